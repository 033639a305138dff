//! Content flags for collision filtering.
//!
//! Every piece of world geometry carries a set of content flags. Movement
//! queries carry a mask and only ever see geometry whose contents intersect
//! it, so trigger-only volumes stay invisible to the character hull.

use serde::{Deserialize, Serialize};

/// What a brush is made of, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// No contents.
    pub const EMPTY: Self = Self(0);

    /// Static level geometry.
    pub const SOLID: Self = Self(1 << 0);

    /// Blocks characters but nothing else (invisible walls).
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Moving or otherwise non-static solid geometry (doors, platforms).
    pub const DYNAMIC: Self = Self(1 << 2);

    /// Trigger volume. Never blocks movement.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Everything a character hull collides with.
    pub const MASK_MOVEMENT: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0 | Self::DYNAMIC.0);

    /// All bits of `other` are set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// At least one bit of `other` is set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// These flags with the bits of `other` cleared.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether geometry with these contents blocks a query using `mask`.
    ///
    /// Volumes that are nothing but triggers never block, even when a caller
    /// passes a mask that includes [`ContentFlags::TRIGGER`].
    #[inline]
    pub fn blocks(self, mask: Self) -> bool {
        let solid_part = self.difference(Self::TRIGGER);
        solid_part.intersects(mask)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_flags() {
        let solid = ContentFlags::SOLID;
        let clip = ContentFlags::PLAYER_CLIP;
        let combined = solid | clip;

        assert!(combined.contains(solid));
        assert!(combined.contains(clip));
        assert!(!combined.contains(ContentFlags::TRIGGER));
        assert!(combined.intersects(solid));
    }

    #[test]
    fn test_movement_mask() {
        let mask = ContentFlags::MASK_MOVEMENT;
        assert!(mask.contains(ContentFlags::SOLID));
        assert!(mask.contains(ContentFlags::PLAYER_CLIP));
        assert!(!mask.contains(ContentFlags::TRIGGER));
    }

    #[test]
    fn test_trigger_never_blocks() {
        let all = ContentFlags(u32::MAX);
        assert!(!ContentFlags::TRIGGER.blocks(all));
        assert!((ContentFlags::TRIGGER | ContentFlags::SOLID).blocks(ContentFlags::SOLID));
        assert!(!ContentFlags::PLAYER_CLIP.blocks(ContentFlags::SOLID));
    }
}
