use crate::api::types::EntityId;
use glam::Vec2;

/// Fat entity: one struct carrying the full capability set the
/// simulation needs: position, velocity, rotation, an AABB size for
/// overlap tests, and the arcade flags.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by role.
    pub tag: String,
    /// Logical liveness flag. Game-level scans skip inactive entities;
    /// physics does not (a retired obstacle still collides).
    pub active: bool,
    /// Center position in world space (y-down).
    pub pos: Vec2,
    /// Linear velocity in world units per second.
    pub vel: Vec2,
    /// Full AABB extent (width, height) centered on `pos`.
    pub size: Vec2,
    /// Rotation in radians. Display-only; does not rotate the AABB.
    pub rotation: f32,
    /// Whether the world gravity accelerates this entity.
    pub gravity_enabled: bool,
    /// Immovable entities participate in overlap tests but are never
    /// displaced by contact.
    pub immovable: bool,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::ONE,
            rotation: 0.0,
            gravity_enabled: false,
            immovable: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.gravity_enabled = enabled;
        self
    }

    pub fn with_immovable(mut self, immovable: bool) -> Self {
        self.immovable = immovable;
        self
    }

    /// Whether two entity AABBs overlap.
    pub fn overlaps(&self, other: &Entity) -> bool {
        let half_a = self.size * 0.5;
        let half_b = other.size * 0.5;
        (self.pos.x - other.pos.x).abs() < half_a.x + half_b.x
            && (self.pos.y - other.pos.y).abs() < half_a.y + half_b.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let e = Entity::new(EntityId(1))
            .with_tag("bird")
            .with_pos(Vec2::new(10.0, 20.0))
            .with_size(Vec2::new(4.0, 4.0))
            .with_gravity(true)
            .with_immovable(true);
        assert_eq!(e.tag, "bird");
        assert_eq!(e.pos, Vec2::new(10.0, 20.0));
        assert!(e.gravity_enabled);
        assert!(e.immovable);
        assert!(e.active);
    }

    #[test]
    fn overlap_is_strict() {
        let a = Entity::new(EntityId(1)).with_size(Vec2::new(10.0, 10.0));
        let mut b = Entity::new(EntityId(2)).with_size(Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));

        // Exactly touching edges do not count as overlap
        b.pos.x = 10.0;
        assert!(!a.overlaps(&b));

        b.pos.x = 9.9;
        assert!(a.overlaps(&b));
    }
}
