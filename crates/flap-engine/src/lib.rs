pub mod api;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::types::{CollisionPair, EntityId, TimerId, WatchId};
pub use components::entity::Entity;
pub use crate::core::clock::Scheduler;
pub use crate::core::physics::Physics;
pub use crate::core::scene::Scene;
pub use crate::core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue};

// Extensions are decoupled optional systems
pub use extensions::{ease, lerp, Easing, Tween, TweenId, TweenLoop, TweenState, TweenTarget};
