// extensions/mod.rs
//
// Optional systems decoupled from core Entity/Scene internals.
// Games opt in by owning these state structs themselves.

pub mod easing;
pub mod tween;

pub use easing::{ease, lerp, Easing};
pub use tween::{Tween, TweenId, TweenLoop, TweenState, TweenTarget};
