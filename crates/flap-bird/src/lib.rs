pub mod bird;
pub mod config;
pub mod pipes;
pub mod score;
pub mod session;

pub use bird::BirdController;
pub use config::Tuning;
pub use pipes::{ObstacleField, PipePair};
pub use score::ScoreKeeper;
pub use session::{GameSession, Status, TimerAction};
