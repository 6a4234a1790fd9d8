pub mod commands;
pub mod controller;
pub mod state;
pub mod ticker;

pub use controller::StopwatchController;
pub use state::{LapEngine, TimerStatus};
