pub mod api;
pub mod cli;
pub mod progress;
pub mod state;
