pub mod category;
pub mod config;
pub mod progress;
pub mod room;
