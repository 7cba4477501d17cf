pub mod category;
pub mod progress;
pub mod room;
pub mod types;
