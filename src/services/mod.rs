pub use self::errors::{ServiceError, ServiceResult};

pub mod errors;
pub mod progress;
pub mod seed;
