pub mod r#type;
pub mod error;
pub mod logger;

#[macro_use]
pub mod shared;

pub mod math;
pub mod config;
pub mod scene;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use shared::{Shared, SharedWeak};
