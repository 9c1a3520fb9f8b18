pub mod api;
pub mod config;
pub mod models;
pub mod storage;
pub mod upload;

pub use api::{ApiClient, ApiError, ApiResult};
pub use config::Config;
