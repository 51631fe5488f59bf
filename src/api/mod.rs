pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use handlers::*;
