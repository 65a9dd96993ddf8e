//! Transport types shared by the admin and project APIs

pub mod error;
pub mod json;
pub mod requests;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{parse_optional_body, Json};
pub use requests::*;
