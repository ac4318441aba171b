//! Shared HTTP building blocks

mod api_response;
mod validated_json;

pub use api_response::{domain_error_response, ApiError, ApiResponse, MessageResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
