// Error types shared by the route handlers

use thiserror::Error;

use crate::model::MalformedId;
use crate::store::StoreError;
use crate::validation::FieldError;

/// Failure of a single API request
///
/// Every variant maps to exactly one HTTP status; see
/// [`crate::api::response::error_response`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields failed validation (400)
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The requested document does not exist (400)
    #[error("{0}")]
    NotFound(String),

    /// A path identifier could not be parsed (400)
    #[error(transparent)]
    MalformedId(#[from] MalformedId),

    /// The request body could not be read or decoded (400)
    #[error("{0}")]
    BadRequest(String),

    /// The request body exceeds the configured limit (413)
    #[error("request body too large")]
    PayloadTooLarge,

    /// Missing or unknown credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else, reported to the client as a generic 500
    #[error("store error: {0}")]
    Internal(#[from] StoreError),
}

impl ApiError {
    pub fn no_profile() -> Self {
        Self::NotFound("There is no profile for this user".to_string())
    }

    pub fn profile_not_found() -> Self {
        Self::NotFound("Profile not found".to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
