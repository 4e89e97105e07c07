//! Typed API result envelope
//!
//! Binds the outcome of one API operation to exactly one of: a parsed
//! domain value, or an error plus an optional structured status the
//! remote API reported in its failure body. This envelope is the only
//! contract exposed above the transport; callers never inspect raw JSON
//! or transport-specific error types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Codec;
use crate::remote::transport::{FetchOutcome, TransportError};

/// Structured status payload the remote API attaches to failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    /// API-defined status code
    pub status_code: i32,
    /// Human-readable status message
    pub status_message: String,
}

/// Errors surfaced to callers above the envelope
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The remote call itself failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The call succeeded but the payload did not match the expected type
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result container for one API operation
///
/// Holds exactly one of a success value or a failure; a failure may
/// additionally carry the structured status parsed from the error body.
#[derive(Debug, Clone)]
pub enum ApiResponse<T> {
    /// The call succeeded and the payload parsed into the domain type
    Success(T),
    /// The call or the parse failed
    Failure {
        /// What went wrong, distinguishing transport from decode failures
        error: ApiError,
        /// Structured status, when the failure body parsed as one
        api_status: Option<ApiStatus>,
    },
}

impl<T> ApiResponse<T> {
    /// The parsed value, if the operation succeeded
    pub fn ok(&self) -> Option<&T> {
        match self {
            ApiResponse::Success(value) => Some(value),
            ApiResponse::Failure { .. } => None,
        }
    }

    /// The error, if the operation failed
    pub fn err(&self) -> Option<&ApiError> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure { error, .. } => Some(error),
        }
    }

    /// The structured API status, when one was reported
    pub fn api_status(&self) -> Option<&ApiStatus> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure { api_status, .. } => api_status.as_ref(),
        }
    }

    /// True when the operation produced a value
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// Converts into a plain `Result`, discarding the structured status
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure { error, .. } => Err(error),
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Builds an envelope from a raw fetch outcome
    ///
    /// # Behavior
    /// * transport success, payload decodes ⇒ `Success`
    /// * transport success, payload fails to decode ⇒ `Failure` with a
    ///   decode error and no status
    /// * transport failure ⇒ `Failure` with the transport error; the
    ///   failure body, if any, is leniently parsed as a structured status
    pub fn from_outcome<C: Codec>(outcome: FetchOutcome<String>, codec: &C) -> Self {
        let FetchOutcome { source_url, result } = outcome;

        match result {
            Ok(payload) => match codec.decode::<T>(&payload) {
                Ok(value) => ApiResponse::Success(value),
                Err(e) => ApiResponse::Failure {
                    error: ApiError::Decode {
                        url: source_url,
                        message: e.0,
                    },
                    api_status: None,
                },
            },
            Err(error) => {
                let api_status = error
                    .body()
                    .and_then(|body| codec.decode::<ApiStatus>(body).ok());

                ApiResponse::Failure {
                    error: ApiError::Transport(error),
                    api_status,
                }
            }
        }
    }
}
