//! Engine errors
//!
//! Only genuine lookup failures surface as errors. Admission failures are
//! data: a rejected submission returns a REJECTED order the caller can
//! inspect, never an `Err`.

use basketsim_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists: {0}")]
    DuplicateIndex(String),

    #[error(transparent)]
    InvalidIndex(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
