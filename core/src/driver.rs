// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic business logic for any service.
//!
//! Every service should implement its own `Driver` type, which receives untrusted inputs from the
//! REST layer, validates them and coordinates the operations against the persistence layer.
//! Drivers hold no state of their own other than handles to their stores, so they are cheap to
//! clone and every operation consumes `self`.

use crate::db::DbError;
use crate::model::ModelError;
use crate::validation::Violations;

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates an error in the input data that is not tied to specific fields.
    #[error("{0}")]
    InvalidInput(String),

    /// Indicates that one or more fields of the input data failed validation.
    #[error("Validation failed: {0}")]
    InvalidFields(Violations),

    /// Indicates that a requested entry does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists => DriverError::BackendError(e.to_string()),
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

impl From<ModelError> for DriverError {
    fn from(e: ModelError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

impl From<Violations> for DriverError {
    fn from(violations: Violations) -> Self {
        DriverError::InvalidFields(violations)
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;
