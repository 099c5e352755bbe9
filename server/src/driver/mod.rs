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

//! Business logic for the service.

use crate::db::Store;
use crate::model::Resource;
use std::sync::Arc;
use usermgmt_core::db::DbError;
use usermgmt_core::driver::DriverError;

mod record;
mod records;
#[cfg(test)]
mod testutils;

/// Business logic for the resource `R`.
///
/// The public operations exposed by the driver are all "one shot": each of them issues at most
/// one store operation.  For this reason, these operations consume the driver.
pub(crate) struct Driver<R: Resource> {
    /// The store that the driver uses for persistence.
    store: Arc<dyn Store<R>>,
}

impl<R: Resource> Clone for Driver<R> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<R: Resource> Driver<R> {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(store: Arc<dyn Store<R>>) -> Self {
        Self { store }
    }

    /// Converts a store error `e` into a driver error that names the resource when a record is
    /// missing.
    fn map_store_error(e: DbError) -> DriverError {
        match e {
            DbError::NotFound => Self::not_found(),
            e => DriverError::from(e),
        }
    }

    /// Returns the error to report when a record of this resource does not exist.
    fn not_found() -> DriverError {
        DriverError::NotFound(format!("{} not found", R::NAME))
    }
}
