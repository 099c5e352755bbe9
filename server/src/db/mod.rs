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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::Resource;
use async_trait::async_trait;
use usermgmt_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use usermgmt_core::db::sqlite;
use usermgmt_core::db::{DbResult, Executor};

pub(crate) mod memory;
pub(crate) mod users;
#[cfg(test)]
pub(crate) mod tests;

/// Initializes the database schema.
///
/// The schema only creates missing tables so this is safe to call on every startup.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Persistent collection of records of type `R`.
///
/// Every operation is independent from the others: there is no way to group them in a
/// transaction.
#[async_trait]
pub(crate) trait Store<R: Resource>: Send + Sync {
    /// Gets all records in insertion order.
    async fn list(&self) -> DbResult<Vec<R>>;

    /// Gets the record identified by `id`.
    async fn get(&self, id: &R::Id) -> DbResult<R>;

    /// Creates a new record with `fields` and a fresh identifier.
    async fn create(&self, fields: R::Fields) -> DbResult<R>;

    /// Replaces all `fields` of the existing record identified by `id`.
    async fn update(&self, id: &R::Id, fields: R::Fields) -> DbResult<R>;

    /// Deletes the record identified by `id`.  Returns false if there was no such record.
    async fn delete(&self, id: &R::Id) -> DbResult<bool>;
}
