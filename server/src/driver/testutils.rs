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

//! Test utilities for the business layer.

use crate::db::memory::MemoryStore;
use crate::db::tests::user_fields;
use crate::db::users::SqlUserStore;
use crate::db::{Store, init_schema};
use crate::driver::Driver;
use crate::model::{Item, User};
use std::sync::Arc;
use usermgmt_core::db::Db;
use usermgmt_core::db::sqlite;

/// State of a running test.
pub(crate) struct TestContext {
    /// The store holding the users, backed by an in-memory SQLite database.
    users: Arc<dyn Store<User>>,

    /// The store holding the items.
    items: Arc<dyn Store<Item>>,
}

impl TestContext {
    /// Initializes the stores.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let users = Arc::new(SqlUserStore::new(db));
        let items = Arc::new(MemoryStore::<Item>::default());
        Self { users, items }
    }

    /// Gets direct access to the users store.
    pub(crate) fn users(&self) -> &dyn Store<User> {
        self.users.as_ref()
    }

    /// Gets direct access to the items store.
    pub(crate) fn items(&self) -> &dyn Store<Item> {
        self.items.as_ref()
    }

    /// Gets a driver for users.
    pub(crate) fn users_driver(&self) -> Driver<User> {
        Driver::new(self.users.clone())
    }

    /// Gets a driver for items.
    pub(crate) fn items_driver(&self) -> Driver<Item> {
        Driver::new(self.items.clone())
    }

    /// Creates a user straight in the store, bypassing the driver.
    pub(crate) async fn create_user(&self, name: &str, email: &str, age: i64) -> User {
        self.users.create(user_fields(name, email, age)).await.unwrap()
    }
}
