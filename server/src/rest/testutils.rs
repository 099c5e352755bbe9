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

//! Test utilities for the REST API.

use crate::db::memory::MemoryStore;
use crate::db::tests::{item_fields, user_fields};
use crate::db::users::SqlUserStore;
use crate::db::{Store, init_schema};
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use std::sync::Arc;
use usermgmt_core::db::sqlite;
use usermgmt_core::db::{Db, Executor};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the users, if any.
    db: Option<Arc<dyn Db>>,

    /// The store holding the users.
    users: Arc<dyn Store<User>>,

    /// The store holding the items.
    items: Arc<dyn Store<Item>>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Builds the app on top of the given stores.
    fn new(
        db: Option<Arc<dyn Db>>,
        users: Arc<dyn Store<User>>,
        items: Arc<dyn Store<Item>>,
    ) -> Self {
        let app = app(Driver::new(users.clone()), Driver::new(items.clone()));
        Self { db, users, items, app }
    }

    /// Initializes the app with users backed by an in-memory SQLite database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db> = Arc::new(sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let users = Arc::new(SqlUserStore::new(db.clone()));
        Self::new(Some(db), users, Arc::new(MemoryStore::<Item>::default()))
    }

    /// Initializes the app with users kept in memory.
    pub(crate) async fn setup_in_memory() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        Self::new(
            None,
            Arc::new(MemoryStore::<User>::default()),
            Arc::new(MemoryStore::<Item>::default()),
        )
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Closes the database so that any further user operations fail.
    pub(crate) async fn break_db(&self) {
        self.db.as_ref().expect("Only available with a database").close().await;
    }

    /// Runs the raw `sql` statements against the database backing the users.
    pub(crate) async fn exec_sql(&self, sql: &str) {
        let db = self.db.as_ref().expect("Only available with a database");
        match &mut db.ex().await.unwrap() {
            Executor::Sqlite(ex) => sqlite::run_schema(ex, sql).await.unwrap(),
            _ => panic!("Test databases are always SQLite"),
        }
    }

    pub(crate) async fn create_user(&self, name: &str, email: &str, age: i64) -> User {
        self.users.create(user_fields(name, email, age)).await.unwrap()
    }

    pub(crate) async fn get_user(&self, id: &UserId) -> Option<User> {
        self.users.get(id).await.ok()
    }

    pub(crate) async fn list_users(&self) -> Vec<User> {
        self.users.list().await.unwrap()
    }

    pub(crate) async fn create_item(&self, name: &str, description: &str) -> Item {
        self.items.create(item_fields(name, description)).await.unwrap()
    }

    pub(crate) async fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.items.get(id).await.ok()
    }

    pub(crate) async fn list_items(&self) -> Vec<Item> {
        self.items.list().await.unwrap()
    }
}
