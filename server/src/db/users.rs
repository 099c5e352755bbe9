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

//! Implementation of the user store on top of a relational database.

use crate::db::Store;
use crate::model::{Age, User, UserFields, UserId};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::sync::Arc;
use usermgmt_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use usermgmt_core::db::sqlite;
use usermgmt_core::db::{Db, DbError, DbResult, Executor};
use usermgmt_core::model::EmailAddress;

impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let age: i32 = row.try_get("age").map_err(postgres::map_sqlx_error)?;

        Ok(User::new(UserId::new(id), name, EmailAddress::new(email)?, Age::new(i64::from(age))?))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let age: i64 = row.try_get("age").map_err(sqlite::map_sqlx_error)?;

        Ok(User::new(UserId::new(id), name, EmailAddress::new(email)?, Age::new(age)?))
    }
}

/// A user store backed by the `users` table of a database.
///
/// Every operation is a single statement, so there is no need for explicit transactions.
pub(crate) struct SqlUserStore {
    /// The database holding the `users` table.
    db: Arc<dyn Db>,
}

impl SqlUserStore {
    /// Creates a new store backed by `db`, whose schema must already be initialized.
    pub(crate) fn new(db: Arc<dyn Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store<User> for SqlUserStore {
    async fn list(&self) -> DbResult<Vec<User>> {
        let mut users = vec![];
        match self.db.ex().await? {
            Executor::Postgres(mut ex) => {
                let query_str = "SELECT id, name, email, age FROM users ORDER BY id";
                let mut rows = sqlx::query(query_str).fetch(&mut *ex);
                while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                    users.push(User::try_from(row)?);
                }
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(mut ex) => {
                let query_str = "SELECT id, name, email, age FROM users ORDER BY id";
                let mut rows = sqlx::query(query_str).fetch(&mut *ex);
                while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                    users.push(User::try_from(row)?);
                }
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
        Ok(users)
    }

    async fn get(&self, id: &UserId) -> DbResult<User> {
        let maybe_user = match self.db.ex().await? {
            Executor::Postgres(mut ex) => {
                let query_str = "SELECT id, name, email, age FROM users WHERE id = $1";
                sqlx::query(query_str)
                    .bind(id.as_i32())
                    .fetch_optional(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?
                    .map(User::try_from)
                    .transpose()?
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(mut ex) => {
                let query_str = "SELECT id, name, email, age FROM users WHERE id = ?";
                sqlx::query(query_str)
                    .bind(id.as_i32())
                    .fetch_optional(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?
                    .map(User::try_from)
                    .transpose()?
            }

            #[allow(unused)]
            _ => unreachable!(),
        };
        maybe_user.ok_or(DbError::NotFound)
    }

    async fn create(&self, fields: UserFields) -> DbResult<User> {
        match self.db.ex().await? {
            Executor::Postgres(mut ex) => {
                let query_str = "
                    INSERT INTO users (name, email, age) VALUES ($1, $2, $3)
                    RETURNING id, name, email, age
                ";
                let row = sqlx::query(query_str)
                    .bind(fields.name())
                    .bind(fields.email().as_str())
                    .bind(fields.age().as_i32())
                    .fetch_one(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                User::try_from(row)
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(mut ex) => {
                let query_str = "
                    INSERT INTO users (name, email, age) VALUES (?, ?, ?)
                    RETURNING id, name, email, age
                ";
                let row = sqlx::query(query_str)
                    .bind(fields.name())
                    .bind(fields.email().as_str())
                    .bind(fields.age().as_i32())
                    .fetch_one(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                User::try_from(row)
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    async fn update(&self, id: &UserId, fields: UserFields) -> DbResult<User> {
        let maybe_user = match self.db.ex().await? {
            Executor::Postgres(mut ex) => {
                let query_str = "
                    UPDATE users SET name = $1, email = $2, age = $3 WHERE id = $4
                    RETURNING id, name, email, age
                ";
                sqlx::query(query_str)
                    .bind(fields.name())
                    .bind(fields.email().as_str())
                    .bind(fields.age().as_i32())
                    .bind(id.as_i32())
                    .fetch_optional(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?
                    .map(User::try_from)
                    .transpose()?
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(mut ex) => {
                let query_str = "
                    UPDATE users SET name = ?, email = ?, age = ? WHERE id = ?
                    RETURNING id, name, email, age
                ";
                sqlx::query(query_str)
                    .bind(fields.name())
                    .bind(fields.email().as_str())
                    .bind(fields.age().as_i32())
                    .bind(id.as_i32())
                    .fetch_optional(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?
                    .map(User::try_from)
                    .transpose()?
            }

            #[allow(unused)]
            _ => unreachable!(),
        };
        maybe_user.ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: &UserId) -> DbResult<bool> {
        let rows_affected = match self.db.ex().await? {
            Executor::Postgres(mut ex) => {
                let query_str = "DELETE FROM users WHERE id = $1";
                let done = sqlx::query(query_str)
                    .bind(id.as_i32())
                    .execute(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                done.rows_affected()
            }

            #[cfg(any(feature = "sqlite", test))]
            Executor::Sqlite(mut ex) => {
                let query_str = "DELETE FROM users WHERE id = ?";
                let done = sqlx::query(query_str)
                    .bind(id.as_i32())
                    .execute(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                done.rows_affected()
            }

            #[allow(unused)]
            _ => unreachable!(),
        };

        match rows_affected {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
        }
    }
}
