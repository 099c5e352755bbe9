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

//! REST service to manage users and items.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crate::db::Store;
use crate::db::memory::MemoryStore;
use crate::db::users::SqlUserStore;
use crate::driver::Driver;
use crate::model::{Item, User};
use log::{info, warn};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use usermgmt_core::db::Db;

pub mod db;
mod doc;
pub(crate) mod driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Where to keep the users.  Items are always kept in memory.
pub enum UsersBackend {
    /// Keep users in process memory.  They are lost on exit.
    Memory,

    /// Keep users in the `users` table of a database whose schema is already initialized.
    Database(Arc<dyn Db>),
}

/// Waits for an interrupt from the terminal.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for SIGINT: {}", e);
        futures::future::pending::<()>().await;
    }
}

/// Waits for a termination request, which is how process managers stop services.
#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut signals) => {
            signals.recv().await;
        }
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {}", e);
            futures::future::pending::<()>().await;
        }
    }
}

/// Waits for a termination request.  There is no such thing outside of Unix.
#[cfg(not(unix))]
async fn terminate() {
    futures::future::pending::<()>().await;
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => (),
        () = terminate() => (),
    }
    info!("Shutting down");
}

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    users: UsersBackend,
) -> Result<(), Box<dyn Error>> {
    let (users_store, db): (Arc<dyn Store<User>>, Option<Arc<dyn Db>>) = match users {
        UsersBackend::Memory => (Arc::new(MemoryStore::<User>::default()), None),
        UsersBackend::Database(db) => (Arc::new(SqlUserStore::new(db.clone())), Some(db)),
    };
    let items_store: Arc<dyn Store<Item>> = Arc::new(MemoryStore::<Item>::default());
    let app = app(Driver::new(users_store), Driver::new(items_store));

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    if let Some(db) = db {
        db.close().await;
    }
    Ok(result?)
}
