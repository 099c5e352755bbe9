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

//! Entry point to the service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{error, info};
use std::error::Error;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::sync::Arc;
use usermgmt::db::init_schema;
use usermgmt::{UsersBackend, serve};
use usermgmt_core::db::Db;
use usermgmt_core::db::postgres::{PostgresDb, PostgresOptions};
use usermgmt_core::env::{Value, get_optional_var};

/// Port to listen on when `SERVER_PORT` is not set.
const DEFAULT_PORT: u16 = 5000;

/// Storage backends that can hold the users.
#[derive(Debug, PartialEq)]
enum BackendKind {
    /// Users are kept in memory.
    Memory,

    /// Users are kept in a PostgreSQL database.
    Postgres,
}

impl TryFrom<Value> for BackendKind {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let name = String::try_from(value)?;
        match name.as_str() {
            "memory" => Ok(BackendKind::Memory),
            "postgres" => Ok(BackendKind::Postgres),
            _ => Err(format!("Unknown backend '{}'; must be one of memory or postgres", name)),
        }
    }
}

/// Configuration of the service, as read from the environment.
#[derive(Debug, PartialEq)]
struct Config {
    /// Port to listen on, on all interfaces.
    port: u16,

    /// Where to keep the users.
    backend: BackendKind,
}

impl Config {
    /// Reads the configuration from the `SERVER_PORT` and `USERS_BACKEND` variables.
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: get_optional_var::<u16>("SERVER", "PORT")?.unwrap_or(DEFAULT_PORT),
            backend: get_optional_var::<BackendKind>("USERS", "BACKEND")?
                .unwrap_or(BackendKind::Postgres),
        })
    }
}

/// Connects to the database configured via `DB_*` variables and prepares its schema.
async fn connect_db() -> Result<Arc<dyn Db>, Box<dyn Error>> {
    let opts = PostgresOptions::from_env("DB")?;
    let db = PostgresDb::connect(opts).await?;

    let schema_result = match db.ex().await {
        Ok(mut ex) => init_schema(&mut ex).await,
        Err(e) => Err(e),
    };
    if let Err(e) = schema_result {
        db.close().await;
        return Err(format!("Cannot initialize database schema: {}", e).into());
    }
    info!("Database schema ready");

    Ok(Arc::new(db))
}

/// Starts the service and runs it until it is asked to terminate.
async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    let users = match config.backend {
        BackendKind::Memory => {
            info!("Keeping users in memory");
            UsersBackend::Memory
        }
        BackendKind::Postgres => UsersBackend::Database(connect_db().await?),
    };

    serve((Ipv4Addr::UNSPECIFIED, config.port), users).await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
