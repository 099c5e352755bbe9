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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{Item, Resource, User};
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use usermgmt_core::rest::RestError;

mod api_docs_get;
mod record_delete;
mod record_get;
mod record_put;
mod records_get;
mod records_post;
mod root_get;
mod route_not_found;
#[cfg(test)]
mod testutils;

/// Creates the router that serves the collection and the individual records of the resource `R`.
fn resource_router<R: Resource>(driver: Driver<R>) -> Router {
    let record_path = format!("{}/:id", R::COLLECTION);
    Router::new()
        .route(R::COLLECTION, get(records_get::handler::<R>).post(records_post::handler::<R>))
        .route(
            &record_path,
            get(record_get::handler::<R>)
                .put(record_put::handler::<R>)
                .delete(record_delete::handler::<R>),
        )
        .with_state(driver)
}

/// Converts a panic raised while serving a request into an internal error response.
fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    RestError::InternalError(format!("Handler panicked: {}", details)).into_response()
}

/// Wraps `router` so that panics in its handlers become JSON error responses.
fn catch_panics(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(panic_to_response))
}

/// Creates the router for the application.
pub(crate) fn app(users: Driver<User>, items: Driver<Item>) -> Router {
    let router = Router::new()
        .route("/", get(root_get::handler))
        .route("/api-docs", get(api_docs_get::handler))
        .merge(resource_router(users))
        .merge(resource_router(items))
        .fallback(route_not_found::handler);
    catch_panics(router)
}
