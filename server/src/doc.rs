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

//! OpenAPI documentation of the REST API.
//!
//! Records and error bodies derive their schemas where they are defined.  Payloads are untyped JSON
//! until validated, so their schemas live here, and the operations below are stubs that only exist
//! to carry the documentation of the real, generic handlers in the `rest` module.

#![allow(dead_code)]

use crate::model::{Item, User};
use usermgmt_core::rest::ErrorResponse;
use usermgmt_core::validation::FieldViolation;
use utoipa::{OpenApi, ToSchema};

/// Contents of a user as provided by clients.  All fields are required.
#[derive(ToSchema)]
#[schema(as = UserPayload)]
struct UserPayloadSchema {
    /// Display name.  Cannot be empty.
    #[schema(example = "Jane Doe")]
    name: String,

    /// Contact address.
    #[schema(example = "jane@example.com", max_length = 254)]
    email: String,

    /// Age in years.  Must be positive on creation and non-negative on updates.
    #[schema(example = 30, minimum = 0)]
    age: i32,
}

/// Contents of an item as provided by clients.  All fields are required.
#[derive(ToSchema)]
#[schema(as = ItemPayload)]
struct ItemPayloadSchema {
    /// Short name.  Cannot be empty.
    #[schema(example = "Pen")]
    name: String,

    /// Longer explanation of what the item is.  Cannot be empty.
    #[schema(example = "Writes in blue")]
    description: String,
}

/// Greets visitors.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = String, content_type = "text/plain")
    ),
    tag = "meta"
)]
fn welcome() {}

/// Lists all users in creation order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "users"
)]
fn list_users() {}

/// Creates a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayloadSchema,
    responses(
        (status = 201, description = "The created user", body = User),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "users"
)]
fn create_user() {}

/// Gets one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "users"
)]
fn get_user() {}

/// Replaces all the fields of one user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = UserPayloadSchema,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 400, description = "Invalid identifier or payload", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "users"
)]
fn update_user() {}

/// Deletes one user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 204, description = "The user was deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "users"
)]
fn delete_user() {}

/// Lists all items in creation order.
#[utoipa::path(
    get,
    path = "/items",
    responses((status = 200, description = "All items", body = [Item])),
    tag = "items"
)]
fn list_items() {}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = ItemPayloadSchema,
    responses(
        (status = 201, description = "The created item", body = Item),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "items"
)]
fn create_item() {}

/// Gets one item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "No such item", body = ErrorResponse)
    ),
    tag = "items"
)]
fn get_item() {}

/// Replaces all the fields of one item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = ItemPayloadSchema,
    responses(
        (status = 200, description = "The updated item", body = Item),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "No such item", body = ErrorResponse)
    ),
    tag = "items"
)]
fn update_item() {}

/// Deletes one item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "The item was deleted"),
        (status = 404, description = "No such item", body = ErrorResponse)
    ),
    tag = "items"
)]
fn delete_item() {}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Management API",
        description = "CRUD operations on users and items."
    ),
    paths(
        welcome,
        list_users,
        create_user,
        get_user,
        update_user,
        delete_user,
        list_items,
        create_item,
        get_item,
        update_item,
        delete_item,
    ),
    components(schemas(
        User,
        UserPayloadSchema,
        Item,
        ItemPayloadSchema,
        FieldViolation,
        ErrorResponse,
    )),
    tags(
        (name = "meta", description = "Information about the service"),
        (name = "users", description = "Operations on users"),
        (name = "items", description = "Operations on items")
    )
)]
pub(crate) struct ApiDoc;
