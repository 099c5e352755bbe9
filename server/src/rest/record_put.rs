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

//! API to replace the contents of one record of a resource.

use crate::driver::Driver;
use crate::model::Resource;
use axum::Json;
use axum::extract::{Path, State};
use usermgmt_core::rest::{JsonPayload, RestError};

/// API handler.
pub(crate) async fn handler<R: Resource>(
    State(driver): State<Driver<R>>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<R>, RestError> {
    let record = driver.update_record(&id, payload).await?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use serde_json::json;
    use usermgmt_core::rest::ErrorResponse;
    use usermgmt_core::rest::testutils::*;
    use usermgmt_core::validation::Violations;

    fn route(collection: &str, id: &str) -> (http::Method, String) {
        (http::Method::PUT, format!("{}/{}", collection, id))
    }

    #[tokio::test]
    async fn test_user() {
        let context = TestContext::setup().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let other = context.create_user("John", "john@example.com", 40).await;
        let raw_id = user.id().as_i32().to_string();

        let request = json!({"name": "Janet", "email": "janet@example.org", "age": 0});
        let response = OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_json(request)
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(user.id(), response.id());
        assert_eq!("Janet", response.name());
        assert_eq!("janet@example.org", response.email().as_str());
        assert_eq!(0, response.age().as_i32());

        assert_eq!(Some(response), context.get_user(user.id()).await);
        assert_eq!(Some(other.clone()), context.get_user(other.id()).await);
    }

    #[tokio::test]
    async fn test_user_in_memory() {
        let context = TestContext::setup_in_memory().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let raw_id = user.id().as_i32().to_string();

        let request = json!({"name": "Janet", "email": "janet@example.org", "age": 31});
        let response = OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_json(request)
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(Some(response), context.get_user(user.id()).await);
    }

    #[tokio::test]
    async fn test_item() {
        let context = TestContext::setup().await;

        let item = context.create_item("Pen", "Writes in blue").await;

        let request = json!({"name": "Marker", "description": "Writes in red"});
        let response = OneShotBuilder::new(context.app(), route("/items", item.id().as_str()))
            .send_json(request)
            .await
            .expect_json::<Item>()
            .await;
        assert_eq!(item.id(), response.id());
        assert_eq!("Marker", response.name());
        assert_eq!("Writes in red", response.description());

        assert_eq!(Some(response), context.get_item(item.id()).await);
    }

    #[tokio::test]
    async fn test_not_found_does_not_create() {
        let context = TestContext::setup().await;

        let request = json!({"name": "Jane", "email": "jane@example.com", "age": 30});
        let response = OneShotBuilder::new(context.app(), route("/users", "12"))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error_response()
            .await;
        assert_eq!(ErrorResponse::new("User not found"), response);
        assert!(context.list_users().await.is_empty());

        let request = json!({"name": "Pen", "description": "Writes in blue"});
        let response = OneShotBuilder::new(context.app(), route("/items", "12"))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error_response()
            .await;
        assert_eq!(ErrorResponse::new("Item not found"), response);
        assert!(context.list_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_payload_is_rejected() {
        let context = TestContext::setup().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let raw_id = user.id().as_i32().to_string();

        let response = OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_json(json!({"age": 31}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error_response()
            .await;
        let mut exp_violations = Violations::single("name", "name is required");
        exp_violations.push("email", "email is required");
        assert_eq!(Some(exp_violations), response.errors);

        assert_eq!(Some(user.clone()), context.get_user(user.id()).await);
    }

    #[tokio::test]
    async fn test_negative_age() {
        let context = TestContext::setup().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let raw_id = user.id().as_i32().to_string();

        let request = json!({"name": "Jane", "email": "jane@example.com", "age": -1});
        let response = OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error_response()
            .await;
        assert_eq!(
            Some(Violations::single("age", "age must be greater than or equal to 0")),
            response.errors
        );
    }

    #[tokio::test]
    async fn test_user_id_not_an_integer() {
        let context = TestContext::setup().await;

        let request = json!({"name": "Jane", "email": "jane@example.com", "age": 30});
        let response = OneShotBuilder::new(context.app(), route("/users", "first"))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error_response()
            .await;
        assert_eq!(Some(Violations::single("id", "id must be an integer")), response.errors);
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route("/users", "1"));
}
