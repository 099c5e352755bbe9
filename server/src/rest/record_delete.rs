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

//! API to delete one record of a resource.

use crate::driver::Driver;
use crate::model::Resource;
use axum::extract::{Path, State};
use axum::http;
use usermgmt_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler<R: Resource>(
    State(driver): State<Driver<R>>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<http::StatusCode, RestError> {
    driver.delete_record(&id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;
    use usermgmt_core::rest::ErrorResponse;
    use usermgmt_core::rest::testutils::*;
    use usermgmt_core::validation::Violations;

    fn route(collection: &str, id: &str) -> (http::Method, String) {
        (http::Method::DELETE, format!("{}/{}", collection, id))
    }

    #[tokio::test]
    async fn test_user() {
        let context = TestContext::setup().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let other = context.create_user("John", "john@example.com", 40).await;
        let raw_id = user.id().as_i32().to_string();

        OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert_eq!(vec![other], context.list_users().await);

        let get_route = (http::Method::GET, format!("/users/{}", raw_id));
        let response = OneShotBuilder::new(context.app(), get_route)
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error_response()
            .await;
        assert_eq!(ErrorResponse::new("User not found"), response);
    }

    #[tokio::test]
    async fn test_item() {
        let context = TestContext::setup().await;

        let item = context.create_item("Pen", "Writes in blue").await;

        OneShotBuilder::new(context.app(), route("/items", item.id().as_str()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert_eq!(None, context.get_item(item.id()).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        let user = context.create_user("Jane", "jane@example.com", 30).await;
        let raw_id = user.id().as_i32().to_string();

        OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let response = OneShotBuilder::new(context.app(), route("/users", &raw_id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error_response()
            .await;
        assert_eq!(ErrorResponse::new("User not found"), response);

        let response = OneShotBuilder::new(context.app(), route("/items", "whatever"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error_response()
            .await;
        assert_eq!(ErrorResponse::new("Item not found"), response);
    }

    #[tokio::test]
    async fn test_user_id_not_an_integer() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route("/users", "1.5"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error_response()
            .await;
        assert_eq!(Some(Violations::single("id", "id must be an integer")), response.errors);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("/users", "1"));
}
