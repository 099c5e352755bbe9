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

//! Operations on the whole collection of records.

use crate::driver::Driver;
use crate::model::Resource;
use usermgmt_core::driver::DriverResult;
use usermgmt_core::validation::validate;

impl<R: Resource> Driver<R> {
    /// Gets all existing records.
    pub(crate) async fn list_records(self) -> DriverResult<Vec<R>> {
        self.store.list().await.map_err(Self::map_store_error)
    }

    /// Creates a new record out of an untrusted `payload`.
    pub(crate) async fn create_record(self, payload: serde_json::Value) -> DriverResult<R> {
        let fields = {
            let valid = validate(&payload, &R::CREATE_RULES)?;
            R::fields_from(&valid)?
        };
        self.store.create(fields).await.map_err(Self::map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::item_fields;
    use crate::driver::testutils::*;
    use serde_json::json;
    use usermgmt_core::driver::DriverError;
    use usermgmt_core::validation::Violations;

    #[tokio::test]
    async fn test_list_records_empty() {
        let context = TestContext::setup().await;

        assert!(context.users_driver().list_records().await.unwrap().is_empty());
        assert!(context.items_driver().list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_records_some() {
        let context = TestContext::setup().await;

        let user1 = context.create_user("A", "a@example.com", 1).await;
        let user2 = context.create_user("B", "b@example.com", 2).await;
        let item = context.items().create(item_fields("Pen", "Blue")).await.unwrap();

        assert_eq!(vec![user1, user2], context.users_driver().list_records().await.unwrap());
        assert_eq!(vec![item], context.items_driver().list_records().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_user_ok() {
        let context = TestContext::setup().await;

        let user = context
            .users_driver()
            .create_record(json!({"name": "Jane", "email": "jane@example.com", "age": 30}))
            .await
            .unwrap();
        assert_eq!("Jane", user.name());
        assert_eq!("jane@example.com", user.email().as_str());
        assert_eq!(30, user.age().as_i32());

        assert_eq!(user, context.users().get(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_user_ignores_client_id() {
        let context = TestContext::setup().await;

        let payload = json!({"id": 500, "name": "Jane", "email": "jane@example.com", "age": 30});
        let user = context.users_driver().create_record(payload).await.unwrap();
        assert_ne!(500, user.id().as_i32());
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let context = TestContext::setup().await;

        let err = context
            .users_driver()
            .create_record(json!({"name": "Jane", "email": "not-an-email", "age": 30}))
            .await
            .unwrap_err();
        assert_eq!(
            DriverError::InvalidFields(Violations::single(
                "email",
                "email must be a valid email address"
            )),
            err
        );

        assert!(context.users().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_zero_age() {
        let context = TestContext::setup().await;

        let err = context
            .users_driver()
            .create_record(json!({"name": "Jane", "email": "jane@example.com", "age": 0}))
            .await
            .unwrap_err();
        assert_eq!(
            DriverError::InvalidFields(Violations::single(
                "age",
                "age must be greater than or equal to 1"
            )),
            err
        );
    }

    #[tokio::test]
    async fn test_create_item_ok() {
        let context = TestContext::setup().await;

        let item = context
            .items_driver()
            .create_record(json!({"name": "Pen", "description": "Blue"}))
            .await
            .unwrap();
        assert_eq!("Pen", item.name());
        assert_eq!("Blue", item.description());

        assert_eq!(item, context.items().get(item.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_item_missing_fields() {
        let context = TestContext::setup().await;

        let mut exp_violations = Violations::single("name", "name is required");
        exp_violations.push("description", "description is required");
        assert_eq!(
            DriverError::InvalidFields(exp_violations),
            context.items_driver().create_record(json!({})).await.unwrap_err()
        );
    }
}
