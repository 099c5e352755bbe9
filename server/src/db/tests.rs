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

//! Store tests shared by all implementations.

use crate::db::Store;
use crate::model::*;
use std::collections::HashSet;
use std::sync::Arc;
use usermgmt_core::db::DbError;
use usermgmt_core::model::EmailAddress;

/// Builds the fields of a user for testing purposes.
pub(crate) fn user_fields(name: &str, email: &str, age: i64) -> UserFields {
    UserFields::new(name.to_owned(), EmailAddress::new(email).unwrap(), Age::new(age).unwrap())
}

/// Builds the fields of an item for testing purposes.
pub(crate) fn item_fields(name: &str, description: &str) -> ItemFields {
    ItemFields::new(name.to_owned(), description.to_owned())
}

pub(crate) async fn test_users_create_and_get(store: Arc<dyn Store<User>>) {
    let user = store.create(user_fields("Jane", "jane@example.com", 30)).await.unwrap();
    assert!(user.id().as_i32() > 0);
    assert_eq!("Jane", user.name());
    assert_eq!("jane@example.com", user.email().as_str());
    assert_eq!(30, user.age().as_i32());

    assert_eq!(user, store.get(user.id()).await.unwrap());
}

pub(crate) async fn test_users_ids_are_unique(store: Arc<dyn Store<User>>) {
    let user1 = store.create(user_fields("A", "a@example.com", 1)).await.unwrap();
    let user2 = store.create(user_fields("B", "b@example.com", 2)).await.unwrap();
    let user3 = store.create(user_fields("A", "a@example.com", 1)).await.unwrap();

    assert_ne!(user1.id(), user2.id());
    assert_ne!(user1.id(), user3.id());
    assert_ne!(user2.id(), user3.id());
}

pub(crate) async fn test_users_concurrent_creates_get_unique_ids(store: Arc<dyn Store<User>>) {
    let mut handles = vec![];
    for i in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let email = format!("user{}@example.com", i);
            store.create(user_fields("Concurrent", &email, 20)).await.unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let user = handle.await.unwrap();
        assert!(ids.insert(user.id().as_i32()), "Duplicate id {:?}", user.id());
    }
    assert_eq!(40, store.list().await.unwrap().len());
}

pub(crate) async fn test_users_ids_not_reused_after_delete(store: Arc<dyn Store<User>>) {
    let user1 = store.create(user_fields("A", "a@example.com", 1)).await.unwrap();
    assert!(store.delete(user1.id()).await.unwrap());

    let user2 = store.create(user_fields("B", "b@example.com", 2)).await.unwrap();
    assert_ne!(user1.id(), user2.id());
}

pub(crate) async fn test_users_list_in_insertion_order(store: Arc<dyn Store<User>>) {
    assert!(store.list().await.unwrap().is_empty());

    let user1 = store.create(user_fields("First", "first@example.com", 10)).await.unwrap();
    let user2 = store.create(user_fields("Second", "second@example.com", 20)).await.unwrap();
    let user3 = store.create(user_fields("Third", "third@example.com", 30)).await.unwrap();

    assert_eq!(vec![user1, user2, user3], store.list().await.unwrap());
}

pub(crate) async fn test_users_get_not_found(store: Arc<dyn Store<User>>) {
    store.create(user_fields("Jane", "jane@example.com", 30)).await.unwrap();

    assert_eq!(DbError::NotFound, store.get(&UserId::new(9999)).await.unwrap_err());
}

pub(crate) async fn test_users_update_replaces_all_fields(store: Arc<dyn Store<User>>) {
    let user = store.create(user_fields("Jane", "jane@example.com", 30)).await.unwrap();
    let other = store.create(user_fields("John", "john@example.com", 40)).await.unwrap();

    let updated =
        store.update(user.id(), user_fields("Janet", "janet@example.org", 0)).await.unwrap();
    assert_eq!(user.id(), updated.id());
    assert_eq!("Janet", updated.name());
    assert_eq!("janet@example.org", updated.email().as_str());
    assert_eq!(0, updated.age().as_i32());

    assert_eq!(updated, store.get(user.id()).await.unwrap());
    assert_eq!(other, store.get(other.id()).await.unwrap());
}

pub(crate) async fn test_users_update_not_found_does_not_create(store: Arc<dyn Store<User>>) {
    let id = UserId::new(9999);
    assert_eq!(
        DbError::NotFound,
        store.update(&id, user_fields("Jane", "jane@example.com", 30)).await.unwrap_err()
    );

    assert!(store.list().await.unwrap().is_empty());
}

pub(crate) async fn test_users_delete(store: Arc<dyn Store<User>>) {
    let user = store.create(user_fields("Jane", "jane@example.com", 30)).await.unwrap();
    let other = store.create(user_fields("John", "john@example.com", 40)).await.unwrap();

    assert!(store.delete(user.id()).await.unwrap());
    assert_eq!(DbError::NotFound, store.get(user.id()).await.unwrap_err());
    assert!(!store.delete(user.id()).await.unwrap());

    assert_eq!(vec![other], store.list().await.unwrap());
}

pub(crate) async fn test_items_crud(store: Arc<dyn Store<Item>>) {
    assert!(store.list().await.unwrap().is_empty());

    let item1 = store.create(item_fields("Pen", "Writes in blue")).await.unwrap();
    let item2 = store.create(item_fields("Pencil", "Writes in grey")).await.unwrap();
    assert_ne!(item1.id(), item2.id());
    assert_eq!(item1, store.get(item1.id()).await.unwrap());
    assert_eq!(vec![item1.clone(), item2.clone()], store.list().await.unwrap());

    let updated = store.update(item1.id(), item_fields("Marker", "Writes in red")).await.unwrap();
    assert_eq!(item1.id(), updated.id());
    assert_eq!("Marker", updated.name());
    assert_eq!("Writes in red", updated.description());
    assert_eq!(vec![updated.clone(), item2.clone()], store.list().await.unwrap());

    assert!(store.delete(item1.id()).await.unwrap());
    assert!(!store.delete(item1.id()).await.unwrap());
    assert_eq!(vec![item2], store.list().await.unwrap());
}

pub(crate) async fn test_items_not_found(store: Arc<dyn Store<Item>>) {
    let id = ItemId::new("no-such-item".to_owned());

    assert_eq!(DbError::NotFound, store.get(&id).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        store.update(&id, item_fields("Pen", "Writes in blue")).await.unwrap_err()
    );
    assert!(!store.delete(&id).await.unwrap());
    assert!(store.list().await.unwrap().is_empty());
}

#[macro_export]
macro_rules! generate_user_store_tests [
    ( $setup:expr $(, #[$extra:meta])? ) => {
        usermgmt_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            $crate::db::tests,
            test_users_create_and_get,
            test_users_ids_are_unique,
            test_users_concurrent_creates_get_unique_ids,
            test_users_ids_not_reused_after_delete,
            test_users_list_in_insertion_order,
            test_users_get_not_found,
            test_users_update_replaces_all_fields,
            test_users_update_not_found_does_not_create,
            test_users_delete
        );
    }
];

pub(crate) use generate_user_store_tests;

#[macro_export]
macro_rules! generate_item_store_tests [
    ( $setup:expr $(, #[$extra:meta])? ) => {
        usermgmt_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            $crate::db::tests,
            test_items_crud,
            test_items_not_found
        );
    }
];

pub(crate) use generate_item_store_tests;
