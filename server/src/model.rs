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

//! High-level data types.

use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use usermgmt_core::model::{EmailAddress, ModelError, ModelResult};
use usermgmt_core::validation::{Rule, RuleSet, ValidPayload, Violations};
use utoipa::ToSchema;
use uuid::Uuid;

/// Largest value that fits in the integer columns of the relational backends.
const MAX_SQL_INT: i64 = i32::MAX as i64;

/// Schema of an entity that is exposed as a REST resource.
///
/// All resources are served by the same generic stores, drivers and handlers, which rely on this
/// trait to learn how to parse identifiers, how to validate payloads and how to assemble records.
pub(crate) trait Resource: Clone + Debug + Send + Serialize + Sync + 'static {
    /// Type of the server-assigned identifier.
    type Id: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Type of the client-provided data, which is everything but the identifier.
    type Fields: Send + 'static;

    /// Human-readable name of the entity, used in error messages.
    const NAME: &'static str;

    /// Path under which the collection of entities is served.
    const COLLECTION: &'static str;

    /// Rules that a payload must satisfy to create a new entity.
    const CREATE_RULES: RuleSet;

    /// Rules that a payload must satisfy to replace an existing entity.
    const UPDATE_RULES: RuleSet;

    /// Parses an identifier received as part of a request path.
    fn parse_id(raw: &str) -> Result<Self::Id, Violations>;

    /// Computes the identifier for a new entity given the `seq`th value of a monotonic counter.
    fn new_id(seq: u64) -> ModelResult<Self::Id>;

    /// Extracts the entity's data out of a validated `payload`.
    fn fields_from(payload: &ValidPayload<'_>) -> ModelResult<Self::Fields>;

    /// Assembles an entity from its parts.
    fn from_parts(id: Self::Id, fields: Self::Fields) -> Self;

    /// Returns the entity's identifier.
    fn id(&self) -> &Self::Id;
}

/// Identifier of a user.  Identifiers assigned by the server are always positive.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct UserId(i32);

impl UserId {
    /// Returns the identifier as an `i32`.
    pub(crate) fn as_i32(self) -> i32 {
        self.0
    }
}

/// Age of a user in years.  We store this as an `i32` because that is what the relational
/// backends use, but guarantee that it is never negative.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct Age(i32);

impl Age {
    /// Creates an age from an untrusted integer with range validation.
    pub(crate) fn new(age: i64) -> ModelResult<Self> {
        match i32::try_from(age) {
            Ok(age) if age >= 0 => Ok(Age(age)),
            _ => Err(ModelError(format!("Age {} is out of range", age))),
        }
    }

    /// Returns the age as an `i32`.
    pub(crate) fn as_i32(self) -> i32 {
        self.0
    }
}

/// A registered user.
#[derive(Clone, Constructor, Debug, PartialEq, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Getters))]
pub(crate) struct User {
    /// Server-assigned identifier.
    #[schema(value_type = i32, example = 1)]
    id: UserId,

    /// Display name.
    #[schema(example = "Jane Doe")]
    name: String,

    /// Contact address.
    #[schema(value_type = String, example = "jane@example.com")]
    email: EmailAddress,

    /// Age in years.
    #[schema(value_type = i32, example = 30, minimum = 0)]
    age: Age,
}

/// The client-provided data of a `User`.
#[derive(Constructor, Debug, Getters)]
pub(crate) struct UserFields {
    /// Display name.
    name: String,

    /// Contact address.
    email: EmailAddress,

    /// Age in years.
    age: Age,
}

impl Resource for User {
    type Id = UserId;
    type Fields = UserFields;

    const NAME: &'static str = "User";
    const COLLECTION: &'static str = "/users";

    const CREATE_RULES: RuleSet = RuleSet(&[
        Rule::non_empty_string("name"),
        Rule::email("email"),
        Rule::integer("age", 1, MAX_SQL_INT),
    ]);

    const UPDATE_RULES: RuleSet = RuleSet(&[
        Rule::non_empty_string("name"),
        Rule::email("email"),
        Rule::integer("age", 0, MAX_SQL_INT),
    ]);

    fn parse_id(raw: &str) -> Result<UserId, Violations> {
        let id = match raw.parse::<i64>() {
            Ok(id) => id,
            Err(_) => return Err(Violations::single("id", "id must be an integer")),
        };
        match i32::try_from(id) {
            Ok(id) => Ok(UserId(id)),
            Err(_) => Err(Violations::single("id", "id is out of range")),
        }
    }

    fn new_id(seq: u64) -> ModelResult<UserId> {
        match i32::try_from(seq) {
            Ok(id) if id > 0 => Ok(UserId(id)),
            _ => Err(ModelError(format!("Cannot assign user id from sequence value {}", seq))),
        }
    }

    fn fields_from(payload: &ValidPayload<'_>) -> ModelResult<UserFields> {
        Ok(UserFields::new(
            payload.string("name")?,
            EmailAddress::new(payload.string("email")?)?,
            Age::new(payload.integer("age")?)?,
        ))
    }

    fn from_parts(id: UserId, fields: UserFields) -> Self {
        let UserFields { name, email, age } = fields;
        Self { id, name, email, age }
    }

    fn id(&self) -> &UserId {
        &self.id
    }
}

/// Identifier of an item: a random UUIDv4 in its textual form.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Constructor))]
#[serde(transparent)]
pub(crate) struct ItemId(String);

impl ItemId {
    /// Returns a string view of the identifier.
    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// A free-form item, unrelated to users.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[cfg_attr(test, derive(Constructor, Deserialize, Getters))]
pub(crate) struct Item {
    /// Server-assigned identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: ItemId,

    /// Short name.
    #[schema(example = "Pen")]
    name: String,

    /// Longer explanation of what the item is.
    #[schema(example = "Writes in blue")]
    description: String,
}

/// The client-provided data of an `Item`.
#[derive(Constructor, Debug)]
pub(crate) struct ItemFields {
    /// Short name.
    name: String,

    /// Longer explanation of what the item is.
    description: String,
}

impl Resource for Item {
    type Id = ItemId;
    type Fields = ItemFields;

    const NAME: &'static str = "Item";
    const COLLECTION: &'static str = "/items";

    const CREATE_RULES: RuleSet =
        RuleSet(&[Rule::non_empty_string("name"), Rule::non_empty_string("description")]);

    const UPDATE_RULES: RuleSet =
        RuleSet(&[Rule::non_empty_string("name"), Rule::non_empty_string("description")]);

    fn parse_id(raw: &str) -> Result<ItemId, Violations> {
        Ok(ItemId(raw.to_owned()))
    }

    fn new_id(_seq: u64) -> ModelResult<ItemId> {
        Ok(ItemId(Uuid::new_v4().to_string()))
    }

    fn fields_from(payload: &ValidPayload<'_>) -> ModelResult<ItemFields> {
        Ok(ItemFields::new(payload.string("name")?, payload.string("description")?))
    }

    fn from_parts(id: ItemId, fields: ItemFields) -> Self {
        let ItemFields { name, description } = fields;
        Self { id, name, description }
    }

    fn id(&self) -> &ItemId {
        &self.id
    }
}
