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

//! Declarative validation of untrusted JSON payloads.
//!
//! Services describe the shape they accept as a static `RuleSet` and run `validate` on every
//! incoming payload before it reaches the persistence layer.  Validation never stops at the first
//! problem: all violations are collected, in rule order, so that clients can fix them at once.

use crate::model::{EmailAddress, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

/// A problem found in a single field of a payload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct FieldViolation {
    /// Name of the offending field.
    #[schema(example = "email")]
    pub field: String,

    /// Human-readable explanation of the problem.
    #[schema(example = "email must be a valid email address")]
    pub message: String,
}

/// Ordered collection of field violations.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Creates a collection with a single violation of `field`.
    pub fn single<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        let mut violations = Self::default();
        violations.push(field, message);
        violations
    }

    /// Records a new violation of `field`.
    pub fn push<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.push(FieldViolation { field: field.into(), message: message.into() });
    }

    /// Returns true if no violations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the recorded violations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// The kind of check that a rule applies to its field.
#[derive(Debug)]
pub enum Check {
    /// The field must be a string with at least one non-whitespace character.
    NonEmptyString,

    /// The field must be a string that looks like an email address.
    Email,

    /// The field must be an integral number within `[min, max]`.
    Integer {
        /// Smallest accepted value.
        min: i64,

        /// Largest accepted value.
        max: i64,
    },
}

/// A requirement on a single payload field.  All fields named by rules are mandatory.
#[derive(Debug)]
pub struct Rule {
    /// Name of the field the rule applies to.
    field: &'static str,

    /// What the field's value must satisfy.
    check: Check,
}

impl Rule {
    /// Requires `field` to be a non-empty string.
    pub const fn non_empty_string(field: &'static str) -> Self {
        Self { field, check: Check::NonEmptyString }
    }

    /// Requires `field` to be a valid email address.
    pub const fn email(field: &'static str) -> Self {
        Self { field, check: Check::Email }
    }

    /// Requires `field` to be an integer in the `[min, max]` range.
    pub const fn integer(field: &'static str, min: i64, max: i64) -> Self {
        Self { field, check: Check::Integer { min, max } }
    }

    /// Checks `value`, which is `None` if the field was not present in the payload.
    fn check(&self, value: Option<&Value>) -> Result<(), String> {
        let value = match value {
            None | Some(Value::Null) => return Err(format!("{} is required", self.field)),
            Some(value) => value,
        };

        match self.check {
            Check::NonEmptyString => match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                Some(_) => Err(format!("{} cannot be empty", self.field)),
                None => Err(format!("{} must be a string", self.field)),
            },

            Check::Email => match value.as_str() {
                Some(s) if EmailAddress::new(s).is_ok() => Ok(()),
                Some(_) => Err(format!("{} must be a valid email address", self.field)),
                None => Err(format!("{} must be a string", self.field)),
            },

            Check::Integer { min, max } => match value.as_i64() {
                Some(i) if i < min => {
                    Err(format!("{} must be greater than or equal to {}", self.field, min))
                }
                Some(i) if i > max => {
                    Err(format!("{} must be less than or equal to {}", self.field, max))
                }
                Some(_) => Ok(()),
                // Integers that only fit in a u64 are above any i64 maximum.
                None if value.is_u64() => {
                    Err(format!("{} must be less than or equal to {}", self.field, max))
                }
                None => Err(format!("{} must be an integer", self.field)),
            },
        }
    }
}

/// The complete set of rules that a payload must satisfy.
#[derive(Debug)]
pub struct RuleSet(pub &'static [Rule]);

/// Checks `payload` against every rule in `rules`.
///
/// On success, returns a view of the payload that can be used to extract the validated fields.
pub fn validate<'a>(payload: &'a Value, rules: &RuleSet) -> Result<ValidPayload<'a>, Violations> {
    let object = match payload.as_object() {
        Some(object) => object,
        None => return Err(Violations::single("body", "Request body must be a JSON object")),
    };

    let mut violations = Violations::default();
    for rule in rules.0 {
        if let Err(message) = rule.check(object.get(rule.field)) {
            violations.push(rule.field, message);
        }
    }

    if violations.is_empty() { Ok(ValidPayload(object)) } else { Err(violations) }
}

/// A payload that passed validation.
#[derive(Debug)]
pub struct ValidPayload<'a>(&'a Map<String, Value>);

impl ValidPayload<'_> {
    /// Extracts the string `field`.
    pub fn string(&self, field: &str) -> ModelResult<String> {
        match self.0.get(field).and_then(Value::as_str) {
            Some(s) => Ok(s.to_owned()),
            None => Err(ModelError(format!("Field {} is not a string", field))),
        }
    }

    /// Extracts the integer `field`.
    pub fn integer(&self, field: &str) -> ModelResult<i64> {
        match self.0.get(field).and_then(Value::as_i64) {
            Some(i) => Ok(i),
            None => Err(ModelError(format!("Field {} is not an integer", field))),
        }
    }
}
