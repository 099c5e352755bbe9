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

//! Implementation of the store abstraction in memory.

use crate::db::Store;
use crate::model::Resource;
use async_trait::async_trait;
use futures::lock::Mutex;
use usermgmt_core::db::{DbError, DbResult};

/// Contents of a `MemoryStore`.
struct Records<R> {
    /// The records themselves, in insertion order.
    entries: Vec<R>,

    /// Last value handed out by the identifier sequence.
    last_seq: u64,
}

/// A store that keeps all records in process memory.  Contents are lost on exit.
pub(crate) struct MemoryStore<R> {
    /// The records, serialized behind a single lock held for the duration of each operation.
    records: Mutex<Records<R>>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self { records: Mutex::new(Records { entries: vec![], last_seq: 0 }) }
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn list(&self) -> DbResult<Vec<R>> {
        let records = self.records.lock().await;
        Ok(records.entries.clone())
    }

    async fn get(&self, id: &R::Id) -> DbResult<R> {
        let records = self.records.lock().await;
        records.entries.iter().find(|r| r.id() == id).cloned().ok_or(DbError::NotFound)
    }

    async fn create(&self, fields: R::Fields) -> DbResult<R> {
        let mut records = self.records.lock().await;

        // Random identifiers can collide, in which case we just try again.
        let id = loop {
            records.last_seq += 1;
            let id = R::new_id(records.last_seq)?;
            if !records.entries.iter().any(|r| r.id() == &id) {
                break id;
            }
        };

        let record = R::from_parts(id, fields);
        records.entries.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &R::Id, fields: R::Fields) -> DbResult<R> {
        let mut records = self.records.lock().await;
        match records.entries.iter_mut().find(|r| r.id() == id) {
            Some(entry) => {
                *entry = R::from_parts(id.clone(), fields);
                Ok(entry.clone())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&self, id: &R::Id) -> DbResult<bool> {
        let mut records = self.records.lock().await;
        match records.entries.iter().position(|r| r.id() == id) {
            Some(pos) => {
                records.entries.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
