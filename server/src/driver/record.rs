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

//! Operations on one record.

use crate::driver::Driver;
use crate::model::Resource;
use usermgmt_core::driver::DriverResult;
use usermgmt_core::validation::validate;

impl<R: Resource> Driver<R> {
    /// Deletes the record identified by the untrusted `raw_id`.
    pub(crate) async fn delete_record(self, raw_id: &str) -> DriverResult<()> {
        let id = R::parse_id(raw_id)?;
        if self.store.delete(&id).await.map_err(Self::map_store_error)? {
            Ok(())
        } else {
            Err(Self::not_found())
        }
    }

    /// Gets the record identified by the untrusted `raw_id`.
    pub(crate) async fn get_record(self, raw_id: &str) -> DriverResult<R> {
        let id = R::parse_id(raw_id)?;
        self.store.get(&id).await.map_err(Self::map_store_error)
    }

    /// Replaces the contents of the record identified by the untrusted `raw_id` with the contents
    /// of the untrusted `payload`.  The record must already exist.
    pub(crate) async fn update_record(
        self,
        raw_id: &str,
        payload: serde_json::Value,
    ) -> DriverResult<R> {
        let id = R::parse_id(raw_id)?;
        let fields = {
            let valid = validate(&payload, &R::UPDATE_RULES)?;
            R::fields_from(&valid)?
        };
        self.store.update(&id, fields).await.map_err(Self::map_store_error)
    }
}
