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

//! API to get one record of a resource.

use crate::driver::Driver;
use crate::model::Resource;
use axum::Json;
use axum::extract::{Path, State};
use usermgmt_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler<R: Resource>(
    State(driver): State<Driver<R>>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Json<R>, RestError> {
    let record = driver.get_record(&id).await?;
    Ok(Json(record))
}
