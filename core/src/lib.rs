// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

mod admin;
mod error;
mod in_memory_realm;
mod keycloak;
mod ops;
mod roster;
mod secret;
mod user;

pub use admin::*;
pub use error::*;
pub use in_memory_realm::*;
pub use keycloak::*;
pub use ops::*;
pub use roster::*;
pub use secret::*;
pub use user::*;
