// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

/// The slice of the identity provider's administrative surface this tool
/// drives. A value of this type is already authenticated: establishing the
/// session (the client-credentials grant) is the constructor of the real
/// implementation, [`KeycloakAdmin::connect`], not part of the contract.
///
/// [`InMemoryRealm`] satisfies the same contract without a server, so the
/// sequential operations ([`import_roster`], [`flush_realm`]) can be
/// exercised directly.
#[async_trait]
pub trait RealmAdmin: Send + Sync {
    /// Create one user, returning the id the realm assigned to it.
    async fn create_user(
        &self,
        user: &UserRepresentation,
    ) -> Result<String, Error>;

    /// Set the password of an existing user.
    async fn reset_password(
        &self,
        user_id: &str,
        credential: &CredentialRepresentation,
    ) -> Result<(), Error>;

    /// List every user in the realm. One call; no pagination.
    async fn list_users(&self) -> Result<Vec<RealmUser>, Error>;

    /// Delete one user by id.
    async fn delete_user(&self, user_id: &str) -> Result<(), Error>;
}
