// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

use slog::Logger;
use slog::debug;
use slog::info;

/// Create every roster user, then set every password.
///
/// Two strictly sequential phases: all creations first, then all resets,
/// with the Nth reset carrying the Nth row's password. The first failure
/// anywhere aborts the run; earlier calls are not rolled back.
pub async fn import_roster(
    log: &Logger,
    admin: &dyn RealmAdmin,
    records: &[RosterRecord],
) -> Result<Vec<String>, Error> {
    let representations: Vec<UserRepresentation> =
        records.iter().map(UserRepresentation::from).collect();

    info!(log, "creating users"; "count" => records.len());

    let mut ids = Vec::with_capacity(records.len());
    for representation in &representations {
        let id = admin.create_user(representation).await?;
        debug!(
            log,
            "created user";
            "username" => %representation.username,
            "user_id" => %id
        );
        ids.push(id);
    }

    info!(log, "setting user passwords");

    let resets: Vec<PasswordReset> = ids
        .iter()
        .zip(records)
        .map(|(user_id, record)| PasswordReset {
            user_id: user_id.clone(),
            credential: CredentialRepresentation::password(
                record.password.clone(),
            ),
        })
        .collect();

    for reset in &resets {
        admin.reset_password(&reset.user_id, &reset.credential).await?;
        debug!(log, "set password"; "user_id" => %reset.user_id);
    }

    Ok(ids)
}

/// Delete every user in the realm, returning how many were deleted.
///
/// The listing is taken once up front; a failed deletion aborts the loop
/// and leaves the remaining users in place.
pub async fn flush_realm(
    log: &Logger,
    admin: &dyn RealmAdmin,
) -> Result<usize, Error> {
    let users = admin.list_users().await?;

    info!(log, "deleting users"; "count" => users.len());

    for user in &users {
        admin.delete_user(&user.id).await?;
        debug!(
            log,
            "deleted user";
            "username" => %user.username,
            "user_id" => %user.id
        );
    }

    Ok(users.len())
}

#[cfg(test)]
mod test {
    use super::*;

    use reqwest::StatusCode;
    use slog::o;
    use std::sync::Mutex;

    fn test_log() -> Logger {
        Logger::root(slog::Discard, o!())
    }

    fn record(name: &str, email: &str, password: &str) -> RosterRecord {
        RosterRecord {
            name: name.to_string(),
            rank: String::from("CPT"),
            callsign: String::from("ACE"),
            position: String::from("Pilot"),
            location: String::from("Hangar 1"),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_import_creates_then_sets_passwords_in_order() {
        let log = test_log();
        let realm = InMemoryRealm::new();
        let records = vec![
            record("Ada Lovelace", "ada@x.org", "p1"),
            record("Grace Hopper", "grace@x.org", "p2"),
        ];

        let ids = import_roster(&log, &realm, &records).await.unwrap();
        assert_eq!(ids.len(), 2);

        assert_eq!(
            realm.calls(),
            vec![
                AdminCall::CreateUser { username: String::from("ada@x.org") },
                AdminCall::CreateUser {
                    username: String::from("grace@x.org"),
                },
                AdminCall::ResetPassword {
                    user_id: ids[0].clone(),
                    value: String::from("p1"),
                },
                AdminCall::ResetPassword {
                    user_id: ids[1].clone(),
                    value: String::from("p2"),
                },
            ]
        );

        let state = realm.state();
        let ada = state.users.get(&ids[0]).unwrap();
        assert_eq!(ada.representation.first_name, "Ada");
        assert_eq!(ada.credential.as_ref().unwrap().value, "p1");
        let grace = state.users.get(&ids[1]).unwrap();
        assert_eq!(grace.representation.username, "grace@x.org");
        assert_eq!(grace.credential.as_ref().unwrap().value, "p2");
    }

    #[tokio::test]
    async fn test_import_empty_roster_is_a_noop() {
        let log = test_log();
        let realm = InMemoryRealm::new();

        let ids = import_roster(&log, &realm, &[]).await.unwrap();

        assert!(ids.is_empty());
        assert!(realm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_import_stops_at_first_create_failure() {
        let log = test_log();
        let realm = InMemoryRealm::new();
        let records = vec![
            record("Ada Lovelace", "ada@x.org", "p1"),
            record("Grace Hopper", "grace@x.org", "p2"),
            record("Ada Again", "ada@x.org", "p3"),
            record("Katherine Johnson", "katherine@x.org", "p4"),
        ];

        let error = import_roster(&log, &realm, &records).await.unwrap_err();
        match error {
            Error::RemoteApi { op, status, .. } => {
                assert_eq!(op, "create user");
                assert_eq!(status, Some(StatusCode::CONFLICT));
            }
            other => panic!("unexpected error {other}"),
        }

        // The first two rows were created, the fourth was never attempted,
        // and the password phase was never reached.
        let state = realm.state();
        assert_eq!(state.users.len(), 2);
        assert_eq!(state.calls.len(), 3);
        for call in &state.calls {
            assert!(matches!(call, AdminCall::CreateUser { .. }));
        }
        assert!(
            state.users.values().all(|stored| stored.credential.is_none())
        );
    }

    #[tokio::test]
    async fn test_flush_deletes_every_user() {
        let log = test_log();
        let realm = InMemoryRealm::new();
        let records = vec![
            record("Ada Lovelace", "ada@x.org", "p1"),
            record("Grace Hopper", "grace@x.org", "p2"),
        ];
        let ids = import_roster(&log, &realm, &records).await.unwrap();

        let deleted = flush_realm(&log, &realm).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(realm.state().users.is_empty());

        // After the four import calls: one listing, then one delete per
        // user.
        let calls = realm.calls();
        assert_eq!(calls.len(), 7);
        assert_eq!(calls[4], AdminCall::ListUsers);
        let mut deleted_ids: Vec<String> = calls[5..]
            .iter()
            .map(|call| match call {
                AdminCall::DeleteUser { user_id } => user_id.clone(),
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        deleted_ids.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(deleted_ids, expected);
    }

    /// Lists three users and fails to delete the second one.
    struct BrokenDelete {
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RealmAdmin for BrokenDelete {
        async fn create_user(
            &self,
            _user: &UserRepresentation,
        ) -> Result<String, Error> {
            unreachable!();
        }

        async fn reset_password(
            &self,
            _user_id: &str,
            _credential: &CredentialRepresentation,
        ) -> Result<(), Error> {
            unreachable!();
        }

        async fn list_users(&self) -> Result<Vec<RealmUser>, Error> {
            Ok(["u1", "u2", "u3"]
                .into_iter()
                .map(|id| RealmUser {
                    id: id.to_string(),
                    username: format!("{id}@x.org"),
                    email: None,
                    enabled: true,
                })
                .collect())
        }

        async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
            if user_id == "u2" {
                return Err(Error::remote(
                    "delete user",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unknown_error",
                ));
            }
            self.deleted.lock().unwrap().push(user_id.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_flush_stops_at_first_delete_failure() {
        let log = test_log();
        let realm = BrokenDelete { deleted: Mutex::new(Vec::new()) };

        let error = flush_realm(&log, &realm).await.unwrap_err();
        match error {
            Error::RemoteApi { op, .. } => assert_eq!(op, "delete user"),
            other => panic!("unexpected error {other}"),
        }

        // u1 was deleted, u3 was never attempted.
        assert_eq!(*realm.deleted.lock().unwrap(), vec![String::from("u1")]);
    }
}
