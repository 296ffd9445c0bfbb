// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

/// The create-user payload POSTed to the admin API, derived 1:1 from a
/// roster row. Constructed, sent, discarded.
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    pub enabled: bool,

    pub email_verified: bool,

    pub email: String,

    /// Always identical to `email`.
    pub username: String,

    pub first_name: String,

    // Absent (not empty) when the row's Name has a single token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    pub attributes: UserAttributes,
}

/// Custom attribute bag attached to every created user. `EDIPI` carries
/// the row's email; the rosters have no separate identifier column.
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct UserAttributes {
    #[serde(rename = "EDIPI")]
    pub edipi: String,

    pub location: String,

    #[serde(rename = "gcasRank")]
    pub rank: String,

    #[serde(rename = "gcasCallsign")]
    pub callsign: String,

    #[serde(rename = "gcasPosition")]
    pub position: String,
}

impl From<&RosterRecord> for UserRepresentation {
    fn from(record: &RosterRecord) -> UserRepresentation {
        // Only the first two space-separated tokens of Name are used. A
        // single-token name leaves lastName unset, and consecutive spaces
        // produce an empty token, exactly as the rosters have always been
        // interpreted.
        let mut tokens = record.name.split(' ');
        let first_name = tokens.next().unwrap_or_default().to_string();
        let last_name = tokens.next().map(String::from);

        UserRepresentation {
            enabled: true,
            email_verified: true,
            email: record.email.clone(),
            username: record.email.clone(),
            first_name,
            last_name,
            attributes: UserAttributes {
                edipi: record.email.clone(),
                location: record.location.clone(),
                rank: record.rank.clone(),
                callsign: record.callsign.clone(),
                position: record.position.clone(),
            },
        }
    }
}

/// Body of the reset-password call.
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct CredentialRepresentation {
    /// Always false: the roster password is the account's real password,
    /// not a first-login placeholder.
    pub temporary: bool,

    #[serde(rename = "type")]
    pub credential_type: String,

    pub value: String,
}

impl CredentialRepresentation {
    pub fn password(value: impl Into<String>) -> CredentialRepresentation {
        CredentialRepresentation {
            temporary: false,
            credential_type: String::from("password"),
            value: value.into(),
        }
    }
}

/// A captured user id paired with the credential to set on it. The Nth
/// reset always carries the Nth row's password.
#[derive(Clone, Debug)]
pub struct PasswordReset {
    pub user_id: String,
    pub credential: CredentialRepresentation,
}

/// A user as returned by the listing endpoint. The remote sends far more
/// fields than these; serde drops the rest.
#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmUser {
    pub id: String,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub enabled: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    use serde_json::json;

    fn record(name: &str) -> RosterRecord {
        RosterRecord {
            name: name.to_string(),
            rank: "CPT".to_string(),
            callsign: "ACE".to_string(),
            position: "Pilot".to_string(),
            location: "Hangar 1".to_string(),
            email: "ada@x.org".to_string(),
            password: "p1".to_string(),
        }
    }

    #[test]
    fn test_two_token_name_splits_into_first_and_last() {
        let user = UserRepresentation::from(&record("Ada Lovelace"));
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn test_single_token_name_has_no_last_name() {
        let user = UserRepresentation::from(&record("Ada"));
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, None);

        // And lastName must not appear on the wire at all.
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("lastName").is_none());
    }

    #[test]
    fn test_only_first_two_tokens_are_used() {
        let user = UserRepresentation::from(&record("Ada Maria Lovelace"));
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name.as_deref(), Some("Maria"));
    }

    #[test]
    fn test_username_email_and_edipi_are_the_row_email() {
        let user = UserRepresentation::from(&record("Ada Lovelace"));
        assert_eq!(user.username, "ada@x.org");
        assert_eq!(user.email, "ada@x.org");
        assert_eq!(user.attributes.edipi, "ada@x.org");
    }

    #[test]
    fn test_creation_payload_wire_format() {
        let user = UserRepresentation::from(&record("Ada Lovelace"));

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "enabled": true,
                "emailVerified": true,
                "email": "ada@x.org",
                "username": "ada@x.org",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "attributes": {
                    "EDIPI": "ada@x.org",
                    "location": "Hangar 1",
                    "gcasRank": "CPT",
                    "gcasCallsign": "ACE",
                    "gcasPosition": "Pilot",
                },
            })
        );
    }

    #[test]
    fn test_password_credential_wire_format() {
        let credential = CredentialRepresentation::password("p1");

        assert_eq!(
            serde_json::to_value(&credential).unwrap(),
            json!({
                "temporary": false,
                "type": "password",
                "value": "p1",
            })
        );
    }
}
