// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

use reqwest::Client;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use std::time::Duration;

/// Everything needed to address one realm's admin API, minus the secret.
#[derive(Clone, Debug)]
pub struct RealmConfig {
    /// Base URL of the identity provider, without a trailing slash.
    pub base_url: String,
    pub realm: String,
    /// The confidential client the grant is performed as.
    pub client_id: String,
    /// Applied to every request, the grant included.
    pub request_timeout: Duration,
}

impl RealmConfig {
    /// The realm's OpenID Connect token endpoint.
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.realm
        )
    }

    fn users_url(&self) -> String {
        format!("{}/admin/realms/{}/users", self.base_url, self.realm)
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/{}", self.users_url(), user_id)
    }

    fn reset_password_url(&self, user_id: &str) -> String {
        format!("{}/reset-password", self.user_url(user_id))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error payloads come in two shapes: admin endpoints send `errorMessage`,
/// the token endpoint sends `error` and `error_description`.
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Pull the most specific message out of an error response body, falling
/// back to the raw text when it is not a shape we recognize.
fn error_detail(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(detail) =
            parsed.error_message.or(parsed.error_description).or(parsed.error)
        {
            return detail;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        String::from("(no response body)")
    } else {
        body.to_string()
    }
}

/// Turn a non-success admin response into the error for `op`.
async fn rejection(op: &'static str, response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::remote(op, status, error_detail(&body))
}

/// An authenticated admin session against one realm.
///
/// Construction performs the client-credentials grant; every subsequent
/// call sends the resulting bearer token. Tokens are never refreshed: a
/// run is expected to finish well inside one token lifetime.
#[derive(Debug)]
pub struct KeycloakAdmin {
    config: RealmConfig,
    client: Client,
    access_token: String,
}

impl KeycloakAdmin {
    /// Exchange the confidential client's secret for an access token.
    pub async fn connect(
        config: RealmConfig,
        client_secret: &str,
    ) -> Result<KeycloakAdmin, Error> {
        let token_url = config.token_url();

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::authentication(&token_url, e.to_string()))?;

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", client_secret),
        ];

        let response = client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::authentication(&token_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::authentication(
                &token_url,
                format!("HTTP {status}: {}", error_detail(&body)),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::authentication(&token_url, e.to_string()))?;

        Ok(KeycloakAdmin { config, client, access_token: token.access_token })
    }
}

#[async_trait]
impl RealmAdmin for KeycloakAdmin {
    async fn create_user(
        &self,
        user: &UserRepresentation,
    ) -> Result<String, Error> {
        let response = self
            .client
            .post(self.config.users_url())
            .bearer_auth(&self.access_token)
            .json(user)
            .send()
            .await
            .map_err(|e| Error::remote_transport("create user", e))?;

        if response.status() != StatusCode::CREATED {
            return Err(rejection("create user", response).await);
        }

        // The admin API does not echo the created user back; the id is the
        // last segment of the Location header.
        let id = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| location.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(String::from);

        match id {
            Some(id) => Ok(id),
            None => Err(Error::remote(
                "create user",
                StatusCode::CREATED,
                "response has no usable Location header",
            )),
        }
    }

    async fn reset_password(
        &self,
        user_id: &str,
        credential: &CredentialRepresentation,
    ) -> Result<(), Error> {
        let response = self
            .client
            .put(self.config.reset_password_url(user_id))
            .bearer_auth(&self.access_token)
            .json(credential)
            .send()
            .await
            .map_err(|e| Error::remote_transport("reset password", e))?;

        if !response.status().is_success() {
            return Err(rejection("reset password", response).await);
        }

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<RealmUser>, Error> {
        let response = self
            .client
            .get(self.config.users_url())
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::remote_transport("list users", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection("list users", response).await);
        }

        response.json().await.map_err(|e| {
            Error::remote(
                "list users",
                status,
                format!("malformed response body: {e}"),
            )
        })
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.config.user_url(user_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::remote_transport("delete user", e))?;

        if !response.status().is_success() {
            return Err(rejection("delete user", response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config() -> RealmConfig {
        RealmConfig {
            base_url: String::from("https://sso.example.com"),
            realm: String::from("emssa"),
            client_id: String::from("gate_api"),
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_token_url() {
        assert_eq!(
            config().token_url(),
            "https://sso.example.com/realms/emssa/protocol/openid-connect/token"
        );
    }

    #[test]
    fn test_admin_urls() {
        let config = config();
        assert_eq!(
            config.users_url(),
            "https://sso.example.com/admin/realms/emssa/users"
        );
        assert_eq!(
            config.user_url("12"),
            "https://sso.example.com/admin/realms/emssa/users/12"
        );
        assert_eq!(
            config.reset_password_url("12"),
            "https://sso.example.com/admin/realms/emssa/users/12/reset-password"
        );
    }

    #[test]
    fn test_error_detail_prefers_error_message() {
        let body = r#"{"errorMessage": "User exists with same username"}"#;
        assert_eq!(error_detail(body), "User exists with same username");
    }

    #[test]
    fn test_error_detail_token_endpoint_shape() {
        let body = r#"{
            "error": "invalid_client",
            "error_description": "Invalid client or Invalid client credentials"
        }"#;
        assert_eq!(
            error_detail(body),
            "Invalid client or Invalid client credentials"
        );

        let error_only = r#"{"error": "invalid_client"}"#;
        assert_eq!(error_detail(error_only), "invalid_client");
    }

    #[test]
    fn test_error_detail_falls_back_to_raw_body() {
        assert_eq!(
            error_detail("upstream proxy error"),
            "upstream proxy error"
        );
        assert_eq!(error_detail("{}"), "{}");
        assert_eq!(error_detail(""), "(no response body)");
        assert_eq!(error_detail("  \n"), "(no response body)");
    }
}
