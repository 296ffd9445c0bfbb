// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use dropshot::ApiDescription;
use dropshot::Body;
use dropshot::ConfigDropshot;
use dropshot::HttpError;
use dropshot::HttpServer;
use dropshot::Path;
use dropshot::RequestContext;
use dropshot::ServerBuilder;
use dropshot::TypedBody;
use dropshot::endpoint;
use http::Response;
use http::StatusCode;
use http::header::AUTHORIZATION;
use schemars::JsonSchema;
use serde::Deserialize;
use slog::Drain;
use slog::o;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use kc_roster::CredentialRepresentation;
use kc_roster::Error;
use kc_roster::InMemoryRealm;
use kc_roster::RealmAdmin;
use kc_roster::UserRepresentation;

mod token;
mod users;

pub use token::*;
pub use users::*;

/// Shared state for the stub identity provider.
pub struct ServerContext {
    /// The one realm the stub serves; anything else 404s.
    pub realm: String,
    /// The one confidential client the token endpoint accepts.
    pub client_id: String,
    pub client_secret: String,
    /// Backing store, shared with tests for assertions.
    pub store: InMemoryRealm,
    /// Bearer tokens minted by the token endpoint.
    pub tokens: Mutex<HashSet<String>>,
}

impl ServerContext {
    pub fn new(
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ServerContext {
        ServerContext {
            realm: realm.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            store: InMemoryRealm::new(),
            tokens: Mutex::new(HashSet::new()),
        }
    }
}

fn json_response(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<Response<Body>, HttpError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.to_string().into())
        .map_err(HttpError::from)
}

/// Requests addressed to any realm but the configured one 404, the same
/// way the real server answers for a realm it does not know.
fn wrong_realm(
    apictx: &ServerContext,
    realm: &str,
) -> Result<Option<Response<Body>>, HttpError> {
    if realm == apictx.realm {
        return Ok(None);
    }

    json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({ "error": "Realm does not exist" }),
    )
    .map(Some)
}

/// Admin calls must present a bearer token minted by the token endpoint.
/// Returns the 401 to send when they do not.
fn unauthorized(
    rqctx: &RequestContext<Arc<ServerContext>>,
) -> Result<Option<Response<Body>>, HttpError> {
    let apictx = rqctx.context();

    let token = rqctx
        .request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        if apictx.tokens.lock().unwrap().contains(token) {
            return Ok(None);
        }
    }

    json_response(
        StatusCode::UNAUTHORIZED,
        serde_json::json!({ "error": "HTTP 401 Unauthorized" }),
    )
    .map(Some)
}

/// Send a store rejection the way the real admin API would have.
fn error_response(error: Error) -> Result<Response<Body>, HttpError> {
    let (status, detail) = match error {
        Error::RemoteApi { status: Some(status), detail, .. } => {
            (status, detail)
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    };

    json_response(status, serde_json::json!({ "errorMessage": detail }))
}

pub fn create_http_server(
    bind_addr: Option<SocketAddr>,
    context: Arc<ServerContext>,
) -> anyhow::Result<HttpServer<Arc<ServerContext>>> {
    let config_dropshot = ConfigDropshot {
        bind_address: bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::LOCALHOST, 0))),
        ..Default::default()
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, o!());

    let mut api = ApiDescription::new();
    api.register(post_token)?;
    api.register(create_user)?;
    api.register(list_users)?;
    api.register(reset_password)?;
    api.register(delete_user)?;

    let server =
        ServerBuilder::new(api, context, log).config(config_dropshot).start()?;

    Ok(server)
}
