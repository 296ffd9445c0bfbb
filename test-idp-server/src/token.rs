// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

use uuid::Uuid;

#[derive(Deserialize, JsonSchema)]
pub struct TokenPathParam {
    realm: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct TokenRequestForm {
    grant_type: String,
    client_id: String,
    client_secret: String,
}

#[endpoint {
    method = POST,
    path = "/realms/{realm}/protocol/openid-connect/token",
    content_type = "application/x-www-form-urlencoded",
}]
pub async fn post_token(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<TokenPathParam>,
    body: TypedBody<TokenRequestForm>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let form = body.into_inner();

    if let Some(denied) = wrong_realm(apictx, &path_param.realm)? {
        return Ok(denied);
    }

    if form.grant_type != "client_credentials" {
        return json_response(
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "error": "unsupported_grant_type",
                "error_description": "Unsupported grant_type",
            }),
        );
    }

    if form.client_id != apictx.client_id
        || form.client_secret != apictx.client_secret
    {
        return json_response(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({
                "error": "invalid_client",
                "error_description":
                    "Invalid client or Invalid client credentials",
            }),
        );
    }

    let token = Uuid::new_v4().to_string();
    apictx.tokens.lock().unwrap().insert(token.clone());

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 60,
        }),
    )
}
