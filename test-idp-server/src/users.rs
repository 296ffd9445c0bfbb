// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct CreateUserPathParam {
    realm: String,
}

#[endpoint {
    method = POST,
    path = "/admin/realms/{realm}/users",
}]
pub async fn create_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<CreateUserPathParam>,
    body: TypedBody<UserRepresentation>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if let Some(denied) = wrong_realm(apictx, &path_param.realm)? {
        return Ok(denied);
    }
    if let Some(denied) = unauthorized(&rqctx)? {
        return Ok(denied);
    }

    let representation = body.into_inner();

    match apictx.store.create_user(&representation).await {
        Ok(id) => {
            // The real server identifies the new user through the Location
            // header only; the body is empty.
            Response::builder()
                .status(StatusCode::CREATED)
                .header(
                    "Location",
                    format!("/admin/realms/{}/users/{id}", path_param.realm),
                )
                .body(String::new().into())
                .map_err(HttpError::from)
        }
        Err(error) => error_response(error),
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct ListUsersPathParam {
    realm: String,
}

#[endpoint {
    method = GET,
    path = "/admin/realms/{realm}/users",
}]
pub async fn list_users(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<ListUsersPathParam>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if let Some(denied) = wrong_realm(apictx, &path_param.realm)? {
        return Ok(denied);
    }
    if let Some(denied) = unauthorized(&rqctx)? {
        return Ok(denied);
    }

    match apictx.store.list_users().await {
        Ok(users) => {
            let body = serde_json::to_string(&users)
                .map_err(|e| HttpError::for_internal_error(e.to_string()))?;

            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .body(body.into())
                .map_err(HttpError::from)
        }
        Err(error) => error_response(error),
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct ResetPasswordPathParam {
    realm: String,
    user_id: String,
}

#[endpoint {
    method = PUT,
    path = "/admin/realms/{realm}/users/{user_id}/reset-password",
}]
pub async fn reset_password(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<ResetPasswordPathParam>,
    body: TypedBody<CredentialRepresentation>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if let Some(denied) = wrong_realm(apictx, &path_param.realm)? {
        return Ok(denied);
    }
    if let Some(denied) = unauthorized(&rqctx)? {
        return Ok(denied);
    }

    let credential = body.into_inner();

    match apictx.store.reset_password(&path_param.user_id, &credential).await {
        Ok(()) => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(String::new().into())
            .map_err(HttpError::from),
        Err(error) => error_response(error),
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct DeleteUserPathParam {
    realm: String,
    user_id: String,
}

#[endpoint {
    method = DELETE,
    path = "/admin/realms/{realm}/users/{user_id}",
}]
pub async fn delete_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<DeleteUserPathParam>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if let Some(denied) = wrong_realm(apictx, &path_param.realm)? {
        return Ok(denied);
    }
    if let Some(denied) = unauthorized(&rqctx)? {
        return Ok(denied);
    }

    match apictx.store.delete_user(&path_param.user_id).await {
        Ok(()) => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(String::new().into())
            .map_err(HttpError::from),
        Err(error) => error_response(error),
    }
}
