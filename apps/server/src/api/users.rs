use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{hash_password, verify_password, AuthError},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub is_active: bool,
}

/// Login credentials, posted either urlencoded or as `multipart/form-data`
/// (what a browser `FormData` body produces).
#[derive(Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

impl TokenForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut username = None;
        let mut password = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let name = field.name().map(str::to_owned);
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            match name.as_deref() {
                Some("username") => username = Some(value),
                Some("password") => password = Some(value),
                _ => {}
            }
        }

        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(ApiError::BadRequest(
                "username and password are required".to_string(),
            )),
        }
    }
}

impl<S> FromRequest<S> for TokenForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Self::from_multipart(multipart)
                .await
                .map_err(IntoResponse::into_response)
        } else {
            let Form(form) = Form::<TokenForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(form)
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".to_string()));
    }
    let password_hash = hash_password(payload.password).await?;
    let user = state
        .user_service
        .register(&payload.username, password_hash)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            is_active: true,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    form: TokenForm,
) -> Result<Json<TokenResponse>, AuthError> {
    let user = state
        .user_service
        .find_by_username(&form.username)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(user.password_hash, form.password).await?;
    let token = state.auth.issue_token(&user.username)?;
    tracing::debug!(
        "Issued token for {} valid {}s",
        user.username,
        state.auth.expires_in().as_secs()
    );

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/token", post(login))
}
