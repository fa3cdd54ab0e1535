use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::User;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::security::{password, token};
use crate::validation::{sanitize_string, validate_email, validate_min_len, validate_required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let username = sanitize_string(&payload.username);
    let email = sanitize_string(&payload.email);

    let mut errors = Vec::new();
    if let Err(e) = validate_required("username", &username) {
        errors.push(e.to_string());
    }
    if let Err(e) = validate_email(&email) {
        errors.push(e.to_string());
    }
    if let Err(e) = validate_min_len("password", &payload.password, 6) {
        errors.push(e.to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::validation("el correo ya esta en uso"));
    }
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::validation("el nombre de usuario ya esta en uso"));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = state
        .users
        .insert(&User::new(username, email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, "usuario registrado");
    Ok(Json(user.profile()))
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::validation("usuario no encontrado"))?;

    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::validation("contrasena incorrecta"));
    }

    let session = token::issue(user.id, &state.config.token_secret, state.config.token_ttl_hours)?;
    let cookie = format!("token={session}; HttpOnly; Path=/");

    tracing::info!(user_id = %user.id, "inicio de sesion");
    Ok(([(header::SET_COOKIE, cookie)], Json(user.profile())))
}

pub async fn logout() -> impl IntoResponse {
    let cookie = "token=; HttpOnly; Path=/; Max-Age=0".to_string();
    ([(header::SET_COOKIE, cookie)], StatusCode::OK)
}

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_id(caller)
        .await?
        .ok_or_else(|| AppError::NotFound("usuario no encontrado".to_string()))?;

    Ok(Json(user.profile()))
}

pub async fn verify(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_id(caller)
        .await?
        .ok_or_else(|| AppError::Unauthorized("no esta autorizado".to_string()))?;

    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
    })))
}
