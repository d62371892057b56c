use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::auth::service::TokenPair;
use crate::error::{AppError, AuthError};
use crate::AppState;
use tracing::{info, warn, error};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub display_name: Option<String>,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    if !state.login_limiter.check_rate_limit(&req.email).await {
        warn!("Login rate limit hit for email: {}", req.email);
        return Err(AuthError::RateLimited.into());
    }

    match state.auth.login(&req.email, &req.password).await {
        Ok((user, tokens)) => {
            info!("Login successful for email: {}", req.email);
            Ok(HttpResponse::Ok().json(AuthResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                display_name: user.display_name,
            }))
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    if req.password.len() < 8 {
        return Err(AppError::ValidationError(
            "password must be at least 8 characters".into(),
        ));
    }

    let user = match state
        .auth
        .register(&req.email, &req.password, req.display_name.as_deref())
        .await
    {
        Ok(user) => {
            info!("Registration successful for email: {}", req.email);
            user
        }
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            return Err(e);
        }
    };

    // Log the fresh account straight in so the client lands with tokens.
    let (_, tokens): (_, TokenPair) = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        display_name: user.display_name,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    req: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Return the account behind a bearer access token.
pub async fn me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req).ok_or(AuthError::Unauthorized)?;
    let user_id = state.auth.validate_access_token(token)?;

    // A token can outlive its account; treat that like any other bad token.
    let user = state
        .db
        .get_user_by_id(user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(HttpResponse::Ok().json(user))
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

pub async fn logout(
    req: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Succeeds whether or not the token matched anything.
    state.auth.logout(&req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully logged out"
    })))
}
