use std::sync::Arc;

use crate::{
    entity::user_profile,
    error::ApiError,
    state::AppState,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum::http::header::AUTHORIZATION;
use sea_orm::EntityTrait;

#[derive(Debug, Clone)]
pub struct OpenIDUser {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Authenticated principal attached to every request. Routes that allow
/// anonymous access match on `Unauthorized` instead of rejecting upfront.
#[derive(Debug, Clone)]
pub enum AppUser {
    OpenID(OpenIDUser),
    Unauthorized,
}

impl AppUser {
    pub fn sub(&self) -> Result<String, ApiError> {
        match self {
            AppUser::OpenID(user) => Ok(user.sub.clone()),
            AppUser::Unauthorized => Err(ApiError::unauthorized("Sign in required")),
        }
    }

    pub fn email(&self) -> Option<String> {
        match self {
            AppUser::OpenID(user) => user.email.clone(),
            AppUser::Unauthorized => None,
        }
    }

    /// Profile lookup by subject, served from the short-lived cache when warm.
    pub async fn profile(
        &self,
        state: &AppState,
    ) -> Result<Arc<user_profile::Model>, ApiError> {
        let sub = self.sub()?;
        if let Some(profile) = state.get_profile(&sub) {
            return Ok(profile);
        }
        let profile = user_profile::Entity::find_by_id(&sub)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;
        let profile = Arc::new(profile);
        state.put_profile(&sub, profile.clone());
        Ok(profile)
    }

    pub async fn require_admin(
        &self,
        state: &AppState,
    ) -> Result<Arc<user_profile::Model>, ApiError> {
        let profile = self.profile(state).await?;
        if profile.is_admin {
            return Ok(profile);
        }
        // Debug builds honor a comma-separated allowlist so local
        // back-office work does not need a seeded admin row.
        #[cfg(debug_assertions)]
        if let Ok(raw) = std::env::var("DEV_ADMIN_EMAILS")
            && raw
                .split(',')
                .any(|email| email.trim().eq_ignore_ascii_case(&profile.email))
        {
            return Ok(profile);
        }
        Err(ApiError::forbidden("Admin access required"))
    }
}

pub async fn jwt_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let mut request = request;
    if let Some(auth_header) = request.headers().get(AUTHORIZATION)
        && let Ok(token) = auth_header.to_str()
    {
        let token = if token.starts_with("Bearer ") {
            &token[7..]
        } else {
            token
        };

        let token = token.trim();
        let claims = state
            .validate_token(token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
        let sub = claims
            .get("sub")
            .and_then(|sub| sub.as_str())
            .ok_or_else(|| ApiError::from(anyhow!("sub missing from token claims")))?;
        let email = claims
            .get("email")
            .and_then(|email| email.as_str())
            .map(str::to_string);
        let name = claims
            .get("name")
            .and_then(|name| name.as_str())
            .map(str::to_string);
        let user = AppUser::OpenID(OpenIDUser {
            sub: sub.to_string(),
            email,
            name,
        });
        request.extensions_mut().insert::<AppUser>(user);
        return Ok(next.run(request).await);
    }

    request
        .extensions_mut()
        .insert::<AppUser>(AppUser::Unauthorized);
    Ok(next.run(request).await)
}
