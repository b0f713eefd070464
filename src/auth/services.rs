use anyhow::Context;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        repo::CreateUserError,
        repo_types::NewUser,
    },
    error::AppError,
    state::AppState,
};

const USER_EXISTS: &str = "User already exists";

/// Returns the trimmed value, or a validation error naming the field.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> Result<(), AppError> {
    let name = required(payload.name, "Name")?;
    let email = required(payload.email, "Email")?;
    // Password is taken verbatim; only presence is checked.
    let password = match payload.password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(AppError::Validation("Password is required".into())),
    };

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(USER_EXISTS.into()));
    }

    let passwords = state.passwords.clone();
    let password_hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
        .await
        .context("password hashing task")??;

    let user = match state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!("email registered concurrently");
            return Err(AppError::Conflict(USER_EXISTS.into()));
        }
        Err(CreateUserError::Store(e)) => return Err(AppError::Internal(e)),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(())
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> Result<String, AppError> {
    let email = required(payload.email, "Email")?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Password is required".into()))?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials("User not found".into()));
    };

    let passwords = state.passwords.clone();
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
        .await
        .context("password verification task")?;

    if !valid {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials("Incorrect password".into()));
    }

    let token = state.keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}
