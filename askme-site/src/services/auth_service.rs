use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use askme_shared::errors::{AppError, AppResult, ErrorCode};

use crate::forms::{LoginForm, RegistrationForm};
use crate::models::{NewUser, Privacy, User};
use crate::services::validation;
use crate::store::EntityStore;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Validates the registration form and creates the account.
///
/// Every rule runs, including both uniqueness lookups, so one response
/// carries all field errors. Nothing is written unless the form passes.
pub fn register(store: &dyn EntityStore, form: &RegistrationForm) -> AppResult<User> {
    let mut errors = validation::validate_form(form);
    validation::check_username_available(store, &form.username, &mut errors)?;
    validation::check_email_available(store, &form.email, &mut errors)?;
    errors.into_result()?;

    let new_user = NewUser {
        username: form.username.clone(),
        email: form.email.clone(),
        password_hash: hash_password(&form.password)?,
        privacy: Privacy::default().to_string(),
    };
    let user = store.insert_user(&new_user)?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Checks a username/password pair. Unknown users and wrong passwords
/// produce the same error.
pub fn authenticate(store: &dyn EntityStore, form: &LoginForm) -> AppResult<User> {
    validation::validate_form(form).into_result()?;

    let Some(user) = store.user_by_username(&form.username)? else {
        tracing::debug!(username = %form.username, "login for unknown user");
        return Err(AppError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS));
    };

    if !verify_password(&form.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "login with wrong password");
        return Err(AppError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = user.id, remember = form.remember_me, "user logged in");
    Ok(user)
}
