//! Field rules shared by the forms, plus the store-backed uniqueness checks
//! the derive cannot express.

use std::borrow::Cow;

use validator::{Validate, ValidationError};

use askme_shared::errors::AppResult;
use askme_shared::types::FieldErrors;

use crate::store::EntityStore;

pub const REQUIRED: &str = "required";
pub const DUPLICATE_USERNAME: &str = "duplicate_username";
pub const DUPLICATE_EMAIL: &str = "duplicate_email";
pub const INVALID_ZIP_FORMAT: &str = "invalid_zip_format";
pub const ANSWER_MISMATCH: &str = "answer_mismatch";

pub const USERNAME_TAKEN_MESSAGE: &str = "Username has already been taken";
pub const EMAIL_TAKEN_MESSAGE: &str = "An account with this email address already exists!";
pub const ZIP_FORMAT_MESSAGE: &str = "Zip code must be exactly 5 digits";

fn rejection(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Rejects only empty input; whitespace counts as a value.
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(rejection(REQUIRED, "This field is required."));
    }
    Ok(())
}

/// Empty is valid; anything else must be exactly five ASCII digits.
pub fn validate_zip_code(value: &str) -> Result<(), ValidationError> {
    if is_valid_zip(value) {
        Ok(())
    } else {
        Err(rejection(INVALID_ZIP_FORMAT, ZIP_FORMAT_MESSAGE))
    }
}

pub fn is_valid_zip(value: &str) -> bool {
    value.is_empty() || (value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()))
}

/// Runs the declarative rules of a form and collects every failure.
pub fn validate_form<T: Validate>(form: &T) -> FieldErrors {
    match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from(errors),
    }
}

pub fn check_username_available(
    store: &dyn EntityStore,
    username: &str,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if !username.is_empty() && store.username_exists(username)? {
        errors.add("username", DUPLICATE_USERNAME, USERNAME_TAKEN_MESSAGE);
    }
    Ok(())
}

pub fn check_email_available(
    store: &dyn EntityStore,
    email: &str,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if !email.is_empty() && store.email_exists(email)? {
        errors.add("email", DUPLICATE_EMAIL, EMAIL_TAKEN_MESSAGE);
    }
    Ok(())
}
