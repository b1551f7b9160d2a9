use askme_shared::errors::{AppError, AppResult, ErrorCode};

use crate::forms::SettingsForm;
use crate::models::{User, UserSettingsChangeset};
use crate::services::validation;
use crate::store::EntityStore;

fn current_user(store: &dyn EntityStore, user_id: i32) -> AppResult<User> {
    store
        .user_by_id(user_id)?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "user not found"))
}

/// The settings form pre-populated with the stored values.
pub fn settings_form(store: &dyn EntityStore, user_id: i32) -> AppResult<SettingsForm> {
    current_user(store, user_id).map(|user| SettingsForm::from(&user))
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

impl From<&SettingsForm> for UserSettingsChangeset {
    fn from(form: &SettingsForm) -> Self {
        Self {
            username: form.username.clone(),
            email: form.email.clone(),
            gender: form.gender.map(|g| g.to_string()),
            birthday: form.birthday,
            city: blank_to_none(&form.city),
            state: blank_to_none(&form.state),
            zip_code: blank_to_none(&form.zip_code),
            privacy: form.privacy.to_string(),
        }
    }
}

/// Validates and saves the whole settings form.
///
/// Uniqueness is only checked for a username or email that differs from
/// the stored one, so resubmitting unchanged values always passes. On
/// success every settings column is overwritten, even unchanged ones.
pub fn update_settings(store: &dyn EntityStore, user_id: i32, form: &SettingsForm) -> AppResult<User> {
    let current = current_user(store, user_id)?;

    let mut errors = validation::validate_form(form);
    if form.username != current.username {
        validation::check_username_available(store, &form.username, &mut errors)?;
    }
    if form.email != current.email {
        validation::check_email_available(store, &form.email, &mut errors)?;
    }
    errors.into_result()?;

    let user = store.replace_settings(user_id, &UserSettingsChangeset::from(form))?;
    tracing::info!(user_id, privacy = %user.privacy, "settings saved");
    Ok(user)
}
