use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use askme_shared::errors::AppResult;
use askme_shared::types::auth::AuthUser;
use askme_shared::types::{ApiResponse, Redirect};

use crate::forms::{PreferenceForm, SettingsForm};
use crate::models::{Preference, Question};
use crate::services::{preference_service, profile_service, settings_service};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsSection {
    pub title: &'static str,
    pub location: &'static str,
}

static SECTIONS: [SettingsSection; 2] = [
    SettingsSection { title: "User settings", location: "/settings/user" },
    SettingsSection { title: "Preferences", location: "/settings/preferences" },
];

pub async fn menu(_user: AuthUser) -> Json<ApiResponse<&'static [SettingsSection]>> {
    Json(ApiResponse::ok(&SECTIONS[..]))
}

pub async fn user_settings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SettingsForm>>> {
    let form = settings_service::settings_form(state.store.as_ref(), user.id)?;
    Ok(Json(ApiResponse::ok(form)))
}

pub async fn save_user_settings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(form): Json<SettingsForm>,
) -> AppResult<Json<ApiResponse<Redirect>>> {
    settings_service::update_settings(state.store.as_ref(), user.id, &form)?;
    Ok(Json(ApiResponse::redirect("/settings/user", "Your changes have been saved.")))
}

#[derive(Debug, Serialize)]
pub struct PreferencesView {
    pub questions: Vec<Question>,
    pub preferences: Vec<Preference>,
}

pub async fn preferences(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PreferencesView>>> {
    let store = state.store.as_ref();
    let view = PreferencesView {
        questions: profile_service::questions(store)?,
        preferences: preference_service::list_preferences(store, user.id)?,
    };
    Ok(Json(ApiResponse::ok(view)))
}

pub async fn save_preference(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(form): Json<PreferenceForm>,
) -> AppResult<Json<ApiResponse<Preference>>> {
    let pref = preference_service::set_preference(state.store.as_ref(), user.id, &form)?;
    Ok(Json(ApiResponse::ok_with_message(pref, "Your preferences have been saved.")))
}
