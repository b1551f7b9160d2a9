use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Gender, Privacy, User};
use crate::services::validation::{required, validate_zip_code};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom = "required")]
    pub username: String,
    #[validate(custom = "required")]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(
        custom = "required",
        email(message = "Invalid email address."),
        length(max = 80, message = "Email address cannot exceed 80 characters")
    )]
    pub email: String,
    #[validate(
        custom = "required",
        length(max = 40, message = "Username cannot exceed 40 characters")
    )]
    pub username: String,
    #[validate(
        custom = "required",
        must_match(other = "conf_password", message = "Passwords must match"),
        length(min = 8, max = 40, message = "Password must be between 8 and 40 characters")
    )]
    pub password: String,
    #[validate(custom = "required")]
    pub conf_password: String,
}

/// The account settings form. Every field is bound and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SettingsForm {
    #[validate(
        custom = "required",
        email(message = "Invalid email address."),
        length(max = 80, message = "Email address cannot exceed 80 characters")
    )]
    pub email: String,
    #[validate(
        custom = "required",
        length(max = 40, message = "Username cannot exceed 40 characters")
    )]
    pub username: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 64, message = "City cannot exceed 64 characters"))]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64, message = "State cannot exceed 64 characters"))]
    pub state: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_zip_code")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub privacy: Privacy,
}

impl From<&User> for SettingsForm {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            gender: user.gender,
            birthday: user.birthday,
            city: user.city.clone(),
            state: user.state.clone(),
            zip_code: user.zip_code.clone(),
            privacy: user.privacy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerForm {
    #[validate(
        custom = "required",
        length(max = 500, message = "Answer cannot exceed 500 characters")
    )]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreferenceForm {
    pub question_id: i32,
    pub answer_id: i32,
}
