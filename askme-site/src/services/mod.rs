pub mod answer_service;
pub mod auth_service;
pub mod preference_service;
pub mod profile_service;
pub mod session_service;
pub mod settings_service;
pub mod validation;
