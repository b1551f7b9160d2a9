//! The entity store: every read and write the services make against the
//! user, question, answer and preference tables.

use chrono::{DateTime, Utc};

use askme_shared::errors::AppResult;
use askme_shared::types::PaginationParams;

use crate::models::{Answer, NewUser, Preference, Privacy, Question, User, UserSettingsChangeset};

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// Result of writing an answer for a (user, question) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerUpsert {
    /// No answer existed; a row was inserted.
    Created(Answer),
    /// The existing row's body was replaced; its timestamp is unchanged.
    Updated(Answer),
}

impl AnswerUpsert {
    pub fn into_answer(self) -> Answer {
        match self {
            AnswerUpsert::Created(a) | AnswerUpsert::Updated(a) => a,
        }
    }

    pub fn flash(&self) -> &'static str {
        match self {
            AnswerUpsert::Created(_) => "Your answer has been recorded.",
            AnswerUpsert::Updated(_) => "Your answer has been edited.",
        }
    }
}

/// Storage port used by the services.
///
/// Implementations must enforce uniqueness of `username`, `email`,
/// (user, question) answers and (user, question) preferences themselves,
/// reporting duplicate users as field errors, so that an application-level
/// pre-check that loses a race still cannot create a duplicate.
pub trait EntityStore: Send + Sync {
    /// Cheap connectivity probe for health checks.
    fn ping(&self) -> AppResult<()>;

    fn user_by_id(&self, id: i32) -> AppResult<Option<User>>;
    fn user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    fn username_exists(&self, username: &str) -> AppResult<bool>;
    fn email_exists(&self, email: &str) -> AppResult<bool>;
    fn insert_user(&self, new_user: &NewUser) -> AppResult<User>;
    /// Overwrites every settings column of the user in one statement.
    fn replace_settings(&self, user_id: i32, changes: &UserSettingsChangeset) -> AppResult<User>;
    fn touch_last_seen(&self, user_id: i32, at: DateTime<Utc>) -> AppResult<()>;
    /// Users whose privacy level is in `visible`, ordered by id, plus the total count.
    fn list_users(&self, visible: &[Privacy], page: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    fn question_by_id(&self, id: i32) -> AppResult<Option<Question>>;
    fn questions(&self) -> AppResult<Vec<Question>>;

    fn answer_for(&self, user_id: i32, question_id: i32) -> AppResult<Option<Answer>>;
    fn answer_by_id(&self, id: i32) -> AppResult<Option<Answer>>;
    /// Creates the answer or replaces the body of the existing one, atomically.
    fn upsert_answer(&self, user_id: i32, question_id: i32, body: &str, now: DateTime<Utc>) -> AppResult<AnswerUpsert>;
    /// The user's answers joined with their questions, ordered by question id.
    fn answers_with_questions(&self, user_id: i32) -> AppResult<Vec<(Question, Answer)>>;

    fn preferences_for(&self, user_id: i32) -> AppResult<Vec<Preference>>;
    fn upsert_preference(&self, user_id: i32, question_id: i32, answer_id: i32) -> AppResult<Preference>;
}
