use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use askme_shared::errors::{AppError, AppResult, ErrorCode};
use askme_shared::types::{Paginated, PaginationParams};

use crate::models::{Gender, Privacy, Question, QuestionKind, User};
use crate::store::EntityStore;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileAnswer {
    pub question_id: i32,
    pub question: String,
    pub answer: String,
}

/// A user's profile page: public fields plus answers split by section.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub privacy: Privacy,
    pub last_seen: Option<DateTime<Utc>>,
    pub is_owner: bool,
    pub summary: Vec<ProfileAnswer>,
    pub short: Vec<ProfileAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCard {
    pub username: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<User> for UserCard {
    fn from(user: User) -> Self {
        Self { username: user.username, city: user.city, state: user.state, last_seen: user.last_seen }
    }
}

/// Loads `username`'s profile as seen by `viewer`. A profile the viewer may
/// not see is reported exactly like a missing one.
pub fn profile(store: &dyn EntityStore, username: &str, viewer: Option<i32>) -> AppResult<ProfileView> {
    let not_found = || AppError::new(ErrorCode::ProfileNotFound, format!("user {username} not found"));

    let user = store.user_by_username(username)?.ok_or_else(not_found)?;
    let is_owner = viewer == Some(user.id);
    if !is_owner && !user.privacy.profile_visible(viewer.is_some()) {
        tracing::debug!(user_id = user.id, privacy = %user.privacy, "profile withheld from viewer");
        return Err(not_found());
    }

    let mut summary = Vec::new();
    let mut short = Vec::new();
    for (question, answer) in store.answers_with_questions(user.id)? {
        let section = question.section();
        let entry = ProfileAnswer { question_id: question.id, question: question.body, answer: answer.body };
        match section {
            QuestionKind::Summary => summary.push(entry),
            QuestionKind::Short => short.push(entry),
        }
    }

    Ok(ProfileView {
        username: user.username,
        gender: user.gender,
        birthday: user.birthday,
        city: user.city,
        state: user.state,
        privacy: user.privacy,
        last_seen: user.last_seen,
        is_owner,
        summary,
        short,
    })
}

/// One page of the users the viewer is allowed to find.
pub fn browse(
    store: &dyn EntityStore,
    viewer_authenticated: bool,
    params: &PaginationParams,
) -> AppResult<Paginated<UserCard>> {
    let levels: Vec<Privacy> = Privacy::ALL.into_iter().filter(|p| p.listed(viewer_authenticated)).collect();
    let (users, total) = store.list_users(&levels, params)?;
    let cards = users.into_iter().map(UserCard::from).collect();
    Ok(Paginated::new(cards, total, params))
}

pub fn questions(store: &dyn EntityStore) -> AppResult<Vec<Question>> {
    store.questions()
}
