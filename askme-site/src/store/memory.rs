//! In-process `EntityStore` for tests. Mirrors the unique constraints the
//! PostgreSQL schema declares.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use askme_shared::errors::{AppError, AppResult};
use askme_shared::types::{FieldErrors, PaginationParams};

use crate::models::{Answer, Gender, NewUser, Preference, Privacy, Question, User, UserSettingsChangeset};
use crate::services::validation::{
    DUPLICATE_EMAIL, DUPLICATE_USERNAME, EMAIL_TAKEN_MESSAGE, USERNAME_TAKEN_MESSAGE,
};

use super::{AnswerUpsert, EntityStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    preferences: Vec<Preference>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn conflicts(&self, except_id: Option<i32>, username: &str, email: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let others = self.users.iter().filter(|u| Some(u.id) != except_id);
        for user in others {
            if user.username == username {
                errors.add("username", DUPLICATE_USERNAME, USERNAME_TAKEN_MESSAGE);
            }
            if user.email == email {
                errors.add("email", DUPLICATE_EMAIL, EMAIL_TAKEN_MESSAGE);
            }
        }
        errors
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given `(body, kind)` questions, with ids from 1.
    pub fn with_questions(questions: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock().unwrap();
            for (body, kind) in questions {
                let id = tables.next_id();
                tables.questions.push(Question { id, body: body.to_string(), kind: kind.to_string() });
            }
        }
        store
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| AppError::internal("memory store poisoned"))
    }
}

impl EntityStore for MemoryStore {
    fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    fn user_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.username == username).cloned())
    }

    fn username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.lock()?.users.iter().any(|u| u.username == username))
    }

    fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.lock()?.users.iter().any(|u| u.email == email))
    }

    fn insert_user(&self, new_user: &NewUser) -> AppResult<User> {
        let mut tables = self.lock()?;
        tables.conflicts(None, &new_user.username, &new_user.email).into_result()?;

        let user = User {
            id: tables.next_id(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            gender: None,
            birthday: None,
            city: None,
            state: None,
            zip_code: None,
            privacy: new_user.privacy.parse().map_err(AppError::internal)?,
            created_at: Utc::now(),
            last_seen: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn replace_settings(&self, user_id: i32, changes: &UserSettingsChangeset) -> AppResult<User> {
        let mut tables = self.lock()?;
        tables.conflicts(Some(user_id), &changes.username, &changes.email).into_result()?;

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::Database(diesel::result::Error::NotFound))?;
        user.username = changes.username.clone();
        user.email = changes.email.clone();
        user.gender = changes.gender.as_deref().map(str::parse::<Gender>).transpose().map_err(AppError::internal)?;
        user.birthday = changes.birthday;
        user.city = changes.city.clone();
        user.state = changes.state.clone();
        user.zip_code = changes.zip_code.clone();
        user.privacy = changes.privacy.parse().map_err(AppError::internal)?;
        Ok(user.clone())
    }

    fn touch_last_seen(&self, user_id: i32, at: DateTime<Utc>) -> AppResult<()> {
        let mut tables = self.lock()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.last_seen = Some(at);
        }
        Ok(())
    }

    fn list_users(&self, visible: &[Privacy], page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let tables = self.lock()?;
        let matching: Vec<&User> = tables.users.iter().filter(|u| visible.contains(&u.privacy)).collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    fn question_by_id(&self, id: i32) -> AppResult<Option<Question>> {
        Ok(self.lock()?.questions.iter().find(|q| q.id == id).cloned())
    }

    fn questions(&self) -> AppResult<Vec<Question>> {
        Ok(self.lock()?.questions.clone())
    }

    fn answer_for(&self, user_id: i32, question_id: i32) -> AppResult<Option<Answer>> {
        Ok(self
            .lock()?
            .answers
            .iter()
            .find(|a| a.user_id == user_id && a.question_id == question_id)
            .cloned())
    }

    fn answer_by_id(&self, id: i32) -> AppResult<Option<Answer>> {
        Ok(self.lock()?.answers.iter().find(|a| a.id == id).cloned())
    }

    fn upsert_answer(&self, user_id: i32, question_id: i32, body: &str, now: DateTime<Utc>) -> AppResult<AnswerUpsert> {
        let mut tables = self.lock()?;
        if let Some(answer) = tables
            .answers
            .iter_mut()
            .find(|a| a.user_id == user_id && a.question_id == question_id)
        {
            answer.body = body.to_string();
            return Ok(AnswerUpsert::Updated(answer.clone()));
        }

        let answer = Answer {
            id: tables.next_id(),
            body: body.to_string(),
            timestamp: now,
            user_id,
            question_id,
        };
        tables.answers.push(answer.clone());
        Ok(AnswerUpsert::Created(answer))
    }

    fn answers_with_questions(&self, user_id: i32) -> AppResult<Vec<(Question, Answer)>> {
        let tables = self.lock()?;
        let mut joined: Vec<(Question, Answer)> = tables
            .answers
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| {
                tables
                    .questions
                    .iter()
                    .find(|q| q.id == a.question_id)
                    .map(|q| (q.clone(), a.clone()))
            })
            .collect();
        joined.sort_by_key(|(q, _)| q.id);
        Ok(joined)
    }

    fn preferences_for(&self, user_id: i32) -> AppResult<Vec<Preference>> {
        let tables = self.lock()?;
        let mut prefs: Vec<Preference> = tables.preferences.iter().filter(|p| p.user_id == user_id).cloned().collect();
        prefs.sort_by_key(|p| p.question_id);
        Ok(prefs)
    }

    fn upsert_preference(&self, user_id: i32, question_id: i32, answer_id: i32) -> AppResult<Preference> {
        let mut tables = self.lock()?;
        if let Some(pref) = tables
            .preferences
            .iter_mut()
            .find(|p| p.user_id == user_id && p.question_id == question_id)
        {
            pref.answer_id = answer_id;
            return Ok(pref.clone());
        }

        let pref = Preference { id: tables.next_id(), user_id, question_id, answer_id };
        tables.preferences.push(pref.clone());
        Ok(pref)
    }
}
