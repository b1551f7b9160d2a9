use askme_shared::errors::{AppError, AppResult, ErrorCode};
use askme_shared::types::FieldErrors;

use crate::forms::PreferenceForm;
use crate::models::Preference;
use crate::services::validation::ANSWER_MISMATCH;
use crate::store::EntityStore;

pub fn list_preferences(store: &dyn EntityStore, user_id: i32) -> AppResult<Vec<Preference>> {
    store.preferences_for(user_id)
}

/// Sets the user's preferred answer for a question, replacing any earlier
/// choice. The answer must be one given to that same question.
pub fn set_preference(store: &dyn EntityStore, user_id: i32, form: &PreferenceForm) -> AppResult<Preference> {
    if store.question_by_id(form.question_id)?.is_none() {
        return Err(AppError::new(
            ErrorCode::QuestionNotFound,
            format!("question {} not found", form.question_id),
        ));
    }

    let matches = store
        .answer_by_id(form.answer_id)?
        .is_some_and(|answer| answer.question_id == form.question_id);
    if !matches {
        let mut errors = FieldErrors::new();
        errors.add("answer_id", ANSWER_MISMATCH, "That answer does not belong to this question");
        return Err(errors.into());
    }

    let pref = store.upsert_preference(user_id, form.question_id, form.answer_id)?;
    tracing::info!(user_id, question_id = pref.question_id, answer_id = pref.answer_id, "preference saved");
    Ok(pref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Privacy};
    use crate::store::memory::MemoryStore;
    use chrono::Utc;

    fn setup() -> (MemoryStore, i32, i32, i32) {
        let store = MemoryStore::with_questions(&[("Favourite number", "short"), ("Height", "short")]);
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = store
                .insert_user(&NewUser {
                    username: name.into(),
                    email: format!("{name}@x.com"),
                    password_hash: "unused".into(),
                    privacy: Privacy::Public.to_string(),
                })
                .unwrap();
            ids.push(user.id);
        }
        let bob_answer = store.upsert_answer(ids[1], 1, "7", Utc::now()).unwrap().into_answer();
        (store, ids[0], ids[1], bob_answer.id)
    }

    #[test]
    fn preference_is_upserted_per_question() {
        let (store, alice, bob, answer_id) = setup();
        let first = set_preference(&store, alice, &PreferenceForm { question_id: 1, answer_id }).unwrap();

        let other = store.upsert_answer(alice, 1, "9", Utc::now()).unwrap().into_answer();
        let second = set_preference(&store, alice, &PreferenceForm { question_id: 1, answer_id: other.id }).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.answer_id, other.id);
        assert_eq!(list_preferences(&store, alice).unwrap(), vec![second]);
        assert!(list_preferences(&store, bob).unwrap().is_empty());
    }

    #[test]
    fn answer_must_belong_to_the_question() {
        let (store, alice, _, answer_id) = setup();
        let err = set_preference(&store, alice, &PreferenceForm { question_id: 2, answer_id }).unwrap_err();
        assert!(err.field_errors().unwrap().has("answer_id", ANSWER_MISMATCH));

        let err = set_preference(&store, alice, &PreferenceForm { question_id: 1, answer_id: 999 }).unwrap_err();
        assert!(err.field_errors().unwrap().has("answer_id", ANSWER_MISMATCH));
        assert!(list_preferences(&store, alice).unwrap().is_empty());
    }

    #[test]
    fn unknown_question_is_not_found() {
        let (store, alice, _, answer_id) = setup();
        let err = set_preference(&store, alice, &PreferenceForm { question_id: 42, answer_id }).unwrap_err();
        assert_eq!(err.code(), ErrorCode::QuestionNotFound);
    }
}
