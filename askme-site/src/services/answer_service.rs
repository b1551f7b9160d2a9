use chrono::Utc;
use serde::Serialize;

use askme_shared::errors::{AppError, AppResult, ErrorCode};

use crate::forms::AnswerForm;
use crate::models::{Answer, Question};
use crate::services::validation;
use crate::store::{AnswerUpsert, EntityStore};

/// What the answer page shows: the question and the form, pre-filled with
/// the stored answer if there is one.
#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question: Question,
    pub form: AnswerForm,
    pub answer: Option<Answer>,
}

fn question(store: &dyn EntityStore, question_id: i32) -> AppResult<Question> {
    store
        .question_by_id(question_id)?
        .ok_or_else(|| AppError::new(ErrorCode::QuestionNotFound, format!("question {question_id} not found")))
}

pub fn view_answer(store: &dyn EntityStore, user_id: i32, question_id: i32) -> AppResult<AnswerView> {
    let question = question(store, question_id)?;
    let answer = store.answer_for(user_id, question_id)?;
    let form = AnswerForm {
        body: answer.as_ref().map(|a| a.body.clone()).unwrap_or_default(),
    };
    Ok(AnswerView { question, form, answer })
}

/// Records the user's answer, or replaces the body of the one they already
/// gave. The original timestamp is kept on edit.
pub fn submit_answer(
    store: &dyn EntityStore,
    user_id: i32,
    question_id: i32,
    form: &AnswerForm,
) -> AppResult<AnswerUpsert> {
    question(store, question_id)?;
    validation::validate_form(form).into_result()?;

    let outcome = store.upsert_answer(user_id, question_id, &form.body, Utc::now())?;
    match &outcome {
        AnswerUpsert::Created(a) => tracing::info!(user_id, question_id, answer_id = a.id, "answer recorded"),
        AnswerUpsert::Updated(a) => tracing::info!(user_id, question_id, answer_id = a.id, "answer edited"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Privacy};
    use crate::services::validation::REQUIRED;
    use crate::store::memory::MemoryStore;

    fn store_with_alice() -> (MemoryStore, i32) {
        let store = MemoryStore::with_questions(&[("My self-summary", "summary"), ("Favourite number", "short")]);
        let alice = store
            .insert_user(&NewUser {
                username: "alice".into(),
                email: "a@x.com".into(),
                password_hash: "unused".into(),
                privacy: Privacy::Public.to_string(),
            })
            .unwrap();
        (store, alice.id)
    }

    fn body(text: &str) -> AnswerForm {
        AnswerForm { body: text.into() }
    }

    #[test]
    fn first_submit_creates_then_edit_keeps_row_and_timestamp() {
        let (store, alice) = store_with_alice();

        let created = submit_answer(&store, alice, 1, &body("42")).unwrap();
        assert!(matches!(created, AnswerUpsert::Created(_)));
        assert_eq!(created.flash(), "Your answer has been recorded.");

        let edited = submit_answer(&store, alice, 1, &body("43")).unwrap();
        assert_eq!(edited.flash(), "Your answer has been edited.");

        let (first, second) = (created.into_answer(), edited.into_answer());
        assert_eq!(first.id, second.id);
        assert_eq!(second.body, "43");
        assert_eq!(first.timestamp, second.timestamp);
    }

    #[test]
    fn view_prepopulates_stored_body() {
        let (store, alice) = store_with_alice();
        let empty = view_answer(&store, alice, 2).unwrap();
        assert_eq!(empty.form.body, "");
        assert!(empty.answer.is_none());

        submit_answer(&store, alice, 2, &body("7")).unwrap();
        let view = view_answer(&store, alice, 2).unwrap();
        assert_eq!(view.form.body, "7");
        assert_eq!(view.question.body, "Favourite number");
    }

    #[test]
    fn invalid_body_changes_nothing() {
        let (store, alice) = store_with_alice();
        submit_answer(&store, alice, 1, &body("42")).unwrap();

        let err = submit_answer(&store, alice, 1, &body("")).unwrap_err();
        assert!(err.field_errors().unwrap().has("body", REQUIRED));
        assert_eq!(store.answer_for(alice, 1).unwrap().unwrap().body, "42");

        assert!(submit_answer(&store, alice, 1, &body(&"x".repeat(501))).is_err());
        assert!(submit_answer(&store, alice, 1, &body(&"x".repeat(500))).is_ok());
    }

    #[test]
    fn unknown_question_is_not_found_even_with_bad_body() {
        let (store, alice) = store_with_alice();
        let err = submit_answer(&store, alice, 999, &body("")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::QuestionNotFound);
        assert_eq!(view_answer(&store, alice, 999).unwrap_err().code(), ErrorCode::QuestionNotFound);
    }

    #[test]
    fn answers_are_per_user() {
        let (store, alice) = store_with_alice();
        let bob = store
            .insert_user(&NewUser {
                username: "bob".into(),
                email: "b@x.com".into(),
                password_hash: "unused".into(),
                privacy: Privacy::Public.to_string(),
            })
            .unwrap()
            .id;

        submit_answer(&store, alice, 1, &body("mine")).unwrap();
        let theirs = submit_answer(&store, bob, 1, &body("theirs")).unwrap();
        assert!(matches!(theirs, AnswerUpsert::Created(_)));
        assert_eq!(store.answer_for(alice, 1).unwrap().unwrap().body, "mine");
    }
}
