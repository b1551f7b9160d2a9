use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use askme_shared::clients::db::DbPool;
use askme_shared::errors::{AppError, AppResult};
use askme_shared::types::{FieldErrors, PaginationParams};

use crate::models::{
    Answer, NewAnswer, NewPreference, NewUser, Preference, Privacy, Question, User, UserRow,
    UserSettingsChangeset,
};
use crate::schema::{answers, preferences, questions, users};
use crate::services::validation::{
    DUPLICATE_EMAIL, DUPLICATE_USERNAME, EMAIL_TAKEN_MESSAGE, INVALID_ZIP_FORMAT,
    USERNAME_TAKEN_MESSAGE, ZIP_FORMAT_MESSAGE,
};

use super::{AnswerUpsert, EntityStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const USERNAME_KEY: &str = "users_username_key";
const EMAIL_KEY: &str = "users_email_key";
const ZIP_CODE_CHECK: &str = "users_zip_code_check";
const ANSWER_KEY: &str = "answers_user_question_key";
const PREFERENCE_KEY: &str = "preferences_user_question_key";

/// Applies any migrations the database has not seen yet.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
    for version in &applied {
        tracing::info!(version = %version, "migration applied");
    }
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(|e| AppError::internal(e.to_string()))
    }
}

/// Name of the constraint a unique/check violation tripped, if that is what failed.
fn violated_constraint(err: &DieselError) -> Option<String> {
    match err {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation,
            info,
        ) => info.constraint_name().map(str::to_owned),
        _ => None,
    }
}

/// Turns constraint violations on `users` back into the field errors the
/// pre-check would have produced.
fn map_user_write_error(err: DieselError) -> AppError {
    let mut errors = FieldErrors::new();
    match violated_constraint(&err).as_deref() {
        Some(USERNAME_KEY) => errors.add("username", DUPLICATE_USERNAME, USERNAME_TAKEN_MESSAGE),
        Some(EMAIL_KEY) => errors.add("email", DUPLICATE_EMAIL, EMAIL_TAKEN_MESSAGE),
        Some(ZIP_CODE_CHECK) => errors.add("zip_code", INVALID_ZIP_FORMAT, ZIP_FORMAT_MESSAGE),
        _ => return AppError::from(err),
    }
    tracing::debug!(%errors, "user write rejected by constraint");
    AppError::Validation(errors)
}

fn is_violation_of(err: &DieselError, constraint: &str) -> bool {
    violated_constraint(err).as_deref() == Some(constraint)
}

fn upsert_answer_tx(
    conn: &mut PgConnection,
    user_id: i32,
    question_id: i32,
    body: &str,
    now: DateTime<Utc>,
) -> Result<AnswerUpsert, DieselError> {
    conn.transaction(|conn| {
        let existing = answers::table
            .filter(answers::user_id.eq(user_id))
            .filter(answers::question_id.eq(question_id))
            .for_update()
            .first::<Answer>(conn)
            .optional()?;

        match existing {
            Some(answer) => diesel::update(answers::table.find(answer.id))
                .set(answers::body.eq(body))
                .get_result::<Answer>(conn)
                .map(AnswerUpsert::Updated),
            None => diesel::insert_into(answers::table)
                .values(&NewAnswer { body, timestamp: now, user_id, question_id })
                .get_result::<Answer>(conn)
                .map(AnswerUpsert::Created),
        }
    })
}

fn upsert_preference_tx(
    conn: &mut PgConnection,
    user_id: i32,
    question_id: i32,
    answer_id: i32,
) -> Result<Preference, DieselError> {
    conn.transaction(|conn| {
        let existing = preferences::table
            .filter(preferences::user_id.eq(user_id))
            .filter(preferences::question_id.eq(question_id))
            .for_update()
            .first::<Preference>(conn)
            .optional()?;

        match existing {
            Some(pref) => diesel::update(preferences::table.find(pref.id))
                .set(preferences::answer_id.eq(answer_id))
                .get_result(conn),
            None => diesel::insert_into(preferences::table)
                .values(&NewPreference { user_id, question_id, answer_id })
                .get_result(conn),
        }
    })
}

impl EntityStore for PgStore {
    fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    fn user_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let mut conn = self.conn()?;
        let row = users::table.find(id).first::<UserRow>(&mut conn).optional()?;
        Ok(row.map(User::from))
    }

    fn user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let mut conn = self.conn()?;
        let row = users::table
            .filter(users::username.eq(username))
            .first::<UserRow>(&mut conn)
            .optional()?;
        Ok(row.map(User::from))
    }

    fn username_exists(&self, username: &str) -> AppResult<bool> {
        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(users::table.filter(users::username.eq(username))))
            .get_result::<bool>(&mut conn)?;
        Ok(exists)
    }

    fn email_exists(&self, email: &str) -> AppResult<bool> {
        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(users::table.filter(users::email.eq(email))))
            .get_result::<bool>(&mut conn)?;
        Ok(exists)
    }

    fn insert_user(&self, new_user: &NewUser) -> AppResult<User> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<UserRow>(&mut conn)
            .map_err(map_user_write_error)?;
        Ok(User::from(row))
    }

    fn replace_settings(&self, user_id: i32, changes: &UserSettingsChangeset) -> AppResult<User> {
        let mut conn = self.conn()?;
        let row = diesel::update(users::table.find(user_id))
            .set(changes)
            .get_result::<UserRow>(&mut conn)
            .map_err(map_user_write_error)?;
        Ok(User::from(row))
    }

    fn touch_last_seen(&self, user_id: i32, at: DateTime<Utc>) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::update(users::table.find(user_id))
            .set(users::last_seen.eq(Some(at)))
            .execute(&mut conn)?;
        Ok(())
    }

    fn list_users(&self, visible: &[Privacy], page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let levels: Vec<String> = visible.iter().map(ToString::to_string).collect();
        let (offset, limit) = page.sql_window();
        let mut conn = self.conn()?;

        let total = users::table
            .filter(users::privacy.eq_any(levels.clone()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = users::table
            .filter(users::privacy.eq_any(levels))
            .order(users::id.asc())
            .offset(offset)
            .limit(limit)
            .load::<UserRow>(&mut conn)?;

        Ok((rows.into_iter().map(User::from).collect(), total.max(0) as u64))
    }

    fn question_by_id(&self, id: i32) -> AppResult<Option<Question>> {
        let mut conn = self.conn()?;
        Ok(questions::table.find(id).first::<Question>(&mut conn).optional()?)
    }

    fn questions(&self) -> AppResult<Vec<Question>> {
        let mut conn = self.conn()?;
        Ok(questions::table.order(questions::id.asc()).load::<Question>(&mut conn)?)
    }

    fn answer_for(&self, user_id: i32, question_id: i32) -> AppResult<Option<Answer>> {
        let mut conn = self.conn()?;
        Ok(answers::table
            .filter(answers::user_id.eq(user_id))
            .filter(answers::question_id.eq(question_id))
            .first::<Answer>(&mut conn)
            .optional()?)
    }

    fn answer_by_id(&self, id: i32) -> AppResult<Option<Answer>> {
        let mut conn = self.conn()?;
        Ok(answers::table.find(id).first::<Answer>(&mut conn).optional()?)
    }

    fn upsert_answer(&self, user_id: i32, question_id: i32, body: &str, now: DateTime<Utc>) -> AppResult<AnswerUpsert> {
        let mut conn = self.conn()?;
        match upsert_answer_tx(&mut conn, user_id, question_id, body, now) {
            // A concurrent first submit inserted between our lookup and insert;
            // the row exists now, so a second pass updates it.
            Err(err) if is_violation_of(&err, ANSWER_KEY) => {
                tracing::debug!(user_id, question_id, "answer insert lost a race, retrying as update");
                Ok(upsert_answer_tx(&mut conn, user_id, question_id, body, now)?)
            }
            other => Ok(other?),
        }
    }

    fn answers_with_questions(&self, user_id: i32) -> AppResult<Vec<(Question, Answer)>> {
        let mut conn = self.conn()?;
        Ok(answers::table
            .inner_join(questions::table)
            .filter(answers::user_id.eq(user_id))
            .order(questions::id.asc())
            .select((questions::all_columns, answers::all_columns))
            .load::<(Question, Answer)>(&mut conn)?)
    }

    fn preferences_for(&self, user_id: i32) -> AppResult<Vec<Preference>> {
        let mut conn = self.conn()?;
        Ok(preferences::table
            .filter(preferences::user_id.eq(user_id))
            .order(preferences::question_id.asc())
            .load::<Preference>(&mut conn)?)
    }

    fn upsert_preference(&self, user_id: i32, question_id: i32, answer_id: i32) -> AppResult<Preference> {
        let mut conn = self.conn()?;
        match upsert_preference_tx(&mut conn, user_id, question_id, answer_id) {
            Err(err) if is_violation_of(&err, PREFERENCE_KEY) => {
                tracing::debug!(user_id, question_id, "preference insert lost a race, retrying as update");
                Ok(upsert_preference_tx(&mut conn, user_id, question_id, answer_id)?)
            }
            other => Ok(other?),
        }
    }
}
