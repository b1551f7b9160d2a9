use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{answers, preferences, questions, users};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// Who may see a user's profile page and find them when browsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Registered,
    Searchable,
    Hidden,
}

impl Privacy {
    pub const ALL: [Privacy; 4] = [Privacy::Public, Privacy::Registered, Privacy::Searchable, Privacy::Hidden];

    /// Whether a non-owner may open the profile page.
    pub fn profile_visible(self, viewer_authenticated: bool) -> bool {
        match self {
            Privacy::Public => true,
            Privacy::Registered => viewer_authenticated,
            Privacy::Searchable | Privacy::Hidden => false,
        }
    }

    /// Whether the user shows up in browse listings.
    pub fn listed(self, viewer_authenticated: bool) -> bool {
        match self {
            Privacy::Public | Privacy::Searchable => true,
            Privacy::Registered => viewer_authenticated,
            Privacy::Hidden => false,
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Privacy::Public => write!(f, "public"),
            Privacy::Registered => write!(f, "registered"),
            Privacy::Searchable => write!(f, "searchable"),
            Privacy::Hidden => write!(f, "hidden"),
        }
    }
}

impl std::str::FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Privacy::Public),
            "registered" => Ok(Privacy::Registered),
            "searchable" => Ok(Privacy::Searchable),
            "hidden" => Ok(Privacy::Hidden),
            _ => Err(format!("unknown privacy level: {s}")),
        }
    }
}

// --- Users ---

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub privacy: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let gender = row.gender.as_deref().and_then(|g| {
            g.parse::<Gender>()
                .map_err(|e| tracing::warn!(user_id = row.id, error = %e, "ignoring stored gender"))
                .ok()
        });
        let privacy = row.privacy.parse::<Privacy>().unwrap_or_else(|e| {
            tracing::warn!(user_id = row.id, error = %e, "unrecognised privacy level, treating as hidden");
            Privacy::Hidden
        });

        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            gender,
            birthday: row.birthday,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            privacy,
            created_at: row.created_at,
            last_seen: row.last_seen,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub privacy: String,
}

/// Every field the settings form binds. `None` is written as NULL so the
/// update replaces the whole settings row.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub struct UserSettingsChangeset {
    pub username: String,
    pub email: String,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub privacy: String,
}

// --- Questions ---

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = questions)]
pub struct Question {
    pub id: i32,
    pub body: String,
    pub kind: String,
}

/// Profile section a question's answer is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Summary,
    Short,
}

impl Question {
    pub fn section(&self) -> QuestionKind {
        if self.kind == "summary" {
            QuestionKind::Summary
        } else {
            QuestionKind::Short
        }
    }
}

// --- Answers ---

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = answers)]
pub struct Answer {
    pub id: i32,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
    pub question_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = answers)]
pub struct NewAnswer<'a> {
    pub body: &'a str,
    pub timestamp: DateTime<Utc>,
    pub user_id: i32,
    pub question_id: i32,
}

// --- Preferences ---

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = preferences)]
pub struct Preference {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub answer_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = preferences)]
pub struct NewPreference {
    pub user_id: i32,
    pub question_id: i32,
    pub answer_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(privacy: &str, gender: Option<&str>) -> UserRow {
        UserRow {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "hash".into(),
            gender: gender.map(String::from),
            birthday: None,
            city: None,
            state: None,
            zip_code: None,
            privacy: privacy.into(),
            created_at: Utc::now(),
            last_seen: None,
        }
    }

    #[test]
    fn row_conversion_parses_enums() {
        let user = User::from(row("registered", Some("female")));
        assert_eq!(user.privacy, Privacy::Registered);
        assert_eq!(user.gender, Some(Gender::Female));
    }

    #[test]
    fn unknown_privacy_fails_closed() {
        let user = User::from(row("friends-only", Some("robot")));
        assert_eq!(user.privacy, Privacy::Hidden);
        assert_eq!(user.gender, None);
    }

    #[test]
    fn privacy_round_trips_through_strings() {
        for level in Privacy::ALL {
            assert_eq!(level.to_string().parse::<Privacy>().unwrap(), level);
        }
    }

    #[test]
    fn privacy_visibility_rules() {
        assert!(Privacy::Public.profile_visible(false));
        assert!(!Privacy::Registered.profile_visible(false));
        assert!(Privacy::Registered.profile_visible(true));
        assert!(!Privacy::Searchable.profile_visible(true));
        assert!(Privacy::Searchable.listed(false));
        assert!(!Privacy::Hidden.listed(true));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(User::from(row("public", None))).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["privacy"], "public");
    }

    #[test]
    fn question_sections() {
        let summary = Question { id: 1, body: "My self-summary".into(), kind: "summary".into() };
        let short = Question { id: 2, body: "Height".into(), kind: "short".into() };
        assert_eq!(summary.section(), QuestionKind::Summary);
        assert_eq!(short.section(), QuestionKind::Short);
    }
}
