use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::new_id;

/// Role of a user. Closed set: roles cannot be added at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Manages the fixed lesson library.
    Admin,
    Mentor,
    Student,
}

impl UserRole {
    /// Only admins may create, edit or delete lessons.
    pub fn can_manage_lessons(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Mentor => write!(f, "mentor"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// Result of a completed quiz: score plus the option chosen per question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Score in `0..=100`.
    pub score: u32,
    /// Question index -> chosen option index.
    pub responses: BTreeMap<u32, u32>,
}

impl TestResult {
    /// Build a result, rejecting scores above 100.
    pub fn new(score: u32, responses: BTreeMap<u32, u32>) -> Result<Self, TypeError> {
        if score > 100 {
            return Err(TypeError::ScoreOutOfRange(score));
        }
        Ok(Self { score, responses })
    }
}

/// One graded answer to an open-ended exercise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub answer: String,
    pub score: f64,
    pub feedback: String,
}

/// Result of a completed practice session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub average_score: f64,
    pub exercises: Vec<ExerciseResult>,
}

/// A registered user.
///
/// The three progress maps are keyed by lesson id. They only grow: entries
/// are added or overwritten, never removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_tests: Option<BTreeMap<String, TestResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_practices: Option<BTreeMap<String, PracticeResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_articles: Option<BTreeMap<String, bool>>,
}

impl User {
    /// Create a user from signup data with a fresh id.
    pub fn from_signup(new_user: NewUser) -> Self {
        let id = new_id();
        let avatar = new_user
            .avatar
            .unwrap_or_else(|| format!("https://picsum.photos/seed/{id}/200"));
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role.unwrap_or(UserRole::Student),
            avatar,
            bio: new_user.bio.unwrap_or_default(),
            completed_tests: None,
            completed_practices: None,
            completed_articles: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.can_manage_lessons()
    }

    pub fn test_result(&self, lesson_id: &str) -> Option<&TestResult> {
        self.completed_tests.as_ref()?.get(lesson_id)
    }

    pub fn practice_result(&self, lesson_id: &str) -> Option<&PracticeResult> {
        self.completed_practices.as_ref()?.get(lesson_id)
    }

    pub fn has_read_article(&self, lesson_id: &str) -> bool {
        self.completed_articles
            .as_ref()
            .and_then(|m| m.get(lesson_id))
            .copied()
            .unwrap_or(false)
    }
}

/// Signup form data. Passwords are not modeled.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Defaults to [`UserRole::Student`].
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// A single change to a user's learning progress.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressUpdate {
    Test { lesson_id: String, result: TestResult },
    Practice { lesson_id: String, result: PracticeResult },
    Article { lesson_id: String },
}

impl ProgressUpdate {
    pub fn lesson_id(&self) -> &str {
        match self {
            Self::Test { lesson_id, .. }
            | Self::Practice { lesson_id, .. }
            | Self::Article { lesson_id } => lesson_id,
        }
    }
}

/// Apply a progress update to a user, returning the merged user.
///
/// The entry for the update's lesson is inserted or overwritten; entries for
/// other lessons and every other attribute are carried over untouched. This
/// is the only place progress is merged, so the session copy and the users
/// collection copy of a user receive the identical result.
pub fn merge_user_update(user: &User, update: &ProgressUpdate) -> User {
    let mut merged = user.clone();
    match update {
        ProgressUpdate::Test { lesson_id, result } => {
            merged
                .completed_tests
                .get_or_insert_with(BTreeMap::new)
                .insert(lesson_id.clone(), result.clone());
        }
        ProgressUpdate::Practice { lesson_id, result } => {
            merged
                .completed_practices
                .get_or_insert_with(BTreeMap::new)
                .insert(lesson_id.clone(), result.clone());
        }
        ProgressUpdate::Article { lesson_id } => {
            merged
                .completed_articles
                .get_or_insert_with(BTreeMap::new)
                .insert(lesson_id.clone(), true);
        }
    }
    merged
}
