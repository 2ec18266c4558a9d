//! Lesson library management and learning-progress recording.

use std::collections::BTreeMap;

use esf_store::Slice;
use esf_types::{
    now_ms, new_id, ContentType, ExerciseResult, Lesson, Post, PostContent, PracticeResult,
    ProgressUpdate, TestResult, User,
};
use tracing::info;

use crate::academy::Academy;
use crate::confirm::{Confirm, Deletion, DELETE_LESSON_PROMPT};
use crate::error::{StateError, StateResult};
use crate::view::{EduTab, View};

/// What [`Academy::upsert_lesson`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// New id; prepended to the library.
    Inserted,
    /// Existing id; replaced in place.
    Replaced,
}

fn celebration_post(author: &User, lesson: &Lesson, score: u32) -> Post {
    Post {
        id: format!("celebration-{}", new_id()),
        user_id: author.id.clone(),
        user_name: author.name.clone(),
        user_avatar: author.avatar.clone(),
        content_type: ContentType::Article,
        content: PostContent::Single(format!(
            "Acabei de concluir a avaliação da aula \"{}\". Minha Nota: {score}/100. \
             Cada passo na educação financeira é um passo rumo à mordomia fiel!",
            lesson.title
        )),
        thumbnail: None,
        title: Some(format!(
            "CONQUISTA: Teste de {} finalizado com {score}/100! 🏆✨",
            lesson.title
        )),
        description: format!(
            "{} completou com sucesso um dos pilares teóricos da Escola de Sabedoria!",
            author.name
        ),
        source_url: None,
        likes: Vec::new(),
        comments: Vec::new(),
        views: 0,
        timestamp: now_ms(),
    }
}

impl Academy {
    fn require_lesson_manager(&self, action: &'static str) -> StateResult<&User> {
        let user = self.acting_user()?;
        if !user.role.can_manage_lessons() {
            info!(user = %user.id, role = %user.role, action, "lesson change refused");
            return Err(StateError::Unauthorized {
                action,
                role: user.role,
            });
        }
        Ok(user)
    }

    fn require_lesson(&self, lesson_id: &str) -> StateResult<&Lesson> {
        self.lesson(lesson_id)
            .ok_or_else(|| StateError::LessonNotFound(lesson_id.to_string()))
    }

    // ---- Library ----

    /// Create or replace a lesson. Admin only.
    ///
    /// An existing id is replaced in place; a new id is prepended. On success
    /// the authoring flow closes and the library tab is shown.
    pub fn upsert_lesson(&mut self, mut lesson: Lesson) -> StateResult<Upsert> {
        let admin_id = self.require_lesson_manager("manage lessons")?.id.clone();
        lesson.validate()?;
        if lesson.user_id.is_empty() {
            lesson.user_id = admin_id;
        }
        if lesson.timestamp == 0 {
            lesson.timestamp = now_ms();
        }

        let outcome = match self.lessons.iter_mut().find(|l| l.id == lesson.id) {
            Some(existing) => {
                *existing = lesson;
                Upsert::Replaced
            }
            None => {
                self.lessons.insert(0, lesson);
                Upsert::Inserted
            }
        };
        info!(?outcome, lessons = self.lessons.len(), "lesson saved");
        self.persist(Slice::Lessons);

        self.close_authoring();
        self.view.view = View::Education;
        self.view.edu_tab = EduTab::Library;
        Ok(outcome)
    }

    /// Remove a lesson after confirmation. Admin only.
    pub fn delete_lesson(&mut self, lesson_id: &str, confirm: &impl Confirm) -> StateResult<Deletion> {
        self.require_lesson_manager("delete lessons")?;
        if !confirm.confirm(DELETE_LESSON_PROMPT) {
            return Ok(Deletion::Declined);
        }

        let before = self.lessons.len();
        self.lessons.retain(|l| l.id != lesson_id);
        if self.lessons.len() == before {
            return Ok(Deletion::NotFound);
        }
        info!(lesson = lesson_id, "lesson deleted");
        self.persist(Slice::Lessons);
        Ok(Deletion::Removed)
    }

    // ---- Progress ----

    /// Record a finished quiz for the session user and announce it on the
    /// feed.
    ///
    /// The merged user is written to the session and the users collection,
    /// then a celebration post is prepended. Every check runs before either
    /// change, so a failure leaves both untouched.
    pub fn record_test_completion(
        &mut self,
        lesson_id: &str,
        score: u32,
        responses: BTreeMap<u32, u32>,
    ) -> StateResult<&Post> {
        self.acting_user()?;
        let lesson = self.require_lesson(lesson_id)?.clone();
        let result = TestResult::new(score, responses)?;

        let user = self
            .apply_progress(&ProgressUpdate::Test {
                lesson_id: lesson_id.to_string(),
                result,
            })?
            .clone();

        info!(user = %user.id, lesson = lesson_id, score, "test completed");
        self.posts.insert(0, celebration_post(&user, &lesson, score));
        self.persist(Slice::Posts);
        Ok(&self.posts[0])
    }

    /// Grade `responses` against the lesson's quiz and record the result.
    /// Returns the score.
    pub fn submit_test(&mut self, lesson_id: &str, responses: BTreeMap<u32, u32>) -> StateResult<u32> {
        let score = self.require_lesson(lesson_id)?.grade(&responses);
        self.record_test_completion(lesson_id, score, responses)?;
        Ok(score)
    }

    /// Record graded practice exercises for the session user.
    pub fn record_practice_completion(
        &mut self,
        lesson_id: &str,
        average_score: f64,
        exercises: Vec<ExerciseResult>,
    ) -> StateResult<&User> {
        self.acting_user()?;
        self.require_lesson(lesson_id)?;
        if !average_score.is_finite() || average_score < 0.0 {
            return Err(StateError::InvalidInput(format!(
                "average score must be a non-negative number, got {average_score}"
            )));
        }
        info!(lesson = lesson_id, average_score, "practice completed");
        self.apply_progress(&ProgressUpdate::Practice {
            lesson_id: lesson_id.to_string(),
            result: PracticeResult {
                average_score,
                exercises,
            },
        })
    }

    /// Mark the lesson's article as read by the session user.
    pub fn record_article_completion(&mut self, lesson_id: &str) -> StateResult<&User> {
        self.acting_user()?;
        self.require_lesson(lesson_id)?;
        info!(lesson = lesson_id, "article read");
        self.apply_progress(&ProgressUpdate::Article {
            lesson_id: lesson_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Confirmation;
    use crate::testing::{fixture, fixture_with_kv, Fixture};
    use esf_store::KeyValueStore;
    use esf_types::{Exercise, QuizQuestion, TypeError, UserRole};

    fn as_admin() -> Fixture {
        let mut f = fixture();
        f.academy.sign_in("admin@esf.com").unwrap();
        f
    }

    fn as_student() -> Fixture {
        let mut f = fixture();
        f.academy.sign_in("aluno@esf.com").unwrap();
        f
    }

    fn new_lesson(id: &str, title: &str) -> Lesson {
        Lesson {
            id: id.into(),
            user_id: String::new(),
            title: title.into(),
            summary: "Resumo".into(),
            exercises: vec![Exercise {
                scenario: "Cenário".into(),
                instructions: "Instruções".into(),
            }],
            tests: vec![QuizQuestion {
                question: "Quanto poupar?".into(),
                options: vec!["0%".into(), "5%".into(), "10%".into(), "Tudo".into()],
                correct_index: 2,
                explanation: "Dez por cento é um bom começo.".into(),
            }],
            article: "# Poupança".into(),
            sources: vec![],
            timestamp: 0,
        }
    }

    // ---- Upsert ----

    #[test]
    fn admin_inserts_new_lesson_first() {
        let Fixture { mut academy, .. } = as_admin();
        academy.open_authoring(None);
        let outcome = academy.upsert_lesson(new_lesson("lesson-3", "Orçamento")).unwrap();

        assert_eq!(outcome, Upsert::Inserted);
        assert_eq!(academy.lessons().len(), 3);
        let first = &academy.lessons()[0];
        assert_eq!(first.id, "lesson-3");
        assert_eq!(first.user_id, "admin-1");
        assert!(first.timestamp > 0);

        let view = academy.view();
        assert!(!view.authoring_open);
        assert_eq!(view.view, View::Education);
        assert_eq!(view.edu_tab, EduTab::Library);
    }

    #[test]
    fn student_upsert_is_rejected() {
        let Fixture { mut academy, kv, .. } = as_student();
        let before = academy.lessons().to_vec();
        let err = academy
            .upsert_lesson(new_lesson("lesson-3", "Orçamento"))
            .unwrap_err();
        assert!(matches!(
            err,
            StateError::Unauthorized {
                role: UserRole::Student,
                ..
            }
        ));
        assert_eq!(academy.lessons(), before.as_slice());
        assert!(kv.get_item(Slice::Lessons.key()).unwrap().is_none());
    }

    #[test]
    fn mentor_cannot_manage_lessons() {
        let Fixture { mut academy, .. } = fixture();
        academy.sign_in("mentor@esf.com").unwrap();
        assert!(academy.upsert_lesson(new_lesson("x", "x")).is_err());
        assert!(matches!(
            academy.delete_lesson("lesson-1", &Confirmation::Granted),
            Err(StateError::Unauthorized { .. })
        ));
        assert_eq!(academy.lessons().len(), 2);
    }

    #[test]
    fn upsert_same_id_replaces_in_place() {
        let Fixture { mut academy, .. } = as_admin();
        let mut edited = academy.lesson("lesson-2").unwrap().clone();
        edited.title = "Juros Compostos na Prática".into();

        assert_eq!(academy.upsert_lesson(edited).unwrap(), Upsert::Replaced);
        assert_eq!(academy.lessons().len(), 2);
        assert_eq!(academy.lessons()[1].id, "lesson-2");
        assert_eq!(
            academy
                .lessons()
                .iter()
                .filter(|l| l.title == "Juros Compostos na Prática")
                .count(),
            1
        );
    }

    #[test]
    fn upsert_twice_does_not_duplicate() {
        let Fixture { mut academy, .. } = as_admin();
        academy.upsert_lesson(new_lesson("lesson-3", "A")).unwrap();
        academy.upsert_lesson(new_lesson("lesson-3", "B")).unwrap();
        assert_eq!(academy.lessons().len(), 3);
        assert_eq!(academy.lesson("lesson-3").unwrap().title, "B");
    }

    #[test]
    fn invalid_quiz_is_rejected() {
        let Fixture { mut academy, .. } = as_admin();
        let mut lesson = new_lesson("lesson-3", "Quebrada");
        lesson.tests[0].correct_index = 4;
        assert!(matches!(
            academy.upsert_lesson(lesson),
            Err(StateError::Invalid(TypeError::CorrectIndexOutOfRange { .. }))
        ));
        assert_eq!(academy.lessons().len(), 2);
    }

    #[test]
    fn upserted_lesson_survives_reopen() {
        let Fixture { mut academy, kv, .. } = as_admin();
        academy.upsert_lesson(new_lesson("lesson-3", "Orçamento")).unwrap();
        let Fixture { academy, .. } = fixture_with_kv(kv);
        assert_eq!(academy.lessons().len(), 3);
        assert_eq!(academy.lessons()[0].title, "Orçamento");
    }

    // ---- Delete ----

    #[test]
    fn delete_requires_confirmation() {
        let Fixture { mut academy, .. } = as_admin();
        assert_eq!(
            academy.delete_lesson("lesson-1", &Confirmation::Declined).unwrap(),
            Deletion::Declined
        );
        assert_eq!(academy.lessons().len(), 2);
    }

    #[test]
    fn delete_shows_lesson_prompt() {
        let Fixture { mut academy, .. } = as_admin();
        let confirm = |prompt: &str| prompt == DELETE_LESSON_PROMPT;
        assert_eq!(
            academy.delete_lesson("lesson-1", &confirm).unwrap(),
            Deletion::Removed
        );
        assert!(academy.lesson("lesson-1").is_none());
        assert_eq!(
            academy.delete_lesson("lesson-1", &confirm).unwrap(),
            Deletion::NotFound
        );
    }

    #[test]
    fn student_delete_never_prompts() {
        let Fixture { mut academy, .. } = as_student();
        let prompted = std::cell::Cell::new(false);
        let confirm = |_: &str| {
            prompted.set(true);
            true
        };
        assert!(academy.delete_lesson("lesson-1", &confirm).is_err());
        assert!(!prompted.get());
        assert_eq!(academy.lessons().len(), 2);
    }

    // ---- Test completion ----

    #[test]
    fn test_completion_updates_both_homes_and_feed() {
        let Fixture { mut academy, .. } = as_student();
        academy.record_article_completion("lesson-1").unwrap();
        let responses: BTreeMap<u32, u32> = (0..10).map(|i| (i, 2)).collect();

        let post = academy
            .record_test_completion("lesson-2", 87, responses.clone())
            .unwrap()
            .clone();

        let expected = TestResult {
            score: 87,
            responses,
        };
        let session = academy.session().unwrap().clone();
        assert_eq!(session.test_result("lesson-2"), Some(&expected));
        assert!(session.has_read_article("lesson-1"));

        let stored = academy.users().iter().find(|u| u.id == "user-1").unwrap();
        assert_eq!(stored, &session);

        assert_eq!(academy.posts().len(), 2);
        assert_eq!(academy.posts()[0], post);
        let title = post.title.as_deref().unwrap();
        assert!(title.contains("O Poder dos Juros Compostos"));
        assert!(title.contains("87/100"));
        assert_eq!(post.user_id, "user-1");
    }

    #[test]
    fn retake_overwrites_only_that_lesson() {
        let Fixture { mut academy, .. } = as_student();
        academy
            .record_test_completion("lesson-1", 50, BTreeMap::new())
            .unwrap();
        academy
            .record_test_completion("lesson-2", 60, BTreeMap::new())
            .unwrap();
        academy
            .record_test_completion("lesson-1", 90, BTreeMap::new())
            .unwrap();

        let user = academy.session().unwrap();
        assert_eq!(user.test_result("lesson-1").unwrap().score, 90);
        assert_eq!(user.test_result("lesson-2").unwrap().score, 60);
        assert_eq!(academy.posts().len(), 4);
    }

    #[test]
    fn failed_completion_changes_nothing() {
        let Fixture { mut academy, .. } = as_student();
        let user_before = academy.session().unwrap().clone();

        assert!(matches!(
            academy.record_test_completion("lesson-9", 80, BTreeMap::new()),
            Err(StateError::LessonNotFound(_))
        ));
        assert!(matches!(
            academy.record_test_completion("lesson-1", 101, BTreeMap::new()),
            Err(StateError::Invalid(TypeError::ScoreOutOfRange(101)))
        ));

        assert_eq!(academy.session(), Some(&user_before));
        assert_eq!(academy.posts().len(), 1);
    }

    #[test]
    fn completion_requires_session() {
        let Fixture { mut academy, .. } = fixture();
        assert!(matches!(
            academy.record_test_completion("lesson-1", 80, BTreeMap::new()),
            Err(StateError::NoSession)
        ));
        assert!(matches!(
            academy.record_article_completion("lesson-1"),
            Err(StateError::NoSession)
        ));
    }

    #[test]
    fn submit_test_grades_against_quiz() {
        let Fixture { mut academy, .. } = as_student();
        // Seed quizzes use option 2 throughout; answer 7 of 10 correctly.
        let responses: BTreeMap<u32, u32> =
            (0..10).map(|i| (i, if i < 7 { 2 } else { 0 })).collect();
        assert_eq!(academy.submit_test("lesson-1", responses).unwrap(), 70);
        assert_eq!(
            academy.session().unwrap().test_result("lesson-1").unwrap().score,
            70
        );
    }

    #[test]
    fn completion_persists_session_and_users() {
        let Fixture { mut academy, kv, .. } = as_student();
        academy
            .record_test_completion("lesson-2", 87, BTreeMap::new())
            .unwrap();

        let Fixture { academy, .. } = fixture_with_kv(kv);
        let session = academy.session().unwrap();
        assert_eq!(session.test_result("lesson-2").unwrap().score, 87);
        let stored = academy.users().iter().find(|u| u.id == session.id).unwrap();
        assert_eq!(stored, session);
        assert!(academy.posts()[0].id.starts_with("celebration-"));
    }

    // ---- Practice / article ----

    #[test]
    fn practice_completion_merges() {
        let Fixture { mut academy, .. } = as_student();
        let exercises = vec![ExerciseResult {
            answer: "Guardaria 10%".into(),
            score: 8.5,
            feedback: "Bom raciocínio.".into(),
        }];
        let user = academy
            .record_practice_completion("lesson-1", 8.5, exercises.clone())
            .unwrap()
            .clone();
        let practice = user.practice_result("lesson-1").unwrap();
        assert_eq!(practice.exercises, exercises);
        assert_eq!(academy.users().iter().find(|u| u.id == user.id), Some(&user));
        assert_eq!(academy.posts().len(), 1);
    }

    #[test]
    fn practice_rejects_nan_average() {
        let Fixture { mut academy, .. } = as_student();
        assert!(matches!(
            academy.record_practice_completion("lesson-1", f64::NAN, vec![]),
            Err(StateError::InvalidInput(_))
        ));
        assert!(academy.session().unwrap().completed_practices.is_none());
    }

    #[test]
    fn session_user_missing_from_users_is_restored() {
        let Fixture { mut academy, .. } = as_student();
        academy.users.retain(|u| u.id != "user-1");
        academy.record_article_completion("lesson-2").unwrap();
        let stored = academy.users().iter().find(|u| u.id == "user-1").unwrap();
        assert!(stored.has_read_article("lesson-2"));
    }
}
