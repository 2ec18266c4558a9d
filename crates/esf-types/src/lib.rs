//! Foundation types for ESF Finanças.
//!
//! This crate provides the data model shared by every other ESF crate: the
//! users and their learning progress, feed posts and comments, the lesson
//! library, and media asset metadata. Every type serializes with camelCase
//! field names so persisted collections keep a stable JSON layout.
//!
//! # Key Types
//!
//! - [`User`]: Identity, role and the three progress maps
//! - [`Post`] / [`Comment`]: Feed entries with denormalized author fields
//! - [`Lesson`]: Article, open-ended exercises and an exactly-scored quiz
//! - [`MediaAsset`] / [`MediaRecord`]: Metadata and the full blob record
//! - [`ProgressUpdate`]: A single progress change, applied with
//!   [`merge_user_update`]

pub mod error;
pub mod id;
pub mod lesson;
pub mod media;
pub mod post;
pub mod user;

pub use error::TypeError;
pub use id::{new_id, now_ms};
pub use lesson::{Exercise, Lesson, QuizQuestion, SourceKind, SourceMaterial, QUIZ_OPTION_COUNT};
pub use media::{MediaAsset, MediaKind, MediaRecord};
pub use post::{Comment, ContentType, Post, PostContent, PostDraft};
pub use user::{
    merge_user_update, ExerciseResult, NewUser, PracticeResult, ProgressUpdate, TestResult, User,
    UserRole,
};
