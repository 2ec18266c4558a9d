//! Domain state container for ESF Finanças.
//!
//! [`Academy`] owns every in-memory collection (users, posts, lessons, media
//! metadata), the session user, the theme preference and the view state.
//! Each mutation updates memory first and then writes the affected slice to
//! the structured store; media payloads go through the blob store.
//!
//! The session user has two homes: the session slot and its entry in the
//! users collection. Progress updates are merged once with
//! [`esf_types::merge_user_update`] and written to both.

pub mod academy;
pub mod config;
pub mod confirm;
pub mod error;
pub mod feed;
pub mod library;
pub mod media;
pub mod seed;
pub mod view;

#[cfg(test)]
mod testing;

pub use academy::Academy;
pub use config::AppConfig;
pub use confirm::{Confirm, Confirmation, Deletion};
pub use error::{StateError, StateResult};
pub use library::Upsert;
pub use media::OrphanReport;
pub use view::{EduTab, View, ViewState};

pub use esf_advisor::{DailyTip, TipBoard};
pub use esf_store::Slice;
pub use esf_types::{
    Comment, ContentType, Lesson, MediaAsset, MediaKind, MediaRecord, NewUser, Post, PostDraft, User,
    UserRole,
};
