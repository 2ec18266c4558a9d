//! Advisory content service for ESF Finanças.
//!
//! The service is an external collaborator: it produces one textual tip per
//! day (with citations) and classifies comments as safe or unsafe before they
//! are appended to a post. The rest of the system only sees the
//! [`AdvisoryService`] trait.

pub mod board;
pub mod local;
pub mod traits;
pub mod types;

pub use board::{TipBoard, TipReader, DEFAULT_PLACEHOLDER};
pub use local::{LocalAdvisor, OfflineAdvisor};
pub use traits::AdvisoryService;
pub use types::{DailyTip, Moderation, TipSource};
