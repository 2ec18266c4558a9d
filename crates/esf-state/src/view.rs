use serde::{Deserialize, Serialize};

/// Top-level view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Feed,
    Education,
}

/// Tab inside the education view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EduTab {
    #[default]
    Library,
    Podcasts,
    Videos,
    Create,
}

/// Transient UI state. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub edu_tab: EduTab,
    pub search_query: String,
    pub authoring_open: bool,
    /// Lesson loaded into the authoring form, if editing.
    pub editing_lesson: Option<String>,
    pub live_session_open: bool,
}
