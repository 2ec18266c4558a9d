use std::collections::BTreeSet;
use std::sync::Arc;

use esf_advisor::{AdvisoryService, LocalAdvisor, TipBoard};
use esf_blob::{BlobStore, FileBlobStore};
use esf_store::{FileKeyValueStore, KeyValueStore, Slice, StructuredStore};
use esf_types::{merge_user_update, Lesson, MediaAsset, NewUser, Post, ProgressUpdate, User};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{StateError, StateResult};
use crate::seed;
use crate::view::{EduTab, View, ViewState};

/// The domain state container.
///
/// Lifecycle: [`Academy::open`] loads every slice (seed data or empty
/// collections stand in for anything missing or malformed), operations
/// mutate memory and persist the touched slices, and [`Academy::sign_out`]
/// clears the session.
pub struct Academy {
    pub(crate) config: AppConfig,
    pub(crate) store: StructuredStore,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) advisor: Arc<dyn AdvisoryService>,
    pub(crate) users: Vec<User>,
    pub(crate) posts: Vec<Post>,
    pub(crate) lessons: Vec<Lesson>,
    pub(crate) media: Vec<MediaAsset>,
    pub(crate) session: Option<User>,
    pub(crate) dark_mode: bool,
    pub(crate) view: ViewState,
    lagging: BTreeSet<Slice>,
}

impl Academy {
    /// Build the container from explicit backends and load persisted state.
    pub fn open(
        config: AppConfig,
        kv: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        advisor: Arc<dyn AdvisoryService>,
    ) -> Self {
        let store = StructuredStore::new(kv, config.dev_mode);

        let users = store.load(Slice::Users, seed::users);
        let posts = store.load(Slice::Posts, seed::posts);
        let lessons = store.load(Slice::Lessons, seed::lessons);
        let media = store.load(Slice::MediaMeta, Vec::new);
        let session: Option<User> = store.load(Slice::Session, || None);
        let dark_mode = store.load(Slice::DarkMode, || false);

        debug!(
            users = users.len(),
            posts = posts.len(),
            lessons = lessons.len(),
            media = media.len(),
            signed_in = session.is_some(),
            "state loaded"
        );

        Self {
            config,
            store,
            blobs,
            advisor,
            users,
            posts,
            lessons,
            media,
            session,
            dark_mode,
            view: ViewState::default(),
            lagging: BTreeSet::new(),
        }
    }

    /// Open with file-backed stores under `config.data_dir` and the local
    /// advisor.
    pub fn open_local(config: AppConfig) -> StateResult<Self> {
        let kv_dir = config.structured_dir();
        let kv: Arc<dyn KeyValueStore> = match config.structured_quota_bytes {
            Some(quota) => Arc::new(FileKeyValueStore::open_with_quota(&kv_dir, quota)?),
            None => Arc::new(FileKeyValueStore::open(&kv_dir)?),
        };
        let mut blobs = FileBlobStore::new(&config.data_dir, &config.database_name);
        if let Some(quota) = config.blob_quota_bytes {
            blobs = blobs.with_quota(quota);
        }
        Ok(Self::open(
            config,
            kv,
            Arc::new(blobs),
            Arc::new(LocalAdvisor::default()),
        ))
    }

    /// Start the single background fetch of the daily tip.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// board discards a tip that arrives afterwards.
    pub fn start_tip_board(&self) -> TipBoard {
        TipBoard::start(Arc::clone(&self.advisor), self.config.tip_placeholder.clone())
    }

    // ---- Accessors ----

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
    pub fn users(&self) -> &[User] {
        &self.users
    }
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }
    pub fn media(&self) -> &[MediaAsset] {
        &self.media
    }
    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Slices whose last save failed, so persisted state is behind memory.
    pub fn lagging_slices(&self) -> &BTreeSet<Slice> {
        &self.lagging
    }

    pub(crate) fn acting_user(&self) -> StateResult<&User> {
        self.session.as_ref().ok_or(StateError::NoSession)
    }

    // ---- Persistence ----

    /// Write one slice from memory to the structured store. Failures are
    /// swallowed; the slice is remembered as lagging until a later save
    /// succeeds.
    pub(crate) fn persist(&mut self, slice: Slice) {
        let saved = match slice {
            Slice::Users => self.store.save(slice, &self.users),
            Slice::Posts => self.store.save(slice, &self.posts),
            Slice::Lessons => self.store.save(slice, &self.lessons),
            Slice::MediaMeta => self.store.save(slice, &self.media),
            Slice::Session => self.store.save(slice, &self.session),
            Slice::DarkMode => self.store.save(slice, &self.dark_mode),
        };
        if saved {
            self.lagging.remove(&slice);
        } else {
            self.lagging.insert(slice);
        }
    }

    /// Write every slice.
    pub fn persist_all(&mut self) {
        for slice in Slice::ALL {
            self.persist(slice);
        }
    }

    /// Merge a progress update into the session user and mirror the merged
    /// user into the users collection by id.
    pub(crate) fn apply_progress(&mut self, update: &ProgressUpdate) -> StateResult<&User> {
        let merged = merge_user_update(self.acting_user()?, update);

        match self.users.iter_mut().find(|u| u.id == merged.id) {
            Some(entry) => *entry = merged.clone(),
            None => {
                debug!(user = %merged.id, "session user missing from users; re-adding");
                self.users.push(merged.clone());
            }
        }
        self.session = Some(merged);

        self.persist(Slice::Session);
        self.persist(Slice::Users);
        self.acting_user()
    }

    // ---- Session ----

    /// Sign in as the registered user with this email (case-insensitive).
    pub fn sign_in(&mut self, email: &str) -> StateResult<&User> {
        let wanted = email.trim().to_lowercase();
        let user = self
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| StateError::UserNotFound(email.to_string()))?;

        info!(user = %user.id, role = %user.role, "signed in");
        self.session = Some(user);
        self.persist(Slice::Session);
        self.acting_user()
    }

    /// Register a new user and sign them in.
    pub fn sign_up(&mut self, new_user: NewUser) -> StateResult<&User> {
        if new_user.name.trim().is_empty() {
            return Err(StateError::InvalidInput("name must not be empty".into()));
        }
        let email = new_user.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(StateError::InvalidInput(format!(
                "not an email address: {}",
                new_user.email
            )));
        }
        if self.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(StateError::DuplicateEmail(email));
        }

        let user = User::from_signup(NewUser { email, ..new_user });
        info!(user = %user.id, role = %user.role, "signed up");
        self.users.push(user.clone());
        self.session = Some(user);

        self.persist(Slice::Users);
        self.persist(Slice::Session);
        self.acting_user()
    }

    /// Clear the session and reset the view.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.session.take() {
            info!(user = %user.id, "signed out");
        }
        self.view = ViewState::default();
        self.persist(Slice::Session);
    }

    // ---- View ----

    /// Flip the theme and persist the preference. Returns the new value.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.persist(Slice::DarkMode);
        self.dark_mode
    }

    pub fn set_view(&mut self, view: View) {
        self.view.view = view;
        if view == View::Education {
            self.view.edu_tab = EduTab::Library;
        }
    }

    pub fn set_edu_tab(&mut self, tab: EduTab) {
        self.view.edu_tab = tab;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
    }

    /// Open the authoring flow, optionally editing an existing lesson.
    pub fn open_authoring(&mut self, editing_lesson: Option<&str>) {
        self.view.authoring_open = true;
        self.view.editing_lesson = editing_lesson.map(str::to_string);
    }

    pub fn close_authoring(&mut self) {
        self.view.authoring_open = false;
        self.view.editing_lesson = None;
    }

    pub fn set_live_session(&mut self, open: bool) {
        self.view.live_session_open = open;
    }
}

impl std::fmt::Debug for Academy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Academy")
            .field("users", &self.users.len())
            .field("posts", &self.posts.len())
            .field("lessons", &self.lessons.len())
            .field("media", &self.media.len())
            .field("session", &self.session.as_ref().map(|u| &u.id))
            .finish()
    }
}
