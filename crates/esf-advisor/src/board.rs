use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::traits::AdvisoryService;
use crate::types::DailyTip;

/// Text shown until a tip arrives, and kept if none does.
pub const DEFAULT_PLACEHOLDER: &str = "Buscando sabedoria...";

/// Holder of the tip of the day.
///
/// [`TipBoard::start`] spawns the single startup fetch. The board owns a
/// liveness flag: once the board is dropped, a result that arrives later is
/// discarded instead of applied.
pub struct TipBoard {
    current: Arc<RwLock<DailyTip>>,
    alive: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

/// Read-only view of a board's tip.
#[derive(Clone)]
pub struct TipReader {
    current: Arc<RwLock<DailyTip>>,
}

impl TipReader {
    pub fn current(&self) -> DailyTip {
        read_tip(&self.current)
    }
}

fn read_tip(slot: &RwLock<DailyTip>) -> DailyTip {
    match slot.read() {
        Ok(tip) => tip.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

impl TipBoard {
    /// A board showing `placeholder` with no fetch in flight.
    pub fn idle(placeholder: impl Into<String>) -> Self {
        Self {
            current: Arc::new(RwLock::new(DailyTip::placeholder(placeholder))),
            alive: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    /// Show `placeholder` and fetch the tip in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(advisor: Arc<dyn AdvisoryService>, placeholder: impl Into<String>) -> Self {
        let mut board = Self::idle(placeholder);
        let current = Arc::clone(&board.current);
        let alive = Arc::clone(&board.alive);

        board.task = Some(tokio::spawn(async move {
            let Some(tip) = advisor.fetch_daily_tip().await else {
                debug!("no daily tip available; keeping placeholder");
                return;
            };
            // Liveness is checked under the write lock that `Drop` also takes.
            let Ok(mut slot) = current.write() else {
                return;
            };
            if !alive.load(Ordering::Acquire) {
                debug!("daily tip arrived after its board was dropped; discarded");
                return;
            }
            *slot = tip;
        }));
        board
    }

    pub fn current(&self) -> DailyTip {
        read_tip(&self.current)
    }

    pub fn reader(&self) -> TipReader {
        TipReader {
            current: Arc::clone(&self.current),
        }
    }

    /// Returns `true` while the startup fetch is still pending.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the startup fetch to finish.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "daily tip task failed");
            }
        }
    }
}

impl Drop for TipBoard {
    fn drop(&mut self) {
        let _slot = match self.current.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.alive.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for TipBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipBoard")
            .field("pending", &self.is_pending())
            .finish()
    }
}
