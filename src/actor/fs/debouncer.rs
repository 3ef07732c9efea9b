use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::types::ChangeKind;
use crate::utils::path::normalize_file_path;

/// Sleep used while nothing is pending.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

/// Trailing-edge debouncer for a single file.
///
/// Every accepted event re-arms the quiet interval; the change is released
/// only once the interval elapses without a new event.
/// No business logic, no global state access.
pub(super) struct Debouncer {
    /// Normalized path of the watched file
    target: PathBuf,
    /// Quiet interval
    quiet: Duration,
    /// First change kind seen in the current burst
    pub(super) pending: Option<ChangeKind>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(target: PathBuf, quiet: Duration) -> Self {
        Self {
            target,
            quiet,
            pending: None,
            last_event: None,
        }
    }

    /// Add a notify event. Returns whether it re-armed the debouncer.
    ///
    /// Only content changes to the target file count: events for sibling
    /// files in the watched directory are dropped.
    pub(super) fn add_event(&mut self, event: &notify::Event) -> bool {
        let Some(kind) = ChangeKind::from_event(&event.kind) else {
            return false;
        };

        if !event.paths.iter().any(|path| self.is_target(path)) {
            return false;
        }

        crate::debug!("watch"; "event {}: {}", kind.label(), self.target.display());
        // First event of a burst wins (created + modified is still a create)
        self.pending.get_or_insert(kind);
        self.last_event = Some(Instant::now());
        true
    }

    fn is_target(&self, path: &Path) -> bool {
        if path == self.target {
            return true;
        }
        path.file_name() == self.target.file_name() && normalize_file_path(path) == self.target
    }

    /// Take the pending change if the quiet interval has elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<ChangeKind> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        self.pending.take()
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        self.pending.is_some() && last_event.elapsed() >= self.quiet
    }

    /// Precise sleep duration until the pending change becomes ready.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return IDLE_SLEEP;
        };

        self.quiet
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}
