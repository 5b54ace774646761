//! The feed watcher: reacts to subtree changes in the host page, injects one
//! trigger control per post container exactly once, and hands extracted post
//! text to the popup process through the shared store.

pub mod html;
pub mod page;

pub use html::HtmlPage;
pub use page::{ContainerId, HostPage};

use crate::error::WatchError;
use crate::store::StateStore;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A notification that some subtree of the host document changed. The event
/// carries no payload: each one triggers a rescan, and the injection
/// registry makes rescans idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    SubtreeChanged,
}

/// Per-container state machine: `Unseen → Injected`, terminal per identity.
/// The registry is the process-wide injection index; entries are never
/// explicitly removed — a container's identity leaves with the page itself.
pub struct FeedWatcher {
    store: Arc<dyn StateStore>,
    injected: HashSet<ContainerId>,
}

impl FeedWatcher {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            injected: HashSet::new(),
        }
    }

    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }

    pub fn is_injected(&self, id: ContainerId) -> bool {
        self.injected.contains(&id)
    }

    /// Eager full scan at startup, covering content already present before
    /// observation begins. Same code path as event handling, so the startup
    /// and incremental routes cannot diverge.
    pub fn start(&mut self, page: &mut dyn HostPage) -> usize {
        self.scan(page)
    }

    pub fn on_event(&mut self, _event: PageEvent, page: &mut dyn HostPage) -> usize {
        self.scan(page)
    }

    fn scan(&mut self, page: &mut dyn HostPage) -> usize {
        let mut attached = 0;
        for id in page.post_containers() {
            if self.injected.contains(&id) {
                continue;
            }
            if !page.has_interaction_bar(id) {
                // stays Unseen; a later mutation may add the bar
                tracing::debug!(?id, "container has no interaction bar yet, skipping");
                continue;
            }

            // Registered before the control goes in, so a duplicate
            // observation of the same batch cannot attach twice.
            self.injected.insert(id);
            match page.attach_trigger(id) {
                Ok(()) => {
                    attached += 1;
                    tracing::debug!(?id, "trigger attached");
                }
                Err(err) => {
                    self.injected.remove(&id);
                    tracing::warn!(?id, error = %err, "failed to attach trigger");
                }
            }
        }
        attached
    }

    /// What the trigger control does when activated: extract the container's
    /// text and hand it off through the shared store with a timestamp.
    ///
    /// Short text is stored as-is; rejecting too-short input is the
    /// consuming pipeline's responsibility, not the watcher's.
    pub fn activate(&self, page: &dyn HostPage, id: ContainerId) -> Result<String, WatchError> {
        if !self.injected.contains(&id) {
            return Err(WatchError::NotInjected(id));
        }
        let text = extract_text(page, id);
        self.store.record_extraction(&text, Utc::now())?;
        Ok(text)
    }

    /// Consume a stream of subtree-change events until the sender side goes
    /// away (tab teardown), rescanning on each one.
    pub async fn run<P: HostPage>(&mut self, page: &mut P, mut events: mpsc::Receiver<PageEvent>) {
        self.start(page);
        while let Some(event) = events.recv().await {
            self.on_event(event, page);
        }
    }
}

/// Concatenate every text-bearing sub-element with single-space separation.
pub fn extract_text(page: &dyn HostPage, id: ContainerId) -> String {
    page.text_blocks(id)
        .iter()
        .flat_map(|block| block.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
