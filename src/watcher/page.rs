use crate::error::WatchError;

/// Identity of a post container within the host page.
///
/// Identity is container-identity, not content-identity: two posts with
/// identical text are distinct containers, and a re-observed container keeps
/// its id for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

/// The host document, as far as the watcher is concerned.
///
/// The seam that keeps injection logic testable without a live document:
/// production code reads real HTML through [`super::HtmlPage`], tests use
/// hand-built fakes. Selector drift shows up here as empty results, which
/// the watcher treats as "nothing to do" — it cannot tell "no posts yet"
/// from "selectors stale".
pub trait HostPage {
    /// Containers currently matching the post selector, in document order.
    fn post_containers(&self) -> Vec<ContainerId>;

    /// Whether the container has a locatable interaction bar to host the
    /// trigger control.
    fn has_interaction_bar(&self, id: ContainerId) -> bool;

    /// Insert the trigger control into the container's interaction bar.
    fn attach_trigger(&mut self, id: ContainerId) -> Result<(), WatchError>;

    /// Text of every text-bearing sub-element of the container, in document
    /// order.
    fn text_blocks(&self, id: ContainerId) -> Vec<String>;
}
