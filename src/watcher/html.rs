use super::page::{ContainerId, HostPage};
use crate::config::SelectorConfig;
use crate::error::WatchError;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML snapshot of the feed, addressed through the configured CSS
/// selectors.
///
/// The snapshot is immutable, so container ids are positions in document
/// order and stay stable for this page's lifetime. Trigger insertion is
/// recorded rather than spliced into the tree — the record is what the rest
/// of the system observes.
pub struct HtmlPage {
    document: Html,
    container_selector: Selector,
    bar_selector: Selector,
    text_selector: Selector,
    injected: Vec<ContainerId>,
}

fn parse_selector(selector: &str) -> Result<Selector, WatchError> {
    Selector::parse(selector).map_err(|e| WatchError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl HtmlPage {
    pub fn parse(html: &str, selectors: &SelectorConfig) -> Result<Self, WatchError> {
        Ok(Self {
            document: Html::parse_document(html),
            container_selector: parse_selector(&selectors.post_container)?,
            bar_selector: parse_selector(&selectors.interaction_bar)?,
            text_selector: parse_selector(&selectors.text_blocks)?,
            injected: Vec::new(),
        })
    }

    /// Containers that received a trigger, in insertion order.
    pub fn injected(&self) -> &[ContainerId] {
        &self.injected
    }

    fn container(&self, id: ContainerId) -> Option<ElementRef<'_>> {
        self.document
            .select(&self.container_selector)
            .nth(usize::try_from(id.0).ok()?)
    }
}

impl HostPage for HtmlPage {
    fn post_containers(&self) -> Vec<ContainerId> {
        (0..self.document.select(&self.container_selector).count() as u64)
            .map(ContainerId)
            .collect()
    }

    fn has_interaction_bar(&self, id: ContainerId) -> bool {
        self.container(id)
            .is_some_and(|el| el.select(&self.bar_selector).next().is_some())
    }

    fn attach_trigger(&mut self, id: ContainerId) -> Result<(), WatchError> {
        if self.container(id).is_none() {
            return Err(WatchError::UnknownContainer(id));
        }
        self.injected.push(id);
        Ok(())
    }

    fn text_blocks(&self, id: ContainerId) -> Vec<String> {
        let Some(container) = self.container(id) else {
            return Vec::new();
        };
        container
            .select(&self.text_selector)
            .map(|el| {
                el.text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|text| !text.is_empty())
            .collect()
    }
}
