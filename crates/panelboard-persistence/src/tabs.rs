//! In-process stand-in for the browser's tab strip.

use async_trait::async_trait;
use panelboard_core::{PanelboardError, PanelboardResult, TabController, TabHandle, TabSignal};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

struct OpenTab {
    handle: TabHandle,
    url: String,
    tx: broadcast::Sender<TabSignal>,
}

/// Registry of open pages. Each page listens on its own signal channel.
pub struct LocalTabHub {
    next_id: AtomicU64,
    tabs: Mutex<Vec<OpenTab>>,
    focused: Mutex<Option<TabHandle>>,
}

impl LocalTabHub {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tabs: Mutex::new(Vec::new()),
            focused: Mutex::new(None),
        }
    }

    /// Open a page at `url` and return the receiver it should listen on.
    pub fn open_tab(&self, url: &str) -> (TabHandle, broadcast::Receiver<TabSignal>) {
        let handle = TabHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = broadcast::channel(8);
        self.tabs.lock().push(OpenTab {
            handle,
            url: url.to_string(),
            tx,
        });
        tracing::debug!("Opened {} at {}", handle, url);
        (handle, rx)
    }

    pub fn close_tab(&self, tab: TabHandle) -> bool {
        let mut tabs = self.tabs.lock();
        let before = tabs.len();
        tabs.retain(|t| t.handle != tab);
        let mut focused = self.focused.lock();
        if *focused == Some(tab) {
            *focused = None;
        }
        tabs.len() != before
    }

    pub fn focused(&self) -> Option<TabHandle> {
        *self.focused.lock()
    }

    pub fn url_of(&self, tab: TabHandle) -> Option<String> {
        self.tabs
            .lock()
            .iter()
            .find(|t| t.handle == tab)
            .map(|t| t.url.clone())
    }

    pub fn open_count(&self) -> usize {
        self.tabs.lock().len()
    }

    fn signal(&self, tab: TabHandle, signal: TabSignal) -> PanelboardResult<()> {
        let tabs = self.tabs.lock();
        let open = tabs
            .iter()
            .find(|t| t.handle == tab)
            .ok_or_else(|| PanelboardError::Tab(format!("{} is not open", tab)))?;
        // A page that stopped listening still counts as open
        let _ = open.tx.send(signal);
        Ok(())
    }
}

impl Default for LocalTabHub {
    fn default() -> Self {
        Self::new()
    }
}

/// `panelA.html` matches both the bare page name and any url ending in `/panelA.html`.
fn url_matches(open: &str, wanted: &str) -> bool {
    open == wanted
        || open
            .strip_suffix(wanted)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

#[async_trait]
impl TabController for LocalTabHub {
    async fn find_tabs(&self, url: &str) -> PanelboardResult<Vec<TabHandle>> {
        Ok(self
            .tabs
            .lock()
            .iter()
            .filter(|t| url_matches(&t.url, url))
            .map(|t| t.handle)
            .collect())
    }

    async fn reload(&self, tab: TabHandle) -> PanelboardResult<()> {
        self.signal(tab, TabSignal::Reload)
    }

    async fn focus(&self, tab: TabHandle) -> PanelboardResult<()> {
        self.signal(tab, TabSignal::Focus)?;
        *self.focused.lock() = Some(tab);
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> PanelboardResult<TabHandle> {
        let (handle, _rx) = self.open_tab(url);
        *self.focused.lock() = Some(handle);
        Ok(handle)
    }
}
