//! Page adapter
//!
//! The thin attach step between rendered markup and whatever displays it.
//! A browser host maps these calls onto the DOM; [`MemoryPage`] keeps the
//! latest state in memory for headless hosts and tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::model::{StatusFilter, Tab};
use crate::notify::Notification;
use crate::render::{Markup, Region};

/// Forms the controller can reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Task,
    Account,
}

/// Display surface driven by the dashboard controller
pub trait Page: Send + Sync {
    /// Replace a region's content wholesale
    fn replace_region(&self, region: Region, markup: Markup);

    /// Show a notification, or hide the current one
    fn show_notification(&self, notification: Option<&Notification>);

    /// Mark a tab (button and content) active and all others inactive
    fn activate_tab(&self, tab: Tab);

    /// Mark a filter button active and all others inactive
    fn activate_filter(&self, filter: StatusFilter);

    /// Clear a form; the task form's max-items field goes back to `default_max_items`
    fn reset_form(&self, form: Form, default_max_items: u32);

    /// Navigate to a URL (used for file downloads)
    fn navigate(&self, url: &str);

    /// Open a secondary window with a stand-alone document.
    /// Returns `false` when the host refuses to open it.
    fn open_window(&self, title: &str, document: Markup) -> bool;
}

/// Something that happened on a [`MemoryPage`], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Region(Region, Markup),
    Notification(Option<String>),
    Tab(Tab),
    Filter(StatusFilter),
    FormReset(Form),
    Navigate(String),
    Window(String),
}

/// Events a [`MemoryPage`] keeps; older ones are dropped first
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Current state of a [`MemoryPage`]
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub regions: BTreeMap<Region, Markup>,
    pub notification: Option<Notification>,
    pub active_tab: Tab,
    pub active_filter: StatusFilter,
    pub task_form_max_items: Option<u32>,
    pub windows: Vec<(String, Markup)>,
    /// Most recent events, at most [`EVENT_LOG_CAPACITY`]
    pub events: VecDeque<PageEvent>,
}

impl PageSnapshot {
    fn record(&mut self, event: PageEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn region(&self, region: Region) -> Option<&Markup> {
        self.regions.get(&region)
    }

    /// Regions replaced so far, in order
    pub fn region_history(&self, region: Region) -> Vec<&Markup> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PageEvent::Region(r, markup) if *r == region => Some(markup),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PageEvent::Navigate(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn form_resets(&self, form: Form) -> usize {
        self.events
            .iter()
            .filter(|e| **e == PageEvent::FormReset(form))
            .count()
    }

    pub fn tab_activations(&self) -> Vec<Tab> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PageEvent::Tab(tab) => Some(*tab),
                _ => None,
            })
            .collect()
    }
}

/// In-memory page for headless hosts and tests
pub struct MemoryPage {
    state: Mutex<PageSnapshot>,
    revision: watch::Sender<u64>,
    popups_allowed: bool,
}

impl MemoryPage {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Mutex::new(PageSnapshot::default()),
            revision,
            popups_allowed: true,
        }
    }

    /// A page whose host refuses to open secondary windows
    pub fn with_popups_blocked() -> Self {
        Self {
            popups_allowed: false,
            ..Self::new()
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    /// Read the current state in place, without cloning it
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&PageSnapshot) -> R) -> R {
        f(&*self.lock())
    }

    /// Receiver that observes a new revision after every change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut PageSnapshot)) {
        f(&mut self.lock());
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MemoryPage {
    fn replace_region(&self, region: Region, markup: Markup) {
        self.update(|s| {
            s.regions.insert(region, markup.clone());
            s.record(PageEvent::Region(region, markup));
        });
    }

    fn show_notification(&self, notification: Option<&Notification>) {
        self.update(|s| {
            s.notification = notification.cloned();
            s.record(PageEvent::Notification(notification.map(|n| n.message.clone())));
        });
    }

    fn activate_tab(&self, tab: Tab) {
        self.update(|s| {
            s.active_tab = tab;
            s.record(PageEvent::Tab(tab));
        });
    }

    fn activate_filter(&self, filter: StatusFilter) {
        self.update(|s| {
            s.active_filter = filter;
            s.record(PageEvent::Filter(filter));
        });
    }

    fn reset_form(&self, form: Form, default_max_items: u32) {
        self.update(|s| {
            if form == Form::Task {
                s.task_form_max_items = Some(default_max_items);
            }
            s.record(PageEvent::FormReset(form));
        });
    }

    fn navigate(&self, url: &str) {
        self.update(|s| s.record(PageEvent::Navigate(url.to_string())));
    }

    fn open_window(&self, title: &str, document: Markup) -> bool {
        if !self.popups_allowed {
            return false;
        }
        self.update(|s| {
            s.windows.push((title.to_string(), document));
            s.record(PageEvent::Window(title.to_string()));
        });
        true
    }
}
