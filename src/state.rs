//! UI state
//!
//! The small amount of state the dashboard owns for the page lifetime: the
//! active tab, the task filter, and per-region load sequence numbers used to
//! drop responses that a newer load has superseded.

use crate::model::{StatusFilter, Tab};
use crate::render::Region;

/// Page-lifetime dashboard state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub active_tab: Tab,
    pub filter: StatusFilter,
    accounts_seq: u64,
    tasks_seq: u64,
}

/// Ticket for one list load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub region: Region,
    pub seq: u64,
}

impl UiState {
    pub fn new(active_tab: Tab, filter: StatusFilter) -> Self {
        Self {
            active_tab,
            filter,
            ..Default::default()
        }
    }

    /// Register a new load of a list region
    pub fn issue(&mut self, region: Region) -> LoadTicket {
        let seq = match region {
            Region::Accounts => {
                self.accounts_seq += 1;
                self.accounts_seq
            }
            Region::Tasks => {
                self.tasks_seq += 1;
                self.tasks_seq
            }
            // stats are a point-in-time projection; every response is rendered
            Region::Stats => 0,
        };
        LoadTicket { region, seq }
    }

    /// Whether no newer load of the same region has been issued
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        match ticket.region {
            Region::Accounts => ticket.seq == self.accounts_seq,
            Region::Tasks => ticket.seq == self.tasks_seq,
            Region::Stats => true,
        }
    }
}
