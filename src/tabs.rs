//! Tab Controller
//!
//! Decides which data a tab activation or a poll tick must load. The
//! decisions are pure; the dashboard controller carries them out.

use crate::model::{StatusFilter, Tab};
use crate::state::UiState;

/// List load triggered by activating a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLoad {
    Accounts,
    Tasks(StatusFilter),
}

/// What one poll tick refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    /// Stats refresh on every tick
    pub stats: bool,
    /// Task list refresh, only while the tasks tab is active
    pub tasks: Option<StatusFilter>,
}

pub struct TabController;

impl TabController {
    /// Activate `tab` and return the load it triggers
    pub fn select(state: &mut UiState, tab: Tab) -> Option<TabLoad> {
        state.active_tab = tab;
        match tab {
            Tab::Accounts => Some(TabLoad::Accounts),
            Tab::Tasks => Some(TabLoad::Tasks(state.filter)),
            Tab::Create => None,
        }
    }

    /// Plan a poll tick against the current state
    pub fn poll_plan(state: &UiState) -> PollPlan {
        PollPlan {
            stats: true,
            tasks: (state.active_tab == Tab::Tasks).then_some(state.filter),
        }
    }
}
