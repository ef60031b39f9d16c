//! Tab navigation state.
//!
//! Exactly one tab (button and content panel) is active at a time; switching
//! tabs dispatches the animation trigger appropriate to the new tab.

use std::fmt;
use std::str::FromStr;

/// The dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Overview,
    Training,
    Analysis,
    Network,
}

impl TabId {
    /// All tabs in display order.
    pub const ALL: [TabId; 4] = [
        TabId::Overview,
        TabId::Training,
        TabId::Analysis,
        TabId::Network,
    ];

    /// Stable identifier used by configuration and the CLI.
    pub fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Training => "training",
            Self::Analysis => "analysis",
            Self::Network => "network",
        }
    }

    /// Human-readable tab title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Training => "Training",
            Self::Analysis => "Live Analysis",
            Self::Network => "Network",
        }
    }

    /// The animation this tab kicks off when activated.
    pub fn trigger(self) -> AnimationTrigger {
        match self {
            Self::Overview => AnimationTrigger::ImprovementCounters,
            Self::Training => AnimationTrigger::TrainingCounters,
            Self::Analysis => AnimationTrigger::LiveMetrics,
            Self::Network => AnimationTrigger::None,
        }
    }

    /// Position in the tab bar.
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TabId {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// Error for an identifier that names no tab.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown tab: {0:?}")]
pub struct UnknownTab(pub String);

/// What a tab activation should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTrigger {
    /// Overview improvement percentages
    ImprovementCounters,
    /// Training statistics
    TrainingCounters,
    /// Analysis live metrics
    LiveMetrics,
    /// No animation for this tab
    None,
}

/// Tracks which tab is active.
#[derive(Debug, Clone)]
pub struct TabController {
    active: Option<TabId>,
}

impl TabController {
    /// Create a controller with no active tab.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// The currently active tab, if any.
    pub fn active(&self) -> Option<TabId> {
        self.active
    }

    /// Whether the given tab carries the active marking.
    pub fn is_active(&self, tab: TabId) -> bool {
        self.active == Some(tab)
    }

    /// Activate a tab and return its animation trigger. Re-activating the
    /// active tab re-runs its trigger.
    pub fn activate(&mut self, tab: TabId) -> AnimationTrigger {
        self.active = Some(tab);
        tab.trigger()
    }

    /// Activate by identifier string. An identifier matching no tab
    /// deactivates everything and triggers nothing.
    pub fn activate_id(&mut self, id: &str) -> AnimationTrigger {
        match id.parse::<TabId>() {
            Ok(tab) => self.activate(tab),
            Err(_) => {
                self.active = None;
                AnimationTrigger::None
            }
        }
    }

}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}
