//! Terminal summary and the lead-capture boundary.
//!
//! The engine hands the presentation layer an [`OutcomeSummary`] once a
//! playthrough ends; where the outcome goes afterwards (a CRM, a local
//! file, nowhere) is the host's business, abstracted behind [`LeadSink`].

use serde::{Deserialize, Serialize};

use crate::badges::BadgeSet;
use crate::metrics::Metrics;
use crate::state::GameOverReason;

/// Everything a results screen needs, frozen at game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub reason: GameOverReason,
    pub metrics: Metrics,
    pub metric_total: i32,
    pub total_points: i32,
    pub badges: BadgeSet,
    pub cards_completed: usize,
    pub events_triggered: usize,
    /// Friendly share code for the seed that produced this run.
    pub share_code: String,
}

impl OutcomeSummary {
    #[must_use]
    pub const fn won(&self) -> bool {
        self.reason.is_win()
    }
}

/// Contact details a player may volunteer on the results screen. All
/// fields are free text as entered; validation belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeadData {
    pub name: String,
    pub whatsapp: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub main_challenge: String,
}

/// Destination for captured leads. Implementations decide transport and
/// persistence; the engine never submits on its own.
pub trait LeadSink {
    type Error;

    /// Deliver one lead together with the outcome it was captured on.
    ///
    /// # Errors
    ///
    /// Returns the sink's error when delivery fails.
    fn submit_lead(&mut self, lead: &LeadData, outcome: &OutcomeSummary) -> Result<(), Self::Error>;
}
