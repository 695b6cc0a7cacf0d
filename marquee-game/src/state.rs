use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::badges::BadgeSet;
use crate::constants::LOG_BOOT;
use crate::data::{Category, Side};
use crate::events::RandomEvent;
use crate::metrics::Metrics;

/// Current position in the playthrough state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the player to pick a side of the current card.
    #[default]
    Playing,
    /// A choice resolved; waiting for the consequence to be acknowledged.
    Consequence,
    /// Terminal defeat. The state is frozen until restart.
    GameOverLoss,
    /// Terminal completion. The state is frozen until restart.
    GameOverWin,
}

impl GamePhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOverLoss | Self::GameOverWin)
    }
}

/// Why the playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    BudgetExhausted,
    AudienceCollapsed,
    SatisfactionCollapsed,
    CompletedAllCards,
}

impl GameOverReason {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BudgetExhausted => "budget_exhausted",
            Self::AudienceCollapsed => "audience_collapsed",
            Self::SatisfactionCollapsed => "satisfaction_collapsed",
            Self::CompletedAllCards => "completed_all_cards",
        }
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::CompletedAllCards)
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Append-only ledger entry, one per resolved card. Never mutated after
/// the push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub card_id: String,
    pub side: Side,
    pub points: i32,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Per-playthrough count of choices by behavioral category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryTally {
    #[serde(default)]
    pub strategic: u32,
    #[serde(default)]
    pub organized: u32,
    #[serde(default)]
    pub platform_user: u32,
    #[serde(default)]
    pub data_driven: u32,
    #[serde(default)]
    pub creative: u32,
    #[serde(default)]
    pub relationship_focused: u32,
    #[serde(default)]
    pub inclusive: u32,
    #[serde(default)]
    pub proactive: u32,
}

impl CategoryTally {
    #[must_use]
    pub const fn count(&self, category: Category) -> u32 {
        match category {
            Category::Strategic => self.strategic,
            Category::Organized => self.organized,
            Category::PlatformUser => self.platform_user,
            Category::DataDriven => self.data_driven,
            Category::Creative => self.creative,
            Category::RelationshipFocused => self.relationship_focused,
            Category::Inclusive => self.inclusive,
            Category::Proactive => self.proactive,
        }
    }

    pub fn bump(&mut self, category: Category) {
        let slot = match category {
            Category::Strategic => &mut self.strategic,
            Category::Organized => &mut self.organized,
            Category::PlatformUser => &mut self.platform_user,
            Category::DataDriven => &mut self.data_driven,
            Category::Creative => &mut self.creative,
            Category::RelationshipFocused => &mut self.relationship_focused,
            Category::Inclusive => &mut self.inclusive,
            Category::Proactive => &mut self.proactive,
        };
        *slot += 1;
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    /// Category with the highest count, ties broken by the fixed category
    /// order. `None` when no tagged choice has been made.
    #[must_use]
    pub fn dominant(&self) -> Option<Category> {
        let mut best: Option<Category> = None;
        for category in Category::ALL {
            let count = self.count(category);
            if count > 0 && best.is_none_or(|b| count > self.count(b)) {
                best = Some(category);
            }
        }
        best
    }
}

/// Resolved-choice payload waiting for acknowledgement: the consequence
/// narrative plus the random event that fired alongside it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub card_id: String,
    pub side: Side,
    pub consequence: String,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub event: Option<RandomEvent>,
}

/// The mutable aggregate owned exclusively by the progression engine.
/// Presentation holds a read-only view; once a terminal phase is reached
/// the state is frozen until `restart()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub phase: GamePhase,
    /// Index of the card currently shown (or next to be shown).
    pub card_index: usize,
    pub metrics: Metrics,
    pub total_points: i32,
    pub history: Vec<ChoiceRecord>,
    #[serde(default)]
    pub tally: CategoryTally,
    #[serde(default)]
    pub triggered_events: HashSet<String>,
    #[serde(default)]
    pub reason: Option<GameOverReason>,
    #[serde(default)]
    pub badges: BadgeSet,
    #[serde(default)]
    pub pending: Option<PendingTurn>,
    #[serde(default)]
    pub style_id: Option<String>,
    pub logs: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            seed: 0,
            phase: GamePhase::Playing,
            card_index: 0,
            metrics: Metrics::default(),
            total_points: 0,
            history: Vec::new(),
            tally: CategoryTally::default(),
            triggered_events: HashSet::new(),
            reason: None,
            badges: BadgeSet::new(),
            pending: None,
            style_id: None,
            logs: vec![String::from(LOG_BOOT)],
        }
    }
}

impl GameState {
    /// Number of cards the player has resolved a choice for.
    #[must_use]
    pub fn cards_completed(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub(crate) fn push_log(&mut self, entry: String) {
        self.logs.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_bump_and_count_agree() {
        let mut tally = CategoryTally::default();
        tally.bump(Category::Strategic);
        tally.bump(Category::Strategic);
        tally.bump(Category::Creative);
        assert_eq!(tally.count(Category::Strategic), 2);
        assert_eq!(tally.count(Category::Creative), 1);
        assert_eq!(tally.count(Category::Proactive), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn dominant_breaks_ties_in_fixed_order() {
        let mut tally = CategoryTally::default();
        assert!(tally.dominant().is_none());

        tally.bump(Category::Proactive);
        tally.bump(Category::Creative);
        // creative comes before proactive in the fixed order
        assert_eq!(tally.dominant(), Some(Category::Creative));

        tally.bump(Category::Proactive);
        assert_eq!(tally.dominant(), Some(Category::Proactive));
    }

    #[test]
    fn phase_terminal_helpers() {
        assert!(!GamePhase::Playing.is_terminal());
        assert!(!GamePhase::Consequence.is_terminal());
        assert!(GamePhase::GameOverLoss.is_terminal());
        assert!(GamePhase::GameOverWin.is_terminal());
        assert!(GameOverReason::CompletedAllCards.is_win());
        assert!(!GameOverReason::BudgetExhausted.is_win());
    }

    #[test]
    fn reason_keys_are_stable() {
        assert_eq!(GameOverReason::BudgetExhausted.key(), "budget_exhausted");
        assert_eq!(
            GameOverReason::AudienceCollapsed.to_string(),
            "audience_collapsed"
        );
        assert_eq!(
            GameOverReason::SatisfactionCollapsed.key(),
            "satisfaction_collapsed"
        );
        assert_eq!(
            GameOverReason::CompletedAllCards.key(),
            "completed_all_cards"
        );
    }

    #[test]
    fn default_state_is_fresh() {
        let state = GameState::default();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.card_index, 0);
        assert_eq!(state.cards_completed(), 0);
        assert!(state.triggered_events.is_empty());
        assert!(state.badges.is_empty());
        assert!(!state.is_terminal());
        assert_eq!(state.logs, vec![String::from(LOG_BOOT)]);
    }
}
