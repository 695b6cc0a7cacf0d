//! The progression engine: the state machine driving card advance,
//! choice application, random-event injection, game-over evaluation,
//! and scoring.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::badges;
use crate::constants::{
    COMBO_BONUS, COMBO_WINDOW, DEFAULT_CHOICE_POINTS, LOG_BADGES_AWARDED, LOG_CHOICE_PREFIX,
    LOG_COMBO_PREFIX, LOG_EVENT_PREFIX, LOG_GAMEOVER_PREFIX, LOG_RECOVERY, LOG_RESTART,
    LOSS_CHECK_GRACE_CARDS, RANDOM_EVENT_CHANCE, RECOVERY_BONUS, RECOVERY_FLOOR,
};
use crate::data::{Card, Deck, Side};
use crate::events::{RandomEvent, RandomEventPool};
use crate::metrics::{Effects, Metrics};
use crate::outcome::OutcomeSummary;
use crate::state::{ChoiceRecord, GameOverReason, GamePhase, GameState, PendingTurn};
use crate::styles::Style;

/// Optional mechanics lifted from the original balancing sketches. All
/// default off; every one still routes metric changes through the
/// clamped metric model.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeatureOpts {
    /// Three consecutive same-category choices pay a bonus on the
    /// category's affine metric.
    #[serde(default)]
    pub combo_bonus: bool,
    /// Axes below the recovery floor get a boost after each card.
    #[serde(default)]
    pub recovery_bonus: bool,
    /// Random events avoid piling onto an already strained axis.
    #[serde(default)]
    pub balanced_events: bool,
    /// Soften early-deck effects and intensify late-deck effects.
    #[serde(default)]
    pub difficulty_curve: bool,
}

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_metrics: Metrics,
    pub default_points: i32,
    /// Per-choice probability that a random event fires.
    pub event_chance: f32,
    /// Cards that must complete before loss checks activate.
    pub grace_cards: usize,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(default)]
    pub features: FeatureOpts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_metrics: Metrics::default(),
            default_points: DEFAULT_CHOICE_POINTS,
            event_chance: RANDOM_EVENT_CHANCE,
            grace_cards: LOSS_CHECK_GRACE_CARDS,
            style: None,
            features: FeatureOpts::default(),
        }
    }
}

/// What a resolved choice surfaced for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub consequence: String,
    pub tip: Option<String>,
    pub points: i32,
    /// Random event that fired in the same transition, already applied
    /// to the metrics.
    pub event: Option<RandomEvent>,
}

/// The progression engine. Exclusively owns the [`GameState`]; the
/// presentation layer reads through [`GameEngine::state`] and drives
/// transitions through the three operations. Invalid transitions are
/// no-ops, never faults.
#[derive(Debug, Clone)]
pub struct GameEngine {
    deck: Deck,
    pool: RandomEventPool,
    cfg: EngineConfig,
    seed: u64,
    rng: ChaCha20Rng,
    state: GameState,
}

impl GameEngine {
    /// Construct an engine over a validated deck and event pool. The
    /// seed fixes the whole random stream, so identical seeds replay
    /// identical playthroughs.
    #[must_use]
    pub fn new(deck: Deck, pool: RandomEventPool, cfg: EngineConfig, seed: u64) -> Self {
        let deck = if cfg.features.difficulty_curve {
            deck.with_difficulty_curve()
        } else {
            deck
        };
        let state = Self::initial_state(&cfg, seed);
        let mut engine = Self {
            deck,
            pool,
            cfg,
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
            state,
        };
        // an empty deck completes immediately
        engine.evaluate_terminal();
        engine
    }

    /// Engine over the bundled production deck, pool, and styles.
    #[must_use]
    pub fn bundled(cfg: EngineConfig, seed: u64) -> Self {
        Self::new(
            Deck::bundled().clone(),
            RandomEventPool::bundled().clone(),
            cfg,
            seed,
        )
    }

    /// Engine fed by a platform-specific [`crate::DeckLoader`].
    ///
    /// # Errors
    ///
    /// Returns the loader's error if deck or event data cannot be loaded.
    pub fn from_loader<L>(loader: &L, cfg: EngineConfig, seed: u64) -> Result<Self, L::Error>
    where
        L: crate::DeckLoader,
    {
        let deck = loader.load_deck()?;
        let pool = loader.load_events()?;
        Ok(Self::new(deck, pool, cfg, seed))
    }

    fn initial_state(cfg: &EngineConfig, seed: u64) -> GameState {
        let metrics = cfg.style.as_ref().map_or(cfg.initial_metrics, |style| {
            style.starting_metrics(cfg.initial_metrics)
        });
        GameState {
            seed,
            metrics,
            style_id: cfg.style.as_ref().map(|style| style.id.clone()),
            ..GameState::default()
        }
    }

    /// Read-only view of the game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Card currently awaiting a choice. `None` while a consequence is
    /// pending or once the game is over.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if self.state.phase != GamePhase::Playing {
            return None;
        }
        self.deck.card_at(self.state.card_index)
    }

    /// Resolve the chosen side of the current card. Valid only in the
    /// `Playing` phase; anything else is a silent no-op returning `None`.
    pub fn submit_choice(&mut self, side: Side) -> Option<ChoiceOutcome> {
        if self.state.phase != GamePhase::Playing {
            return None;
        }
        let card = self.deck.card_at(self.state.card_index)?.clone();
        let choice = card.choice(side).clone();
        let points = card.points_for(side, self.cfg.default_points);

        self.state.history.push(ChoiceRecord {
            card_id: card.id.clone(),
            side,
            points,
            category: choice.category,
        });
        self.state.total_points += points;
        if let Some(category) = choice.category {
            self.state.tally.bump(category);
        }
        self.state.metrics.apply(&choice.effects);
        self.state
            .push_log(format!("{LOG_CHOICE_PREFIX}{}.{side}", card.id));

        if self.cfg.features.combo_bonus {
            self.apply_combo_bonus();
        }
        let event = self.roll_random_event();
        if self.cfg.features.recovery_bonus {
            self.apply_recovery_bonus();
        }

        self.state.pending = Some(PendingTurn {
            card_id: card.id,
            side,
            consequence: choice.consequence.clone(),
            tip: choice.tip.clone(),
            event: event.clone(),
        });

        self.evaluate_terminal();
        if !self.state.phase.is_terminal() {
            self.state.phase = GamePhase::Consequence;
        }

        Some(ChoiceOutcome {
            consequence: choice.consequence,
            tip: choice.tip,
            points,
            event,
        })
    }

    /// Acknowledge the pending consequence and advance to the next card.
    /// Valid only in the `Consequence` phase; otherwise a no-op
    /// returning `false`.
    pub fn acknowledge(&mut self) -> bool {
        if self.state.phase != GamePhase::Consequence {
            return false;
        }
        self.state.card_index += 1;
        self.state.pending = None;
        self.evaluate_terminal();
        if !self.state.phase.is_terminal() {
            self.state.phase = GamePhase::Playing;
        }
        true
    }

    /// Reset to the exact initial state: same deck, same seed (the
    /// random stream restarts), cleared history, tally, triggered set,
    /// and terminal flags.
    pub fn restart(&mut self) {
        self.rng = ChaCha20Rng::seed_from_u64(self.seed);
        self.state = Self::initial_state(&self.cfg, self.seed);
        self.state.push_log(String::from(LOG_RESTART));
        self.evaluate_terminal();
    }

    /// Terminal payload for the lead/outcome boundary. `None` until the
    /// game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<OutcomeSummary> {
        let reason = self.state.reason?;
        if !self.state.is_terminal() {
            return None;
        }
        Some(OutcomeSummary {
            reason,
            metrics: self.state.metrics,
            metric_total: self.state.metrics.total(),
            total_points: self.state.total_points,
            badges: self.state.badges.clone(),
            cards_completed: self.state.cards_completed(),
            events_triggered: self.state.triggered_events.len(),
            share_code: crate::seed::encode_friendly(self.seed),
        })
    }

    /// Terminal evaluation. Idempotent: once the state is terminal this
    /// returns immediately, so badge computation and reason assignment
    /// happen exactly once per playthrough.
    ///
    /// The budget boundary is `<= 0` while audience and satisfaction are
    /// strictly `< 0` — the asymmetry is preserved from the observed
    /// design pending product confirmation.
    fn evaluate_terminal(&mut self) {
        if self.state.phase.is_terminal() {
            return;
        }
        if self.state.cards_completed() >= self.cfg.grace_cards {
            let metrics = &self.state.metrics;
            let loss = if metrics.budget <= 0 {
                Some(GameOverReason::BudgetExhausted)
            } else if metrics.audience < 0 {
                Some(GameOverReason::AudienceCollapsed)
            } else if metrics.satisfaction < 0 {
                Some(GameOverReason::SatisfactionCollapsed)
            } else {
                None
            };
            if let Some(reason) = loss {
                self.state.reason = Some(reason);
                self.state.phase = GamePhase::GameOverLoss;
                self.state
                    .push_log(format!("{LOG_GAMEOVER_PREFIX}{}", reason.key()));
                return;
            }
        }
        if self.state.card_index >= self.deck.len() {
            self.state.badges = badges::evaluate(
                &self.state.metrics,
                self.state.total_points,
                &self.state.tally,
            );
            self.state.reason = Some(GameOverReason::CompletedAllCards);
            self.state.phase = GamePhase::GameOverWin;
            self.state
                .push_log(format!("{LOG_GAMEOVER_PREFIX}{}", GameOverReason::CompletedAllCards.key()));
            self.state.push_log(String::from(LOG_BADGES_AWARDED));
        }
    }

    /// Roll the per-choice random event. At most one event per choice;
    /// every event fires at most once per playthrough.
    fn roll_random_event(&mut self) -> Option<RandomEvent> {
        if self.cfg.event_chance <= 0.0 || self.pool.is_empty() {
            return None;
        }
        if self.rng.r#gen::<f32>() >= self.cfg.event_chance {
            return None;
        }
        let picked = if self.cfg.features.balanced_events {
            self.pool
                .pick_balanced(&self.state.metrics, &self.state.triggered_events, &mut self.rng)
        } else {
            self.pool
                .pick_untriggered(&self.state.triggered_events, &mut self.rng)
        }?
        .clone();
        self.state.metrics.apply(&picked.effects);
        self.state.triggered_events.insert(picked.id.clone());
        self.state.push_log(format!("{LOG_EVENT_PREFIX}{}", picked.id));
        Some(picked)
    }

    fn apply_combo_bonus(&mut self) {
        let len = self.state.history.len();
        if len < COMBO_WINDOW {
            return;
        }
        let window = &self.state.history[len - COMBO_WINDOW..];
        let Some(category) = window[0].category else {
            return;
        };
        if window.iter().all(|record| record.category == Some(category)) {
            let bonus = Effects::single(category.affinity(), COMBO_BONUS);
            self.state.metrics.apply(&bonus);
            self.state
                .push_log(format!("{LOG_COMBO_PREFIX}{category}"));
        }
    }

    fn apply_recovery_bonus(&mut self) {
        let metrics = self.state.metrics;
        let boost = |v: i32| if v < RECOVERY_FLOOR { RECOVERY_BONUS } else { 0 };
        let bonus = Effects {
            budget: boost(metrics.budget),
            audience: boost(metrics.audience),
            satisfaction: boost(metrics.satisfaction),
            technology: boost(metrics.technology),
        };
        if bonus.is_empty() {
            return;
        }
        self.state.metrics.apply(&bonus);
        self.state.push_log(String::from(LOG_RECOVERY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Card, CardPoints, Category, Choice};

    fn choice(text: &str, effects: Effects, category: Option<Category>) -> Choice {
        Choice {
            text: text.to_string(),
            effects,
            consequence: format!("{text} happened"),
            tip: None,
            category,
            points: None,
        }
    }

    fn card(id: &str, left_fx: Effects, right_fx: Effects, category: Option<Category>) -> Card {
        Card {
            id: id.to_string(),
            title: id.to_string(),
            description: "desc".to_string(),
            icon: "x".to_string(),
            left: choice("left", left_fx, category),
            right: choice("right", right_fx, None),
            educational: None,
            points: Some(CardPoints { left: 10, right: 20 }),
        }
    }

    fn neutral_deck(count: usize) -> Deck {
        let cards = (0..count)
            .map(|i| {
                card(
                    &format!("card-{i}"),
                    Effects::default(),
                    Effects::default(),
                    Some(Category::Strategic),
                )
            })
            .collect();
        Deck::from_cards(cards).unwrap()
    }

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            event_chance: 0.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn submit_then_acknowledge_advances_the_deck() {
        let mut engine = GameEngine::new(
            neutral_deck(3),
            RandomEventPool::empty(),
            quiet_config(),
            1,
        );
        assert_eq!(engine.current_card().unwrap().id, "card-0");

        let outcome = engine.submit_choice(Side::Left).unwrap();
        assert_eq!(outcome.consequence, "left happened");
        assert_eq!(outcome.points, 10);
        assert_eq!(engine.state().phase, GamePhase::Consequence);
        assert!(engine.current_card().is_none(), "no card while pending");

        assert!(engine.acknowledge());
        assert_eq!(engine.state().phase, GamePhase::Playing);
        assert_eq!(engine.state().card_index, 1);
        assert_eq!(engine.current_card().unwrap().id, "card-1");
    }

    #[test]
    fn invalid_transitions_are_noops() {
        let mut engine = GameEngine::new(
            neutral_deck(2),
            RandomEventPool::empty(),
            quiet_config(),
            2,
        );
        assert!(!engine.acknowledge(), "nothing pending yet");

        engine.submit_choice(Side::Right).unwrap();
        assert!(
            engine.submit_choice(Side::Left).is_none(),
            "cannot choose twice on one card"
        );
        let before = engine.state().clone();
        engine.submit_choice(Side::Left);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn loss_checks_wait_for_the_grace_window() {
        // budget starts at zero, which would lose instantly without grace
        let cfg = EngineConfig {
            initial_metrics: Metrics {
                budget: 0,
                audience: 50,
                satisfaction: 50,
                technology: 50,
            },
            ..quiet_config()
        };
        let mut engine = GameEngine::new(neutral_deck(4), RandomEventPool::empty(), cfg, 3);

        engine.submit_choice(Side::Left).unwrap();
        assert!(!engine.state().is_terminal(), "one card completed");
        assert!(engine.acknowledge());

        engine.submit_choice(Side::Left).unwrap();
        assert_eq!(engine.state().phase, GamePhase::GameOverLoss);
        assert_eq!(
            engine.state().reason,
            Some(GameOverReason::BudgetExhausted)
        );
    }

    #[test]
    fn combo_bonus_pays_on_three_in_a_row() {
        let cfg = EngineConfig {
            features: FeatureOpts {
                combo_bonus: true,
                ..FeatureOpts::default()
            },
            ..quiet_config()
        };
        // strategic affinity is budget
        let mut engine = GameEngine::new(neutral_deck(4), RandomEventPool::empty(), cfg, 4);
        let start_budget = engine.state().metrics.budget;

        for _ in 0..3 {
            engine.submit_choice(Side::Left).unwrap();
            engine.acknowledge();
        }
        assert_eq!(engine.state().metrics.budget, start_budget + COMBO_BONUS);
        assert!(
            engine
                .state()
                .logs
                .iter()
                .any(|entry| entry == "log.combo.strategic")
        );
    }

    #[test]
    fn recovery_bonus_lifts_axes_below_the_floor() {
        let cfg = EngineConfig {
            initial_metrics: Metrics {
                budget: 50,
                audience: 15,
                satisfaction: 50,
                technology: 15,
            },
            features: FeatureOpts {
                recovery_bonus: true,
                ..FeatureOpts::default()
            },
            ..quiet_config()
        };
        let mut engine = GameEngine::new(neutral_deck(3), RandomEventPool::empty(), cfg, 5);
        engine.submit_choice(Side::Left).unwrap();
        assert_eq!(engine.state().metrics.audience, 25);
        assert_eq!(engine.state().metrics.technology, 25);
        assert_eq!(engine.state().metrics.budget, 50);
    }

    #[test]
    fn style_shapes_the_starting_vector() {
        let cfg = EngineConfig {
            style: Some(Style {
                id: "tech".to_string(),
                name: "Tech-first".to_string(),
                description: String::new(),
                bonus: Effects::single(crate::metrics::Axis::Technology, 15),
                penalty: Effects::single(crate::metrics::Axis::Budget, -10),
            }),
            ..quiet_config()
        };
        let engine = GameEngine::new(neutral_deck(2), RandomEventPool::empty(), cfg, 6);
        assert_eq!(engine.state().metrics.technology, 70);
        assert_eq!(engine.state().metrics.budget, 55);
        assert_eq!(engine.state().style_id.as_deref(), Some("tech"));
    }

    #[test]
    fn empty_deck_completes_immediately() {
        let engine = GameEngine::new(Deck::empty(), RandomEventPool::empty(), quiet_config(), 7);
        assert_eq!(engine.state().phase, GamePhase::GameOverWin);
        assert!(!engine.state().badges.is_empty());
        let outcome = engine.outcome().unwrap();
        assert!(outcome.reason.is_win());
        assert_eq!(outcome.cards_completed, 0);
    }

    #[test]
    fn same_seed_replays_identically() {
        let play = |seed: u64| {
            let cfg = EngineConfig {
                event_chance: 1.0,
                ..EngineConfig::default()
            };
            let mut engine = GameEngine::bundled(cfg, seed);
            while !engine.state().is_terminal() {
                if engine.submit_choice(Side::Right).is_some() {
                    engine.acknowledge();
                } else {
                    break;
                }
            }
            engine.state().clone()
        };
        assert_eq!(play(0xABCD), play(0xABCD));
    }
}
