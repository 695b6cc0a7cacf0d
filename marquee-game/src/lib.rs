//! Marquee — a decision-card game engine for event-production scenarios.
//!
//! A playthrough walks a linear deck of scenario cards. Each card offers
//! two choices; a choice moves four clamped metrics (budget, audience,
//! satisfaction, technology), scores points, tallies a producer
//! category, and may trigger a one-shot random event. The engine owns
//! the whole state machine; hosts render it and feed back two inputs:
//! a chosen side and an acknowledgement.
//!
//! The crate is platform-agnostic: no I/O, no clocks, no global RNG.
//! Hosts inject data through [`DeckLoader`] (or use the bundled assets)
//! and randomness through the construction seed.

pub mod badges;
pub mod constants;
pub mod data;
pub mod engine;
pub mod events;
pub mod metrics;
pub mod outcome;
pub mod seed;
pub mod state;
pub mod styles;

pub use badges::{BadgeId, BadgeSet, axis_badge, category_badge};
pub use data::{Card, CardPoints, Category, Choice, DataError, Deck, Side};
pub use engine::{ChoiceOutcome, EngineConfig, FeatureOpts, GameEngine};
pub use events::{RandomEvent, RandomEventPool};
pub use metrics::{Axis, Effects, Metrics};
pub use outcome::{LeadData, LeadSink, OutcomeSummary};
pub use state::{
    CategoryTally, ChoiceRecord, GameOverReason, GamePhase, GameState, PendingTurn,
};
pub use styles::{Style, StyleList};

/// Source of game data for a host platform. The bundled assets satisfy
/// most hosts; a loader lets tests and alternate frontends swap decks
/// without touching the engine.
pub trait DeckLoader {
    type Error;

    /// Load and validate the scenario deck.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the deck is missing or invalid.
    fn load_deck(&self) -> Result<Deck, Self::Error>;

    /// Load and validate the random-event pool.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the pool is missing or invalid.
    fn load_events(&self) -> Result<RandomEventPool, Self::Error>;

    /// Load the producer styles on offer.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the style data is invalid.
    fn load_styles(&self) -> Result<StyleList, Self::Error>;
}

/// Loader backed by the assets compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLoader;

impl DeckLoader for BundledLoader {
    type Error = DataError;

    fn load_deck(&self) -> Result<Deck, Self::Error> {
        Ok(Deck::bundled().clone())
    }

    fn load_events(&self) -> Result<RandomEventPool, Self::Error> {
        Ok(RandomEventPool::bundled().clone())
    }

    fn load_styles(&self) -> Result<StyleList, Self::Error> {
        Ok(StyleList::bundled().clone())
    }
}
