use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{CURVE_EARLY_FACTOR, CURVE_EARLY_TENTHS, CURVE_LATE_FACTOR, CURVE_LATE_TENTHS};
use crate::metrics::{Axis, Effects};

const DEFAULT_CARDS_DATA: &str = include_str!("../assets/data/cards.json");

/// Which side of a card the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

/// Behavioral category tag used for badge tallying. The enumeration is
/// closed; deck data carrying any other tag fails at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strategic,
    Organized,
    PlatformUser,
    DataDriven,
    Creative,
    RelationshipFocused,
    Inclusive,
    Proactive,
}

impl Category {
    /// Fixed iteration order, also the dominance tie-break order.
    pub const ALL: [Self; 8] = [
        Self::Strategic,
        Self::Organized,
        Self::PlatformUser,
        Self::DataDriven,
        Self::Creative,
        Self::RelationshipFocused,
        Self::Inclusive,
        Self::Proactive,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::Organized => "organized",
            Self::PlatformUser => "platform_user",
            Self::DataDriven => "data_driven",
            Self::Creative => "creative",
            Self::RelationshipFocused => "relationship_focused",
            Self::Inclusive => "inclusive",
            Self::Proactive => "proactive",
        }
    }

    /// Metric axis a category combo streak pays out on.
    #[must_use]
    pub const fn affinity(self) -> Axis {
        match self {
            Self::Strategic | Self::Organized => Axis::Budget,
            Self::PlatformUser | Self::DataDriven => Axis::Technology,
            Self::Creative | Self::RelationshipFocused => Axis::Satisfaction,
            Self::Inclusive | Self::Proactive => Axis::Audience,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable side of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub effects: Effects,
    pub consequence: String,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub points: Option<i32>,
}

/// Per-card point awards, one value per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPoints {
    pub left: i32,
    pub right: i32,
}

impl CardPoints {
    #[must_use]
    pub const fn side(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// One scenario in the deck. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub left: Choice,
    pub right: Choice,
    #[serde(default)]
    pub educational: Option<String>,
    #[serde(default)]
    pub points: Option<CardPoints>,
}

impl Card {
    #[must_use]
    pub const fn choice(&self, side: Side) -> &Choice {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Points awarded for a side: the choice's own value wins, then the
    /// card-level table, then the engine default.
    #[must_use]
    pub fn points_for(&self, side: Side, default_points: i32) -> i32 {
        self.choice(side)
            .points
            .or_else(|| self.points.map(|p| p.side(side)))
            .unwrap_or(default_points)
    }
}

/// Construction-time deck validation failures.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("card at index {index} has a blank id")]
    BlankCardId { index: usize },
    #[error("duplicate card id '{0}'")]
    DuplicateCardId(String),
    #[error("duplicate random event id '{0}'")]
    DuplicateEventId(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, static sequence of cards consumed front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Empty deck (useful for tests).
    #[must_use]
    pub const fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Parse and validate a deck from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the deck violates the
    /// id invariants.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let deck: Self = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Build a deck from pre-parsed cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the cards violate the id invariants.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DataError> {
        let deck = Self { cards };
        deck.validate()?;
        Ok(deck)
    }

    fn validate(&self) -> Result<(), DataError> {
        let mut seen = std::collections::HashSet::new();
        for (index, card) in self.cards.iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(DataError::BlankCardId { index });
            }
            if !seen.insert(card.id.as_str()) {
                return Err(DataError::DuplicateCardId(card.id.clone()));
            }
        }
        Ok(())
    }

    /// The bundled production deck.
    ///
    /// # Panics
    ///
    /// Panics only if the embedded asset is invalid, which the data-shape
    /// test suite guards against.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static DECK: OnceLock<Deck> = OnceLock::new();
        DECK.get_or_init(|| {
            Self::from_json(DEFAULT_CARDS_DATA)
                .unwrap_or_else(|err| panic!("bundled cards.json invalid: {err}"))
        })
    }

    /// Card at `index`, or `None` once the deck is exhausted. The `None`
    /// is the primary completion signal.
    #[must_use]
    pub fn card_at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Softens effects in the first three tenths of the deck and
    /// intensifies them in the last three tenths.
    #[must_use]
    pub fn with_difficulty_curve(mut self) -> Self {
        let total = self.cards.len();
        if total == 0 {
            return self;
        }
        for (index, card) in self.cards.iter_mut().enumerate() {
            let factor = if index * 10 < total * CURVE_EARLY_TENTHS {
                CURVE_EARLY_FACTOR
            } else if index * 10 > total * CURVE_LATE_TENTHS {
                CURVE_LATE_FACTOR
            } else {
                continue;
            };
            card.left.effects = card.left.effects.scaled(factor);
            card.right.effects = card.right.effects.scaled(factor);
        }
        self
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
