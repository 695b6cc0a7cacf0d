use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::constants::EVENT_BALANCE_FLOOR;
use crate::data::DataError;
use crate::metrics::{Effects, Metrics};

const DEFAULT_EVENTS_DATA: &str = include_str!("../assets/data/random_events.json");

/// Exogenous perturbation drawn from a finite non-repeating pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub effects: Effects,
    pub message: String,
}

/// Fixed pool of random events. Each one fires at most once per
/// playthrough; the engine tracks triggered ids and the pool only ever
/// selects from the remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RandomEventPool {
    #[serde(default)]
    events: Vec<RandomEvent>,
}

impl RandomEventPool {
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Parse and validate a pool from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or event ids collide.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let pool: Self = serde_json::from_str(json)?;
        pool.validate()?;
        Ok(pool)
    }

    /// Build a pool from pre-parsed events.
    ///
    /// # Errors
    ///
    /// Returns an error if event ids collide.
    pub fn from_events(events: Vec<RandomEvent>) -> Result<Self, DataError> {
        let pool = Self { events };
        pool.validate()?;
        Ok(pool)
    }

    fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(DataError::DuplicateEventId(event.id.clone()));
            }
        }
        Ok(())
    }

    /// The bundled production pool.
    ///
    /// # Panics
    ///
    /// Panics only if the embedded asset is invalid, which the data-shape
    /// test suite guards against.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static POOL: OnceLock<RandomEventPool> = OnceLock::new();
        POOL.get_or_init(|| {
            Self::from_json(DEFAULT_EVENTS_DATA)
                .unwrap_or_else(|err| panic!("bundled random_events.json invalid: {err}"))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RandomEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&RandomEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Uniform selection over the untriggered remainder, or `None` when
    /// the pool is exhausted.
    pub fn pick_untriggered<R>(
        &self,
        triggered: &HashSet<String>,
        rng: &mut R,
    ) -> Option<&RandomEvent>
    where
        R: Rng + ?Sized,
    {
        let available: Vec<&RandomEvent> = self
            .events
            .iter()
            .filter(|event| !triggered.contains(&event.id))
            .collect();
        if available.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..available.len());
        Some(available[idx])
    }

    /// Balance-aware selection: skips events whose negative budget or
    /// satisfaction deltas would pile onto an axis already below the
    /// balance floor, falling back to the plain untriggered set when the
    /// filter empties the pool. Never re-fires a triggered event.
    pub fn pick_balanced<R>(
        &self,
        metrics: &Metrics,
        triggered: &HashSet<String>,
        rng: &mut R,
    ) -> Option<&RandomEvent>
    where
        R: Rng + ?Sized,
    {
        let untriggered: Vec<&RandomEvent> = self
            .events
            .iter()
            .filter(|event| !triggered.contains(&event.id))
            .collect();
        if untriggered.is_empty() {
            return None;
        }
        let safe: Vec<&RandomEvent> = untriggered
            .iter()
            .copied()
            .filter(|event| {
                !(metrics.budget < EVENT_BALANCE_FLOOR && event.effects.budget < 0)
                    && !(metrics.satisfaction < EVENT_BALANCE_FLOOR
                        && event.effects.satisfaction < 0)
            })
            .collect();
        let candidates = if safe.is_empty() { &untriggered } else { &safe };
        let idx = rng.gen_range(0..candidates.len());
        Some(candidates[idx])
    }
}

impl<'a> IntoIterator for &'a RandomEventPool {
    type Item = &'a RandomEvent;
    type IntoIter = std::slice::Iter<'a, RandomEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
