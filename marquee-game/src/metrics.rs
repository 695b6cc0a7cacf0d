use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    INITIAL_AUDIENCE, INITIAL_BUDGET, INITIAL_SATISFACTION, INITIAL_TECHNOLOGY, METRIC_MAX,
    METRIC_MIN,
};

/// One of the four production axes tracked during a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Budget,
    Audience,
    Satisfaction,
    Technology,
}

impl Axis {
    /// Fixed iteration order used for dominance tie-breaking.
    pub const ALL: [Self; 4] = [
        Self::Budget,
        Self::Audience,
        Self::Satisfaction,
        Self::Technology,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Audience => "audience",
            Self::Satisfaction => "satisfaction",
            Self::Technology => "technology",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse metric delta applied when a choice or random event resolves.
///
/// The shape is fixed: unknown axis names are rejected at parse time so
/// malformed deck data fails before gameplay begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Effects {
    #[serde(default)]
    pub budget: i32,
    #[serde(default)]
    pub audience: i32,
    #[serde(default)]
    pub satisfaction: i32,
    #[serde(default)]
    pub technology: i32,
}

impl Effects {
    /// Delta touching a single axis.
    #[must_use]
    pub const fn single(axis: Axis, amount: i32) -> Self {
        let mut fx = Self {
            budget: 0,
            audience: 0,
            satisfaction: 0,
            technology: 0,
        };
        match axis {
            Axis::Budget => fx.budget = amount,
            Axis::Audience => fx.audience = amount,
            Axis::Satisfaction => fx.satisfaction = amount,
            Axis::Technology => fx.technology = amount,
        }
        fx
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.budget == 0 && self.audience == 0 && self.satisfaction == 0 && self.technology == 0
    }

    /// Scaled copy with each axis multiplied and rounded to the nearest
    /// integer. Used by the deck difficulty curve.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |v: i32| (f64::from(v) * factor).round() as i32;
        Self {
            budget: scale(self.budget),
            audience: scale(self.audience),
            satisfaction: scale(self.satisfaction),
            technology: scale(self.technology),
        }
    }
}

/// The four-axis bounded state vector. Every value stays in
/// `[METRIC_MIN, METRIC_MAX]`; [`Metrics::apply`] is the only mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub budget: i32,
    pub audience: i32,
    pub satisfaction: i32,
    pub technology: i32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            budget: INITIAL_BUDGET,
            audience: INITIAL_AUDIENCE,
            satisfaction: INITIAL_SATISFACTION,
            technology: INITIAL_TECHNOLOGY,
        }
    }
}

impl Metrics {
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Budget => self.budget,
            Axis::Audience => self.audience,
            Axis::Satisfaction => self.satisfaction,
            Axis::Technology => self.technology,
        }
    }

    /// Pure application: missing deltas count as zero, every result is
    /// clamped back into range. Choices, random events, style bonuses, and
    /// recovery/combo bonuses all flow through here.
    #[must_use]
    pub fn applying(&self, fx: &Effects) -> Self {
        let clamp = |v: i32| v.clamp(METRIC_MIN, METRIC_MAX);
        Self {
            budget: clamp(self.budget + fx.budget),
            audience: clamp(self.audience + fx.audience),
            satisfaction: clamp(self.satisfaction + fx.satisfaction),
            technology: clamp(self.technology + fx.technology),
        }
    }

    /// In-place variant of [`Metrics::applying`].
    pub fn apply(&mut self, fx: &Effects) {
        *self = self.applying(fx);
    }

    /// Sum of all four axes, surfaced to the lead boundary as a headline
    /// score.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.budget + self.audience + self.satisfaction + self.technology
    }

    /// The highest axis, ties broken by fixed axis order.
    #[must_use]
    pub fn dominant_axis(&self) -> Axis {
        let mut best = Axis::Budget;
        for axis in Axis::ALL {
            if self.axis(axis) > self.axis(best) {
                best = axis;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_clamps_both_bounds() {
        let mut m = Metrics {
            budget: 5,
            audience: 95,
            satisfaction: 50,
            technology: 0,
        };
        m.apply(&Effects {
            budget: -30,
            audience: 20,
            satisfaction: 0,
            technology: -1,
        });
        assert_eq!(m.budget, 0);
        assert_eq!(m.audience, 100);
        assert_eq!(m.satisfaction, 50);
        assert_eq!(m.technology, 0);
    }

    #[test]
    fn applying_is_pure_and_deterministic() {
        let start = Metrics::default();
        let fx = Effects {
            budget: 12,
            audience: -8,
            satisfaction: -3,
            technology: -3,
        };
        let first = start.applying(&fx);
        let second = start.applying(&fx);
        assert_eq!(first, second);
        assert_eq!(start, Metrics::default(), "input left untouched");
    }

    #[test]
    fn sparse_effects_default_missing_axes_to_zero() {
        let fx: Effects = serde_json::from_str(r#"{ "budget": -15 }"#).unwrap();
        assert_eq!(fx.budget, -15);
        assert_eq!(fx.audience, 0);
        assert_eq!(fx.satisfaction, 0);
        assert_eq!(fx.technology, 0);
    }

    #[test]
    fn unknown_effect_axis_is_rejected() {
        let parsed: Result<Effects, _> = serde_json::from_str(r#"{ "morale": 3 }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn scaled_rounds_to_nearest() {
        let fx = Effects {
            budget: 5,
            audience: -5,
            satisfaction: 3,
            technology: 0,
        };
        let scaled = fx.scaled(0.7);
        assert_eq!(scaled.budget, 4); // 3.5 rounds up
        assert_eq!(scaled.audience, -4);
        assert_eq!(scaled.satisfaction, 2);
        assert_eq!(scaled.technology, 0);
    }

    #[test]
    fn dominant_axis_breaks_ties_in_fixed_order() {
        let m = Metrics {
            budget: 40,
            audience: 40,
            satisfaction: 10,
            technology: 10,
        };
        assert_eq!(m.dominant_axis(), Axis::Budget);
        let m = Metrics {
            budget: 10,
            audience: 20,
            satisfaction: 80,
            technology: 80,
        };
        assert_eq!(m.dominant_axis(), Axis::Satisfaction);
    }
}
