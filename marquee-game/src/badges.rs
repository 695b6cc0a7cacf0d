//! Badge evaluation: a fixed, ordered table of independent predicates
//! plus an explicit last-resort rule that makes the result set total —
//! every completed playthrough earns at least one badge.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{
    BADGE_AUDIENCE_MIN, BADGE_BUDGET_MIN, BADGE_CREATIVE_CHOICES_MIN, BADGE_DATA_CHOICES_MIN,
    BADGE_PLATFORM_CHOICES_MIN, BADGE_POINTS_MIN, BADGE_RELATIONSHIP_CHOICES_MIN,
    BADGE_SATISFACTION_MIN, BADGE_TECHNOLOGY_MIN,
};
use crate::data::Category;
use crate::metrics::{Axis, Metrics};
use crate::state::CategoryTally;

/// Earned badges, inline up to the full table size.
pub type BadgeSet = SmallVec<[BadgeId; 9]>;

/// Named achievement awarded at game completion. Not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    BudgetWizard,
    CrowdPleaser,
    SatisfactionGuru,
    TechMaster,
    StrategicMind,
    PlatformAdopter,
    DataMaster,
    RelationshipBuilder,
    CrisisManager,
}

impl BadgeId {
    pub const ALL: [Self; 9] = [
        Self::BudgetWizard,
        Self::CrowdPleaser,
        Self::SatisfactionGuru,
        Self::TechMaster,
        Self::StrategicMind,
        Self::PlatformAdopter,
        Self::DataMaster,
        Self::RelationshipBuilder,
        Self::CrisisManager,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BudgetWizard => "budget_wizard",
            Self::CrowdPleaser => "crowd_pleaser",
            Self::SatisfactionGuru => "satisfaction_guru",
            Self::TechMaster => "tech_master",
            Self::StrategicMind => "strategic_mind",
            Self::PlatformAdopter => "platform_adopter",
            Self::DataMaster => "data_master",
            Self::RelationshipBuilder => "relationship_builder",
            Self::CrisisManager => "crisis_manager",
        }
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One predicate form in the badge table.
#[derive(Debug, Clone, Copy)]
enum Rule {
    MetricAtLeast(Axis, i32),
    TallyAtLeast(Category, u32),
    PointsAtLeast(i32),
}

impl Rule {
    const fn holds(self, metrics: &Metrics, total_points: i32, tally: &CategoryTally) -> bool {
        match self {
            Self::MetricAtLeast(axis, min) => metrics.axis(axis) >= min,
            Self::TallyAtLeast(category, min) => tally.count(category) >= min,
            Self::PointsAtLeast(min) => total_points >= min,
        }
    }
}

/// Evaluation order is fixed; the emitted set preserves it.
const BADGE_TABLE: [(BadgeId, Rule); 9] = [
    (
        BadgeId::BudgetWizard,
        Rule::MetricAtLeast(Axis::Budget, BADGE_BUDGET_MIN),
    ),
    (
        BadgeId::CrowdPleaser,
        Rule::MetricAtLeast(Axis::Audience, BADGE_AUDIENCE_MIN),
    ),
    (
        BadgeId::SatisfactionGuru,
        Rule::MetricAtLeast(Axis::Satisfaction, BADGE_SATISFACTION_MIN),
    ),
    (
        BadgeId::TechMaster,
        Rule::MetricAtLeast(Axis::Technology, BADGE_TECHNOLOGY_MIN),
    ),
    (BadgeId::StrategicMind, Rule::PointsAtLeast(BADGE_POINTS_MIN)),
    (
        BadgeId::PlatformAdopter,
        Rule::TallyAtLeast(Category::PlatformUser, BADGE_PLATFORM_CHOICES_MIN),
    ),
    (
        BadgeId::DataMaster,
        Rule::TallyAtLeast(Category::DataDriven, BADGE_DATA_CHOICES_MIN),
    ),
    (
        BadgeId::RelationshipBuilder,
        Rule::TallyAtLeast(Category::RelationshipFocused, BADGE_RELATIONSHIP_CHOICES_MIN),
    ),
    (
        BadgeId::CrisisManager,
        Rule::TallyAtLeast(Category::Creative, BADGE_CREATIVE_CHOICES_MIN),
    ),
];

/// Badge tied to a behavioral category, used by the fallback rule.
#[must_use]
pub const fn category_badge(category: Category) -> BadgeId {
    match category {
        Category::Strategic => BadgeId::StrategicMind,
        Category::Organized => BadgeId::BudgetWizard,
        Category::PlatformUser => BadgeId::PlatformAdopter,
        Category::DataDriven => BadgeId::DataMaster,
        Category::Creative => BadgeId::CrisisManager,
        Category::RelationshipFocused => BadgeId::RelationshipBuilder,
        Category::Inclusive => BadgeId::CrowdPleaser,
        Category::Proactive => BadgeId::SatisfactionGuru,
    }
}

/// Badge tied to a metric axis, used when the tally is empty.
#[must_use]
pub const fn axis_badge(axis: Axis) -> BadgeId {
    match axis {
        Axis::Budget => BadgeId::BudgetWizard,
        Axis::Audience => BadgeId::CrowdPleaser,
        Axis::Satisfaction => BadgeId::SatisfactionGuru,
        Axis::Technology => BadgeId::TechMaster,
    }
}

/// Evaluate final metrics, points, and the category tally against the
/// badge table. Total: the result is never empty — when no predicate
/// holds, the dominant category (ties by fixed order) maps to its badge,
/// and an untagged playthrough falls back to the dominant metric.
#[must_use]
pub fn evaluate(metrics: &Metrics, total_points: i32, tally: &CategoryTally) -> BadgeSet {
    let mut earned = BadgeSet::new();
    for (badge, rule) in BADGE_TABLE {
        if rule.holds(metrics, total_points, tally) {
            earned.push(badge);
        }
    }
    if earned.is_empty() {
        earned.push(fallback_badge(metrics, tally));
    }
    earned
}

fn fallback_badge(metrics: &Metrics, tally: &CategoryTally) -> BadgeId {
    tally
        .dominant()
        .map_or_else(|| axis_badge(metrics.dominant_axis()), category_badge)
}
