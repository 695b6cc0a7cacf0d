//! Centralized balance and tuning constants for Marquee game logic.
//!
//! These values define the deterministic math for the card progression.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_BOOT: &str = "log.booting";
pub(crate) const LOG_CHOICE_PREFIX: &str = "log.choice.";
pub(crate) const LOG_EVENT_PREFIX: &str = "log.event.";
pub(crate) const LOG_COMBO_PREFIX: &str = "log.combo.";
pub(crate) const LOG_RECOVERY: &str = "log.recovery";
pub(crate) const LOG_GAMEOVER_PREFIX: &str = "log.gameover.";
pub(crate) const LOG_BADGES_AWARDED: &str = "log.badges.awarded";
pub(crate) const LOG_RESTART: &str = "log.restart";

// Metric bounds ------------------------------------------------------------
pub const METRIC_MIN: i32 = 0;
pub const METRIC_MAX: i32 = 100;

// Starting vector ----------------------------------------------------------
pub(crate) const INITIAL_BUDGET: i32 = 65;
pub(crate) const INITIAL_AUDIENCE: i32 = 55;
pub(crate) const INITIAL_SATISFACTION: i32 = 55;
pub(crate) const INITIAL_TECHNOLOGY: i32 = 55;

// Progression tuning -------------------------------------------------------
pub(crate) const DEFAULT_CHOICE_POINTS: i32 = 15;
pub(crate) const RANDOM_EVENT_CHANCE: f32 = 0.2;
/// Loss checks stay suppressed until this many cards have been completed,
/// so unconditioned starting metrics cannot trip a spurious defeat.
pub(crate) const LOSS_CHECK_GRACE_CARDS: usize = 2;

// Optional mechanics -------------------------------------------------------
pub(crate) const COMBO_WINDOW: usize = 3;
pub(crate) const COMBO_BONUS: i32 = 10;
pub(crate) const RECOVERY_FLOOR: i32 = 20;
pub(crate) const RECOVERY_BONUS: i32 = 10;
pub(crate) const EVENT_BALANCE_FLOOR: i32 = 30;

// Difficulty curve (tenths of the deck, integer math) ----------------------
pub(crate) const CURVE_EARLY_TENTHS: usize = 3;
pub(crate) const CURVE_LATE_TENTHS: usize = 7;
pub(crate) const CURVE_EARLY_FACTOR: f64 = 0.7;
pub(crate) const CURVE_LATE_FACTOR: f64 = 1.2;

// Badge thresholds ---------------------------------------------------------
pub(crate) const BADGE_BUDGET_MIN: i32 = 70;
pub(crate) const BADGE_AUDIENCE_MIN: i32 = 75;
pub(crate) const BADGE_SATISFACTION_MIN: i32 = 70;
pub(crate) const BADGE_TECHNOLOGY_MIN: i32 = 65;
pub(crate) const BADGE_POINTS_MIN: i32 = 250;
pub(crate) const BADGE_PLATFORM_CHOICES_MIN: u32 = 3;
pub(crate) const BADGE_DATA_CHOICES_MIN: u32 = 2;
pub(crate) const BADGE_RELATIONSHIP_CHOICES_MIN: u32 = 3;
pub(crate) const BADGE_CREATIVE_CHOICES_MIN: u32 = 2;
