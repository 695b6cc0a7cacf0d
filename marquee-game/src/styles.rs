use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::metrics::{Effects, Metrics};

const DEFAULT_STYLES_DATA: &str = include_str!("../assets/data/styles.json");

/// Starting-style customization: a bonus and a penalty folded into the
/// initial metric vector before the first card is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub bonus: Effects,
    #[serde(default)]
    pub penalty: Effects,
}

impl Style {
    /// Starting metrics for this style, clamped like every other mutation.
    #[must_use]
    pub fn starting_metrics(&self, base: Metrics) -> Metrics {
        base.applying(&self.bonus).applying(&self.penalty)
    }
}

/// Ordered list of selectable styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StyleList(pub Vec<Style>);

impl StyleList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load styles from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid styles.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The bundled style roster.
    ///
    /// # Panics
    ///
    /// Panics only if the embedded asset is invalid, which the data-shape
    /// test suite guards against.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static STYLES: OnceLock<StyleList> = OnceLock::new();
        STYLES.get_or_init(|| {
            Self::from_json(DEFAULT_STYLES_DATA)
                .unwrap_or_else(|err| panic!("bundled styles.json invalid: {err}"))
        })
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Style> {
        self.0.iter().find(|style| style.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a StyleList {
    type Item = &'a Style;
    type IntoIter = std::slice::Iter<'a, Style>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_json_parsing() {
        let json = r#"[
            {
                "id": "tech",
                "name": "Tech-first",
                "description": "More technology, less budget.",
                "bonus": { "technology": 15 },
                "penalty": { "budget": -10 }
            }
        ]"#;
        let styles = StyleList::from_json(json).unwrap();
        assert_eq!(styles.len(), 1);
        let tech = styles.get_by_id("tech").unwrap();
        assert_eq!(tech.bonus.technology, 15);
        assert_eq!(tech.penalty.budget, -10);
    }

    #[test]
    fn starting_metrics_apply_bonus_and_penalty_clamped() {
        let style = Style {
            id: "popular".to_string(),
            name: "Popular".to_string(),
            description: "More audience.".to_string(),
            bonus: Effects {
                budget: 0,
                audience: 60,
                satisfaction: 0,
                technology: 0,
            },
            penalty: Effects {
                budget: -70,
                audience: 0,
                satisfaction: 0,
                technology: 0,
            },
        };
        let start = style.starting_metrics(Metrics::default());
        assert_eq!(start.audience, 100, "bonus clamps at the ceiling");
        assert_eq!(start.budget, 0, "penalty clamps at the floor");
    }

    #[test]
    fn empty_list_helpers_are_consistent() {
        let empty = StyleList::empty();
        assert!(empty.is_empty());
        assert!(empty.get_by_id("tech").is_none());
        assert_eq!((&empty).into_iter().count(), 0);
    }
}
