//! Region-label keyword lexicon.
//!
//! Region labels are never geocoded. They are lower-cased and checked for
//! keyword substrings against ordered rule lists; the first rule with any
//! matching keyword wins. Rule order is the precedence order.
//!
//! Built-in rules:
//!   vegetation base index
//!     sahel | desert | rajasthan  → 0.3
//!     machakos | kenya            → 0.6
//!     brazil | amazon             → 0.8
//!     mongolia | grassland        → 0.5
//!   environmental context
//!     sahel | desert              → arid, 200 mm
//!     kenya | machakos            → semi-arid, 500 mm

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::context::{ClimateZone, EnvironmentalContext};

/// One `(keyword set, value)` row of a lexicon table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    pub keywords: Vec<String>,
    pub value: T,
}

impl<T> KeywordRule<T> {
    pub fn new(keywords: &[&str], value: T) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            value,
        }
    }

    /// `label_lower` must already be lower-cased.
    pub fn matches(&self, label_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && label_lower.contains(k.to_lowercase().as_str()))
    }
}

/// Value of the first rule whose keywords occur in `label`, case-insensitively.
pub fn first_match<'a, T>(rules: &'a [KeywordRule<T>], label: &str) -> Option<&'a T> {
    let lower = label.to_lowercase();
    rules.iter().find(|r| r.matches(&lower)).map(|r| &r.value)
}

/// Ordered keyword tables consulted by the trend synthesizer and the
/// context classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Region keyword → NDVI base index.
    pub vegetation: Vec<KeywordRule<f64>>,
    /// Region keyword → full environmental context override.
    pub context: Vec<KeywordRule<EnvironmentalContext>>,
}

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| Lexicon {
    vegetation: vec![
        KeywordRule::new(&["sahel", "desert", "rajasthan"], 0.3),
        KeywordRule::new(&["machakos", "kenya"], 0.6),
        KeywordRule::new(&["brazil", "amazon"], 0.8),
        KeywordRule::new(&["mongolia", "grassland"], 0.5),
    ],
    context: vec![
        KeywordRule::new(
            &["sahel", "desert"],
            EnvironmentalContext::new(
                ClimateZone::Arid,
                200,
                &["desertification", "drought", "overgrazing"],
            ),
        ),
        KeywordRule::new(
            &["kenya", "machakos"],
            EnvironmentalContext::new(
                ClimateZone::SemiArid,
                500,
                &["soil erosion", "drought", "deforestation"],
            ),
        ),
    ],
});

impl Lexicon {
    /// The lexicon shipped with the engine.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    pub fn base_index_for(&self, label: &str) -> Option<f64> {
        first_match(&self.vegetation, label).copied()
    }

    pub fn context_for(&self, label: &str) -> Option<&EnvironmentalContext> {
        first_match(&self.context, label)
    }

    /// Rules with no usable keyword would silently never match (or, for an
    /// empty string, match everything); report the first offender.
    pub(crate) fn find_empty_rule(&self) -> Option<&'static str> {
        let blank = |ks: &[String]| ks.is_empty() || ks.iter().any(|k| k.trim().is_empty());
        if self.vegetation.iter().any(|r| blank(&r.keywords)) {
            return Some("lexicon.vegetation");
        }
        if self.context.iter().any(|r| blank(&r.keywords)) {
            return Some("lexicon.context");
        }
        None
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
