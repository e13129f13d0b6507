//! Weight tables and vocabularies for the lexical rule engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::strings;

/// Curated phrase with its score contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseWeight {
    pub phrase: String,
    pub weight: f32,
}

/// Query terms that narrow the search to matching knowledge-base files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCategory {
    pub terms: Vec<String>,
    /// File-name globs (`*` wildcard)
    pub patterns: Vec<String>,
}

/// Rule engine vocabularies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringLexicon {
    pub phrase_weights: Vec<PhraseWeight>,
    /// Symptom category to member terms
    pub symptom_categories: BTreeMap<String, Vec<String>>,
    /// File category to trigger terms and file patterns
    pub file_categories: BTreeMap<String, FileCategory>,
    /// Words indicating an increase
    pub up_terms: Vec<String>,
    /// Words indicating a decrease
    pub down_terms: Vec<String>,
    /// Words that activate the single/all cylinder check
    pub cylinder_terms: Vec<String>,
    pub single_scope_terms: Vec<String>,
    pub all_scope_terms: Vec<String>,
}

const PHRASE_WEIGHTS: &[(&str, f32)] = &[
    ("no pressure", 15.0),
    ("crankcase explosion", 15.0),
    ("scavenge fire", 15.0),
    ("overspeed", 15.0),
    ("not starting", 14.0),
    ("not start", 14.0),
    ("fail to start", 14.0),
    ("oil mist", 14.0),
    ("high exhaust temperature", 14.0),
    ("high temperature", 12.0),
    ("low pressure", 12.0),
    ("high pressure", 12.0),
    ("black smoke", 12.0),
    ("overheating", 12.0),
    ("loss of power", 11.0),
    ("power loss", 11.0),
    ("low temperature", 10.0),
    ("white smoke", 10.0),
    ("blue smoke", 10.0),
    ("excessive vibration", 10.0),
    ("knocking", 10.0),
    ("misfiring", 10.0),
    ("misfire", 10.0),
    ("hunting", 10.0),
    ("surging", 10.0),
    ("low power", 10.0),
    ("abnormal noise", 9.0),
    ("shutdown", 9.0),
    ("trip", 9.0),
    ("high consumption", 8.0),
    ("vibration", 7.0),
    ("leakage", 6.0),
    ("leak", 6.0),
    ("smoke", 5.0),
    ("noise", 5.0),
];

const SYMPTOM_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "temperature",
        &[
            "temperature", "hot", "overheating", "overheat", "heat", "cold", "cooling", "thermal",
            "warm",
        ],
    ),
    (
        "pressure",
        &["pressure", "bar", "psi", "kpa", "mpa", "vacuum", "boost"],
    ),
    (
        "noise",
        &[
            "noise", "knocking", "knock", "vibration", "rattling", "sound", "loud", "banging",
            "whining",
        ],
    ),
    (
        "smoke",
        &["smoke", "black", "white", "blue", "soot", "fume", "smoking"],
    ),
    (
        "starting",
        &["start", "starting", "crank", "cranking", "ignition", "starter"],
    ),
    (
        "leakage",
        &["leak", "leaking", "leakage", "drip", "dripping", "seepage"],
    ),
    (
        "speed",
        &["rpm", "speed", "revolution", "hunting", "surging", "overspeed", "governor"],
    ),
    (
        "power",
        &["power", "load", "output", "performance", "torque"],
    ),
    (
        "lubrication",
        &["lubricating", "lubrication", "lube", "bearing", "crankcase", "mist"],
    ),
    (
        "fuel",
        &["fuel", "injector", "injection", "combustion", "hfo", "mdo"],
    ),
    (
        "electrical",
        &["voltage", "current", "alternator", "frequency", "battery", "electrical"],
    ),
];

impl Default for ScoringLexicon {
    fn default() -> Self {
        let phrase_weights = PHRASE_WEIGHTS
            .iter()
            .map(|(phrase, weight)| PhraseWeight {
                phrase: phrase.to_string(),
                weight: *weight,
            })
            .collect();

        let symptom_categories = SYMPTOM_CATEGORIES
            .iter()
            .map(|(category, terms)| (category.to_string(), strings(terms)))
            .collect();

        let mut file_categories = BTreeMap::new();
        file_categories.insert(
            "temperature".to_string(),
            FileCategory {
                terms: strings(&[
                    "temperature", "hot", "overheating", "overheat", "heat", "cooling", "cold",
                ]),
                patterns: strings(&["*temperature*", "*temp*", "*cooling*", "*heat*"]),
            },
        );
        file_categories.insert(
            "pressure".to_string(),
            FileCategory {
                terms: strings(&["pressure", "bar", "psi", "kpa", "vacuum"]),
                patterns: strings(&["*pressure*"]),
            },
        );
        file_categories.insert(
            "other".to_string(),
            FileCategory {
                terms: strings(&[
                    "smoke", "noise", "vibration", "knocking", "start", "starting", "speed",
                    "hunting", "leak", "leakage", "power",
                ]),
                patterns: strings(&["*other*", "*general*", "*misc*"]),
            },
        );

        Self {
            phrase_weights,
            symptom_categories,
            file_categories,
            up_terms: strings(&[
                "high",
                "higher",
                "increase",
                "increased",
                "increasing",
                "rise",
                "rising",
                "excessive",
                "elevated",
                "overheating",
                "overheat",
                "overspeed",
                "overload",
            ]),
            down_terms: strings(&[
                "low",
                "lower",
                "decrease",
                "decreased",
                "decreasing",
                "drop",
                "dropping",
                "falling",
                "fall",
                "insufficient",
                "reduced",
                "loss",
            ]),
            cylinder_terms: strings(&["cylinder", "cylinders"]),
            single_scope_terms: strings(&["single", "one", "individual", "particular", "specific"]),
            all_scope_terms: strings(&["all", "every", "multiple", "several", "both", "cylinders"]),
        }
    }
}
