//! Terms the clarification dialogue classifies queries with

use serde::{Deserialize, Serialize};

use super::strings;

/// Dialogue term lists, matched as whole words or whole phrases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueLexicon {
    /// Any of these marks an explicit engine mention
    pub engine_terms: Vec<String>,
    pub main_engine_terms: Vec<String>,
    pub auxiliary_engine_terms: Vec<String>,
    /// Unqualified engine words ("engine")
    pub generic_engine_terms: Vec<String>,
    pub component_terms: Vec<String>,
    pub problem_terms: Vec<String>,
    pub action_terms: Vec<String>,
    pub vague_terms: Vec<String>,
    /// Verbs whose negation means "not functioning"
    pub function_terms: Vec<String>,
}

impl Default for DialogueLexicon {
    fn default() -> Self {
        Self {
            engine_terms: strings(&[
                "main", "auxiliary", "aux", "generator", "gen", "me", "ae", "dg", "genset",
            ]),
            main_engine_terms: strings(&["main engine", "main", "me"]),
            auxiliary_engine_terms: strings(&[
                "auxiliary engine",
                "aux engine",
                "diesel generator",
                "auxiliary",
                "aux",
                "ae",
                "generator",
                "gen",
                "genset",
                "dg",
            ]),
            generic_engine_terms: strings(&["engine"]),
            component_terms: strings(&[
                "temperature",
                "pressure",
                "vibration",
                "smoke",
                "noise",
                "cooling",
                "fuel",
                "oil",
                "turbocharger",
                "exhaust",
                "bearing",
                "injector",
                "piston",
                "governor",
                "crankcase",
                "starter",
            ]),
            problem_terms: strings(&[
                "high",
                "low",
                "excessive",
                "insufficient",
                "abnormal",
                "unusual",
                "leak",
                "leaking",
                "hot",
                "cold",
                "loud",
                "rough",
                "black",
                "white",
                "blue",
                "overheating",
                "knocking",
            ]),
            action_terms: strings(&[
                "start", "starting", "stop", "stopping", "run", "running", "work", "working",
            ]),
            vague_terms: strings(&[
                "problem",
                "issue",
                "trouble",
                "fault",
                "wrong",
                "bad",
                "strange",
                "something",
                "it",
                "that",
                "not good",
                "acting up",
                "broken",
                "damaged",
                "kaput",
                "failed",
                "failure",
                "dead",
                "gone",
                "finished",
                "malfunctioning",
            ]),
            function_terms: strings(&[
                "work",
                "working",
                "function",
                "functioning",
                "run",
                "running",
                "operate",
                "operating",
            ]),
        }
    }
}
