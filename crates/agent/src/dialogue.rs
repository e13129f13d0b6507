//! Clarification Dialogue
//!
//! Decides, per turn, whether a query is specific enough to diagnose or
//! whether the operator must first say which engine, which component or
//! which kind of problem they mean.
//!
//! ```text
//!            vague / no engine
//!   Idle ───────────────────────► AwaitingEngine
//!    │                                 │ original vague or unspecific
//!    │ engine, vague                   ▼
//!    └───────────────────────────► AwaitingComponent
//!                                      │ answer vague
//!                                      ▼
//!                                 AwaitingProblem
//! ```
//!
//! Every state has a terminal exit that produces an enhanced query and
//! returns the dialogue to `Idle`.

use std::sync::Arc;

use marine_diag_config::{DialogueLexicon, DomainLexicon};
use marine_diag_core::{Awaiting, ClarificationRequest, DialogueState, Subsystem};
use marine_diag_text_processing::matching::{contains_any, matched_terms, words};

const VAGUE_PROMPT: &str = "I need more information. Which engine are you referring to?";
const ENGINE_PROMPT: &str = "Which engine are you referring to? (Main Engine or Auxiliary Engine)";
const PROBLEM_PROMPT: &str = "Please be more specific. Is it related to temperature, pressure, noise, starting issues, or something else?";

fn component_prompt(engine: Subsystem) -> String {
    format!(
        "What specific issue are you experiencing with the {}?",
        engine.display_name()
    )
}

/// Features of one query as the dialogue sees them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFeatures {
    pub vague: bool,
    /// A specific engine is named (or hinted by the caller)
    pub engine_mentioned: bool,
    pub engine_type: Option<Subsystem>,
    /// Only the bare word "engine"
    pub engine_unspecified: bool,
    pub components: Vec<String>,
    pub problems: Vec<String>,
    pub action: bool,
    /// "not working", "not running", ...
    pub function_negated: bool,
}

impl QueryFeatures {
    pub fn has_component(&self) -> bool {
        !self.components.is_empty()
    }

    pub fn has_problem(&self) -> bool {
        !self.problems.is_empty()
    }
}

/// Result of one dialogue turn
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueStep {
    /// Ask a follow-up and move to `next`
    Clarify {
        request: ClarificationRequest,
        next: DialogueState,
    },
    /// Enough context; search with the enhanced query
    Resolved {
        enhanced_query: String,
        /// Operator text as typed, across every turn of the clarification
        raw_query: String,
        clarified_engine: Option<Subsystem>,
    },
}

impl DialogueStep {
    fn clarify(message: impl Into<String>, next: DialogueState) -> Self {
        let awaiting = next.awaiting().unwrap_or(Awaiting::Engine);
        Self::Clarify {
            request: ClarificationRequest::new(message, awaiting),
            next,
        }
    }

    fn resolved(
        enhanced_query: String,
        raw_query: String,
        clarified_engine: Option<Subsystem>,
    ) -> Self {
        Self::Resolved {
            enhanced_query,
            raw_query,
            clarified_engine,
        }
    }
}

/// Clarification state machine over the dialogue lexicon
pub struct DialogueController {
    lexicon: Arc<DomainLexicon>,
    negators: Vec<String>,
}

impl DialogueController {
    pub fn new(lexicon: Arc<DomainLexicon>) -> Self {
        let mut negators: Vec<String> = lexicon
            .normalization
            .negators
            .values()
            .cloned()
            .collect();
        negators.sort();
        negators.dedup();

        Self { lexicon, negators }
    }

    fn terms(&self) -> &DialogueLexicon {
        &self.lexicon.dialogue
    }

    /// Classify a processed query
    pub fn analyze(&self, text: &str, engine_hint: Option<Subsystem>) -> QueryFeatures {
        let terms = self.terms();
        let words = words(text);

        let detected = if contains_any(&words, &terms.main_engine_terms) {
            Some(Subsystem::MainEngine)
        } else if contains_any(&words, &terms.auxiliary_engine_terms) {
            Some(Subsystem::AuxiliaryEngine)
        } else {
            None
        };
        let engine_type = engine_hint.or(detected);
        let engine_mentioned = engine_hint.is_some() || contains_any(&words, &terms.engine_terms);

        let function_negated = words.windows(2).any(|pair| {
            self.negators.contains(&pair[0]) && terms.function_terms.contains(&pair[1])
        });

        QueryFeatures {
            vague: contains_any(&words, &terms.vague_terms),
            engine_mentioned,
            engine_unspecified: engine_type.is_none()
                && contains_any(&words, &terms.generic_engine_terms),
            engine_type,
            components: in_text_order(&words, &terms.component_terms),
            problems: in_text_order(&words, &terms.problem_terms),
            action: contains_any(&words, &terms.action_terms),
            function_negated,
        }
    }

    /// Advance the dialogue by one turn
    ///
    /// `processed` is the normalizer's processed query and `raw` the text
    /// the operator typed. Raw text is carried through the clarification so
    /// the resolved search still sees every term the operator used. An
    /// `engine_hint` counts as an explicit engine mention.
    pub fn step(
        &self,
        state: &DialogueState,
        processed: &str,
        raw: &str,
        engine_hint: Option<Subsystem>,
    ) -> DialogueStep {
        let step = match state {
            DialogueState::Idle => self.fresh(processed, raw, engine_hint),
            DialogueState::AwaitingEngine {
                original_query,
                operator_text,
            } => self.engine_answer(
                original_query,
                processed,
                join([operator_text.as_str(), raw]),
                engine_hint,
            ),
            DialogueState::AwaitingComponent {
                original_query,
                clarified_engine,
                operator_text,
            } => self.component_answer(
                original_query,
                *clarified_engine,
                processed,
                join([operator_text.as_str(), raw]),
            ),
            DialogueState::AwaitingProblem {
                clarified_engine,
                clarified_component,
                operator_text,
                ..
            } => DialogueStep::resolved(
                join([
                    clarified_engine.display_name(),
                    clarified_component.as_str(),
                    processed,
                ]),
                join([operator_text.as_str(), raw]),
                Some(*clarified_engine),
            ),
        };

        let next = match &step {
            DialogueStep::Clarify { next, .. } => next.awaiting(),
            DialogueStep::Resolved { .. } => None,
        };
        tracing::debug!(from = ?state.awaiting(), to = ?next, "Dialogue step");
        step
    }

    fn fresh(&self, processed: &str, raw: &str, engine_hint: Option<Subsystem>) -> DialogueStep {
        let features = self.analyze(processed, engine_hint);
        let awaiting_engine = || DialogueState::AwaitingEngine {
            original_query: processed.to_string(),
            operator_text: raw.to_string(),
        };

        if features.vague && !features.engine_mentioned && !features.has_component() {
            return DialogueStep::clarify(VAGUE_PROMPT, awaiting_engine());
        }

        if features.engine_unspecified {
            return DialogueStep::clarify(ENGINE_PROMPT, awaiting_engine());
        }

        if (features.has_component() || features.has_problem() || features.action)
            && !features.engine_mentioned
        {
            return DialogueStep::clarify(ENGINE_PROMPT, awaiting_engine());
        }

        if features.engine_mentioned
            && features.vague
            && !features.has_component()
            && !features.has_problem()
        {
            if let Some(engine) = features.engine_type {
                return DialogueStep::clarify(
                    component_prompt(engine),
                    DialogueState::AwaitingComponent {
                        original_query: processed.to_string(),
                        clarified_engine: engine,
                        operator_text: raw.to_string(),
                    },
                );
            }
        }

        DialogueStep::resolved(processed.to_string(), raw.to_string(), engine_hint)
    }

    fn engine_answer(
        &self,
        original_query: &str,
        answer: &str,
        operator_text: String,
        engine_hint: Option<Subsystem>,
    ) -> DialogueStep {
        let engine = self
            .analyze(answer, engine_hint)
            .engine_type
            .unwrap_or(Subsystem::MainEngine);
        let original = self.analyze(original_query, None);

        if original.vague || (!original.has_component() && !original.has_problem()) {
            return DialogueStep::clarify(
                component_prompt(engine),
                DialogueState::AwaitingComponent {
                    original_query: original_query.to_string(),
                    clarified_engine: engine,
                    operator_text,
                },
            );
        }

        DialogueStep::resolved(
            join([engine.display_name(), original_query]),
            operator_text,
            Some(engine),
        )
    }

    fn component_answer(
        &self,
        original_query: &str,
        engine: Subsystem,
        answer: &str,
        operator_text: String,
    ) -> DialogueStep {
        let features = self.analyze(answer, None);
        let engine_name = engine.display_name();

        let enhanced = if features.has_component() {
            let components = features.components.join(" and ");
            let problems = features.problems.join(" ");
            join([engine_name, components.as_str(), problems.as_str()])
        } else if features.function_negated {
            format!("{} not functioning properly", engine_name)
        } else if let Some(indicator) = features.problems.first() {
            format!("{} {} issue", engine_name, indicator)
        } else {
            return DialogueStep::clarify(
                PROBLEM_PROMPT,
                DialogueState::AwaitingProblem {
                    original_query: original_query.to_string(),
                    clarified_engine: engine,
                    clarified_component: answer.to_string(),
                    operator_text,
                },
            );
        };

        DialogueStep::resolved(enhanced, operator_text, Some(engine))
    }
}

/// Matched single-word terms in the order the text mentions them
fn in_text_order(words: &[String], terms: &[String]) -> Vec<String> {
    let matched = matched_terms(words, terms);
    let mut ordered: Vec<(usize, String)> = matched
        .into_iter()
        .map(|term| {
            let first = term.split_whitespace().next().unwrap_or(term);
            let position = words.iter().position(|w| w == first).unwrap_or(usize::MAX);
            (position, term.to_string())
        })
        .collect();
    ordered.sort();
    ordered.into_iter().map(|(_, term)| term).collect()
}

/// Space-join the non-empty parts
fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DialogueController {
        DialogueController::new(Arc::new(DomainLexicon::builtin()))
    }

    fn expect_clarify(step: DialogueStep) -> (ClarificationRequest, DialogueState) {
        match step {
            DialogueStep::Clarify { request, next } => (request, next),
            other => panic!("expected clarification, got {:?}", other),
        }
    }

    fn expect_resolved(step: DialogueStep) -> (String, Option<Subsystem>) {
        match step {
            DialogueStep::Resolved {
                enhanced_query,
                clarified_engine,
                ..
            } => (enhanced_query, clarified_engine),
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    fn resolved_raw(step: DialogueStep) -> String {
        match step {
            DialogueStep::Resolved { raw_query, .. } => raw_query,
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    /// Turn where the operator typed exactly the processed text
    fn turn(
        controller: &DialogueController,
        state: &DialogueState,
        text: &str,
        hint: Option<Subsystem>,
    ) -> DialogueStep {
        controller.step(state, text, text, hint)
    }

    #[test]
    fn test_vague_query_asks_for_engine() {
        let (request, next) =
            expect_clarify(turn(&controller(), &DialogueState::Idle, "problem", None));
        assert_eq!(request.message, VAGUE_PROMPT);
        assert_eq!(request.awaiting, Awaiting::Engine);
        assert_eq!(
            next,
            DialogueState::AwaitingEngine {
                original_query: "problem".to_string(),
                operator_text: "problem".to_string(),
            }
        );
    }

    #[test]
    fn test_bare_engine_asks_which() {
        let (request, _) =
            expect_clarify(turn(&controller(), &DialogueState::Idle, "engine overheating", None));
        assert_eq!(request.message, ENGINE_PROMPT);
    }

    #[test]
    fn test_component_without_engine_asks_which() {
        let (request, next) =
            expect_clarify(turn(
                &controller(),
                &DialogueState::Idle,
                "exhaust temperature high",
                None,
            ));
        assert_eq!(request.message, ENGINE_PROMPT);
        assert_eq!(next.awaiting(), Some(Awaiting::Engine));
    }

    #[test]
    fn test_engine_but_vague_asks_for_issue() {
        let (request, next) =
            expect_clarify(turn(&controller(), &DialogueState::Idle, "main engine problem", None));
        assert_eq!(
            request.message,
            "What specific issue are you experiencing with the main engine?"
        );
        assert_eq!(next.clarified_engine(), Some(Subsystem::MainEngine));
    }

    #[test]
    fn test_specific_query_resolves() {
        let (enhanced, engine) = expect_resolved(turn(
            &controller(),
            &DialogueState::Idle,
            "main engine temperature too high",
            None,
        ));
        assert_eq!(enhanced, "main engine temperature too high");
        assert_eq!(engine, None);

        // engine and action only
        let (enhanced, _) =
            expect_resolved(turn(
                &controller(),
                &DialogueState::Idle,
                "generator not_starting",
                None,
            ));
        assert_eq!(enhanced, "generator not_starting");
    }

    #[test]
    fn test_engine_hint_counts_as_mention() {
        let (enhanced, engine) = expect_resolved(turn(
            &controller(),
            &DialogueState::Idle,
            "exhaust temperature high",
            Some(Subsystem::AuxiliaryEngine),
        ));
        assert_eq!(enhanced, "exhaust temperature high");
        assert_eq!(engine, Some(Subsystem::AuxiliaryEngine));
    }

    #[test]
    fn test_engine_answer_with_specific_original_resolves() {
        let state = DialogueState::AwaitingEngine {
            original_query: "exhaust temperature high".to_string(),
            operator_text: "exhaust temperature high".to_string(),
        };
        let (enhanced, engine) = expect_resolved(turn(&controller(), &state, "main", None));
        assert_eq!(enhanced, "main engine exhaust temperature high");
        assert_eq!(engine, Some(Subsystem::MainEngine));
    }

    #[test]
    fn test_engine_answer_defaults_to_main_and_asks_component() {
        let state = DialogueState::AwaitingEngine {
            original_query: "problem".to_string(),
            operator_text: "problem".to_string(),
        };
        let (request, next) = expect_clarify(turn(&controller(), &state, "dunno", None));
        assert_eq!(request.awaiting, Awaiting::Component);
        assert_eq!(next.clarified_engine(), Some(Subsystem::MainEngine));

        let (_, next) = expect_clarify(turn(&controller(), &state, "generator", None));
        assert_eq!(next.clarified_engine(), Some(Subsystem::AuxiliaryEngine));
    }

    #[test]
    fn test_component_answers() {
        let c = controller();
        let state = DialogueState::AwaitingComponent {
            original_query: "problem".to_string(),
            clarified_engine: Subsystem::MainEngine,
            operator_text: "problem".to_string(),
        };

        let (enhanced, _) = expect_resolved(turn(&c, &state, "exhaust temperature high", None));
        assert_eq!(enhanced, "main engine exhaust and temperature high");

        let (enhanced, _) = expect_resolved(turn(&c, &state, "not_working", None));
        assert_eq!(enhanced, "main engine not functioning properly");

        let (enhanced, _) = expect_resolved(turn(&c, &state, "knocking", None));
        assert_eq!(enhanced, "main engine knocking issue");
    }

    #[test]
    fn test_vague_component_answer_asks_problem() {
        let state = DialogueState::AwaitingComponent {
            original_query: "problem".to_string(),
            clarified_engine: Subsystem::AuxiliaryEngine,
            operator_text: "problem".to_string(),
        };
        let (request, next) = expect_clarify(turn(&controller(), &state, "something wrong", None));
        assert_eq!(request.message, PROBLEM_PROMPT);
        assert_eq!(request.awaiting, Awaiting::Problem);
        assert_eq!(
            next,
            DialogueState::AwaitingProblem {
                original_query: "problem".to_string(),
                clarified_engine: Subsystem::AuxiliaryEngine,
                clarified_component: "something wrong".to_string(),
                operator_text: "problem something wrong".to_string(),
            }
        );
    }

    #[test]
    fn test_problem_answer_always_resolves() {
        let state = DialogueState::AwaitingProblem {
            original_query: "problem".to_string(),
            clarified_engine: Subsystem::AuxiliaryEngine,
            clarified_component: "something wrong".to_string(),
            operator_text: "problem something wrong".to_string(),
        };
        let (enhanced, engine) = expect_resolved(turn(&controller(), &state, "vibration", None));
        assert_eq!(enhanced, "auxiliary engine something wrong vibration");
        assert_eq!(engine, Some(Subsystem::AuxiliaryEngine));
    }

    #[test]
    fn test_raw_text_survives_clarification() {
        let c = controller();
        let (_, next) = expect_clarify(c.step(
            &DialogueState::Idle,
            "seawater pump leak",
            "Seawater pump leaking",
            None,
        ));
        assert_eq!(next.operator_text(), Some("Seawater pump leaking"));

        let raw = resolved_raw(c.step(&next, "main", "main", None));
        assert_eq!(raw, "Seawater pump leaking main");
    }

    #[test]
    fn test_raw_text_accumulates_over_three_turns() {
        let c = controller();
        let (_, next) = expect_clarify(c.step(&DialogueState::Idle, "problem", "Problem!", None));
        let (_, next) = expect_clarify(c.step(&next, "main", "Main", None));
        let (_, next) = expect_clarify(c.step(&next, "something wrong", "something wrong", None));
        assert_eq!(next.awaiting(), Some(Awaiting::Problem));

        let raw = resolved_raw(c.step(&next, "vibration", "vibrating", None));
        assert_eq!(raw, "Problem! Main something wrong vibrating");

        // fresh resolution keeps the typed text
        let raw = resolved_raw(c.step(
            &DialogueState::Idle,
            "main engine temperature too high",
            "Main engine temp too high",
            None,
        ));
        assert_eq!(raw, "Main engine temp too high");
    }

    #[test]
    fn test_whole_word_features() {
        let features = controller().analyze("temperature", None);
        // "me" inside "temperature" is not an engine mention
        assert!(!features.engine_mentioned);
        assert_eq!(features.components, vec!["temperature".to_string()]);
    }
}
