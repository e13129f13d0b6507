//! Query normalization for marine engine fault diagnosis
//!
//! This crate turns free operator text into the canonical form the dialogue
//! controller and both retrieval engines work on:
//! - **Tokenization**: words, numbers, ranges, slashed abbreviations, `n't`
//! - **Spelling**: SymSpell over a domain-aware dictionary plus fixed marine corrections
//! - **Abbreviations**: `me`, `t/c`, `temp`, ... expanded in place
//! - **Lemmatization**: rule-based noun lemmas with an exception list
//! - **Polarity**: negations joined to the following word (`not_leaking`)
//!
//! # Example
//!
//! ```ignore
//! use marine_diag_text_processing::QueryNormalizer;
//!
//! let normalizer = QueryNormalizer::builtin()?;
//! let query = normalizer.normalize("ME exaust temp too high");
//! assert_eq!(query.processed, "main engine exhaust temperature too high");
//! ```

pub mod abbreviations;
pub mod lemmatizer;
pub mod matching;
pub mod normalizer;
pub mod spelling;
pub mod tokenizer;

mod error;

pub use abbreviations::AbbreviationExpander;
pub use error::{Result, TextProcessingError};
pub use lemmatizer::Lemmatizer;
pub use normalizer::QueryNormalizer;
pub use spelling::{Correction, SpellCorrector};
