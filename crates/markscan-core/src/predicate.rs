//! Composable boolean predicates over cleaned source text.
//!
//! Predicates are pure: evaluating the same predicate against the same text
//! always yields the same answer.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::RubricError;

/// A compiled pattern together with its source text.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`, optionally ignoring case.
    pub fn new(source: &str, case_insensitive: bool) -> Result<Self, RubricError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| RubricError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// A boolean test over cleaned text.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// The pattern occurs somewhere in the text.
    Matches(Pattern),
    /// At least one inner predicate holds. Empty is `false`.
    AnyOf(Vec<Predicate>),
    /// Every inner predicate holds. Empty is `true`.
    AllOf(Vec<Predicate>),
    /// The inner predicate does not hold.
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, text: &str) -> bool {
        match self {
            Predicate::Matches(pattern) => pattern.is_match(text),
            Predicate::AnyOf(inner) => inner.iter().any(|p| p.evaluate(text)),
            Predicate::AllOf(inner) => inner.iter().all(|p| p.evaluate(text)),
            Predicate::Not(inner) => !inner.evaluate(text),
        }
    }

    /// Number of `Matches` leaves.
    pub fn pattern_count(&self) -> usize {
        match self {
            Predicate::Matches(_) => 1,
            Predicate::AnyOf(inner) | Predicate::AllOf(inner) => {
                inner.iter().map(Predicate::pattern_count).sum()
            }
            Predicate::Not(inner) => inner.pattern_count(),
        }
    }
}

/// Case-insensitive pattern-present predicate.
pub fn matches(pattern: &str) -> Result<Predicate, RubricError> {
    Ok(Predicate::Matches(Pattern::new(pattern, true)?))
}

/// Pattern-present predicate with explicit case handling.
pub fn matches_with_case(pattern: &str, case_insensitive: bool) -> Result<Predicate, RubricError> {
    Ok(Predicate::Matches(Pattern::new(pattern, case_insensitive)?))
}

pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::AnyOf(predicates.into_iter().collect())
}

pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::AllOf(predicates.into_iter().collect())
}

pub fn not(predicate: Predicate) -> Predicate {
    Predicate::Not(Box::new(predicate))
}

/// Compile a list of alternative spellings into one `AnyOf`.
pub fn any_pattern<S: AsRef<str>>(
    patterns: &[S],
    case_insensitive: bool,
) -> Result<Predicate, RubricError> {
    let inner = patterns
        .iter()
        .map(|p| matches_with_case(p.as_ref(), case_insensitive))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Predicate::AnyOf(inner))
}
