//! Concept gap identity and resolution tracking.
//!
//! A gap is identified once per concept per question; its identity is
//! the concept string scoped to the parent question. The tracker
//! replays attempts in order: a previously-unresolved concept absent
//! from an attempt's flagged set is marked resolved at that attempt,
//! and resolution is monotonic - once resolved, a gap never reopens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a knowledge gap, as judged by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Minor,
    Moderate,
    Major,
}

impl GapSeverity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minor" => Some(Self::Minor),
            "moderate" => Some(Self::Moderate),
            "major" => Some(Self::Major),
            _ => None,
        }
    }
}

impl fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gap as reported by the evaluator for a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedGap {
    pub concept: String,
    pub severity: GapSeverity,
}

impl FlaggedGap {
    pub fn new(concept: impl Into<String>, severity: GapSeverity) -> Self {
        Self {
            concept: concept.into(),
            severity,
        }
    }
}

/// A tracked knowledge gap with its resolution history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptGap {
    /// Concept string; identity within one parent question.
    pub concept: String,
    pub severity: GapSeverity,
    pub resolved: bool,
    pub identified_at_attempt: u8,
    pub resolved_at_attempt: Option<u8>,
}

impl ConceptGap {
    /// A freshly identified, unresolved gap.
    pub fn identified(concept: impl Into<String>, severity: GapSeverity, attempt: u8) -> Self {
        Self {
            concept: concept.into(),
            severity,
            resolved: false,
            identified_at_attempt: attempt,
            resolved_at_attempt: None,
        }
    }
}

/// Accumulates gaps across the attempts of one parent question.
///
/// Order of first identification is preserved so the follow-up
/// generator sees gaps in the order they surfaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapTracker {
    gaps: Vec<ConceptGap>,
}

impl GapTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker by replaying per-attempt flagged sets in order.
    pub fn replay<'a, I>(attempts: I) -> Self
    where
        I: IntoIterator<Item = (u8, &'a [FlaggedGap])>,
    {
        let mut tracker = Self::new();
        for (attempt, flagged) in attempts {
            tracker.record_attempt(attempt, flagged);
        }
        tracker
    }

    /// Record one attempt's flagged gaps.
    ///
    /// New concepts are identified at this attempt. Unresolved concepts
    /// absent from `flagged` are marked resolved at this attempt. A
    /// re-flag of an already-resolved concept is ignored.
    pub fn record_attempt(&mut self, attempt_number: u8, flagged: &[FlaggedGap]) {
        for gap in &mut self.gaps {
            if gap.resolved {
                continue;
            }
            if !flagged.iter().any(|f| f.concept == gap.concept) {
                gap.resolved = true;
                gap.resolved_at_attempt = Some(attempt_number);
            }
        }
        for flag in flagged {
            if !self.gaps.iter().any(|g| g.concept == flag.concept) {
                self.gaps.push(ConceptGap::identified(
                    flag.concept.clone(),
                    flag.severity,
                    attempt_number,
                ));
            }
        }
    }

    /// All gaps ever identified, in order of first identification.
    pub fn cumulative(&self) -> &[ConceptGap] {
        &self.gaps
    }

    /// Gaps still open after the attempts recorded so far.
    pub fn unresolved(&self) -> impl Iterator<Item = &ConceptGap> {
        self.gaps.iter().filter(|g| !g.resolved)
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    pub fn resolved_count(&self) -> usize {
        self.gaps.iter().filter(|g| g.resolved).count()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gaps.len()
    }
}
