// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword set and evaluation.

use std::sync::LazyLock;

use nila_config::model::GuardConfig;
use tracing::debug;

/// Built-in self-harm phrases (lower-case, matched as substrings).
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "i want to die",
    "end my life",
    "cutting myself",
    "end it all",
    "better off dead",
    "harm myself",
];

static BUILTIN: LazyLock<CrisisKeywordSet> = LazyLock::new(CrisisKeywordSet::builtin);

/// The guard's decision for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No crisis phrase found; the message may be sent.
    Safe,
    /// A crisis phrase was found; show safety resources instead of sending.
    AtRisk,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::AtRisk => write!(f, "at-risk"),
        }
    }
}

/// Immutable set of lower-cased crisis phrases.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisKeywordSet {
    keywords: Box<[String]>,
}

impl CrisisKeywordSet {
    /// The built-in phrase list only.
    pub fn builtin() -> Self {
        Self::with_extra(std::iter::empty::<&str>())
    }

    /// The built-in list plus `extra` phrases.
    ///
    /// Extras are trimmed and lower-cased; blanks and duplicates are dropped.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = CRISIS_KEYWORDS.iter().map(|k| k.to_string()).collect();
        for phrase in extra {
            let folded = phrase.as_ref().trim().to_lowercase();
            if !folded.is_empty() && !keywords.contains(&folded) {
                keywords.push(folded);
            }
        }
        Self {
            keywords: keywords.into_boxed_slice(),
        }
    }

    /// Build from the `[guard]` config section.
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::with_extra(&config.extra_keywords)
    }

    /// The phrases in this set, built-ins first.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns the first phrase contained in `text`, if any.
    pub fn find_match(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let folded = text.to_lowercase();
        self.keywords()
            .find(|keyword| folded.contains(keyword))
    }

    /// Decide whether `text` may be sent.
    pub fn evaluate(&self, text: &str) -> Verdict {
        match self.find_match(text) {
            Some(keyword) => {
                debug!(keyword, text_len = text.len(), "crisis keyword matched");
                Verdict::AtRisk
            }
            None => Verdict::Safe,
        }
    }
}

impl Default for CrisisKeywordSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Evaluate `text` against the built-in keyword set.
pub fn evaluate(text: &str) -> Verdict {
    BUILTIN.evaluate(text)
}
