// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crisis detection for outgoing chat messages.
//!
//! This crate provides:
//! - [`CrisisKeywordSet`]: an immutable set of lower-cased self-harm phrases
//! - [`Verdict`]: the guard's decision for one message
//! - [`resources`]: the helplines shown instead of a chat reply
//!
//! Matching is a plain case-folded substring test with no negation
//! handling: "I do not want to end my life" is still `AtRisk`.

pub mod keywords;
pub mod resources;

pub use keywords::{evaluate, CrisisKeywordSet, Verdict, CRISIS_KEYWORDS};
pub use resources::{Helpline, HELPLINES, SAFETY_MESSAGE, SAFETY_TITLE};
