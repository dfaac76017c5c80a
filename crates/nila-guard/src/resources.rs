// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safety resources shown when the guard returns [`Verdict::AtRisk`](crate::Verdict).

/// A crisis helpline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helpline {
    pub name: &'static str,
    /// Dialable number, digits only.
    pub number: &'static str,
}

impl Helpline {
    /// `tel:` URI for platforms that can place calls.
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.number)
    }
}

pub const SAFETY_TITLE: &str = "You are not alone.";

pub const SAFETY_MESSAGE: &str = "We care about you and your safety. \
     Please reach out to someone who can help. Support is available 24/7.";

/// Helplines in display order; the first is the primary action.
pub const HELPLINES: &[Helpline] = &[
    Helpline {
        name: "Tele-MANAS",
        number: "14416",
    },
    Helpline {
        name: "Vandrevala Foundation",
        number: "18602662345",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_helpline_is_tele_manas() {
        assert_eq!(HELPLINES[0].name, "Tele-MANAS");
        assert_eq!(HELPLINES[0].tel_uri(), "tel:14416");
    }

    #[test]
    fn numbers_are_digits_only() {
        for line in HELPLINES {
            assert!(line.number.chars().all(|c| c.is_ascii_digit()), "{line:?}");
        }
    }
}
