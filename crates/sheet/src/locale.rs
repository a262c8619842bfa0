//! Locale-aware integer parsing for numeric table cells.

use crate::error::{Result, SheetError};
use std::fmt;

const COMMA: &[char] = &[','];
const DOT: &[char] = &['.'];
const FRENCH: &[char] = &['\u{202F}', '\u{00A0}', ' '];
const NONE: &[char] = &[];

/// Digit grouping rules for a named locale such as `en_US.UTF-8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    name: String,
    separators: &'static [char],
}

impl NumberLocale {
    /// Parse a locale name. The encoding suffix (`.UTF-8`, `.utf8`) and any
    /// `@modifier` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::UnknownLocale` for a locale without known
    /// grouping rules.
    pub fn parse(name: &str) -> Result<Self> {
        let base = name
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        let separators = match base {
            "en_US" | "en_GB" | "ja_JP" | "zh_CN" | "ko_KR" => COMMA,
            "de_DE" | "it_IT" | "es_ES" | "nl_NL" => DOT,
            "fr_FR" => FRENCH,
            "C" | "POSIX" => NONE,
            _ => return Err(SheetError::UnknownLocale(name.to_string())),
        };

        Ok(NumberLocale {
            name: base.to_string(),
            separators,
        })
    }

    /// The locale name without its encoding suffix
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a grouped integer such as `1,234` (`en_US`) or `1.234` (`de_DE`).
    ///
    /// Returns `None` if anything other than an optional sign, digits and
    /// the locale's grouping separators remains. `fr_FR` also accepts a
    /// no-break space or a plain space, which `format_int` writes back as
    /// U+202F.
    #[must_use]
    pub fn parse_int(&self, text: &str) -> Option<i64> {
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits: String = body
            .chars()
            .filter(|c| !self.separators.contains(c))
            .collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        if negative {
            format!("-{digits}").parse().ok()
        } else {
            digits.parse().ok()
        }
    }

    /// Format an integer with the locale's grouping separator every three
    /// digits.
    #[must_use]
    pub fn format_int(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }

        let Some(&sep) = self.separators.first() else {
            out.push_str(&digits);
            return out;
        };

        let lead = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push(sep);
            }
            out.push(c);
        }
        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale {
            name: "en_US".to_string(),
            separators: COMMA,
        }
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
