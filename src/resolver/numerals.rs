use anyhow::{Context, Result};
use regex::Regex;

use super::config::RomanTable;

/// Converts raw footer or TOC page tokens into canonical ordinals.
///
/// Footer text is noisy extraction output, so interpretation follows a fixed
/// precedence where each rule is strictly narrower than the next: a clean
/// digit run, a clean Roman run, a bracketed/dashed number, any digit run,
/// any word-boundary Roman token. Order determines correctness.
#[derive(Debug)]
pub struct NumeralNormalizer {
    romans: RomanTable,
    digits_only: Regex,
    roman_only: Regex,
    enclosed_digits: Regex,
    any_digits: Regex,
    any_roman_word: Regex,
}

impl NumeralNormalizer {
    pub fn new(romans: RomanTable) -> Result<Self> {
        Ok(Self {
            romans,
            digits_only: Regex::new(r"^\d+$").context("failed to compile digit-run regex")?,
            roman_only: Regex::new(r"(?i)^[ivxlcdm]+$")
                .context("failed to compile roman-run regex")?,
            enclosed_digits: Regex::new(r"[-~(\[]\s*(\d+)\s*[-~)\]]")
                .context("failed to compile enclosed-digits regex")?,
            any_digits: Regex::new(r"\d+").context("failed to compile digit-scan regex")?,
            any_roman_word: Regex::new(r"(?i)\b[ivxlcdm]+\b")
                .context("failed to compile roman-scan regex")?,
        })
    }

    /// Returns the canonical ordinal for a raw page label, or `None` when the
    /// label carries no recognizable number. Unparseable labels are expected
    /// input, not errors.
    pub fn normalize(&self, raw: &str) -> Option<u32> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if self.digits_only.is_match(trimmed) {
            return trimmed.parse::<u32>().ok().filter(|value| *value >= 1);
        }

        if self.roman_only.is_match(trimmed) {
            if let Some(value) = self.romans.lookup(trimmed) {
                return Some(value);
            }
        }

        if let Some(captures) = self.enclosed_digits.captures(trimmed) {
            if let Some(value) = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                if value >= 1 {
                    return Some(value);
                }
            }
        }

        if let Some(found) = self.any_digits.find(trimmed) {
            if let Ok(value) = found.as_str().parse::<u32>() {
                if value >= 1 {
                    return Some(value);
                }
            }
        }

        for found in self.any_roman_word.find_iter(trimmed) {
            if let Some(value) = self.romans.lookup(found.as_str()) {
                return Some(value);
            }
        }

        None
    }
}
