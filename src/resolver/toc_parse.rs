use anyhow::{Context, Result};
use regex::Regex;

use crate::model::TocEntry;

use super::config::IndentConfig;
use super::numerals::NumeralNormalizer;

/// Parses single OCR'd TOC lines into candidate entries.
///
/// Patterns are ordered most-specific first and the first one that both
/// matches structurally and yields a normalizable page token wins; there is
/// no best-of scoring across patterns.
pub struct TocLineParser {
    indent: IndentConfig,
    normalizer: NumeralNormalizer,
    patterns: Vec<Regex>,
    leader_dots: Regex,
}

impl TocLineParser {
    pub fn new(indent: IndentConfig, normalizer: NumeralNormalizer) -> Result<Self> {
        let sources = [
            // numbered heading with leader dots: "1. Section .... 25"
            r"^(\d+\.?\s+.+?)\s*\.{2,}\s*(\d+)\s*$",
            // lettered heading with leader dots: "A. Section .... 25"
            r"^([A-Z]\.?\s+.+?)\s*\.{2,}\s*(\d+)\s*$",
            // explicit page suffix, Arabic or Roman: "Section Page iii"
            r"(?i)^(.+?)\s+page\s+([ivxlcdm\d]+)\s*$",
            // leader dots with Roman page: "Section .... iii"
            r"(?i)^(.+?)\s*\.{2,}\s*([ivxlcdm]+)\s*$",
            // leader dots with Arabic page: "Section .... 25"
            r"^(.+?)\s*\.{2,}\s*(\d+)\s*$",
            // wide whitespace with Arabic page: "Section   25"
            r"^(.+?)\s{3,}(\d+)\s*$",
            // wide whitespace with Roman page: "Section   iii"
            r"(?i)^(.+?)\s{3,}([ivxlcdm]+)\s*$",
            // trailing number fallback: "Section 25"
            r"^(.+?)\s+(\d+)\s*$",
        ];

        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            patterns.push(
                Regex::new(source)
                    .with_context(|| format!("failed to compile TOC pattern: {source}"))?,
            );
        }

        Ok(Self {
            indent,
            normalizer,
            patterns,
            leader_dots: Regex::new(r"\.{2,}")
                .context("failed to compile leader-dot strip regex")?,
        })
    }

    pub fn normalizer(&self) -> &NumeralNormalizer {
        &self.normalizer
    }

    /// Returns `None` for lines that do not describe a TOC entry. OCR output
    /// routinely contains page headers and decorative lines; skipping them
    /// silently is the expected behavior, not an error.
    pub fn parse_line(&self, line: &str) -> Option<TocEntry> {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            return None;
        }

        let level = self.indent_level(trimmed);
        let candidate = trimmed.trim_start();

        for pattern in &self.patterns {
            let Some(captures) = pattern.captures(candidate) else {
                continue;
            };

            let page_token = captures.get(2).map(|m| m.as_str())?;
            let Some(ordinal) = self.normalizer.normalize(page_token) else {
                // structural match with a bogus page token: try the next,
                // less specific pattern
                continue;
            };

            let title = self.clean_title(captures.get(1).map(|m| m.as_str())?);
            if title.is_empty() {
                continue;
            }

            return Some(TocEntry {
                title,
                ordinal,
                level,
            });
        }

        None
    }

    pub fn parse_text(&self, text: &str) -> Vec<TocEntry> {
        text.lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn indent_level(&self, line: &str) -> u32 {
        let leading = line.len() - line.trim_start_matches(' ').len();
        if leading >= self.indent.level3_spaces {
            3
        } else if leading >= self.indent.level2_spaces {
            2
        } else {
            1
        }
    }

    fn clean_title(&self, raw: &str) -> String {
        self.leader_dots
            .replace_all(raw, " ")
            .trim()
            .trim_end_matches('.')
            .trim()
            .to_string()
    }
}
