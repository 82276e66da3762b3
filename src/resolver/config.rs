use std::collections::HashMap;

/// Bounded lookup table of lowercase Roman numerals. Footer labels in CAFR
/// front matter rarely exceed xxx, so the table is finite and configurable
/// rather than a general Roman parser.
#[derive(Debug, Clone)]
pub struct RomanTable {
    values: HashMap<String, u32>,
}

impl RomanTable {
    pub fn bounded(max_value: u32) -> Self {
        let mut values = HashMap::new();
        for value in 1..=max_value {
            values.insert(to_roman_lower(value), value);
        }
        Self { values }
    }

    pub fn lookup(&self, token: &str) -> Option<u32> {
        self.values.get(&token.to_ascii_lowercase()).copied()
    }
}

impl Default for RomanTable {
    fn default() -> Self {
        Self::bounded(30)
    }
}

fn to_roman_lower(value: u32) -> String {
    const DIGITS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut remainder = value;
    let mut out = String::new();
    for (magnitude, literal) in DIGITS {
        while remainder >= magnitude {
            out.push_str(literal);
            remainder -= magnitude;
        }
    }
    out
}

/// Leading-whitespace thresholds that turn OCR indentation into nesting
/// depth. Below the level-2 threshold an entry is a main section.
#[derive(Debug, Clone, Copy)]
pub struct IndentConfig {
    pub level2_spaces: usize,
    pub level3_spaces: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            level2_spaces: 4,
            level3_spaces: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub min_main_sections: usize,
    pub gap_threshold: u32,
    pub expected_keywords: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_main_sections: 3,
            gap_threshold: 100,
            expected_keywords: vec![
                "introductory".to_string(),
                "financial".to_string(),
                "statistical".to_string(),
            ],
        }
    }
}
