use crate::model::StructuralRole;
use crate::numeral::{is_sino_numeral_char, normalize_numeral};
use crate::rules::RuleSet;

pub const DEFAULT_MAX_HEADING_CHARS: usize = 50;

/// Order in which roles are tried. Lexical synonyms come first because they
/// can also look like numbered chapters ("第一百章 大结局").
pub const PRECEDENCE: [StructuralRole; 6] = [
    StructuralRole::Prologue,
    StructuralRole::Epilogue,
    StructuralRole::Summary,
    StructuralRole::Volume,
    StructuralRole::Chapter,
    StructuralRole::Section,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: StructuralRole,
    /// Title fragment, falling back to the text before the first colon.
    pub title: String,
    /// Title fragment exactly as captured; empty when the marker stands alone.
    pub fragment: String,
    pub marker: String,
    /// Ordinal written in the marker, 0 when absent.
    pub ordinal: u32,
    /// Whether the marker's ordinal was written in Sino numerals.
    pub sino: bool,
}

impl Classification {
    pub fn plain() -> Self {
        Self {
            role: StructuralRole::Plain,
            title: String::new(),
            fragment: String::new(),
            marker: String::new(),
            ordinal: 0,
            sino: false,
        }
    }
}

fn before_colon(line: &str) -> &str {
    line.split(|c: char| c == ':' || c == '：').next().unwrap_or("").trim()
}

#[derive(Clone, Copy)]
pub struct LineClassifier<'r> {
    rules: &'r RuleSet,
    max_heading_chars: usize,
}

impl<'r> LineClassifier<'r> {
    pub fn new(rules: &'r RuleSet, max_heading_chars: usize) -> Self {
        Self { rules, max_heading_chars }
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    pub fn classify(&self, line: &str) -> Classification {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().count() > self.max_heading_chars {
            return Classification::plain();
        }
        let text = self.rules.strip_heading_prefix(trimmed).trim();

        for role in PRECEDENCE {
            if let Some(m) = self.rules.match_role(role, text) {
                let title = if m.fragment.is_empty() {
                    before_colon(text).to_string()
                } else {
                    m.fragment.clone()
                };
                return Classification {
                    role,
                    title,
                    ordinal: normalize_numeral(&m.ordinal),
                    sino: m.ordinal.chars().any(is_sino_numeral_char),
                    fragment: m.fragment,
                    marker: m.marker,
                };
            }
        }
        Classification::plain()
    }
}

impl Default for LineClassifier<'static> {
    fn default() -> Self {
        Self::new(RuleSet::shared(), DEFAULT_MAX_HEADING_CHARS)
    }
}

/// Classify with the shared rule set and default limits.
pub fn classify_line(line: &str) -> Classification {
    LineClassifier::default().classify(line)
}
