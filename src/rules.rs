//! Structural and metadata recognition rules, kept as data.
//!
//! Adding a synonym or a marker form means editing the tables below; nothing
//! else in the crate hard-codes vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::StructuralRole;

/// Ordinal token: ASCII, full-width and Sino digits.
const NUM: &str = "[0-9０-９零〇一二两三四五六七八九十百千万]+";
/// Punctuation allowed between a marker and its title.
const GAP: &str = r"[\s:：·、.．\-—]";

const VOLUME_PATTERNS: &[&str] = &[
    r"^(?P<marker>第(?P<num>{N})卷){GAP}*(?P<title>.*)$",
    r"^(?P<marker>卷(?P<num>{N})){GAP}*(?P<title>.*)$",
    r"(?i)^(?P<marker>volume\s*(?P<num>[0-9]+)){GAP}*(?P<title>.*)$",
];

const CHAPTER_PATTERNS: &[&str] = &[
    r"^(?P<marker>第(?P<num>{N})[章回]){GAP}*(?P<title>.*)$",
    r"(?i)^(?P<marker>chapter\s*(?P<num>[0-9]+)){GAP}*(?P<title>.*)$",
    // "3." but not "3.1": the title may not start with a digit
    r"^(?P<marker>(?P<num>[0-9]{1,4})[.．])(?:\s*(?P<title>[^0-9０-９\s].*))?\s*$",
    r"^(?P<marker>(?P<num>[0-9]{1,4})、){GAP}*(?P<title>.*)$",
];

const SECTION_PATTERNS: &[&str] = &[
    r"^(?P<marker>第(?P<num>{N})节){GAP}*(?P<title>.*)$",
    r"^(?P<marker>[0-9]{1,4}[.．](?P<num>[0-9]{1,4}))(?:\s*(?P<title>[^0-9０-９.．\s].*))?\s*$",
    r"^(?P<marker>(?P<num>[零〇一二两三四五六七八九十百千]+)、){GAP}*(?P<title>.*)$",
    r"^(?P<marker>[（(](?P<num>[0-9零〇一二两三四五六七八九十]+)[)）]){GAP}*(?P<title>.*)$",
];

const PROLOGUE_WORDS: &str = "序章|序言|自序|代序|序|楔子|引子|前言|开篇|缘起|题记|prologue";
const EPILOGUE_WORDS: &str =
    "作者后记|完结感言|大结局|后记|尾声|结语|跋文|跋|结尾|终章|epilogue";
const SUMMARY_WORDS: &str = "内容简介|故事梗概|内容梗概|作品简介|小说简介|简介";

/// A lexicon word matches only as a whole token, optionally behind a
/// numbered chapter marker ("第一百章 大结局").
const LEXICON_PATTERN: &str =
    r"(?i)^(?:第{N}[章回]{GAP}*)?(?P<marker>{WORDS})(?:{GAP}+(?P<title>.*))?$";
const SUMMARY_PATTERN: &str = r"^(?P<marker>{WORDS})(?:{GAP}+(?P<title>.*))?$";

const SEPARATOR_PATTERN: &str = r"^[=\-*~＝－＊～]{3,}$";
const HEADING_PREFIX_PATTERN: &str = r"^#{1,6}\s*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaField {
    Title,
    Author,
    Description,
    Category,
    Tags,
    Cover,
}

const METADATA_ALIASES: &[(MetaField, &str)] = &[
    (MetaField::Title, "title|标题|书名|小说名|作品名"),
    (MetaField::Author, "author|作者|编著|原著|著"),
    (MetaField::Description, "description|内容简介|故事简介|作品简介|简介|描述"),
    (MetaField::Category, "category|分类|类别"),
    (MetaField::Tags, "tags|标签"),
    (MetaField::Cover, "cover|封面"),
];
const METADATA_PATTERN: &str = r"(?i)^(?:{ALIASES})(?:\s*[:：]\s*|\s+|$)(?P<value>.*)$";
/// A bare book title line: 《长夜》
const BOOK_TITLE_PATTERN: &str = r"^《(?P<value>[^《》]+)》$";

/// What a structural matcher extracted from a heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// The marker text as written ("第一章", "Chapter 3", "后记").
    pub marker: String,
    /// Raw ordinal token, empty for lexical markers.
    pub ordinal: String,
    /// Title fragment after the marker, trimmed; may be empty.
    pub fragment: String,
}

struct StructuralRule {
    role: StructuralRole,
    patterns: Vec<Regex>,
}

struct MetadataRule {
    field: MetaField,
    pattern: Regex,
}

pub struct RuleSet {
    structural: Vec<StructuralRule>,
    separator: Regex,
    heading_prefix: Regex,
    book_title: Regex,
    metadata: Vec<MetadataRule>,
}

static SHARED: Lazy<RuleSet> = Lazy::new(RuleSet::new);

fn expand(template: &str) -> String {
    template.replace("{N}", NUM).replace("{GAP}", GAP)
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn lexicon(template: &str, words: &str) -> Vec<Regex> {
    vec![compile(&expand(template).replace("{WORDS}", words))]
}

impl RuleSet {
    pub fn new() -> Self {
        let numbered = |patterns: &[&str]| -> Vec<Regex> {
            patterns.iter().map(|p| compile(&expand(p))).collect()
        };
        let structural = vec![
            StructuralRule { role: StructuralRole::Volume, patterns: numbered(VOLUME_PATTERNS) },
            StructuralRule { role: StructuralRole::Chapter, patterns: numbered(CHAPTER_PATTERNS) },
            StructuralRule { role: StructuralRole::Section, patterns: numbered(SECTION_PATTERNS) },
            StructuralRule {
                role: StructuralRole::Prologue,
                patterns: lexicon(LEXICON_PATTERN, PROLOGUE_WORDS),
            },
            StructuralRule {
                role: StructuralRole::Epilogue,
                patterns: lexicon(LEXICON_PATTERN, EPILOGUE_WORDS),
            },
            StructuralRule {
                role: StructuralRole::Summary,
                patterns: lexicon(SUMMARY_PATTERN, SUMMARY_WORDS),
            },
        ];
        let metadata = METADATA_ALIASES
            .iter()
            .map(|(field, aliases)| MetadataRule {
                field: *field,
                pattern: compile(&METADATA_PATTERN.replace("{ALIASES}", aliases)),
            })
            .collect();

        Self {
            structural,
            separator: compile(SEPARATOR_PATTERN),
            heading_prefix: compile(HEADING_PREFIX_PATTERN),
            book_title: compile(BOOK_TITLE_PATTERN),
            metadata,
        }
    }

    /// Process-wide compiled rules; read-only, so safe to share across threads.
    pub fn shared() -> &'static RuleSet {
        &SHARED
    }

    /// Match `line` (already trimmed) against the rules for one role.
    pub fn match_role(&self, role: StructuralRole, line: &str) -> Option<HeadingMatch> {
        let rule = self.structural.iter().find(|r| r.role == role)?;
        rule.patterns.iter().find_map(|re| {
            let caps = re.captures(line)?;
            let text = |name: &str| caps.name(name).map(|m| m.as_str().trim()).unwrap_or("");
            Some(HeadingMatch {
                marker: text("marker").to_string(),
                ordinal: text("num").to_string(),
                fragment: text("title").to_string(),
            })
        })
    }

    pub fn volume(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Volume, line)
    }

    pub fn chapter(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Chapter, line)
    }

    pub fn section(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Section, line)
    }

    pub fn prologue(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Prologue, line)
    }

    pub fn epilogue(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Epilogue, line)
    }

    pub fn summary(&self, line: &str) -> Option<HeadingMatch> {
        self.match_role(StructuralRole::Summary, line)
    }

    pub fn is_separator(&self, line: &str) -> bool {
        self.separator.is_match(line.trim())
    }

    /// Drop one Markdown heading prefix ("## 第一章" -> "第一章").
    pub fn strip_heading_prefix<'a>(&self, line: &'a str) -> &'a str {
        match self.heading_prefix.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }

    /// Recognize a metadata field line; the value is trimmed and may be empty.
    pub fn match_metadata(&self, line: &str) -> Option<(MetaField, String)> {
        let line = line.trim();
        if let Some(caps) = self.book_title.captures(line) {
            return Some((MetaField::Title, caps["value"].trim().to_string()));
        }
        self.metadata.iter().find_map(|rule| {
            let caps = rule.pattern.captures(line)?;
            let value = caps.name("value").map(|m| m.as_str().trim()).unwrap_or("");
            Some((rule.field, value.to_string()))
        })
    }

    fn field_value(&self, field: MetaField, line: &str) -> Option<String> {
        self.match_metadata(line).filter(|(f, _)| *f == field).map(|(_, v)| v)
    }

    pub fn title(&self, line: &str) -> Option<String> {
        self.field_value(MetaField::Title, line)
    }

    pub fn author(&self, line: &str) -> Option<String> {
        self.field_value(MetaField::Author, line)
    }

    pub fn description(&self, line: &str) -> Option<String> {
        self.field_value(MetaField::Description, line)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}
