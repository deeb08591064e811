//! Hooks composed around the parsing core: caching, validation, statistics.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assemble::parse_document_with;
use crate::config::ExtractConfig;
use crate::error::SourceError;
use crate::model::{Document, StructuralRole};
use crate::source::{fill_title_from_stem, parse_document_dir, read_text};

/// Chapters shorter than this (in chars) are flagged.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Lowercase hex SHA-256 of `bytes`; keys the document cache.
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    out.iter().map(|b| format!("{:02x}", b)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingTitle,
    EmptyContent { chapter_id: usize, title: String },
    ShortContent { chapter_id: usize, title: String, chars: usize },
}

pub fn validate_document(doc: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if doc.title.trim().is_empty() {
        issues.push(ValidationIssue::MissingTitle);
    }
    for ch in &doc.chapters {
        if ch.content.trim().is_empty() {
            issues.push(ValidationIssue::EmptyContent { chapter_id: ch.id, title: ch.title.clone() });
        } else if ch.word_count < MIN_CONTENT_CHARS {
            issues.push(ValidationIssue::ShortContent {
                chapter_id: ch.id,
                title: ch.title.clone(),
                chars: ch.word_count,
            });
        }
    }
    issues
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub chapters: usize,
    pub words: usize,
    pub volumes: usize,
    pub roles: BTreeMap<StructuralRole, usize>,
}

impl DocumentStats {
    pub fn collect(doc: &Document) -> Self {
        let mut roles = BTreeMap::new();
        for ch in &doc.chapters {
            *roles.entry(ch.role).or_insert(0) += 1;
        }
        Self {
            chapters: doc.chapters.len(),
            words: doc.total_words(),
            volumes: doc.chapters.iter().map(|c| c.volume_index).max().unwrap_or(0),
            roles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub document: Document,
    pub stats: DocumentStats,
    pub issues: Vec<ValidationIssue>,
    pub cache_hit: bool,
}

/// Parse with optional caching and validation.
///
/// ```
/// use manuscript_to_doc::ParsePipeline;
///
/// let mut pipeline = ParsePipeline::default().with_cache(true);
/// let first = pipeline.run("第一章 开始\n内容");
/// let second = pipeline.run("第一章 开始\n内容");
/// assert!(!first.cache_hit);
/// assert!(second.cache_hit);
/// ```
#[derive(Debug, Default)]
pub struct ParsePipeline {
    config: ExtractConfig,
    cache: Option<HashMap<String, Document>>,
    validate: bool,
}

impl ParsePipeline {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config, cache: None, validate: false }
    }

    pub fn with_cache(mut self, on: bool) -> Self {
        self.cache = if on { Some(HashMap::new()) } else { None };
        self
    }

    pub fn with_validation(mut self, on: bool) -> Self {
        self.validate = on;
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn cached_documents(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    /// Parse raw manuscript text.
    pub fn run(&mut self, raw: &str) -> ParseOutcome {
        let started = Instant::now();
        let key = self.cache.as_ref().map(|_| sha256_hex(raw.as_bytes()));

        let cached = match (&self.cache, &key) {
            (Some(cache), Some(key)) => cache.get(key).cloned(),
            _ => None,
        };
        let cache_hit = cached.is_some();
        let document = match cached {
            Some(doc) => doc,
            None => {
                let doc = parse_document_with(raw, &self.config);
                if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
                    cache.insert(key, doc.clone());
                }
                doc
            }
        };

        let outcome = self.finish(document, cache_hit);
        tracing::info!(
            chapters = outcome.stats.chapters,
            words = outcome.stats.words,
            cache_hit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline run"
        );
        outcome
    }

    /// Parse a manuscript file, or a directory of chapter files.
    pub fn run_path(&mut self, path: &Path) -> Result<ParseOutcome, SourceError> {
        if path.is_dir() {
            let started = Instant::now();
            let doc = parse_document_dir(path, &self.config)?;
            let outcome = self.finish(doc, false);
            tracing::info!(
                dir = %path.display(),
                chapters = outcome.stats.chapters,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "pipeline run"
            );
            return Ok(outcome);
        }
        let text = read_text(path)?;
        let mut outcome = self.run(&text);
        if fill_title_from_stem(&mut outcome.document, path) && self.validate {
            outcome.issues = validate_document(&outcome.document);
        }
        Ok(outcome)
    }

    fn finish(&self, document: Document, cache_hit: bool) -> ParseOutcome {
        let issues = if self.validate { validate_document(&document) } else { Vec::new() };
        for issue in &issues {
            tracing::warn!(?issue, "validation");
        }
        ParseOutcome { stats: DocumentStats::collect(&document), document, issues, cache_hit }
    }
}
