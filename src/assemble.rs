use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder::{build_structure, synthesize_title, BuildContext, Counters};
use crate::classify::{Classification, LineClassifier};
use crate::config::ExtractConfig;
use crate::metadata::{fenced_front_matter, locate_header, parse_metadata_text};
use crate::model::{Chapter, ChapterRecord, Document, StructuralRole};
use crate::normalize::{normalize_lines, word_count};
use crate::numeral::normalize_numeral;
use crate::rules::RuleSet;

static NUMBERED_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+[-_. ]?(.*)$").unwrap());

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Parse one manuscript with default settings.
pub fn parse_document(raw: &str) -> Document {
    parse_document_with(raw, &ExtractConfig::default())
}

pub fn parse_document_with(raw: &str, cfg: &ExtractConfig) -> Document {
    let rules = RuleSet::shared();
    let classifier = LineClassifier::new(rules, cfg.max_heading_chars);
    let lines: Vec<&str> = strip_bom(raw).lines().collect();

    let header = locate_header(&lines, &classifier, cfg.metadata_window);
    let ctx = BuildContext { classifier, fallback_title: &cfg.fallback_title };
    let built = build_structure(&lines, header, &ctx);

    let body_start = header.map_or(0, |h| h.body_start());
    let body: Vec<&str> = lines[body_start..]
        .iter()
        .copied()
        .filter(|l| !rules.is_separator(l))
        .collect();

    let mut doc = assemble(built.records, &body, cfg);
    built.metadata.apply_to(&mut doc);
    tracing::info!(
        title = %doc.title,
        chapters = doc.chapters.len(),
        header = header.is_some(),
        "parsed document"
    );
    doc
}

fn finalize(record: ChapterRecord, max_blank_run: usize) -> Option<Chapter> {
    let content = normalize_lines(&record.lines, max_blank_run);
    if content.is_empty() {
        return None;
    }
    Some(Chapter {
        id: 0,
        title: record.title,
        word_count: word_count(&content),
        content,
        role: record.role,
        volume_index: record.volume_index,
        chapter_index: record.chapter_index,
        section_index: record.section_index,
    })
}

/// Normalize records, drop empty ones and number the rest 1..N. With nothing
/// left, `body` becomes a single fallback chapter.
pub fn assemble<S: AsRef<str>>(
    records: Vec<ChapterRecord>,
    body: &[S],
    cfg: &ExtractConfig,
) -> Document {
    let mut chapters: Vec<Chapter> = records
        .into_iter()
        .filter_map(|r| finalize(r, cfg.max_blank_run))
        .collect();

    if chapters.is_empty() {
        tracing::warn!(fallback = %cfg.fallback_title, "no structural markers; using whole body");
        let content = normalize_lines(body, cfg.max_blank_run);
        chapters.push(Chapter {
            id: 0,
            title: cfg.fallback_title.clone(),
            word_count: word_count(&content),
            content,
            role: StructuralRole::Plain,
            volume_index: 0,
            chapter_index: 0,
            section_index: 0,
        });
    }

    for (i, chapter) in chapters.iter_mut().enumerate() {
        chapter.id = i + 1;
    }
    Document { chapters, ..Document::default() }
}

/// Chapter files of one volume. An empty `name` holds loose files that
/// belong to no volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeFiles {
    pub name: String,
    pub files: Vec<(String, String)>,
}

fn order_key(name: &str) -> (u32, String) {
    let stem = Path::new(name).file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    (normalize_numeral(stem), name.to_string())
}

/// Title from a file name: "01-开始.txt" -> "开始".
pub fn title_from_file_name(name: &str) -> String {
    let stem = Path::new(name).file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    match NUMBERED_STEM.captures(stem) {
        Some(caps) if !caps[1].trim().is_empty() => caps[1].trim().to_string(),
        _ => stem.to_string(),
    }
}

/// One chapter file before numbering.
struct FileUnit {
    heading: Option<Classification>,
    title: String,
    role: StructuralRole,
    lines: Vec<String>,
}

fn read_file_unit(name: &str, text: &str, classifier: &LineClassifier<'_>, cfg: &ExtractConfig) -> FileUnit {
    let rules = classifier.rules();
    let mut lines: Vec<&str> = strip_bom(text).lines().collect();

    let mut front_title = String::new();
    if let Some((meta, body_start)) = fenced_front_matter(&lines, rules, cfg.metadata_window) {
        front_title = meta.title;
        lines.drain(..body_start);
    }

    let mut heading = None;
    if let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) {
        let class = classifier.classify(lines[first]);
        if class.role.is_heading() {
            lines.drain(..=first);
            heading = Some(class);
        }
    }

    let (title, role) = match &heading {
        Some(class) => (String::new(), class.role),
        None if !front_title.is_empty() => (front_title, StructuralRole::Chapter),
        None => {
            let title = title_from_file_name(name);
            let role = match classifier.classify(&title).role {
                r @ (StructuralRole::Prologue | StructuralRole::Epilogue | StructuralRole::Summary) => r,
                _ => StructuralRole::Chapter,
            };
            (title, role)
        }
    };

    FileUnit {
        heading,
        title,
        role,
        lines: lines
            .into_iter()
            .filter(|l| !rules.is_separator(l))
            .map(str::to_string)
            .collect(),
    }
}

/// Directory mode: one chapter per file, ordered by each name's numeral with
/// the name itself breaking ties.
pub fn parse_document_from_files(files: Vec<(String, String)>, meta_text: Option<&str>) -> Document {
    parse_document_from_files_with(files, meta_text, &ExtractConfig::default())
}

pub fn parse_document_from_files_with(
    files: Vec<(String, String)>,
    meta_text: Option<&str>,
    cfg: &ExtractConfig,
) -> Document {
    parse_document_from_volumes(vec![VolumeFiles { name: String::new(), files }], meta_text, cfg)
}

/// Directory mode with one subdirectory per volume. Chapter numbering
/// restarts in every volume.
pub fn parse_document_from_volumes(
    mut volumes: Vec<VolumeFiles>,
    meta_text: Option<&str>,
    cfg: &ExtractConfig,
) -> Document {
    let rules = RuleSet::shared();
    let classifier = LineClassifier::new(rules, cfg.max_heading_chars);

    volumes.sort_by(|a, b| order_key(&a.name).cmp(&order_key(&b.name)));
    let mut records = Vec::new();
    let mut volume_index = 0;
    for mut volume in volumes {
        if !volume.name.is_empty() {
            volume_index += 1;
            tracing::debug!(volume = %volume.name, index = volume_index, "volume");
        }
        volume.files.sort_by(|a, b| order_key(&a.0).cmp(&order_key(&b.0)));
        let mut counters = Counters { volume: volume_index, chapter: 0, section: 0 };
        for (name, text) in &volume.files {
            let unit = read_file_unit(name, text, &classifier, cfg);
            if !unit.lines.iter().any(|l| !l.trim().is_empty()) {
                tracing::debug!(file = %name, "skipping empty chapter file");
                continue;
            }
            // same numbering as single-file mode: only chapters and sections count
            counters.advance(unit.role);
            let title = match &unit.heading {
                Some(class) => synthesize_title(class, &counters),
                None => unit.title,
            };
            records.push(ChapterRecord {
                title,
                role: unit.role,
                volume_index: counters.volume,
                chapter_index: counters.chapter,
                section_index: counters.section,
                lines: unit.lines,
            });
        }
    }

    let mut doc = assemble(records, &[] as &[&str], cfg);
    if let Some(meta) = meta_text {
        parse_metadata_text(strip_bom(meta), rules).apply_to(&mut doc);
    }
    tracing::info!(title = %doc.title, chapters = doc.chapters.len(), "assembled directory");
    doc
}
