//! Single-pass structure scan.
//!
//! The scan is a transition function: [`step`] takes the current [`Scan`] by
//! value plus one line and returns the next `Scan` together with the record
//! the line closed, if any. Counters and the open accumulator travel inside
//! the `Scan`, so a test can drive the machine one line at a time.

use crate::classify::{Classification, LineClassifier};
use crate::metadata::{HeaderReader, HeaderSpan, Metadata};
use crate::model::{ChapterRecord, StructuralRole};
use crate::numeral::to_sino;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Metadata,
    Content,
    Chapter,
    Volume,
    Prologue,
    Epilogue,
}

impl ParseState {
    /// State entered after a heading of `role` opens a unit.
    fn after(role: StructuralRole) -> Self {
        match role {
            StructuralRole::Volume => ParseState::Volume,
            StructuralRole::Chapter | StructuralRole::Section => ParseState::Chapter,
            StructuralRole::Prologue => ParseState::Prologue,
            StructuralRole::Epilogue => ParseState::Epilogue,
            StructuralRole::Summary | StructuralRole::Plain => ParseState::Content,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub volume: usize,
    pub chapter: usize,
    pub section: usize,
}

impl Counters {
    /// A new volume restarts chapter numbering; a new chapter restarts sections.
    pub fn advance(&mut self, role: StructuralRole) {
        match role {
            StructuralRole::Volume => {
                self.volume += 1;
                self.chapter = 0;
                self.section = 0;
            }
            StructuralRole::Chapter => {
                self.chapter += 1;
                self.section = 0;
            }
            StructuralRole::Section => self.section += 1,
            _ => {}
        }
    }
}

pub struct BuildContext<'a> {
    pub classifier: LineClassifier<'a>,
    /// Title for untitled text ahead of the first heading.
    pub fallback_title: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub state: ParseState,
    pub counters: Counters,
    open: Option<ChapterRecord>,
    preamble: Vec<String>,
    header: HeaderReader,
    header_end: Option<usize>,
    line_no: usize,
}

impl Scan {
    /// Start in `Metadata` when a header was located, else in `Content`.
    pub fn start(header: Option<HeaderSpan>) -> Self {
        Self {
            state: if header.is_some() { ParseState::Metadata } else { ParseState::Content },
            counters: Counters::default(),
            open: None,
            preamble: Vec::new(),
            header: HeaderReader::default(),
            header_end: header.map(|h| h.end),
            line_no: 0,
        }
    }

    pub fn open(&self) -> Option<&ChapterRecord> {
        self.open.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        self.header.metadata()
    }
}

/// Display title for a freshly opened unit.
pub fn synthesize_title(class: &Classification, counters: &Counters) -> String {
    let (index, unit) = match class.role {
        StructuralRole::Volume => (counters.volume, "卷"),
        StructuralRole::Chapter if class.marker.ends_with('回') => (counters.chapter, "回"),
        StructuralRole::Chapter => (counters.chapter, "章"),
        StructuralRole::Section => (counters.section, "节"),
        role if class.title.is_empty() => return role.label().to_string(),
        _ => return class.title.clone(),
    };
    let n = if class.ordinal > 0 { class.ordinal } else { index as u32 };
    let num = if class.sino { to_sino(n) } else { n.to_string() };
    if class.fragment.is_empty() {
        format!("第{}{}", num, unit)
    } else {
        format!("第{}{} {}", num, unit, class.fragment)
    }
}

fn has_text(lines: &[String]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

/// Feed one line.
pub fn step(mut scan: Scan, line: &str, ctx: &BuildContext<'_>) -> (Scan, Option<ChapterRecord>) {
    let rules = ctx.classifier.rules();
    let idx = scan.line_no;
    scan.line_no += 1;

    if scan.state == ParseState::Metadata {
        if scan.header_end == Some(idx) {
            tracing::debug!(line = idx, "header closed");
            scan.state = ParseState::Content;
        } else {
            scan.header.feed(line, rules);
        }
        return (scan, None);
    }

    if rules.is_separator(line) {
        return (scan, None);
    }

    let class = ctx.classifier.classify(line);
    if !class.role.is_heading() {
        match scan.open.as_mut() {
            Some(record) => record.lines.push(line.to_string()),
            None => scan.preamble.push(line.to_string()),
        }
        return (scan, None);
    }

    let emitted = match scan.open.take() {
        Some(record) if record.has_text() => Some(record),
        Some(record) => {
            tracing::debug!(title = %record.title, "dropped empty unit");
            None
        }
        None if has_text(&scan.preamble) => Some(ChapterRecord {
            title: ctx.fallback_title.to_string(),
            role: StructuralRole::Plain,
            volume_index: scan.counters.volume,
            chapter_index: scan.counters.chapter,
            section_index: scan.counters.section,
            lines: std::mem::take(&mut scan.preamble),
        }),
        None => None,
    };
    scan.preamble.clear();

    scan.counters.advance(class.role);
    let title = synthesize_title(&class, &scan.counters);
    tracing::debug!(
        line = idx,
        role = ?class.role,
        title = %title,
        volume = scan.counters.volume,
        chapter = scan.counters.chapter,
        section = scan.counters.section,
        "opened unit"
    );
    scan.open = Some(ChapterRecord {
        title,
        role: class.role,
        volume_index: scan.counters.volume,
        chapter_index: scan.counters.chapter,
        section_index: scan.counters.section,
        lines: Vec::new(),
    });
    scan.state = ParseState::after(class.role);
    (scan, emitted)
}

/// End of input: emit the open unit if it has text.
pub fn finish(scan: Scan) -> (Option<ChapterRecord>, Metadata) {
    let last = scan.open.filter(ChapterRecord::has_text);
    (last, scan.header.into_metadata())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub records: Vec<ChapterRecord>,
    pub metadata: Metadata,
}

/// Run the whole scan over `lines`.
pub fn build_structure<S: AsRef<str>>(
    lines: &[S],
    header: Option<HeaderSpan>,
    ctx: &BuildContext<'_>,
) -> BuildOutput {
    let mut records = Vec::new();
    let mut scan = Scan::start(header);
    for line in lines {
        let (next, emitted) = step(scan, line.as_ref(), ctx);
        scan = next;
        records.extend(emitted);
    }
    let (last, metadata) = finish(scan);
    records.extend(last);
    BuildOutput { records, metadata }
}
