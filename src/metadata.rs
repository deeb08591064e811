//! Document-level attributes read from a leading header block or a meta file.

use serde::{Deserialize, Serialize};

use crate::classify::LineClassifier;
use crate::model::Document;
use crate::rules::{MetaField, RuleSet};

pub const DEFAULT_METADATA_WINDOW: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover: String,
}

impl Metadata {
    /// Store one field value. Empty values never overwrite.
    pub fn set(&mut self, field: MetaField, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match field {
            MetaField::Title => self.title = value.to_string(),
            MetaField::Author => self.author = value.to_string(),
            MetaField::Description => self.description = value.to_string(),
            MetaField::Category => self.category = value.to_string(),
            MetaField::Cover => self.cover = value.to_string(),
            MetaField::Tags => {
                for tag in split_tags(value) {
                    if !self.tags.contains(&tag) {
                        self.tags.push(tag);
                    }
                }
            }
        }
    }

    fn append_description(&mut self, line: &str) {
        if !self.description.is_empty() {
            self.description.push('\n');
        }
        self.description.push_str(line);
    }

    /// Copy every non-empty field onto `doc`.
    pub fn apply_to(&self, doc: &mut Document) {
        let pairs = [
            (&mut doc.title, &self.title),
            (&mut doc.author, &self.author),
            (&mut doc.description, &self.description),
            (&mut doc.category, &self.category),
            (&mut doc.cover, &self.cover),
        ];
        for (slot, value) in pairs {
            if !value.is_empty() {
                slot.clone_from(value);
            }
        }
        if !self.tags.is_empty() {
            doc.tags.clone_from(&self.tags);
        }
    }
}

/// Split a tags value on ASCII or full-width commas and semicolons.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(|c: char| matches!(c, ',' | ';' | '，' | '；'))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Line positions of a detected header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpan {
    /// Opening fence line, for `---` style front matter.
    pub fence: Option<usize>,
    /// The separator that closes the header.
    pub end: usize,
}

impl HeaderSpan {
    pub fn body_start(&self) -> usize {
        self.end + 1
    }
}

fn looks_like_key_value(line: &str) -> bool {
    match line.find(|c: char| c == ':' || c == '：') {
        Some(pos) => pos > 0 && !line[..pos].trim().contains(char::is_whitespace),
        None => false,
    }
}

/// Find a header within the first `window` lines.
///
/// A header is closed by a separator that appears before any structural
/// heading. It must hold at least one `key: value` line, recognized or not;
/// prose followed by a decorative separator stays body.
pub fn locate_header<S: AsRef<str>>(
    lines: &[S],
    classifier: &LineClassifier<'_>,
    window: usize,
) -> Option<HeaderSpan> {
    let rules = classifier.rules();
    let mut fence = None;
    let mut seen_text = false;
    let mut fields = 0usize;
    let mut unknown_keys = 0usize;

    for (idx, line) in lines.iter().take(window).enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if rules.is_separator(line) {
            if !seen_text && fence.is_none() {
                fence = Some(idx);
                continue;
            }
            if fields > 0 || unknown_keys > 0 {
                return Some(HeaderSpan { fence, end: idx });
            }
            return None;
        }
        seen_text = true;
        if rules.match_metadata(line).is_some() {
            fields += 1;
            continue;
        }
        if classifier.classify(line).role.is_heading() {
            return None;
        }
        if looks_like_key_value(line) {
            unknown_keys += 1;
        }
    }
    None
}

/// Accumulates header lines into [`Metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReader {
    metadata: Metadata,
    in_description: bool,
    paragraph_break: bool,
}

impl HeaderReader {
    pub fn feed(&mut self, line: &str, rules: &RuleSet) {
        let line = line.trim();
        if line.is_empty() {
            // a blank run inside a description is one paragraph break
            self.paragraph_break = self.in_description && !self.metadata.description.is_empty();
            return;
        }
        if rules.is_separator(line) {
            return;
        }
        match rules.match_metadata(line) {
            Some((MetaField::Description, value)) => {
                // an empty value opens a multi-line description
                self.in_description = value.is_empty();
                self.paragraph_break = false;
                self.metadata.set(MetaField::Description, &value);
            }
            Some((field, value)) => {
                self.in_description = false;
                self.paragraph_break = false;
                self.metadata.set(field, &value);
            }
            None if self.in_description => {
                if std::mem::take(&mut self.paragraph_break) {
                    self.metadata.description.push('\n');
                }
                self.metadata.append_description(line);
            }
            None => tracing::trace!(line, "ignored header line"),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }
}

/// Read a whole meta file (meta.txt, 简介.txt, meta.md) as a header.
pub fn parse_metadata_text(text: &str, rules: &RuleSet) -> Metadata {
    let mut reader = HeaderReader::default();
    for line in text.lines() {
        reader.feed(line, rules);
    }
    reader.into_metadata()
}

/// `---` fenced front matter at the top of a chapter file. Returns the parsed
/// fields and the index of the first line after the closing fence.
pub fn fenced_front_matter<S: AsRef<str>>(
    lines: &[S],
    rules: &RuleSet,
    window: usize,
) -> Option<(Metadata, usize)> {
    let open = lines.iter().position(|l| !l.as_ref().trim().is_empty())?;
    if !rules.is_separator(lines[open].as_ref()) {
        return None;
    }
    let close = lines
        .iter()
        .enumerate()
        .skip(open + 1)
        .take(window)
        .find(|(_, l)| rules.is_separator(l.as_ref()))
        .map(|(idx, _)| idx)?;

    let mut reader = HeaderReader::default();
    for line in &lines[open + 1..close] {
        reader.feed(line.as_ref(), rules);
    }
    Some((reader.into_metadata(), close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(text: &str) -> Option<HeaderSpan> {
        let lines: Vec<&str> = text.lines().collect();
        locate_header(&lines, &LineClassifier::default(), DEFAULT_METADATA_WINDOW)
    }

    #[test]
    fn separator_closes_header() {
        let span = header("作者：张三\n========\n第一章 开始").unwrap();
        assert_eq!(span, HeaderSpan { fence: None, end: 1 });
        assert_eq!(span.body_start(), 2);
    }

    #[test]
    fn fenced_front_matter_header() {
        let span = header("---\ntitle: 长夜\nauthor: 李四\n---\n正文").unwrap();
        assert_eq!(span.fence, Some(0));
        assert_eq!(span.end, 3);
    }

    #[test]
    fn fenced_unknown_keys_still_header() {
        let span = header("---\ndate: 2020-01-01\n---\n正文").unwrap();
        assert_eq!(span.end, 2);
    }

    #[test]
    fn unrecognized_keys_still_close_a_header() {
        let span = header("出版社：某社\n========\n第一章 开始").unwrap();
        assert_eq!(span, HeaderSpan { fence: None, end: 1 });
    }

    #[test]
    fn heading_before_separator_means_no_header() {
        assert!(header("第一章 开始\n内容\n=====\n第二章").is_none());
    }

    #[test]
    fn prose_before_separator_is_not_header() {
        assert!(header("这是一段开头。\n***\n后面的话").is_none());
    }

    #[test]
    fn separator_past_window_is_ignored() {
        let mut text = String::from("作者：张三\n");
        for i in 0..25 {
            text.push_str(&format!("行{}\n", i));
        }
        text.push_str("=====\n");
        assert!(header(&text).is_none());
    }

    #[test]
    fn reader_collects_fields() {
        let rules = RuleSet::shared();
        let meta = parse_metadata_text(
            "书名：长夜\n作者：张三\n分类：玄幻\n标签：热血, 修真；升级，，\n封面：cover.jpg\n出版社：某社",
            rules,
        );
        assert_eq!(meta.title, "长夜");
        assert_eq!(meta.author, "张三");
        assert_eq!(meta.category, "玄幻");
        assert_eq!(meta.tags, vec!["热血", "修真", "升级"]);
        assert_eq!(meta.cover, "cover.jpg");
    }

    #[test]
    fn multi_line_description() {
        let meta = parse_metadata_text(
            "简介：\n少年离家。\n\n踏上旅途。\n作者：张三\n这行不属于简介",
            RuleSet::shared(),
        );
        assert_eq!(meta.description, "少年离家。\n\n踏上旅途。");
        assert_eq!(meta.author, "张三");
    }

    #[test]
    fn split_tags_discards_empty_fragments() {
        assert_eq!(split_tags(" a ;b,,；c，"), vec!["a", "b", "c"]);
        assert!(split_tags(" , ; ").is_empty());
    }

    #[test]
    fn apply_to_keeps_existing_when_empty() {
        let mut doc = Document { title: "旧".into(), ..Document::default() };
        let meta = Metadata { author: "张三".into(), ..Metadata::default() };
        meta.apply_to(&mut doc);
        assert_eq!(doc.title, "旧");
        assert_eq!(doc.author, "张三");
    }

    #[test]
    fn chapter_file_front_matter() {
        let lines = ["", "---", "title: 夜行", "---", "他走了。"];
        let (meta, body) = fenced_front_matter(&lines, RuleSet::shared(), 20).unwrap();
        assert_eq!(meta.title, "夜行");
        assert_eq!(body, 4);
        assert!(fenced_front_matter(&["他走了。"], RuleSet::shared(), 20).is_none());
    }
}
