use serde::{Deserialize, Serialize};

/// Structural role of a line or of an emitted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralRole {
    Volume,
    Chapter,
    Section,
    Prologue,
    Epilogue,
    Summary,
    Plain,
}

impl StructuralRole {
    /// Every role that opens a new unit when it heads a line.
    pub fn is_heading(self) -> bool {
        !matches!(self, StructuralRole::Plain)
    }

    pub fn label(self) -> &'static str {
        match self {
            StructuralRole::Volume => "卷",
            StructuralRole::Chapter => "章",
            StructuralRole::Section => "节",
            StructuralRole::Prologue => "序言",
            StructuralRole::Epilogue => "后记",
            StructuralRole::Summary => "概述",
            StructuralRole::Plain => "正文",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based, assigned by the assembler only.
    pub id: usize,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub role: StructuralRole,
    pub volume_index: usize,
    pub chapter_index: usize,
    pub section_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover: String,
    pub chapters: Vec<Chapter>,
}

impl Document {
    pub fn total_words(&self) -> usize {
        self.chapters.iter().map(|c| c.word_count).sum()
    }
}

/// A unit emitted by the structure builder before normalization and id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub title: String,
    pub role: StructuralRole,
    pub volume_index: usize,
    pub chapter_index: usize,
    pub section_index: usize,
    /// Raw accumulated lines; blank lines are kept as empty strings.
    pub lines: Vec<String>,
}

impl ChapterRecord {
    pub fn has_text(&self) -> bool {
        self.lines.iter().any(|l| !l.trim().is_empty())
    }
}
