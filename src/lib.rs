//! Infers volumes, chapters and sections from loosely structured manuscripts.
//!
//! ```
//! let doc = manuscript_to_doc::parse_document("作者：张三\n========\n第一章 开始\n内容...\n第二章 发展\n内容2");
//! assert_eq!(doc.author, "张三");
//! assert_eq!(doc.chapters[1].title, "第二章 发展");
//! ```

pub mod assemble;
pub mod builder;
pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod numeral;
pub mod pipeline;
pub mod rules;
pub mod source;

pub use assemble::{
    assemble, parse_document, parse_document_from_files, parse_document_from_files_with,
    parse_document_from_volumes, parse_document_with, title_from_file_name, VolumeFiles,
};
pub use builder::{build_structure, finish, step, BuildContext, Counters, ParseState, Scan};
pub use classify::{classify_line, Classification, LineClassifier};
pub use config::{load_config, parse_config, ExtractConfig};
pub use emit::{emit_document, slugify, unique_slug};
pub use error::{ConfigError, EmitError, SourceError};
pub use metadata::{locate_header, parse_metadata_text, split_tags, HeaderSpan, Metadata};
pub use model::{Chapter, ChapterRecord, Document, StructuralRole};
pub use normalize::{normalize_content, normalize_lines, word_count};
pub use numeral::{normalize_numeral, to_sino};
pub use pipeline::{sha256_hex, validate_document, DocumentStats, ParseOutcome, ParsePipeline, ValidationIssue};
pub use rules::{HeadingMatch, MetaField, RuleSet};
pub use source::{enumerate_manuscripts, fill_title_from_stem, parse_document_dir, parse_document_file, read_text};
