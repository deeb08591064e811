//! File-system front end: finding manuscripts and loading them as text.

use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;

use crate::assemble::{parse_document_from_volumes, parse_document_with, VolumeFiles};
use crate::config::ExtractConfig;
use crate::error::SourceError;
use crate::model::Document;

/// Enumerate manuscripts matching a glob (e.g. "./input/**/*.txt").
/// Returns a sorted list of files.
pub fn enumerate_manuscripts(glob_pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
    let root = if Path::new(glob_pattern).is_absolute() { "/" } else { "." };
    let pattern = glob_pattern.trim_start_matches("./");
    let mut paths: Vec<PathBuf> = GlobWalkerBuilder::from_patterns(root, &[pattern])
        .case_insensitive(false)
        .follow_links(false)
        .build()
        .map_err(|_| SourceError::NoFilesFound { guidance: folder_guidance() })?
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .collect();

    paths.sort();
    paths.retain(|p| p.is_file());

    if paths.is_empty() {
        return Err(SourceError::NoFilesFound { guidance: folder_guidance() });
    }
    Ok(paths)
}

pub fn folder_guidance() -> String {
    let guide = r#"No manuscripts matched the pattern.
Expected layout:
  ./input/长夜.txt                single-file manuscript
  ./input/长夜/meta.txt           directory mode: optional metadata
  ./input/长夜/01-开始.txt        one chapter per file
  ./input/长夜/第一卷/01.txt      optional volume subdirectories"#;
    guide.to_string()
}

/// Read a UTF-8 text file, dropping a leading byte-order mark.
pub fn read_text(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let text = String::from_utf8(bytes)
        .map_err(|_| SourceError::NotUtf8 { path: path.display().to_string() })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn stem_of(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

fn name_of(path: &Path) -> String {
    path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Give an untitled single-file document the file stem as its title.
/// Returns whether the title changed.
pub fn fill_title_from_stem(doc: &mut Document, path: &Path) -> bool {
    if !doc.title.is_empty() {
        return false;
    }
    doc.title = stem_of(path);
    !doc.title.is_empty()
}

/// Parse a single manuscript file. The title falls back to the file stem.
pub fn parse_document_file(path: &Path, cfg: &ExtractConfig) -> Result<Document, SourceError> {
    let text = read_text(path)?;
    let mut doc = parse_document_with(&text, cfg);
    fill_title_from_stem(&mut doc, path);
    Ok(doc)
}

/// Sorted, non-hidden entries of `dir`. Entries that cannot be read are skipped.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SourceError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !name_of(&path).starts_with('.') {
                    paths.push(path);
                }
            }
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry"),
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_chapter_file(path: &Path, cfg: &ExtractConfig) -> bool {
    path.is_file()
        && !cfg.meta_file_names.iter().any(|m| *m == name_of(path))
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| cfg.is_chapter_extension(e))
}

fn load_chapter_files(paths: &[PathBuf], cfg: &ExtractConfig) -> Result<Vec<(String, String)>, SourceError> {
    paths
        .iter()
        .filter(|p| is_chapter_file(p, cfg))
        .map(|p| Ok((name_of(p), read_text(p)?)))
        .collect()
}

/// Directory mode: each chapter file is one chapter, subdirectories are
/// volumes, and the first meta file present supplies the metadata.
pub fn parse_document_dir(dir: &Path, cfg: &ExtractConfig) -> Result<Document, SourceError> {
    let entries = list_dir(dir)?;

    let meta_text = match cfg.meta_file_names.iter().map(|n| dir.join(n)).find(|p| p.is_file()) {
        Some(path) => {
            tracing::debug!(meta = %path.display(), "metadata file");
            Some(read_text(&path)?)
        }
        None => None,
    };

    let mut volumes = vec![VolumeFiles { name: String::new(), files: load_chapter_files(&entries, cfg)? }];
    for sub in entries.iter().filter(|p| p.is_dir()) {
        let files = load_chapter_files(&list_dir(sub)?, cfg)?;
        if files.is_empty() {
            tracing::warn!(dir = %sub.display(), "volume directory has no chapter files");
            continue;
        }
        volumes.push(VolumeFiles { name: name_of(sub), files });
    }

    if volumes.iter().all(|v| v.files.is_empty()) {
        return Err(SourceError::NoFilesFound { guidance: folder_guidance() });
    }

    let mut doc = parse_document_from_volumes(volumes, meta_text.as_deref(), cfg);
    if doc.title.is_empty() {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        doc.title = name_of(&dir);
    }
    Ok(doc)
}
