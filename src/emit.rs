use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::EmitError;
use crate::model::Document;

/// Lowercase, keep letters and digits of any script, collapse the rest to `-`.
pub fn slugify(base: &str) -> String {
    let mut slug = String::with_capacity(base.len());
    let mut prev_dash = true;
    for ch in base.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "doc".to_string()
    } else {
        slug.to_string()
    }
}

/// Reserve `slug`, suffixing `-1`, `-2`, ... when already taken this run.
pub fn unique_slug(slug: String, used: &mut HashSet<String>) -> String {
    if used.insert(slug.clone()) {
        return slug;
    }
    let mut i = 1;
    loop {
        let candidate = format!("{}-{}", slug, i);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}

/// Atomically write `doc` as pretty JSON to `<outdir>/<slug>.json`.
pub fn emit_document(doc: &Document, outdir: &Path, slug: &str) -> Result<PathBuf, EmitError> {
    std::fs::create_dir_all(outdir).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    let path = outdir.join(format!("{}.json", slug));

    // write a temp file then rename
    let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));
    let bytes = serde_json::to_vec_pretty(doc).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    std::fs::write(&tmp, bytes).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    std::fs::rename(&tmp, &path).map_err(|e| EmitError::WriteFailed(e.to_string()))?;

    tracing::debug!(path = %path.display(), "emitted document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_keeps_cjk() {
        assert_eq!(slugify("长夜 第一部"), "长夜-第一部");
        assert_eq!(slugify("  My Novel!! "), "my-novel");
        assert_eq!(slugify("***"), "doc");
    }

    #[test]
    fn unique_slug_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_slug("a".into(), &mut used), "a");
        assert_eq!(unique_slug("a".into(), &mut used), "a-1");
        assert_eq!(unique_slug("a".into(), &mut used), "a-2");
    }
}
