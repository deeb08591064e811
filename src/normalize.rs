pub const DEFAULT_MAX_BLANK_RUN: usize = 2;

/// Trim every line, cap blank runs at `max_blank_run`, and drop leading and
/// trailing blank lines. Applying it twice changes nothing.
pub fn normalize_lines<S: AsRef<str>>(lines: &[S], max_blank_run: usize) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut blank_run = 0usize;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            blank_run += 1;
            if blank_run <= max_blank_run {
                out.push("");
            }
        } else {
            blank_run = 0;
            out.push(line);
        }
    }

    while matches!(out.first(), Some(l) if l.is_empty()) {
        out.remove(0);
    }
    while matches!(out.last(), Some(l) if l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

pub fn normalize_content(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    normalize_lines(&lines, DEFAULT_MAX_BLANK_RUN)
}

/// Character count of normalized content, newlines included.
pub fn word_count(content: &str) -> usize {
    content.chars().count()
}
