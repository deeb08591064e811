use manuscript_to_doc::{normalize_content, normalize_lines, parse_document};

fn blank_run_max(text: &str) -> usize {
    let mut max = 0;
    let mut run = 0;
    for line in text.split('\n') {
        if line.is_empty() {
            run += 1;
            max = max.max(run);
        } else {
            run = 0;
        }
    }
    max
}

#[test]
fn normalize_is_idempotent() {
    let samples = [
        "",
        "\n",
        "   ",
        "a",
        "\n\n\na\n\n\n\n\nb\n\n",
        "  行一  \n\t\n\u{3000}\n行二\r\n",
        "x\n\n\ny\n\n\n\nz\n",
    ];
    for s in samples {
        let once = normalize_content(s);
        assert_eq!(normalize_content(&once), once, "{:?}", s);
    }
}

#[test]
fn normalized_content_has_no_long_blank_runs_or_edges() {
    let out = normalize_content("\n\n甲\n\n\n\n\n\n乙\n \n \n \n丙\n\n");
    assert!(blank_run_max(&out) <= 2);
    assert!(!out.starts_with('\n'));
    assert!(!out.ends_with('\n'));
    assert_eq!(out, "甲\n\n\n乙\n\n\n丙");
}

#[test]
fn lines_and_text_agree() {
    let lines = vec![" a ".to_string(), String::new(), "b".to_string()];
    assert_eq!(normalize_lines(&lines, 2), normalize_content(" a \n\nb"));
}

#[test]
fn chapter_content_is_normalized() {
    let doc = parse_document("第一章\n\n\n   甲   \n\n\n\n\n\n乙\n\n\n");
    assert_eq!(doc.chapters[0].content, "甲\n\n\n乙");
    assert_eq!(doc.chapters[0].word_count, 5);
}
