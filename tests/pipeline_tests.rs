use std::fs;

use manuscript_to_doc::{
    emit_document, fill_title_from_stem, parse_document, parse_document_file, Document, DocumentStats, ExtractConfig, ParsePipeline, StructuralRole,
    ValidationIssue,
};

#[test]
fn validation_flags_missing_title_and_short_chapters() {
    let mut pipeline = ParsePipeline::default().with_validation(true);
    let out = pipeline.run("第一章 开始\n短\n第二章 发展\n这一章的内容足够长，不会被标记。");
    assert_eq!(
        out.issues,
        vec![
            ValidationIssue::MissingTitle,
            ValidationIssue::ShortContent { chapter_id: 1, title: "第一章 开始".into(), chars: 1 },
        ]
    );
}

#[test]
fn validation_flags_empty_fallback() {
    let mut pipeline = ParsePipeline::default().with_validation(true);
    let out = pipeline.run("书名：空\n===\n");
    assert_eq!(out.document.title, "空");
    assert_eq!(
        out.issues,
        vec![ValidationIssue::EmptyContent { chapter_id: 1, title: "正文".into() }]
    );
}

#[test]
fn validation_is_off_by_default() {
    let mut pipeline = ParsePipeline::default();
    assert!(pipeline.run("第一章\n短").issues.is_empty());
}

#[test]
fn cache_hits_return_clones() {
    let mut pipeline = ParsePipeline::default().with_cache(true);
    let mut first = pipeline.run("第一章 开始\n内容");
    first.document.title = "changed".into();
    let second = pipeline.run("第一章 开始\n内容");
    assert!(second.cache_hit);
    assert_eq!(second.document.title, "");
    assert_eq!(second.document, parse_document("第一章 开始\n内容"));

    let third = pipeline.run("第一章 开始\n别的内容");
    assert!(!third.cache_hit);
    assert_eq!(pipeline.cached_documents(), 2);
}

#[test]
fn run_path_uses_file_stem_for_title() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("长夜.txt");
    fs::write(&path, "第一章 开始\n这一章的内容足够长，不会被标记。").unwrap();
    let mut pipeline = ParsePipeline::new(ExtractConfig::default()).with_validation(true);
    let out = pipeline.run_path(&path).unwrap();
    assert_eq!(out.document.title, "长夜");
    assert!(out.issues.is_empty());

    let direct = parse_document_file(&path, &ExtractConfig::default()).unwrap();
    assert_eq!(direct.title, out.document.title);

    let mut titled = Document { title: "雪国".into(), ..Document::default() };
    assert!(!fill_title_from_stem(&mut titled, &path));
    assert_eq!(titled.title, "雪国");
}

#[test]
fn stats_summarize_roles() {
    let doc = parse_document("楔子\n引言\n第一卷\n第一章\n甲\n第二章\n乙\n第二卷\n第一章\n丙\n尾声\n完");
    let stats = DocumentStats::collect(&doc);
    assert_eq!(stats.chapters, 5);
    assert_eq!(stats.volumes, 2);
    assert_eq!(stats.words, doc.total_words());
    assert_eq!(stats.roles.get(&StructuralRole::Chapter), Some(&3));
    assert_eq!(stats.roles.get(&StructuralRole::Epilogue), Some(&1));
}

#[test]
fn emitted_json_reads_back() {
    let doc = parse_document("作者：张三\n===\n第一章 开始\n内容");
    let td = tempfile::tempdir().unwrap();
    let out = td.path().join("out");
    let path = emit_document(&doc, &out, "changye").expect("emit ok");
    assert_eq!(path, out.join("changye.json"));

    let back: Document = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, doc);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["chapters"][0]["role"], "chapter");
    assert_eq!(raw["chapters"][0]["id"], 1);

    let leftovers: Vec<_> = fs::read_dir(&out).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(leftovers.len(), 1, "no temp files left behind");
}

#[test]
fn parallel_parses_share_rules() {
    let inputs: Vec<String> = (1..=8).map(|i| format!("第{}章 测试\n内容{}", i, i)).collect();
    std::thread::scope(|s| {
        let handles: Vec<_> = inputs.iter().map(|text| s.spawn(move || parse_document(text))).collect();
        for (i, h) in handles.into_iter().enumerate() {
            let doc = h.join().unwrap();
            assert_eq!(doc.chapters[0].title, format!("第{}章 测试", i + 1));
        }
    });
}
