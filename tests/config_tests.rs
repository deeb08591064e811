use std::fs;

use manuscript_to_doc::{load_config, parse_config, parse_document_with, ConfigError, ExtractConfig};

#[test]
fn load_config_reads_yaml_with_defaults() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("extract.yaml");
    fs::write(&path, "fallback_title: Body\nmeta_file_names: [book.txt]\n").unwrap();

    let cfg = load_config(&path).expect("valid config");
    assert_eq!(cfg.fallback_title, "Body");
    assert_eq!(cfg.meta_file_names, vec!["book.txt"]);
    assert_eq!(cfg.metadata_window, 20);
    assert_eq!(cfg.chapter_extensions, vec!["txt", "md"]);
}

#[test]
fn empty_file_is_default_config() {
    assert_eq!(parse_config("").unwrap(), ExtractConfig::default());
}

#[test]
fn invalid_values_are_rejected() {
    let err = parse_config("metadata_window: 0").unwrap_err();
    assert_eq!(err.to_string(), "Invalid config: metadata_window must be > 0");

    let err = parse_config("fallback_title: '  '").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = parse_config("chapter_extensions: []").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_config("metadata_window: [1, 2").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = parse_config("metadata_window: many").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_read_error() {
    let td = tempfile::tempdir().unwrap();
    let err = load_config(&td.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read(_)));
}

#[test]
fn fallback_title_is_configurable() {
    let cfg = ExtractConfig { fallback_title: "Body".into(), ..ExtractConfig::default() };
    let doc = parse_document_with("no markers here", &cfg);
    assert_eq!(doc.chapters[0].title, "Body");
}

#[test]
fn metadata_window_bounds_header_search() {
    let text = "作者：张三\n书名：长夜\n分类：玄幻\n标签：热血\n=====\n第一章 开始\n内容";

    let doc = parse_document_with(text, &ExtractConfig::default());
    assert_eq!(doc.author, "张三");
    assert_eq!(doc.chapters.len(), 1);

    let narrow = ExtractConfig { metadata_window: 3, ..ExtractConfig::default() };
    let doc = parse_document_with(text, &narrow);
    assert_eq!(doc.author, "");
    assert_eq!(doc.chapters.len(), 2);
    assert!(doc.chapters[0].content.starts_with("作者：张三"));
}

#[test]
fn blank_run_cap_is_configurable() {
    let cfg = ExtractConfig { max_blank_run: 1, ..ExtractConfig::default() };
    let doc = parse_document_with("第一章\n甲\n\n\n\n乙", &cfg);
    assert_eq!(doc.chapters[0].content, "甲\n\n乙");
}
