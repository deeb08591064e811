use manuscript_to_doc::{classify_line, LineClassifier, RuleSet, StructuralRole};

#[test]
fn epilogue_synonym_beats_numbered_chapter() {
    for line in ["第一百章 大结局", "第50章 尾声", "第九十九回 后记", "第3章：终章"] {
        assert!(RuleSet::shared().chapter(line).is_some(), "{} should also look like a chapter", line);
        assert_eq!(classify_line(line).role, StructuralRole::Epilogue, "{}", line);
    }
}

#[test]
fn prologue_synonym_beats_numbered_chapter() {
    for line in ["第一章 楔子", "第1章 序章", "第零回 引子"] {
        assert_eq!(classify_line(line).role, StructuralRole::Prologue, "{}", line);
    }
}

#[test]
fn prologue_beats_epilogue() {
    let line = "序 后记";
    assert!(RuleSet::shared().prologue(line).is_some());
    assert_eq!(classify_line(line).role, StructuralRole::Prologue);
}

#[test]
fn summary_beats_volume_and_chapter() {
    assert_eq!(classify_line("内容简介").role, StructuralRole::Summary);
    assert_eq!(classify_line("简介：第一卷 回顾").role, StructuralRole::Summary);
}

#[test]
fn volume_beats_chapter_beats_section() {
    assert_eq!(classify_line("第一卷 第一章").role, StructuralRole::Volume);
    assert_eq!(classify_line("Volume 1").role, StructuralRole::Volume);
    assert_eq!(classify_line("第一章 第一节").role, StructuralRole::Chapter);
    assert_eq!(classify_line("第一节").role, StructuralRole::Section);
}

#[test]
fn classification_is_deterministic() {
    let lines = ["第一百章 大结局", "Chapter 9", "1.2 细节", "普通的一句话。", "==="];
    let first: Vec<_> = lines.iter().map(|l| classify_line(l)).collect();
    for _ in 0..5 {
        let again: Vec<_> = lines.iter().map(|l| classify_line(l)).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn prose_starting_with_lexicon_word_is_plain() {
    for line in ["序幕拉开了，灯光亮起。", "后记得那一天", "尾声渐近。", "卷起千堆雪"] {
        assert_eq!(classify_line(line).role, StructuralRole::Plain, "{}", line);
    }
}

#[test]
fn heading_length_limit_is_configurable() {
    let short = LineClassifier::new(RuleSet::shared(), 4);
    assert_eq!(short.classify("第一章 开始了").role, StructuralRole::Plain);
    assert_eq!(short.classify("第一章").role, StructuralRole::Chapter);
}

#[test]
fn separators_are_not_headings() {
    assert_eq!(classify_line("=====").role, StructuralRole::Plain);
    assert!(RuleSet::shared().is_separator("====="));
}
