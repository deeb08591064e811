use std::fs;
use std::path::PathBuf;

use manuscript_to_doc::enumerate_manuscripts;

#[test]
fn enumerate_manuscripts_finds_nested_files() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path();
    let nested = base.join("input/wuxia");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("b.txt"), "乙").unwrap();
    fs::write(base.join("input/a.txt"), "甲").unwrap();
    fs::write(base.join("input/skip.md"), "丙").unwrap();

    let pattern = format!("{}/input/**/*.txt", base.display());
    let files = enumerate_manuscripts(&pattern).expect("should find files");
    let files: Vec<PathBuf> = files.into_iter().map(|p| p.strip_prefix(base).unwrap().to_path_buf()).collect();
    assert_eq!(files, vec![PathBuf::from("input/a.txt"), PathBuf::from("input/wuxia/b.txt")]);
}

#[test]
fn enumerate_manuscripts_empty_returns_error_with_guidance() {
    let td = tempfile::tempdir().unwrap();
    let pattern = format!("{}/input/**/*.txt", td.path().display());
    let err = enumerate_manuscripts(&pattern).err().expect("should be error");
    assert_eq!(format!("{}", err), "NoFilesFound");
}
