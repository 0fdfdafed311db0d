use std::path::PathBuf;

use super::*;

#[test]
fn creates_missing_parents() {
    let dir = PathBuf::from("target").join("fs-tests").join("nested").join("deeper");
    let _ = std::fs::remove_dir_all(&dir);
    ensure_parent_dir(&dir.join("out.json")).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn bare_file_name_needs_no_directory() {
    ensure_parent_dir(Path::new("out.json")).unwrap();
}
