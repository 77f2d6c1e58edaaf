use super::*;
use std::fs;
use tempfile::tempdir;

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_directory_yields_only_candidates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.LOG"), "a").unwrap();
    fs::write(dir.path().join("app.bin"), "b").unwrap();
    fs::write(dir.path().join("logcat.001"), "c").unwrap();

    let found: Vec<PathBuf> = PathScanner::new(dir.path(), FileFilter::default())
        .unwrap()
        .collect();

    assert_eq!(names(&found), vec!["app.LOG", "logcat.001"]);
}

#[test]
fn test_single_file_bypasses_filter() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("dump.bin");
    fs::write(&file, "data").unwrap();

    let found: Vec<PathBuf> = PathScanner::new(&file, FileFilter::default())
        .unwrap()
        .collect();

    assert_eq!(found, vec![file]);
}

#[test]
fn test_recurses_in_stable_order() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("b/nested")).unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("b/nested/z.log"), "").unwrap();
    fs::write(dir.path().join("b/y.txt"), "").unwrap();
    fs::write(dir.path().join("a/x.log"), "").unwrap();
    fs::write(dir.path().join("root.log"), "").unwrap();
    fs::write(dir.path().join(".hidden.log"), "").unwrap();

    let first: Vec<PathBuf> = PathScanner::new(dir.path(), FileFilter::default())
        .unwrap()
        .collect();
    let second: Vec<PathBuf> = PathScanner::new(dir.path(), FileFilter::default())
        .unwrap()
        .collect();

    assert_eq!(first, second);
    assert_eq!(
        names(&first),
        vec![".hidden.log", "x.log", "z.log", "y.txt", "root.log"]
    );
}

#[test]
fn test_missing_root_is_invalid_target() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = PathScanner::new(&missing, FileFilter::default()).err().unwrap();
    assert!(matches!(err, SearchError::InvalidTarget(p) if p == missing));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.log"), "").unwrap();
    fs::write(dir.path().join("visible.log"), "").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe then.
    let readable_anyway = fs::read_dir(&locked).is_ok();
    let found: Vec<PathBuf> = PathScanner::new(dir.path(), FileFilter::default())
        .unwrap()
        .collect();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if readable_anyway {
        return;
    }
    assert_eq!(names(&found), vec!["visible.log"]);
}
