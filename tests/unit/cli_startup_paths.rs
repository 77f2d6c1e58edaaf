use std::path::{Path, PathBuf};

#[test]
fn resolve_target_joins_relative_root_to_cwd() {
    let target = super::resolve_target(Path::new("/work"), "logs", "error");
    assert_eq!(target.root, PathBuf::from("/work/logs"));
    assert_eq!(target.keyword, "error");
}

#[test]
fn resolve_target_keeps_absolute_root() {
    let target = super::resolve_target(Path::new("/work"), "/var/log", "error");
    assert_eq!(target.root, PathBuf::from("/var/log"));
}

#[test]
fn resolve_target_strips_drop_wrappers() {
    let target = super::resolve_target(Path::new("/work"), "{/home/me/My Logs}", "x");
    assert_eq!(target.root, PathBuf::from("/home/me/My Logs"));

    let target = super::resolve_target(Path::new("/work"), "\"old logs\"", "x");
    assert_eq!(target.root, PathBuf::from("/work/old logs"));
}

#[test]
fn resolve_target_trims_keyword() {
    let target = super::resolve_target(Path::new("/work"), "/var/log", "  timeout \n");
    assert_eq!(target.keyword, "timeout");

    let target = super::resolve_target(Path::new("/work"), "/var/log", "   ");
    assert!(target.keyword.is_empty());
}
