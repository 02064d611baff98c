use air_folder::shortcut::{
    resolve_shortcut_path, shortcut_arguments, shortcut_file_name, ConflictPolicy,
};
use tempfile::tempdir;

#[test]
fn invalid_characters_are_replaced() {
    assert_eq!(shortcut_file_name("Work: 2024/Q1?"), "Work_ 2024_Q1_");
    assert_eq!(shortcut_file_name("   "), "Stack");
    assert_eq!(shortcut_file_name("Docs"), "Docs");
}

#[test]
fn arguments_quote_the_folder() {
    assert_eq!(
        shortcut_arguments("C:\\My Docs\\"),
        "--open-stack \"C:\\My Docs\""
    );
}

#[test]
fn conflicts_follow_the_policy() {
    let dir = tempdir().unwrap();
    let first = resolve_shortcut_path(dir.path(), "Docs", ConflictPolicy::KeepBoth);
    assert_eq!(first, dir.path().join("Docs.lnk"));

    std::fs::write(&first, "").unwrap();
    assert_eq!(
        resolve_shortcut_path(dir.path(), "Docs", ConflictPolicy::Replace),
        first
    );
    let second = resolve_shortcut_path(dir.path(), "Docs", ConflictPolicy::KeepBoth);
    assert_eq!(second, dir.path().join("Docs (2).lnk"));

    std::fs::write(&second, "").unwrap();
    assert_eq!(
        resolve_shortcut_path(dir.path(), "Docs", ConflictPolicy::KeepBoth),
        dir.path().join("Docs (3).lnk")
    );
}
