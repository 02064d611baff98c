use air_folder::folder::list_visible_files;
use tempfile::tempdir;

#[test]
fn lists_files_sorted_without_extensions() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("beta.txt"), "").unwrap();
    std::fs::write(dir.path().join("Alpha.pdf"), "").unwrap();
    std::fs::write(dir.path().join("gamma"), "").unwrap();
    std::fs::create_dir(dir.path().join("subdir")).unwrap();

    let items = list_visible_files(dir.path()).unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    assert_eq!(items[1].path, dir.path().join("beta.txt"));
}

#[cfg(not(windows))]
#[test]
fn dot_files_are_hidden() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".secret"), "").unwrap();
    std::fs::write(dir.path().join("shown.md"), "").unwrap();

    let items = list_visible_files(dir.path()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "shown");
}

#[test]
fn missing_folder_is_empty() {
    let dir = tempdir().unwrap();
    let items = list_visible_files(&dir.path().join("gone")).unwrap();
    assert!(items.is_empty());
}
