use air_folder::geometry::Direction;
use air_folder::stacks::{StackConfiguration, StackStore};
use tempfile::tempdir;

fn stack(folder: &str) -> StackConfiguration {
    StackConfiguration {
        id: 0,
        name: "Docs".into(),
        target_folder: folder.into(),
        icon_path: None,
        x: 150.0,
        y: 300.0,
        direction: Direction::Up,
    }
}

#[test]
fn empty_or_missing_root_loads_nothing() {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path().join("Stacks"));
    assert!(store.load_all().unwrap().is_empty());
    assert_eq!(store.next_id().unwrap(), 1);
}

#[test]
fn save_assigns_increasing_ids_and_round_trips() {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path().join("Stacks"));

    let mut first = stack("C:\\Docs");
    let path = store.save(&mut first).unwrap();
    assert_eq!(first.id, 1);
    assert!(path.ends_with("Stack 1.json"));

    let mut second = stack("C:\\Work");
    store.save(&mut second).unwrap();
    assert_eq!(second.id, 2);

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![first, second]);
}

#[test]
fn next_id_follows_highest_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Stack 7.json"), "{}").unwrap();
    std::fs::write(dir.path().join("Stack 3.json"), "{}").unwrap();
    let store = StackStore::new(dir.path());
    assert_eq!(store.next_id().unwrap(), 8);
}

#[test]
fn unreadable_files_are_skipped_and_result_is_sorted() {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path());
    std::fs::write(dir.path().join("Stack 2.json"), "not json").unwrap();
    std::fs::write(
        dir.path().join("Stack 10.json"),
        r#"{"name":"B","target_folder":"D:\\B"}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Stack 4.json"),
        r#"{"name":"A","target_folder":"D:\\A","direction":"left"}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

    let stacks = store.load_all().unwrap();
    let ids: Vec<u32> = stacks.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![4, 10]);
    assert_eq!(stacks[0].direction, Direction::Left);
    assert_eq!(stacks[1].direction, Direction::Right);
}

#[test]
fn delete_removes_only_that_stack() {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path());
    let mut a = stack("C:\\A");
    let mut b = stack("C:\\B");
    store.save(&mut a).unwrap();
    store.save(&mut b).unwrap();

    assert!(store.delete(a.id).unwrap());
    assert!(!store.delete(a.id).unwrap());
    let left: Vec<u32> = store.load_all().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(left, vec![b.id]);
}

#[test]
fn find_by_folder_ignores_case_and_trailing_separator() {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path());
    let mut docs = stack("C:\\Users\\Me\\Docs");
    store.save(&mut docs).unwrap();

    let found = store.find_by_folder("c:\\users\\me\\docs\\").unwrap();
    assert_eq!(found.map(|s| s.id), Some(docs.id));
    assert!(store.find_by_folder("C:\\Users\\Me").unwrap().is_none());
}
