use air_folder::geometry::Direction;
use air_folder::launch::{resolve_launch, LaunchArgs, LaunchPlan};
use air_folder::stacks::{StackConfiguration, StackStore};
use tempfile::tempdir;

fn store_with_docs() -> (tempfile::TempDir, StackStore) {
    let dir = tempdir().unwrap();
    let store = StackStore::new(dir.path());
    let mut docs = StackConfiguration {
        id: 0,
        name: "Docs".into(),
        target_folder: "C:\\Docs".into(),
        icon_path: None,
        x: 40.0,
        y: 60.0,
        direction: Direction::Down,
    };
    store.save(&mut docs).unwrap();
    (dir, store)
}

#[test]
fn no_argument_shows_main_surface() {
    let (_dir, store) = store_with_docs();
    let args = LaunchArgs::parse_from_iter(["air_folder"]);
    assert_eq!(
        resolve_launch(&args, &store),
        LaunchPlan::MainSurface { notice: None }
    );
}

#[test]
fn matching_folder_launches_only_the_bubble() {
    let (_dir, store) = store_with_docs();
    let args = LaunchArgs::parse_from_iter(["air_folder", "--open-stack", "c:\\docs\\"]);
    match resolve_launch(&args, &store) {
        LaunchPlan::Bubble(stack) => {
            assert_eq!(stack.name, "Docs");
            assert_eq!(stack.direction, Direction::Down);
            assert_eq!((stack.x, stack.y), (40.0, 60.0));
        }
        other => panic!("expected bubble, got {other:?}"),
    }
}

#[test]
fn unknown_folder_falls_back_with_notice() {
    let (_dir, store) = store_with_docs();
    let args = LaunchArgs::parse_from_iter(["air_folder", "--open-stack", "D:\\Nowhere"]);
    match resolve_launch(&args, &store) {
        LaunchPlan::MainSurface { notice: Some(text) } => assert!(text.contains("D:\\Nowhere")),
        other => panic!("expected main surface notice, got {other:?}"),
    }
}

#[test]
fn unrecognised_arguments_are_ignored() {
    let args = LaunchArgs::parse_from_iter(["air_folder", "--bogus"]);
    assert_eq!(args, LaunchArgs::default());
}
