use air_folder::gui::{run_bubble, run_main_surface};
use air_folder::launch::{resolve_launch, LaunchArgs, LaunchPlan};
use air_folder::logging;
use air_folder::settings::{Settings, SETTINGS_FILE};
use air_folder::stacks::StackStore;

fn main() -> anyhow::Result<()> {
    let settings = match Settings::load(SETTINGS_FILE) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("failed to read {SETTINGS_FILE}: {err}; using defaults");
            Settings::default()
        }
    };
    logging::init(settings.debug_logging, settings.log_file_path());

    let args = LaunchArgs::from_env();
    let store = StackStore::new(settings.stacks_root());
    tracing::info!(root = %store.root().display(), "starting");

    match resolve_launch(&args, &store) {
        LaunchPlan::Bubble(stack) => match run_bubble(&stack) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(error = %err, "bubble-only launch failed");
                run_main_surface(store, settings, Some(err.to_string()))
            }
        },
        LaunchPlan::MainSurface { notice } => run_main_surface(store, settings, notice),
    }
}
