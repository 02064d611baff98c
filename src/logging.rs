use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging. With `debug` enabled the default level is `debug` and
/// `RUST_LOG` may override it; otherwise the level is forced to `info`.
/// When `log_file` is given the output is appended to that file instead of
/// stderr.
///
/// Returns `false` when a global subscriber was already installed; nothing
/// is changed and no log file is created in that case.
pub fn init(debug: bool, log_file: Option<PathBuf>) -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }

    // Forcing `info` when debug logging is off keeps a stray `RUST_LOG` in the
    // user's environment from producing verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "air_folder.log".into());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .is_ok();
            if installed {
                let _ = FILE_GUARD.set(guard);
            }
            installed
        }
        None => builder.try_init().is_ok(),
    }
}
