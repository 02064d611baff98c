//! Command-line launch handling.

use crate::error::LaunchError;
use crate::stacks::{StackConfiguration, StackStore};
use clap::Parser;

pub const OPEN_STACK_FLAG: &str = "--open-stack";

#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = "air_folder", version, about = "Quick-access folder bubbles")]
pub struct LaunchArgs {
    /// Show only the bubble of the stack whose target folder is PATH.
    #[arg(long = "open-stack", value_name = "PATH")]
    pub open_stack: Option<String>,
}

impl LaunchArgs {
    /// Parse the process arguments. Unknown arguments are logged and ignored
    /// so a stale shortcut still opens the main window.
    pub fn from_env() -> Self {
        Self::parse_from_iter(std::env::args_os())
    }

    pub fn parse_from_iter<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(args) => args,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unrecognised launch arguments");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchPlan {
    /// Run only the bubble for this stack.
    Bubble(StackConfiguration),
    /// Show the main window, optionally with an error notice.
    MainSurface { notice: Option<String> },
}

fn lookup(folder: &str, store: &StackStore) -> Result<StackConfiguration, LaunchError> {
    store
        .find_by_folder(folder)?
        .ok_or_else(|| LaunchError::StackLookupFailed(folder.to_string()))
}

pub fn resolve_launch(args: &LaunchArgs, store: &StackStore) -> LaunchPlan {
    let Some(folder) = args.open_stack.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
        return LaunchPlan::MainSurface { notice: None };
    };
    match lookup(folder, store) {
        Ok(stack) => {
            tracing::info!(id = stack.id, folder, "launching bubble only");
            LaunchPlan::Bubble(stack)
        }
        Err(err) => {
            tracing::warn!(error = %err, "falling back to main window");
            LaunchPlan::MainSurface {
                notice: Some(err.to_string()),
            }
        }
    }
}
