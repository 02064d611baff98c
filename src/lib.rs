pub mod capture;
pub mod error;
pub mod folder;
pub mod geometry;
pub mod gui;
pub mod launch;
pub mod logging;
pub mod reveal;
pub mod settings;
pub mod shortcut;
pub mod stacks;
