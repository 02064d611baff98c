use crate::capture::{LiveAnchor, PickOutcome, PositionPicker, UiWaker};
use crate::geometry::{Anchor, Direction};
use crate::shortcut::{self, ConflictPolicy};
use crate::stacks::{folder_display_name, StackConfiguration};
use eframe::egui;
use egui_toast::ToastKind;
use std::path::PathBuf;
use std::sync::Arc;

/// What the hosting window should do after a frame of the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    None,
    Save(StackConfiguration),
    OpenBubble(StackConfiguration),
    Close,
}

/// Shortcut waiting for the user to resolve a name clash.
#[derive(Debug, Clone)]
struct PendingShortcut {
    dir: PathBuf,
    file_name: String,
}

/// Editor for a single stack. The anchor lives in a [`LiveAnchor`] so a
/// running pick can update it from the capture events.
pub struct StackEditor {
    draft: StackConfiguration,
    anchor: LiveAnchor,
    picker: Option<PositionPicker>,
    pending_shortcut: Option<PendingShortcut>,
    notices: Vec<(ToastKind, String)>,
}

impl StackEditor {
    pub fn new_stack() -> Self {
        Self::edit(StackConfiguration::default())
    }

    pub fn edit(stack: StackConfiguration) -> Self {
        let anchor = LiveAnchor::new(stack.anchor());
        Self {
            draft: stack,
            anchor,
            picker: None,
            pending_shortcut: None,
            notices: Vec::new(),
        }
    }

    /// Draft including the current anchor value.
    pub fn current(&self) -> StackConfiguration {
        let mut stack = self.draft.clone();
        stack.set_anchor(self.anchor.get());
        stack
    }

    pub fn is_picking(&self) -> bool {
        self.picker.as_ref().map(PositionPicker::is_picking).unwrap_or(false)
    }

    pub fn take_notices(&mut self) -> Vec<(ToastKind, String)> {
        std::mem::take(&mut self.notices)
    }

    /// Release the capture hooks and overlay, rolling back a running pick.
    pub fn unload(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.unload();
        }
    }

    /// Update the target folder, carrying the name along when it still
    /// mirrors the old folder.
    pub fn set_target_folder(&mut self, folder: String) {
        let previous = folder_display_name(&self.draft.target_folder);
        if self.draft.name.trim().is_empty() || self.draft.name == previous {
            self.draft.name = folder_display_name(&folder);
        }
        self.draft.target_folder = folder;
    }

    fn begin_pick(&mut self, ctx: &egui::Context) {
        let repaint = ctx.clone();
        let waker: UiWaker = Arc::new(move || repaint.request_repaint());
        let picker = self.picker.get_or_insert_with(PositionPicker::default);
        if let Err(err) = picker.begin_pick(&self.anchor, Some(waker)) {
            self.notices
                .push((ToastKind::Error, format!("Cannot pick a position: {err}")));
        }
    }

    fn pump_picker(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match picker.pump() {
            Some(PickOutcome::Confirmed(anchor)) => self.notices.push((
                ToastKind::Success,
                format!("Position set to {:.0}, {:.0}", anchor.x, anchor.y),
            )),
            Some(PickOutcome::Cancelled(_)) => {
                self.notices
                    .push((ToastKind::Info, "Position pick cancelled".into()));
            }
            Some(PickOutcome::Aborted(_)) => {
                self.notices
                    .push((ToastKind::Warning, "Position pick was interrupted".into()));
            }
            None => {}
        }
    }

    fn create_shortcut(&mut self, dir: Option<PathBuf>, policy: Option<ConflictPolicy>) {
        let Some(dir) = dir else {
            self.notices
                .push((ToastKind::Error, "Shortcut folder not found".into()));
            return;
        };
        let stack = self.current();
        let name = stack.display_name();
        let policy = match policy {
            Some(policy) => policy,
            None if shortcut::shortcut_exists(&dir, &name) => {
                self.pending_shortcut = Some(PendingShortcut {
                    dir,
                    file_name: shortcut::shortcut_file_name(&name),
                });
                return;
            }
            None => ConflictPolicy::Replace,
        };
        match shortcut::create_shortcut(&stack, &dir, policy) {
            Ok(path) => self.notices.push((
                ToastKind::Success,
                format!("Shortcut created: {}", path.display()),
            )),
            Err(err) => {
                tracing::error!(error = %err, "shortcut creation failed");
                self.notices
                    .push((ToastKind::Error, format!("Failed to create shortcut: {err}")));
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> EditorAction {
        self.pump_picker();

        let mut action = EditorAction::None;
        let mut open = true;
        let picking = self.is_picking();
        let title = if self.draft.id == 0 {
            "New stack".to_string()
        } else {
            format!("Stack {}", self.draft.id)
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("stack_editor_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name");
                        ui.text_edit_singleline(&mut self.draft.name);
                        ui.end_row();

                        ui.label("Folder");
                        ui.horizontal(|ui| {
                            let mut folder = self.draft.target_folder.clone();
                            if ui.text_edit_singleline(&mut folder).changed() {
                                self.set_target_folder(folder);
                            }
                            #[cfg(target_os = "windows")]
                            if ui.button("Browse").clicked() {
                                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                                    self.set_target_folder(dir.display().to_string());
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Icon");
                        ui.horizontal(|ui| {
                            let mut icon = self.draft.icon_path.clone().unwrap_or_default();
                            if ui.text_edit_singleline(&mut icon).changed() {
                                self.draft.icon_path =
                                    Some(icon).filter(|p| !p.trim().is_empty());
                            }
                            #[cfg(target_os = "windows")]
                            if ui.button("Browse").clicked() {
                                if let Some(file) = rfd::FileDialog::new()
                                    .add_filter("Icons", &["ico", "png"])
                                    .pick_file()
                                {
                                    self.draft.icon_path = Some(file.display().to_string());
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Direction");
                        egui::ComboBox::from_id_source("stack_direction")
                            .selected_text(self.draft.direction.to_string())
                            .show_ui(ui, |ui| {
                                for dir in Direction::ALL {
                                    ui.selectable_value(
                                        &mut self.draft.direction,
                                        dir,
                                        dir.to_string(),
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label("Position");
                        ui.horizontal(|ui| {
                            let Anchor { mut x, mut y } = self.anchor.get();
                            let changed = ui
                                .add_enabled(!picking, egui::DragValue::new(&mut x).prefix("x: "))
                                .changed()
                                | ui.add_enabled(!picking, egui::DragValue::new(&mut y).prefix("y: "))
                                    .changed();
                            if changed {
                                self.anchor.set(Anchor::new(x, y));
                            }
                            if picking {
                                ui.label("Click to place, Esc to cancel");
                            } else if ui.button("Pick on screen").clicked() {
                                self.begin_pick(ctx);
                            }
                        });
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Open bubble").clicked() {
                        action = EditorAction::OpenBubble(self.current());
                    }
                    if ui.button("Desktop shortcut").clicked() {
                        self.create_shortcut(shortcut::desktop_dir(), None);
                    }
                    if ui.button("Program folder shortcut").clicked() {
                        self.create_shortcut(shortcut::program_dir(), None);
                    }
                });

                if let Some(pending) = self.pending_shortcut.clone() {
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("A shortcut named '{}' already exists.", pending.file_name),
                    );
                    ui.horizontal(|ui| {
                        if ui.button("Replace").clicked() {
                            self.pending_shortcut = None;
                            self.create_shortcut(Some(pending.dir.clone()), Some(ConflictPolicy::Replace));
                        }
                        if ui.button("Keep both").clicked() {
                            self.pending_shortcut = None;
                            self.create_shortcut(Some(pending.dir.clone()), Some(ConflictPolicy::KeepBoth));
                        }
                        if ui.button("Cancel").clicked() {
                            self.pending_shortcut = None;
                        }
                    });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.add_enabled(!picking, egui::Button::new("Save")).clicked() {
                        if self.draft.target_folder.trim().is_empty() {
                            self.notices
                                .push((ToastKind::Error, "Choose a folder first".into()));
                        } else {
                            action = EditorAction::Save(self.current());
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        action = EditorAction::Close;
                    }
                });
            });

        if !open {
            action = EditorAction::Close;
        }
        if action == EditorAction::Close {
            self.unload();
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_change_updates_mirrored_name() {
        let mut editor = StackEditor::edit(StackConfiguration {
            name: "Docs".into(),
            target_folder: "C:\\Docs".into(),
            ..StackConfiguration::default()
        });
        editor.set_target_folder("C:\\Work\\Reports".into());
        assert_eq!(editor.current().name, "Reports");
    }

    #[test]
    fn custom_name_survives_folder_change() {
        let mut editor = StackEditor::edit(StackConfiguration {
            name: "My files".into(),
            target_folder: "C:\\Docs".into(),
            ..StackConfiguration::default()
        });
        editor.set_target_folder("C:\\Other".into());
        assert_eq!(editor.current().name, "My files");
    }

    #[test]
    fn current_includes_live_anchor() {
        let editor = StackEditor::edit(StackConfiguration::default());
        editor.anchor.set(Anchor::new(150.0, 300.0));
        let stack = editor.current();
        assert_eq!((stack.x, stack.y), (150.0, 300.0));
    }
}
