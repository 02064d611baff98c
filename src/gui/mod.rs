mod bubble;
mod confirmation_modal;
mod stack_editor;

pub use bubble::{run_bubble, BubbleApp, BubbleView};
pub use confirmation_modal::{ConfirmationModal, ConfirmationResult};
pub use stack_editor::{EditorAction, StackEditor};

use crate::reveal::{IdleQueue, IdleTask};
use crate::settings::Settings;
use crate::stacks::{StackConfiguration, StackStore};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

/// Main window: the list of stacks plus the editor and bubble previews.
pub struct StacksApp {
    store: StackStore,
    stacks: Vec<StackConfiguration>,
    editor: Option<StackEditor>,
    bubble: Option<BubbleView>,
    idle: IdleQueue,
    delete_modal: ConfirmationModal,
    pending_delete: Option<u32>,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
}

impl StacksApp {
    pub fn new(store: StackStore, settings: &Settings, notice: Option<String>) -> Self {
        let mut app = Self {
            store,
            stacks: Vec::new(),
            editor: None,
            bubble: None,
            idle: IdleQueue::default(),
            delete_modal: ConfirmationModal::default(),
            pending_delete: None,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
        };
        app.reload();
        if let Some(notice) = notice {
            app.notify(ToastKind::Error, notice);
        }
        app
    }

    fn reload(&mut self) {
        match self.store.load_all() {
            Ok(stacks) => self.stacks = stacks,
            Err(err) => {
                tracing::error!(error = %err, "failed to load stacks");
                self.notify(ToastKind::Error, format!("Failed to load stacks: {err}"));
            }
        }
    }

    fn notify(&mut self, kind: ToastKind, text: String) {
        match kind {
            ToastKind::Error => tracing::error!("{text}"),
            _ => tracing::info!("{text}"),
        }
        if !self.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    fn open_bubble(&mut self, ctx: &egui::Context, stack: &StackConfiguration) {
        match BubbleView::new(stack) {
            Ok(view) => {
                self.bubble = Some(view);
                ctx.request_repaint();
            }
            Err(err) => self.notify(ToastKind::Error, format!("Cannot open bubble: {err}")),
        }
    }

    fn save_stack(&mut self, mut stack: StackConfiguration) -> bool {
        match self.store.save(&mut stack) {
            Ok(_) => {
                self.notify(ToastKind::Success, format!("Saved '{}'", stack.display_name()));
                self.reload();
                true
            }
            Err(err) => {
                self.notify(ToastKind::Error, format!("Failed to save stack: {err}"));
                false
            }
        }
    }

    fn delete_stack(&mut self, id: u32) {
        match self.store.delete(id) {
            Ok(_) => self.reload(),
            Err(err) => self.notify(ToastKind::Error, format!("Failed to delete stack: {err}")),
        }
    }

    fn run_idle_tasks(&mut self, ctx: &egui::Context) {
        let tasks: Vec<IdleTask> = self.idle.drain().collect();
        for task in tasks {
            match task {
                IdleTask::ActivatePrimaryWindow => {
                    ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Focus);
                }
            }
        }
    }

    fn stack_list(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut open = None;
        let mut edit = None;
        let mut delete = None;
        if self.stacks.is_empty() {
            ui.label("No stacks yet.");
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("stack_list")
                .num_columns(4)
                .striped(true)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for stack in &self.stacks {
                        ui.label(stack.display_name());
                        ui.label(&stack.target_folder)
                            .on_hover_text(format!("{:.0}, {:.0}", stack.x, stack.y));
                        ui.label(stack.direction.to_string());
                        ui.horizontal(|ui| {
                            if ui.button("Open").clicked() {
                                open = Some(stack.clone());
                            }
                            if ui.button("Edit").clicked() {
                                edit = Some(stack.clone());
                            }
                            if ui.button("Delete").clicked() {
                                delete = Some((stack.id, stack.display_name()));
                            }
                        });
                        ui.end_row();
                    }
                });
        });
        if let Some(stack) = open {
            self.open_bubble(ctx, &stack);
        }
        if let Some(stack) = edit {
            self.replace_editor(StackEditor::edit(stack));
        }
        if let Some((id, name)) = delete {
            self.pending_delete = Some(id);
            self.delete_modal.open_for(&format!("Delete stack '{name}'"));
        }
    }

    fn replace_editor(&mut self, editor: StackEditor) {
        if let Some(mut old) = self.editor.take() {
            old.unload();
        }
        self.editor = Some(editor);
    }

    fn editor_ui(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let action = editor.ui(ctx);
        let notices = editor.take_notices();
        for (kind, text) in notices {
            self.notify(kind, text);
        }
        match action {
            EditorAction::None => {}
            EditorAction::Save(stack) => {
                if self.save_stack(stack) {
                    self.editor = None;
                }
            }
            EditorAction::OpenBubble(stack) => self.open_bubble(ctx, &stack),
            EditorAction::Close => self.editor = None,
        }
    }

    fn bubble_ui(&mut self, ctx: &egui::Context) {
        let Some(view) = self.bubble.as_mut() else {
            return;
        };
        bubble::show_child_bubble(ctx, view, &mut self.idle);
        let errors = view.take_errors();
        let closed = view.is_closed();
        for err in errors {
            self.notify(ToastKind::Error, err);
        }
        if closed {
            self.bubble = None;
            // Idle tasks run on the next frame.
            ctx.request_repaint();
        }
    }
}

impl eframe::App for StacksApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_idle_tasks(ctx);

        egui::TopBottomPanel::top("stacks_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Stacks");
                if ui.button("New stack").clicked() {
                    self.replace_editor(StackEditor::new_stack());
                }
                if ui.button("Reload").clicked() {
                    self.reload();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.stack_list(ui, ctx);
        });

        match self.delete_modal.ui(ctx) {
            ConfirmationResult::Confirmed => {
                if let Some(id) = self.pending_delete.take() {
                    self.delete_stack(id);
                }
            }
            ConfirmationResult::Cancelled => self.pending_delete = None,
            ConfirmationResult::None => {}
        }

        self.editor_ui(ctx);
        self.bubble_ui(ctx);
        self.toasts.show(ctx);
    }
}

/// Run the main window.
pub fn run_main_surface(store: StackStore, settings: Settings, notice: Option<String>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Air Folder")
            .with_inner_size([640.0, 420.0])
            .with_min_inner_size([420.0, 260.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Air Folder",
        options,
        Box::new(move |_cc| Box::new(StacksApp::new(store, &settings, notice))),
    )
    .map_err(|e| anyhow::anyhow!("main window failed: {e}"))
}
