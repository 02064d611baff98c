//! egui host for the reveal engine: one borderless, transparent viewport per
//! open bubble.

use crate::folder::{list_visible_files, ItemOpener, SystemOpener};
use crate::geometry::Size;
use crate::reveal::animation::scaled_content_rect;
use crate::reveal::layout::EMPTY_PLACEHOLDER;
use crate::reveal::{
    BubbleFrame, BubbleLayout, BubbleViewport, CloseTrigger, IdleQueue, IdleTask, RevealEngine,
    RevealState, TriggerDetector,
};
use crate::stacks::StackConfiguration;
use eframe::egui;
use std::path::Path;
use std::time::Instant;

const BUBBLE_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(30, 32, 38, 235);
const BUBBLE_TEXT: egui::Color32 = egui::Color32::from_gray(225);
const BUBBLE_ROUNDING: f32 = 8.0;

/// Per-viewport state the engine drives through [`BubbleViewport`].
#[derive(Debug, Default)]
struct ViewportGlue {
    intercept_close: bool,
    destroyed: bool,
    /// A root viewport is closed with a command; a child viewport is closed
    /// by no longer showing it.
    is_root: bool,
    last_applied: Option<(egui::Pos2, egui::Vec2)>,
}

struct EguiViewport<'a> {
    ctx: &'a egui::Context,
    glue: &'a mut ViewportGlue,
}

impl BubbleViewport for EguiViewport<'_> {
    fn apply_frame(&mut self, frame: &BubbleFrame) {
        let ppp = self.ctx.pixels_per_point();
        let pos = egui::pos2(frame.rect.left as f32 / ppp, frame.rect.top as f32 / ppp);
        // Platform windows cannot be zero-sized.
        let size = egui::vec2(
            (frame.rect.width as f32 / ppp).max(1.0),
            (frame.rect.height as f32 / ppp).max(1.0),
        );
        if self.glue.last_applied == Some((pos, size)) {
            return;
        }
        self.glue.last_applied = Some((pos, size));
        self.ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
        self.ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
    }

    fn set_close_interception(&mut self, intercept: bool) {
        self.glue.intercept_close = intercept;
    }

    fn destroy(&mut self) {
        self.glue.destroyed = true;
        if self.glue.is_root {
            self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

pub struct BubbleView {
    stack_id: u32,
    title: String,
    engine: RevealEngine,
    detector: TriggerDetector,
    glue: ViewportGlue,
    layout: BubbleLayout,
    opener: Box<dyn ItemOpener>,
    /// Measured content size in points.
    content_size: Option<egui::Vec2>,
    errors: Vec<String>,
}

impl BubbleView {
    pub fn new(stack: &StackConfiguration) -> anyhow::Result<Self> {
        let items = list_visible_files(Path::new(&stack.target_folder))?;
        tracing::debug!(id = stack.id, items = items.len(), "preparing bubble");
        Ok(Self {
            stack_id: stack.id,
            title: stack.display_name(),
            engine: RevealEngine::new(stack.anchor(), stack.direction, items),
            detector: TriggerDetector::default(),
            glue: ViewportGlue::default(),
            layout: BubbleLayout::default(),
            opener: Box::new(SystemOpener),
            content_size: None,
            errors: Vec::new(),
        })
    }

    /// Mark the view as the application's only viewport.
    pub fn as_root(mut self) -> Self {
        self.glue.is_root = true;
        self
    }

    pub fn viewport_id(&self) -> egui::ViewportId {
        egui::ViewportId::from_hash_of(("air_folder_bubble", self.stack_id))
    }

    /// Initial window: a borderless, transparent 1x1 point at the anchor. The
    /// engine sizes and moves it once the content has been measured.
    pub fn builder(&self, pixels_per_point: f32) -> egui::ViewportBuilder {
        let anchor = self.engine.anchor();
        egui::ViewportBuilder::default()
            .with_title(self.title.clone())
            .with_position([anchor.x as f32 / pixels_per_point, anchor.y as f32 / pixels_per_point])
            .with_inner_size([1.0, 1.0])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false)
            .with_resizable(false)
    }

    pub fn is_closed(&self) -> bool {
        self.glue.destroyed || self.engine.state() == RevealState::Closed
    }

    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Close the bubble as if the user had asked the window to close.
    pub fn request_close(&mut self, ctx: &egui::Context) {
        let mut vp = EguiViewport {
            ctx,
            glue: &mut self.glue,
        };
        self.engine
            .request_close(CloseTrigger::CloseRequested, Instant::now(), &mut vp);
        ctx.request_repaint();
    }

    /// Draw one frame and advance the animation. `ctx` must be the bubble
    /// viewport's context.
    pub fn ui(&mut self, ctx: &egui::Context, idle: &mut IdleQueue) {
        if self.is_closed() {
            return;
        }
        let now = Instant::now();

        if self.engine.placement().is_none() {
            let size = self.measure(ctx);
            let ppp = ctx.pixels_per_point() as f64;
            self.content_size = Some(size);
            let mut vp = EguiViewport {
                ctx,
                glue: &mut self.glue,
            };
            self.engine.begin(
                Size::new(size.x as f64 * ppp, size.y as f64 * ppp),
                now,
                &mut vp,
            );
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }

        let close_requested = ctx.input(|i| i.viewport().close_requested());
        if close_requested && self.glue.intercept_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            let mut vp = EguiViewport {
                ctx,
                glue: &mut self.glue,
            };
            self.engine
                .request_close(CloseTrigger::CloseRequested, now, &mut vp);
        }

        let (focused, pointer_inside) =
            ctx.input(|i| (i.viewport().focused, i.pointer.hover_pos().is_some()));
        if let Some(trigger) = self.detector.observe(focused, pointer_inside) {
            let mut vp = EguiViewport {
                ctx,
                glue: &mut self.glue,
            };
            self.engine.request_close(trigger, now, &mut vp);
        }

        if let Some(index) = self.paint(ctx) {
            let mut vp = EguiViewport {
                ctx,
                glue: &mut self.glue,
            };
            if let Err(err) = self
                .engine
                .open_item(index, self.opener.as_ref(), now, &mut vp)
            {
                self.errors.push(err.to_string());
            }
        }

        let mut vp = EguiViewport {
            ctx,
            glue: &mut self.glue,
        };
        self.engine.tick(now, &mut vp, idle);
        if self.engine.is_animating() {
            ctx.request_repaint();
        }
    }

    fn measure(&self, ctx: &egui::Context) -> egui::Vec2 {
        let font = egui::TextStyle::Button.resolve(&ctx.style());
        let button_padding = ctx.style().spacing.button_padding.x as f64 * 2.0;
        let (widths, placeholder) = ctx.fonts(|fonts| {
            let width_of = |text: &str| {
                fonts
                    .layout_no_wrap(text.to_owned(), font.clone(), BUBBLE_TEXT)
                    .size()
                    .x as f64
            };
            let widths: Vec<f64> = self
                .engine
                .items()
                .iter()
                .map(|item| width_of(&item.name) + button_padding)
                .collect();
            (widths, width_of(EMPTY_PLACEHOLDER))
        });
        let size = self.layout.measure(&widths, placeholder);
        egui::vec2(size.width as f32, size.height as f32)
    }

    /// Paint background and items; returns the index of a clicked item.
    fn paint(&self, ctx: &egui::Context) -> Option<usize> {
        let frame = *self.engine.frame();
        let opacity = frame.opacity.clamp(0.0, 1.0) as f32;
        let origin = self
            .engine
            .placement()
            .map(|p| p.scale_origin)
            .unwrap_or((0.0, 0.5));
        let content = self.content_size?;
        let mut clicked = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let window = ui.max_rect();
                ui.painter().rect_filled(
                    window,
                    BUBBLE_ROUNDING,
                    BUBBLE_FILL.gamma_multiply(opacity),
                );

                // Keep the content's scale origin on the same unit point of
                // the window, then clip to the scaled rectangle.
                let offset = egui::vec2(
                    (window.width() - content.x) * origin.0 as f32,
                    (window.height() - content.y) * origin.1 as f32,
                );
                let content_rect =
                    egui::Rect::from_min_size(window.min + offset, content);
                let scaled = scaled_content_rect(content.x as f64, content.y as f64, &frame, origin);
                let visible = egui::Rect::from_min_size(
                    content_rect.min + egui::vec2(scaled.left as f32, scaled.top as f32),
                    egui::vec2(scaled.width as f32, scaled.height as f32),
                )
                .intersect(window);

                let padding = self.layout.padding as f32;
                let inner = content_rect.shrink(padding);
                let text_color = BUBBLE_TEXT.gamma_multiply(opacity);
                ui.allocate_ui_at_rect(inner, |ui| {
                    ui.set_clip_rect(visible);
                    ui.spacing_mut().item_spacing.y = self.layout.row_spacing as f32;
                    let row = egui::vec2(inner.width(), self.layout.row_height as f32);
                    let items = self.engine.items();
                    if items.is_empty() {
                        ui.add_sized(
                            row,
                            egui::Label::new(
                                egui::RichText::new(EMPTY_PLACEHOLDER).color(text_color.gamma_multiply(0.6)),
                            ),
                        );
                        return;
                    }
                    for (index, item) in items.iter().enumerate() {
                        let label = egui::RichText::new(&item.name).color(text_color);
                        let response = ui
                            .add_sized(row, egui::SelectableLabel::new(false, label))
                            .on_hover_text(item.path.display().to_string());
                        if response.clicked() {
                            clicked = Some(index);
                        }
                    }
                });
            });
        clicked
    }
}

/// Host that shows one bubble as a child viewport of the main window.
pub fn show_child_bubble(ctx: &egui::Context, view: &mut BubbleView, idle: &mut IdleQueue) {
    if view.is_closed() {
        return;
    }
    let builder = view.builder(ctx.pixels_per_point());
    let id = view.viewport_id();
    ctx.show_viewport_immediate(id, builder, |ctx, _class| {
        view.ui(ctx, idle);
    });
}

/// Shows an error to the user when there is no main window to toast on.
pub type ErrorReporter = Box<dyn FnMut(&str)>;

/// Modal error box on Windows; stderr elsewhere.
pub fn show_error_dialog(message: &str) {
    tracing::error!(error = %message, "bubble error");
    #[cfg(target_os = "windows")]
    {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Air Folder")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
    #[cfg(not(target_os = "windows"))]
    eprintln!("Air Folder: {message}");
}

/// Application that consists of nothing but one bubble.
pub struct BubbleApp {
    view: BubbleView,
    idle: IdleQueue,
    report: ErrorReporter,
}

impl BubbleApp {
    pub fn new(view: BubbleView) -> Self {
        Self::with_reporter(view, Box::new(show_error_dialog))
    }

    pub fn with_reporter(view: BubbleView, report: ErrorReporter) -> Self {
        Self {
            view: view.as_root(),
            idle: IdleQueue::default(),
            report,
        }
    }

    /// Hand every error the bubble collected to the reporter.
    pub fn report_errors(&mut self) {
        for err in self.view.take_errors() {
            (self.report)(&err);
        }
    }
}

impl eframe::App for BubbleApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for task in self.idle.drain() {
            match task {
                IdleTask::ActivatePrimaryWindow => {
                    tracing::debug!("bubble-only launch has no primary window to activate")
                }
            }
        }
        self.view.ui(ctx, &mut self.idle);
        self.report_errors();
    }
}

/// Run a bubble for `stack` as the whole application.
pub fn run_bubble(stack: &StackConfiguration) -> anyhow::Result<()> {
    let view = BubbleView::new(stack)?;
    let options = eframe::NativeOptions {
        viewport: view.builder(1.0),
        ..Default::default()
    };
    eframe::run_native(
        "Air Folder",
        options,
        Box::new(move |_cc| Box::new(BubbleApp::new(view))),
    )
    .map_err(|e| anyhow::anyhow!("bubble window failed: {e}"))
}
