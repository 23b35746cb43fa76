use crate::display::interface::Display;
use crate::lotto_picture::core::Msg;
use crate::lotto_picture::render::{Ball, Status, View};
use crate::lotto_picture::text::{text, Text};
use crate::store::{Language, PreferencesPatch, Theme};
use crate::upload::read_upload;
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

const BALL_REVEAL_SECONDS: f64 = 0.35;

const CJK_FONT_PATHS: [&str; 5] = [
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

#[derive(Default)]
struct Shared {
    view: Option<View>,
    clipboard: Option<String>,
    ctx: Option<egui::Context>,
}

/// Display backed by an egui window. The window reads whatever view was
/// rendered last, so `render` never blocks on the UI thread.
#[derive(Clone, Default)]
pub struct DisplayGui {
    shared: Arc<Mutex<Shared>>,
}

impl DisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, sender: Sender<Msg>) -> GuiWindow {
        GuiWindow {
            shared: self.shared.clone(),
            sender,
            texture: None,
            path_input: String::new(),
            reveal: None,
        }
    }

    fn request_repaint(shared: &Shared) {
        if let Some(ctx) = &shared.ctx {
            ctx.request_repaint();
        }
    }
}

impl Display for DisplayGui {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut shared = self.shared.lock().map_err(|e| e.to_string())?;
        shared.view = Some(view.clone());
        Self::request_repaint(&shared);
        Ok(())
    }

    fn copy_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut shared = self.shared.lock().map_err(|e| e.to_string())?;
        shared.clipboard = Some(text.to_string());
        Self::request_repaint(&shared);
        Ok(())
    }
}

/// Blocks the calling thread until the window is closed.
pub fn run_gui(
    display: &DisplayGui,
    title: &str,
    sender: Sender<Msg>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let window = display.window(sender);
    let shared = display.shared.clone();

    eframe::run_native(
        title,
        options,
        Box::new(move |cc| {
            install_cjk_font(&cc.egui_ctx);
            if let Ok(mut shared) = shared.lock() {
                shared.ctx = Some(cc.egui_ctx.clone());
            }
            Box::new(window)
        }),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn install_cjk_font(ctx: &egui::Context) {
    let Some(bytes) = CJK_FONT_PATHS
        .iter()
        .find_map(|path| std::fs::read(path).ok())
    else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
}

pub struct GuiWindow {
    shared: Arc<Mutex<Shared>>,
    sender: Sender<Msg>,
    texture: Option<(String, egui::TextureHandle)>,
    path_input: String,
    reveal: Option<(String, f64)>,
}

impl GuiWindow {
    fn send(&self, msg: Msg) {
        // The app loop only goes away on shutdown.
        let _ = self.sender.send(msg);
    }

    fn send_patch(&self, patch: PreferencesPatch) {
        self.send(Msg::UpdatePreferences(patch));
    }

    fn open_path(&self, path: &str) {
        let path = path.trim();
        if path.is_empty() {
            return;
        }
        match read_upload(std::path::Path::new(path)) {
            Ok(bytes) => self.send(Msg::ImageSelected { bytes }),
            Err(error) => self.send(Msg::ImageDecodeDone(Err(error))),
        }
    }

    fn handle_dropped_files(&self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(bytes) = file.bytes {
            self.send(Msg::ImageSelected {
                bytes: bytes.to_vec(),
            });
        } else if let Some(path) = file.path {
            self.open_path(&path.to_string_lossy());
        }
    }

    fn apply_theme(&self, ctx: &egui::Context, frame: &eframe::Frame, theme: Theme) {
        let visuals = match theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
            Theme::System => frame
                .info()
                .system_theme
                .map(|theme| theme.egui_visuals())
                .unwrap_or_else(egui::Visuals::light),
        };
        ctx.set_visuals(visuals);
    }

    fn sync_texture(&mut self, ctx: &egui::Context, view: &View) {
        let Some(preview) = &view.preview else {
            self.texture = None;
            return;
        };
        if matches!(&self.texture, Some((id, _)) if *id == preview.id) {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [
                preview.preview.width as usize,
                preview.preview.height as usize,
            ],
            &preview.preview.rgba,
        );
        let handle = ctx.load_texture(
            format!("preview-{}", preview.id),
            image,
            egui::TextureOptions::default(),
        );
        self.texture = Some((preview.id.clone(), handle));
    }

    /// Number of balls shown so far for the current result.
    fn revealed(&mut self, ctx: &egui::Context, view: &View) -> usize {
        let Some(key) = &view.result_key else {
            self.reveal = None;
            return 0;
        };
        let now = ctx.input(|i| i.time);
        let started = match &self.reveal {
            Some((current, started)) if current == key => *started,
            _ => {
                self.reveal = Some((key.clone(), now));
                now
            }
        };

        let shown = ((now - started) / BALL_REVEAL_SECONDS) as usize + 1;
        if shown < view.balls.len() {
            ctx.request_repaint();
        }
        shown.min(view.balls.len())
    }

    fn header(&self, ui: &mut egui::Ui, view: &View) {
        let language = view.language;
        ui.horizontal(|ui| {
            ui.heading(text(language, Text::Title));
            ui.label(text(language, Text::Subtitle));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for (theme, label) in [
                    (Theme::System, "system"),
                    (Theme::Dark, "dark"),
                    (Theme::Light, "light"),
                ] {
                    if ui.selectable_label(view.theme == theme, label).clicked() {
                        self.send_patch(PreferencesPatch {
                            theme: Some(theme),
                            ..Default::default()
                        });
                    }
                }
                ui.label(text(language, Text::Theme));
                ui.separator();

                for (option, label) in [(Language::En, "English"), (Language::Ko, "한국어")] {
                    if ui.selectable_label(language == option, label).clicked() {
                        self.send_patch(PreferencesPatch {
                            language: Some(option),
                            ..Default::default()
                        });
                    }
                }
                ui.label(text(language, Text::Language));
            });
        });
    }

    fn upload_area(&mut self, ui: &mut egui::Ui, view: &View, hovering: bool) {
        let language = view.language;

        if let Some((_, texture)) = &self.texture {
            let image = egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                .max_width(ui.available_width().min(480.0))
                .max_height(320.0);
            ui.add(image);
        } else if hovering {
            ui.label(egui::RichText::new(text(language, Text::DropHere)).strong());
        } else {
            ui.label(egui::RichText::new(text(language, Text::UploadPrompt)).strong());
            ui.label(text(language, Text::UploadHint));
        }

        let label = if self.texture.is_some() {
            text(language, Text::ChooseAnother)
        } else {
            text(language, Text::Open)
        };
        let path_input = &mut self.path_input;
        let clicked = ui
            .horizontal(|ui| {
                ui.text_edit_singleline(path_input);
                ui.button(label).clicked()
            })
            .inner;
        if clicked {
            self.open_path(&self.path_input);
        }
    }

    fn controls(&self, ui: &mut egui::Ui, view: &View) {
        let language = view.language;

        ui.horizontal(|ui| {
            let label = if view.balls.is_empty() {
                text(language, Text::Generate)
            } else {
                text(language, Text::Regenerate)
            };
            if ui
                .add_enabled(view.can_generate, egui::Button::new(label))
                .clicked()
            {
                self.send(Msg::Generate);
            }

            if view.preview.is_some() && ui.button(text(language, Text::NewPhoto)).clicked() {
                self.send(Msg::Reset);
            }

            if !view.balls.is_empty() && ui.button(text(language, Text::Share)).clicked() {
                self.send(Msg::CopyShareText);
            }

            if view.can_retry_model && ui.button(text(language, Text::RetryModel)).clicked() {
                self.send(Msg::RetryModelLoad);
            }
        });
    }

    fn result(&mut self, ui: &mut egui::Ui, view: &View) {
        let shown = self.revealed(ui.ctx(), view);

        ui.horizontal(|ui| {
            if matches!(
                view.status,
                Status::Analyzing | Status::ModelLoading | Status::DecodingImage
            ) {
                ui.spinner();
            }
            ui.label(egui::RichText::new(&view.status_text).size(18.0));
        });

        if !view.balls.is_empty() {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                for ball in view.balls.iter().take(shown) {
                    paint_ball(ui, ball, 48.0);
                }
            });
        }
        if let Some(confidence) = &view.confidence_text {
            ui.label(confidence);
        }
        if let Some(notice) = &view.notice_text {
            ui.colored_label(egui::Color32::from_rgb(34, 197, 94), notice);
        }
        if let Some(error) = &view.error_text {
            ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
        }
        if !view.balls.is_empty() {
            ui.add_space(8.0);
            ui.small(text(view.language, Text::Tip));
        }
    }

    fn history(&self, ui: &mut egui::Ui, view: &View) {
        let language = view.language;

        ui.heading(text(language, Text::History));

        let mut save_history = view.save_history;
        if ui
            .checkbox(&mut save_history, text(language, Text::SaveHistory))
            .changed()
        {
            self.send_patch(PreferencesPatch {
                save_history: Some(save_history),
                ..Default::default()
            });
        }

        if view.history.is_empty() {
            ui.label(text(language, Text::HistoryEmpty));
            return;
        }

        if ui.button(text(language, Text::ClearHistory)).clicked() {
            self.send(Msg::ClearHistory);
        }
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &view.history {
                ui.horizontal(|ui| {
                    ui.small(&entry.when);
                    ui.small(format!("{}%", entry.confidence_percent));
                });
                ui.horizontal(|ui| {
                    for ball in &entry.balls {
                        paint_ball(ui, ball, 26.0);
                    }
                });
                ui.add_space(6.0);
            }
        });
    }
}

fn paint_ball(ui: &mut egui::Ui, ball: &Ball, diameter: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(diameter, diameter), egui::Sense::hover());
    let (r, g, b) = ball.color.rgb();
    let painter = ui.painter();

    painter.circle_filled(rect.center(), diameter / 2.0, egui::Color32::from_rgb(r, g, b));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        &ball.label,
        egui::FontId::proportional(diameter * 0.42),
        egui::Color32::WHITE,
    );
}

impl eframe::App for GuiWindow {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let (view, clipboard) = match self.shared.lock() {
            Ok(mut shared) => (shared.view.clone(), shared.clipboard.take()),
            Err(_) => return,
        };

        if let Some(copied) = clipboard {
            ctx.output_mut(|o| o.copied_text = copied);
        }

        let Some(view) = view else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| ui.spinner());
            });
            return;
        };

        self.apply_theme(ctx, frame, view.theme);
        self.handle_dropped_files(ctx);
        self.sync_texture(ctx, &view);
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.header(ui, &view);
        });

        egui::SidePanel::right("history")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.history(ui, &view);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.upload_area(ui, &view, hovering);
                ui.add_space(12.0);
                self.controls(ui, &view);
                ui.add_space(12.0);
                self.result(ui, &view);
            });
        });
    }
}
