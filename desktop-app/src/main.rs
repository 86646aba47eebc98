use std::path::Path;
use std::time::Instant;

use async_channel::{Receiver, Sender, unbounded};
use eframe::egui;
use inkcheck::analyze::Analyzer;
use inkcheck::config::ClientConfig;
use inkcheck::preview::{PreviewImage, decode_preview};
use inkcheck::state::{Phase, UploadAnalyzer};
use inkcheck::{AnalysisResult, AnalyzeError, intake};
use tokio::runtime::Runtime;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Outcome of a background submission, delivered back to the UI thread.
enum AnalysisMsg {
    Done(AnalysisResult),
    Failed(String),
}

struct InkcheckApp {
    config: ClientConfig,
    state: UploadAnalyzer,
    preview_texture: Option<egui::TextureHandle>,
    banner: Option<String>,
    result_shown_at: Option<Instant>,
    runtime: Runtime,
    msg_tx: Sender<AnalysisMsg>,
    msg_rx: Receiver<AnalysisMsg>,
}

impl InkcheckApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (msg_tx, msg_rx) = unbounded();
        Self {
            config: ClientConfig::default(),
            state: UploadAnalyzer::new(),
            preview_texture: None,
            banner: None,
            result_shown_at: None,
            runtime: Runtime::new().expect("failed to start tokio runtime"),
            msg_tx,
            msg_rx,
        }
    }

    /// Stage a file offered by drop or dialog; on success swap the preview.
    fn offer_file(&mut self, ctx: &egui::Context, name: String, bytes: Vec<u8>) {
        self.banner = None;
        let staged = intake::stage_bytes(name, bytes).and_then(|file| {
            let preview = decode_preview(&file)?;
            Ok((file, preview))
        });
        match staged {
            Ok((file, preview)) => {
                // Only render what the state machine actually staged: while
                // a request is in flight the selection is refused and the
                // displayed preview must keep matching the submitted file.
                if self.state.select(file, preview) {
                    if let Some(preview) = self.state.preview() {
                        self.preview_texture = Some(upload_preview(ctx, preview));
                    }
                    self.result_shown_at = None;
                } else {
                    self.banner = Some(
                        "An analysis is still running. Wait for it to finish or remove the \
                         current image first."
                            .to_string(),
                    );
                }
            }
            Err(err) => {
                log::warn!("intake rejected: {err}");
                self.banner = Some(err.user_message());
            }
        }
    }

    fn offer_path(&mut self, ctx: &egui::Context, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match std::fs::read(path) {
            Ok(bytes) => self.offer_file(ctx, name, bytes),
            Err(err) => {
                self.banner =
                    Some(AnalyzeError::preview_decode(name, err.to_string()).user_message());
            }
        }
    }

    /// Kick off the background submission for the staged file.
    fn start_analysis(&mut self) {
        let Some(file) = self.state.begin_analysis() else {
            return;
        };
        self.banner = None;
        self.result_shown_at = None;

        let config = self.config.clone();
        let tx = self.msg_tx.clone();
        self.runtime.spawn(async move {
            let outcome = match Analyzer::new(config) {
                Ok(analyzer) => analyzer.analyze(&file).await,
                Err(err) => Err(err),
            };
            let msg = match outcome {
                Ok(result) => AnalysisMsg::Done(result),
                Err(err) => {
                    log::warn!("analysis failed: {err}");
                    AnalysisMsg::Failed(err.user_message())
                }
            };
            let _ = tx.send(msg).await;
        });
    }

    fn remove_selection(&mut self) {
        self.state.remove();
        self.preview_texture = None;
        self.banner = None;
        self.result_shown_at = None;
    }

    /// Drain outcomes from the background task. Busy state clears on every
    /// path, success or failure.
    fn drain_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AnalysisMsg::Done(result) => {
                    self.state.finish_analysis(result);
                    if self.state.phase() == Phase::Resulted {
                        self.result_shown_at = Some(Instant::now());
                    }
                }
                AnalysisMsg::Failed(message) => {
                    // A failure for a request that was removed mid-flight is
                    // as stale as its verdict would have been.
                    let was_in_flight = self.state.phase() == Phase::Analyzing;
                    self.state.fail_analysis();
                    if was_in_flight {
                        self.banner = Some(message);
                    }
                }
            }
        }
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Single-file contract: only the first dropped file is considered.
        if let Some(file) = dropped.into_iter().next() {
            if let Some(path) = file.path {
                self.offer_path(ctx, &path);
            } else if let Some(bytes) = file.bytes {
                self.offer_file(ctx, file.name.clone(), bytes.to_vec());
            }
        }
    }

    fn ui_drop_zone(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if hovering {
            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
        } else {
            egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        let frame = egui::Frame::group(ui.style()).stroke(stroke).inner_margin(24.0);
        frame.show(ui, |ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), 160.0));
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(egui::RichText::new("🖼 Drop a signature image here").size(18.0));
                ui.label("or");
                if ui.button("Browse files…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file()
                    {
                        self.offer_path(ctx, &path);
                    }
                }
                ui.add_space(30.0);
            });
        });
    }

    fn ui_preview_panel(&mut self, ui: &mut egui::Ui) {
        if let Some(texture) = &self.preview_texture {
            ui.vertical_centered(|ui| {
                ui.add(
                    egui::Image::new(texture)
                        .max_height(260.0)
                        .max_width(ui.available_width())
                        .maintain_aspect_ratio(true),
                );
                if let Some(file) = self.state.selected_file() {
                    ui.label(
                        egui::RichText::new(format!("{} · {}", file.name, file.mime)).weak(),
                    );
                }
            });
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let analyzing = self.state.phase() == Phase::Analyzing;
            let label = if analyzing { "Analyzing…" } else { "Analyze Signature" };
            let button = ui.add_enabled(self.state.can_analyze(), egui::Button::new(label));
            if button.clicked() {
                self.start_analysis();
            }
            if analyzing {
                ui.spinner();
            }
            // Remove stays enactable while a request is in flight; the state
            // machine drops the stale outcome when it arrives.
            if ui.button("Remove").clicked() {
                self.remove_selection();
            }
        });
    }

    fn ui_result_card(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(result) = self.state.result() else {
            return;
        };

        let success = result.verdict.is_success();
        let accent = if success {
            egui::Color32::from_rgb(0x2e, 0xa0, 0x4e)
        } else {
            egui::Color32::from_rgb(0xc9, 0x3c, 0x3c)
        };

        let elapsed = self
            .result_shown_at
            .map(|t| t.elapsed())
            .unwrap_or_default();
        let fill = result.meter_fill_at(elapsed);
        if fill < result.meter_target() {
            ctx.request_repaint();
        }

        ui.add_space(12.0);
        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.5, accent))
            .inner_margin(12.0)
            .show(ui, |ui| {
                let icon = if success { "✔" } else { "⚠" };
                ui.label(
                    egui::RichText::new(format!("{icon} {}", result.verdict.title()))
                        .color(accent)
                        .size(18.0)
                        .strong(),
                );
                ui.label(result.verdict.description());
                ui.add_space(6.0);
                ui.add(
                    egui::ProgressBar::new(fill)
                        .fill(accent)
                        .text(result.confidence_text()),
                );
            });
    }
}

impl eframe::App for InkcheckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();
        self.handle_drops(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("✒ Signature Forgery Check");
            ui.add_space(8.0);

            if let Some(banner) = &self.banner {
                ui.colored_label(ui.visuals().error_fg_color, banner);
                ui.add_space(4.0);
            }

            // Panels derive from the state machine: intake zone when empty,
            // preview + actions otherwise, result card only when resulted.
            match self.state.phase() {
                Phase::Empty => self.ui_drop_zone(ctx, ui),
                Phase::Previewing | Phase::Analyzing | Phase::Resulted => {
                    self.ui_preview_panel(ui);
                    self.ui_result_card(ctx, ui);
                }
            }
        });
    }
}

/// Upload decoded preview pixels as a GUI texture.
fn upload_preview(ctx: &egui::Context, preview: &PreviewImage) -> egui::TextureHandle {
    let image = egui::ColorImage::from_rgba_unmultiplied(preview.size(), &preview.rgba);
    ctx.load_texture("preview", image, egui::TextureOptions::LINEAR)
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([460.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Inkcheck",
        options,
        Box::new(|cc| Box::new(InkcheckApp::new(cc))),
    )
}
