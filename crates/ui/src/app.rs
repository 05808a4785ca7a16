use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use editor::{EditorConfig, EditorSession, LinkView, Notice, NoticeLevel, ViewKind, persist};
use egui::{Align, Button, CentralPanel, Context, Frame, Key, Margin, ScrollArea, TopBottomPanel};
use net::FetchConfig;

use crate::preview::ImagePreview;

/// Pause after the last keystroke before the typed-in image value is previewed.
const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(400);
const PREVIEW_MAX: egui::Vec2 = egui::vec2(220.0, 160.0);
const LIST_HEIGHT: f32 = 150.0;

pub struct EditorApp {
    session: EditorSession,
    fetch: FetchConfig,

    path_input: String,
    new_image: String,
    new_href: String,
    new_url: String,
    new_text: String,
    query: String,

    notice: Option<Notice>,
    status: Option<String>,

    current_preview: ImagePreview,
    new_preview: ImagePreview,
    new_preview_due: Option<Instant>,
}

impl EditorApp {
    pub fn new(config: EditorConfig, initial: Option<PathBuf>) -> Self {
        let mut app = Self {
            session: EditorSession::new(config),
            fetch: FetchConfig::default(),
            path_input: String::new(),
            new_image: String::new(),
            new_href: String::new(),
            new_url: String::new(),
            new_text: String::new(),
            query: String::new(),
            notice: None,
            status: None,
            current_preview: ImagePreview::new("current"),
            new_preview: ImagePreview::new("new"),
            new_preview_due: None,
        };
        if let Some(path) = initial {
            app.open(&path);
        }
        app
    }

    fn open(&mut self, path: &Path) {
        self.path_input = path.display().to_string();
        match self.session.open_file(path) {
            Ok(()) => {
                self.current_preview.clear();
                self.status = Some(format!(
                    "Opened {}: {} images, {} links, {} text nodes",
                    path.display(),
                    self.session.image_sources().len(),
                    self.session.link_targets(LinkView::Href).len(),
                    self.session.text_contents().len()
                ));
                if !persist::has_html_extension(path) {
                    self.notice = Some(Notice::warning(
                        "Not an .html file",
                        format!("{} was opened as HTML anyway.", path.display()),
                    ));
                }
            }
            Err(err) => {
                log::warn!(target: "ui", "open failed: {err}");
                self.notice = Some(Notice::from(&err));
            }
        }
    }

    fn overwrite(&mut self) {
        self.notice = Some(match self.session.overwrite_file() {
            Ok(path) => Notice::saved(&path),
            Err(err) => {
                log::warn!(target: "ui", "overwrite failed: {err}");
                Notice::from(&err)
            }
        });
    }

    fn base_dir(&self) -> Option<&Path> {
        self.session.file_path().and_then(Path::parent)
    }

    fn report_replace(&mut self, what: &str, count: usize) {
        self.status = Some(match count {
            0 => format!("{what}: nothing replaced"),
            1 => format!("{what}: replaced 1 node"),
            n => format!("{what}: replaced {n} nodes"),
        });
    }

    fn ui_toolbar(&mut self, ui: &mut egui::Ui) {
        let resp = Frame::new()
            .fill(ui.visuals().extreme_bg_color)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.inactive.bg_stroke.color))
            .corner_radius(6.0)
            .inner_margin(Margin::symmetric(4, 4))
            .show(ui, |ui| {
                ui.add_sized(
                    [(ui.available_width() - 220.0).max(160.0), 24.0],
                    egui::TextEdit::singleline(&mut self.path_input)
                        .hint_text("Path to an .html file")
                        .vertical_align(Align::Center),
                )
            })
            .inner;

        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button("Open").clicked() || enter {
            let path = PathBuf::from(self.path_input.trim());
            self.open(&path);
        }
        let has_document = self.session.document().is_some();
        if ui.add_enabled(has_document, Button::new("Overwrite HTML")).clicked() {
            self.overwrite();
        }
    }

    fn ui_images(&mut self, ui: &mut egui::Ui) {
        ui.heading("Images");
        let selected = self.session.selection().selected(ViewKind::Image);
        let values = self.session.image_sources();
        if let Some(value) = value_list(ui, "images", &values, selected) {
            self.session.select_image(value.clone());
            let base = self.base_dir().map(Path::to_path_buf);
            self.current_preview.request(ui.ctx(), &value, base.as_deref(), &self.fetch);
        }

        ui.horizontal(|ui| {
            let resp = ui.text_edit_singleline(&mut self.new_image);
            if resp.changed() {
                self.new_preview_due = Some(Instant::now() + PREVIEW_DEBOUNCE);
            }
            if ui.button("Replace").clicked() {
                let n = self.session.replace_image(&self.new_image);
                self.report_replace("Image", n);
            }
        });

        ui.columns(2, |cols| {
            cols[0].label("Current");
            self.current_preview.show(&mut cols[0], PREVIEW_MAX);
            cols[1].label("New");
            self.new_preview.show(&mut cols[1], PREVIEW_MAX);
        });
    }

    fn ui_links(&mut self, ui: &mut egui::Ui, view: LinkView) {
        let (title, id) = match view {
            LinkView::Href => ("Links (href)", "links_href"),
            LinkView::Url => ("Links (URL)", "links_url"),
        };
        ui.heading(title);
        let selected = self.session.selection().selected(view.into());
        let values = self.session.link_targets(view);
        if let Some(value) = value_list(ui, id, &values, selected) {
            self.session.select_link(view, value);
        }

        ui.horizontal(|ui| {
            let input = match view {
                LinkView::Href => &mut self.new_href,
                LinkView::Url => &mut self.new_url,
            };
            ui.text_edit_singleline(input);
            if ui.button("Replace").clicked() {
                let new_value = input.clone();
                let n = self.session.replace_link(view, &new_value);
                self.report_replace(title, n);
            }
        });
    }

    fn ui_text(&mut self, ui: &mut egui::Ui) {
        ui.heading("Text");
        ui.horizontal(|ui| {
            ui.label("Search:");
            if ui.text_edit_singleline(&mut self.query).changed() {
                self.session.set_search_query(self.query.clone());
            }
        });

        let selected = self.session.selection().selected(ViewKind::Text);
        let clicked = if self.query.trim().is_empty() {
            let values = self.session.text_contents();
            value_list(ui, "texts", &values, selected)
        } else {
            let values: Vec<&str> = self.session.search_results().iter().map(String::as_str).collect();
            value_list(ui, "texts", &values, selected)
        };
        if let Some(value) = clicked {
            self.session.select_text(value);
        }

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_text);
            if ui.button("Replace").clicked() {
                let n = self.session.replace_text(&self.new_text);
                self.report_replace("Text", n);
            }
        });
    }

    fn ui_notice(&mut self, ctx: &Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                let color = match notice.level {
                    NoticeLevel::Info => ui.visuals().text_color(),
                    NoticeLevel::Warning => ui.visuals().warn_fg_color,
                    NoticeLevel::Error => ui.visuals().error_fg_color,
                };
                ui.colored_label(color, notice.message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if !open || dismissed {
            self.notice = None;
        }
    }

    fn handle_input(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.open(&path);
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, Key::S)) {
            self.overwrite();
        }
    }

    fn poll_previews(&mut self, ctx: &Context) {
        if let Some(due) = self.new_preview_due {
            let now = Instant::now();
            if now >= due {
                self.new_preview_due = None;
                let base = self.base_dir().map(Path::to_path_buf);
                let value = self.new_image.trim().to_string();
                self.new_preview.request(ctx, &value, base.as_deref(), &self.fetch);
            } else {
                ctx.request_repaint_after(due - now);
            }
        }
        self.current_preview.pump(ctx);
        self.new_preview.pump(ctx);
    }
}

/// Lists `values` as selectable rows. Returns the clicked value, if any.
fn value_list(ui: &mut egui::Ui, id: &str, values: &[&str], selected: Option<&str>) -> Option<String> {
    let mut clicked = None;
    ScrollArea::vertical()
        .id_salt(id)
        .max_height(LIST_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if values.is_empty() {
                ui.weak("(empty)");
            }
            for value in values {
                if ui.selectable_label(selected == Some(*value), *value).clicked() {
                    clicked = Some(value.to_string());
                }
            }
        });
    clicked
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.poll_previews(ctx);

        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| self.ui_toolbar(ui));
        });

        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.session.selection().last_selected() {
                    Some((_, value)) => ui.label(format!("Selected: {value}")),
                    None => ui.weak("Nothing selected"),
                };
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |cols| {
                    self.ui_images(&mut cols[0]);
                    cols[0].separator();
                    self.ui_text(&mut cols[0]);

                    self.ui_links(&mut cols[1], LinkView::Href);
                    cols[1].separator();
                    self.ui_links(&mut cols[1], LinkView::Url);
                });
            });
        });

        self.ui_notice(ctx);
    }
}
