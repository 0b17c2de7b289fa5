use std::{path::PathBuf, sync::Arc, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{Mode, Track},
    error::DataError,
    protocol::SettingsQuery,
};
use timetable_core::{
    labels, render_load_failure, split_address, Cell, Controller, Direction, Dropdown, Grid,
    LatestFrame, LoadError, MemoryHistory, Startup, TimetableController, TimetableTable,
    ViewModel,
};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const CJK_FONT_NAME: &str = "cjk_fallback";

/// System fonts tried, in order, when no font is configured explicitly.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub address: String,
    pub font: Option<PathBuf>,
}

enum Page {
    Loading,
    Ready(Box<TimetableController>),
    Failed { error: DataError, view: ViewModel },
}

/// User input gathered while drawing, applied once the frame is laid out.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Reload,
    Navigate(Direction),
    SwitchMode(Mode),
    ToggleDropdown(Dropdown),
    SelectTrack(Track),
    SelectCohort(String),
    FollowLink(SettingsQuery),
    ClickOutside,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    address: String,
    page: Page,
    status: String,
    dropdown_anchor: Option<egui::Rect>,
}

impl DesktopGuiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        install_cjk_font(&cc.egui_ctx, startup.font.as_deref());

        let mut app = Self {
            cmd_tx,
            ui_rx,
            address: startup.address,
            page: Page::Loading,
            status: String::new(),
            dropdown_anchor: None,
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        match split_address(&self.address) {
            Ok((location, query)) => {
                tracing::info!(%location, query, "loading page");
                self.page = Page::Loading;
                self.status = format!("Loading {location}");
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Load { location, query },
                    &mut self.status,
                );
            }
            Err(err) => {
                tracing::warn!("rejected address: {err}");
                self.status = err.to_string();
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Loaded {
                    location,
                    query,
                    startup,
                } => {
                    self.page = open_page(location.page_url(), &query, startup);
                    match &self.page {
                        Page::Ready(controller) => {
                            self.address = controller.location().address();
                            self.status = format!("Loaded {location}");
                        }
                        Page::Failed { error, .. } => {
                            tracing::warn!(%location, "page load failed: {error}");
                            self.status = error.to_string();
                        }
                        Page::Loading => {}
                    }
                }
                UiEvent::BackendFailed(message) => {
                    self.status = message;
                }
            }
        }
    }

    fn model(&self) -> Option<&ViewModel> {
        match &self.page {
            Page::Loading => None,
            Page::Ready(controller) => controller.presenter().model(),
            Page::Failed { view, .. } => Some(view),
        }
    }

    fn apply(&mut self, action: UiAction) {
        if action == UiAction::Reload {
            self.reload();
            return;
        }
        let Page::Ready(controller) = &mut self.page else {
            return;
        };
        match action {
            UiAction::Reload => {}
            UiAction::Navigate(direction) => controller.navigate(direction),
            UiAction::SwitchMode(mode) => controller.switch_mode(mode),
            UiAction::ToggleDropdown(dropdown) => controller.toggle_dropdown(dropdown),
            UiAction::SelectTrack(track) => controller.select_track(track),
            UiAction::SelectCohort(label) => controller.select_cohort(&label),
            UiAction::FollowLink(link) => controller.follow_link(&link),
            UiAction::ClickOutside => controller.click_outside(),
        }
        self.address = controller.location().address();
    }

    fn show_address_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("address_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⟳").on_hover_text("Reload").clicked() {
                    actions.push(UiAction::Reload);
                }
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.address)
                        .desired_width(f32::INFINITY)
                        .hint_text("https://example.org/timetable/?type=week&grade=M1"),
                );
                if response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter))
                {
                    actions.push(UiAction::Reload);
                }
            });
        });
    }

    fn show_controls(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(model) = self.model() else {
            return;
        };
        let mut anchor = None;

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for option in &model.mode_options {
                    if ui.selectable_label(option.active, option.label).clicked() {
                        actions.push(UiAction::SwitchMode(option.mode));
                    }
                }
                ui.separator();

                let (dropdown, label) = if model.track_selector.visible {
                    (Dropdown::Track, &model.track_selector.toggle_label)
                } else {
                    (Dropdown::Cohort, &model.cohort_selector.toggle_label)
                };
                let toggle = ui.button(format!("{label} ▾"));
                if toggle.clicked() {
                    actions.push(UiAction::ToggleDropdown(dropdown));
                }
                anchor = Some(toggle.rect);
                ui.separator();

                if ui.button("◀").clicked() {
                    actions.push(UiAction::Navigate(Direction::Previous));
                }
                ui.heading(&model.date_header);
                if ui.button("▶").clicked() {
                    actions.push(UiAction::Navigate(Direction::Next));
                }
            });
        });

        self.dropdown_anchor = anchor;
    }

    fn show_dropdown(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let (Page::Ready(controller), Some(anchor)) = (&self.page, self.dropdown_anchor) else {
            return;
        };
        let Some(open) = controller.open_dropdown() else {
            return;
        };
        let Some(model) = controller.presenter().model() else {
            return;
        };

        let area = egui::Area::new(egui::Id::new("selector_popup"))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor.left_bottom() + egui::vec2(0.0, 4.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(anchor.width().max(120.0));
                    match open {
                        Dropdown::Track => {
                            for option in &model.track_selector.options {
                                let label = option.label.as_str();
                                if ui.selectable_label(option.active, label).clicked() {
                                    actions.push(UiAction::SelectTrack(option.value));
                                }
                            }
                        }
                        Dropdown::Cohort => {
                            for option in &model.cohort_selector.options {
                                let label = option.label.as_str();
                                if ui.selectable_label(option.active, label).clicked() {
                                    actions.push(UiAction::SelectCohort(
                                        option.value.as_str().to_string(),
                                    ));
                                }
                            }
                        }
                    }
                });
            });

        let pointer = ctx.input(|input| {
            input
                .pointer
                .any_click()
                .then(|| input.pointer.interact_pos())
                .flatten()
        });
        if let Some(pos) = pointer {
            if !area.response.rect.contains(pos) && !anchor.contains(pos) {
                actions.push(UiAction::ClickOutside);
            }
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(line) = self.model().and_then(|model| model.last_updated.as_ref()) {
                    ui.label(line);
                    ui.separator();
                }
                ui.weak(&self.status);
            });
        });
    }

    fn show_timetable(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let model = match &self.page {
                Page::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading…");
                    });
                    return;
                }
                Page::Failed { error, view } => {
                    ui.colored_label(ui.visuals().error_fg_color, labels::LOAD_FAILED);
                    ui.weak(error.to_string());
                    view
                }
                Page::Ready(controller) => match controller.presenter().model() {
                    Some(model) => model,
                    None => return,
                },
            };

            match &model.grid {
                Grid::Placeholder(message) if message != labels::LOAD_FAILED => {
                    ui.add_space(24.0);
                    ui.vertical_centered(|ui| ui.label(message));
                }
                Grid::Placeholder(_) => {}
                Grid::Table(table) => {
                    egui::ScrollArea::both().show(ui, |ui| timetable_grid(ui, table, actions));
                }
            }
        });
    }
}

/// Page shown once a load finishes. Data without a page address to resolve
/// history against is shown as a failed load.
fn open_page(page_url: Result<Url, LoadError>, query: &str, startup: Startup) -> Page {
    match startup {
        Startup::Ready(state) => match page_url {
            Ok(page_url) => {
                let mut controller = Controller::new(
                    state,
                    LatestFrame::default(),
                    MemoryHistory::new(page_url, query),
                );
                controller.start();
                Page::Ready(Box::new(controller))
            }
            Err(err) => Page::Failed {
                error: DataError::from(&err),
                view: render_load_failure(&state),
            },
        },
        Startup::Failed { error, view } => Page::Failed { error, view },
    }
}

fn timetable_grid(ui: &mut egui::Ui, table: &TimetableTable, actions: &mut Vec<UiAction>) {
    egui::Grid::new("timetable")
        .striped(true)
        .min_col_width(96.0)
        .spacing(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.strong(table.corner);
            for column in &table.columns {
                ui.vertical(|ui| {
                    let link = ui
                        .link(column.lines.join("\n"))
                        .on_hover_text(column.link.href());
                    if link.clicked() {
                        actions.push(UiAction::FollowLink(column.link.clone()));
                    }
                    for note in &column.notes {
                        ui.small(format!("※ {note}"));
                    }
                });
            }
            ui.end_row();

            for row in &table.rows {
                ui.strong(&row.label);
                for cell in &row.cells {
                    match cell {
                        Cell::Class { course, room } => {
                            ui.vertical(|ui| {
                                ui.label(course);
                                ui.weak(room);
                            });
                        }
                        Cell::Empty => {
                            ui.label("");
                        }
                    }
                }
                ui.end_row();
            }
        });
}

fn install_cjk_font(ctx: &egui::Context, explicit: Option<&std::path::Path>) {
    let candidates = explicit
        .map(|path| vec![path.to_path_buf()])
        .unwrap_or_else(|| CJK_FONT_CANDIDATES.iter().map(PathBuf::from).collect());

    let Some((path, bytes)) = candidates
        .into_iter()
        .find_map(|path| std::fs::read(&path).ok().map(|bytes| (path, bytes)))
    else {
        tracing::warn!("no CJK font found; Japanese labels may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        CJK_FONT_NAME.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    tracing::debug!(path = %path.display(), "installed CJK fallback font");
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        self.show_address_bar(ctx, &mut actions);
        self.show_controls(ctx, &mut actions);
        self.show_status_bar(ctx);
        self.show_timetable(ctx, &mut actions);
        self.show_dropdown(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }

        if matches!(self.page, Page::Loading) {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
