use eframe::egui;
use eframe::egui::text::LayoutJob;
use eframe::egui::{
    vec2, Align, Color32, FontFamily, FontId, Id, Margin, Pos2, Rect, Sense, Stroke, TextFormat,
    TextStyle, Vec2, ViewportCommand, Visuals,
};
use eframe::epaint::Shadow;

use crate::border;
use crate::clock::{ClockRenderer, DisplaySnapshot};
use crate::preferences::PreferenceStore;
use crate::ticker::{spawn_repaint_ticker, BORDER_TICK, CLOCK_TICK};
use crate::window::{self, MenuAction, MoveTracker, QUIT_SHORTCUT};

const CORNER_RADIUS: f32 = 22.0;
const MIN_CONTENT_WIDTH: f32 = 260.0;
const PADDING: Vec2 = Vec2::new(40.0, 24.0);
const SHADOW_MARGIN: f32 = 28.0;

const TIME_SIZE: f32 = 54.0;
const MERIDIEM_SIZE: f32 = 18.0;
const DATE_SIZE: f32 = 14.0;

const CLOSE_RADIUS: f32 = 6.0;
const CLOSE_OFFSET: Vec2 = Vec2::new(14.0, 12.0);
const CLOSE_RED: Color32 = Color32::from_rgb(255, 97, 87);

/// The floating clock: one panel, drawn every frame from the current
/// preferences and the wall clock.
pub struct ClockApp {
    store: PreferenceStore,
    renderer: ClockRenderer,
    moves: MoveTracker,
    fitted: Option<Vec2>,
    placed: bool,
}

impl ClockApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(Visuals::dark());

        let mut style = (*cc.egui_ctx.style()).clone();
        style.wrap = Some(false);
        for text_style in [TextStyle::Body, TextStyle::Button] {
            style
                .text_styles
                .insert(text_style, FontId::new(14.0, FontFamily::Proportional));
        }
        cc.egui_ctx.set_style(style);

        spawn_repaint_ticker(cc.egui_ctx.clone(), CLOCK_TICK);
        spawn_repaint_ticker(cc.egui_ctx.clone(), BORDER_TICK);

        let store = PreferenceStore::load(cc.storage);
        let mut app = Self::with_store(store, ClockRenderer::from_env());

        // The saved origin does not depend on the fitted size, so it is applied
        // before the first frame.
        if let Some(origin) = app.store.preferences().window_position() {
            log::info!("restoring panel at {origin:?}");
            cc.egui_ctx
                .send_viewport_cmd(ViewportCommand::OuterPosition(origin));
            app.moves.settle(origin);
            app.placed = true;
        }

        app
    }

    fn with_store(store: PreferenceStore, renderer: ClockRenderer) -> Self {
        Self {
            store,
            renderer,
            moves: MoveTracker::default(),
            fitted: None,
            placed: false,
        }
    }

    /// Resizes the surface to the content whenever the content size changes.
    fn fit(&mut self, ctx: &egui::Context, size: Vec2) {
        let size = size.ceil();
        if self.fitted == Some(size) {
            return;
        }
        log::debug!("fitting panel to {size:?}");
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(size));
        self.fitted = Some(size);
    }

    /// Anchors the panel top-right once both the monitor and the fitted size
    /// are known.
    fn place(&mut self, ctx: &egui::Context) {
        if self.placed {
            return;
        }
        let (Some(monitor), Some(size)) = (ctx.input(|i| i.viewport().monitor_size), self.fitted)
        else {
            return;
        };
        let origin = window::initial_position(self.store.preferences(), monitor, size);
        log::info!("placing panel at {origin:?}");
        ctx.send_viewport_cmd(ViewportCommand::OuterPosition(origin));
        self.moves.settle(origin);
        self.placed = true;
    }

    /// Persists the window origin whenever it differs from the last one seen.
    fn track_moves(
        &mut self,
        origin: Option<Pos2>,
        storage: Option<&mut (dyn eframe::Storage + '_)>,
    ) {
        if let Some(moved) = origin.and_then(|origin| self.moves.observe(origin)) {
            self.store.set_window_position(storage, moved);
        }
    }

    /// Lays out and paints the panel. Returns the user's choice from the
    /// context menu or the close button.
    fn panel(&mut self, ui: &mut egui::Ui) -> Option<MenuAction> {
        let prefs = *self.store.preferences();
        let snapshot = self.renderer.current().cloned();

        let frame = egui::Frame::none()
            .fill(Color32::from_rgba_unmultiplied(28, 28, 32, 170))
            .rounding(CORNER_RADIUS)
            .inner_margin(Margin::symmetric(PADDING.x, PADDING.y))
            .outer_margin(SHADOW_MARGIN)
            .shadow(Shadow {
                offset: vec2(0.0, 8.0),
                blur: 40.0,
                spread: 0.0,
                color: Color32::from_black_alpha(90),
            });
        let content = frame
            .show(ui, |ui| {
                ui.set_min_width(MIN_CONTENT_WIDTH);
                ui.vertical_centered(|ui| {
                    if let Some(snapshot) = &snapshot {
                        ui.label(time_job(snapshot));
                        ui.label(
                            egui::RichText::new(&snapshot.date)
                                .size(DATE_SIZE)
                                .color(Color32::from_white_alpha(115)),
                        );
                    }
                });
                ui.min_rect()
            })
            .inner;
        let panel_rect = content.expand2(PADDING);

        border::paint(ui.painter(), panel_rect, CORNER_RADIUS, ui.input(|i| i.time));

        let mut chosen = None;
        let response = ui.interact(panel_rect, Id::new("panel"), Sense::click_and_drag());
        if response.drag_started() {
            self.moves.user_drag();
            ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
        }
        response.context_menu(|ui| {
            chosen = window::show_menu(ui, &prefs);
        });

        if ui.rect_contains_pointer(panel_rect) && close_button(ui, panel_rect) {
            chosen = Some(MenuAction::Quit);
        }

        chosen
    }
}

/// Time in large type followed by the dimmed meridiem, sharing a baseline.
fn time_job(snapshot: &DisplaySnapshot) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.append(
        &snapshot.time,
        0.0,
        TextFormat {
            font_id: FontId::proportional(TIME_SIZE),
            color: Color32::WHITE,
            valign: Align::BOTTOM,
            ..Default::default()
        },
    );
    if let Some(meridiem) = &snapshot.meridiem {
        job.append(
            meridiem,
            4.0,
            TextFormat {
                font_id: FontId::proportional(MERIDIEM_SIZE),
                color: Color32::from_white_alpha(128),
                valign: Align::BOTTOM,
                ..Default::default()
            },
        );
    }
    job
}

/// The red close light in the top-left corner. Returns `true` when clicked.
fn close_button(ui: &mut egui::Ui, panel_rect: Rect) -> bool {
    let center = panel_rect.min + CLOSE_OFFSET + Vec2::splat(CLOSE_RADIUS);
    let rect = Rect::from_center_size(center, Vec2::splat(CLOSE_RADIUS * 2.0));
    let response = ui.interact(rect, Id::new("close"), Sense::click());

    let painter = ui.painter();
    painter.circle_filled(center, CLOSE_RADIUS, CLOSE_RED);
    if response.hovered() {
        let d = CLOSE_RADIUS * 0.45;
        let stroke = Stroke::new(1.5, Color32::from_black_alpha(128));
        painter.line_segment([center + vec2(-d, -d), center + vec2(d, d)], stroke);
        painter.line_segment([center + vec2(-d, d), center + vec2(d, -d)], stroke);
    }
    response.clicked()
}

fn quit(ctx: &egui::Context) {
    log::info!("quitting");
    ctx.send_viewport_cmd(ViewportCommand::Close);
}

impl eframe::App for ClockApp {
    /// Called on every clock and border tick, and on input.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = chrono::Local::now();
        if self.renderer.refresh(&now, self.store.preferences()) {
            log::trace!("clock now shows {:?}", self.renderer.current());
        }

        let origin = ctx.input(|i| i.viewport().outer_rect).map(|r| r.min);
        self.track_moves(origin, frame.storage_mut());

        if ctx.input_mut(|i| i.consume_shortcut(&QUIT_SHORTCUT)) {
            quit(ctx);
            return;
        }

        let area = egui::Area::new(Id::new("clock"))
            .fixed_pos(Pos2::ZERO)
            .constrain(false)
            .show(ctx, |ui| self.panel(ui));
        self.fit(ctx, area.response.rect.size());
        self.place(ctx);

        if let Some(action) = area.inner {
            if window::apply(action, &mut self.store, frame.storage_mut()) {
                quit(ctx);
            } else {
                // Reflect the toggle in this frame's strings right away.
                self.renderer.refresh(&now, self.store.preferences());
                ctx.request_repaint();
            }
        }
    }

    fn clear_color(&self, _visuals: &Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::tests::MemoryStorage;
    use crate::preferences::{Preferences, WINDOW_X_KEY, WINDOW_Y_KEY};

    fn snapshot(meridiem: Option<&str>) -> DisplaySnapshot {
        DisplaySnapshot {
            time: "2:05:09".to_owned(),
            meridiem: meridiem.map(str::to_owned),
            date: "2024-03-05".to_owned(),
        }
    }

    #[test]
    fn time_job_adds_meridiem_only_when_present() {
        assert_eq!(time_job(&snapshot(Some("PM"))).sections.len(), 2);
        assert_eq!(time_job(&snapshot(None)).sections.len(), 1);
        assert_eq!(time_job(&snapshot(Some("PM"))).text, "2:05:09PM");
    }

    #[test]
    fn fit_only_resizes_on_change() {
        let ctx = egui::Context::default();
        let mut app = ClockApp::with_store(PreferenceStore::default(), ClockRenderer::new(None));
        app.fit(&ctx, vec2(315.2, 160.0));
        assert_eq!(app.fitted, Some(vec2(316.0, 160.0)));
        app.fit(&ctx, vec2(315.9, 160.0));
        assert_eq!(app.fitted, Some(vec2(316.0, 160.0)));
    }

    #[test]
    fn starts_from_stored_preferences() {
        let mut storage = MemoryStorage::default();
        let mut store = PreferenceStore::load(Some(&storage));
        store.set_use_24_hour(Some(&mut storage), true);

        let app = ClockApp::with_store(
            PreferenceStore::load(Some(&storage)),
            ClockRenderer::new(None),
        );
        assert_eq!(
            *app.store.preferences(),
            Preferences {
                use_24_hour: true,
                ..Preferences::default()
            }
        );
        assert!(!app.placed);
    }

    #[test]
    fn window_moves_reach_storage() {
        let mut storage = MemoryStorage::default();
        let mut app = ClockApp::with_store(
            PreferenceStore::load(Some(&storage)),
            ClockRenderer::new(None),
        );

        app.track_moves(Some(Pos2::new(10.0, 20.0)), Some(&mut storage));
        assert_eq!(storage.flushes, 0);

        app.track_moves(Some(Pos2::new(100.0, 200.0)), Some(&mut storage));
        app.track_moves(None, Some(&mut storage));
        assert_eq!(storage.flushes, 2);
        assert_eq!(eframe::get_value::<f32>(&storage, WINDOW_X_KEY), Some(100.0));
        assert_eq!(eframe::get_value::<f32>(&storage, WINDOW_Y_KEY), Some(200.0));

        app.track_moves(Some(Pos2::new(130.0, 200.0)), Some(&mut storage));
        assert_eq!(storage.flushes, 4);
        let reloaded = PreferenceStore::load(Some(&storage));
        assert_eq!(
            reloaded.preferences().window_position(),
            Some(Pos2::new(130.0, 200.0))
        );
    }
}
