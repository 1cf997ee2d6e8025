//! Placement, move tracking and the context menu of the floating panel.

use eframe::egui::{self, Key, KeyboardShortcut, Modifiers, Pos2, Vec2, ViewportBuilder};

use crate::preferences::{PreferenceStore, Preferences};

/// Inset from the top and right edges of the primary monitor when no
/// position has been saved.
pub const SCREEN_MARGIN: f32 = 10.0;

/// Surface size before the content has reported its fitted size.
pub const INITIAL_SIZE: Vec2 = Vec2::new(360.0, 200.0);

pub const APP_NAME: &str = "floating clock";

pub const QUIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

/// A borderless, transparent, always-on-top surface with no taskbar entry
/// that does not take focus when shown.
///
/// Joining all virtual desktops is not requested: eframe 0.27 has no viewport
/// flag for it.
pub fn panel_viewport() -> ViewportBuilder {
    ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size(INITIAL_SIZE)
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_resizable(false)
        .with_taskbar(false)
        .with_active(false)
}

/// Native options for the panel. eframe's own window persistence is off;
/// the origin is stored by [`crate::ClockApp`] instead.
pub fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: panel_viewport(),
        persist_window: false,
        #[cfg(target_os = "macos")]
        event_loop_builder: Some(Box::new(|builder| {
            use eframe::egui_winit::winit::platform::macos::{
                ActivationPolicy, EventLoopBuilderExtMacOS,
            };
            // No dock icon and no menu bar.
            builder.with_activation_policy(ActivationPolicy::Accessory);
        })),
        ..Default::default()
    }
}

/// Top-right of a monitor of `monitor` size for a panel of `panel` size.
pub fn default_position(monitor: Vec2, panel: Vec2) -> Pos2 {
    Pos2::new(monitor.x - panel.x - SCREEN_MARGIN, SCREEN_MARGIN)
}

/// Where the panel starts: the saved origin verbatim, even off-screen,
/// otherwise the top-right anchor.
pub fn initial_position(prefs: &Preferences, monitor: Vec2, panel: Vec2) -> Pos2 {
    prefs
        .window_position()
        .unwrap_or_else(|| default_position(monitor, panel))
}

/// Reports each change of the window origin exactly once.
///
/// After [`MoveTracker::settle`] the tracker waits for the window to arrive at
/// the requested origin and reports nothing until it does, or until the user
/// starts dragging.
#[derive(Debug, Default)]
pub struct MoveTracker {
    last: Option<Pos2>,
    pending: Option<Pos2>,
}

impl MoveTracker {
    /// Marks `origin` as requested by us rather than by the user.
    pub fn settle(&mut self, origin: Pos2) {
        self.last = Some(origin);
        self.pending = Some(origin);
    }

    pub fn user_drag(&mut self) {
        self.pending = None;
    }

    /// Returns the new origin if it differs from the last one seen. The first
    /// observation only establishes the baseline.
    pub fn observe(&mut self, origin: Pos2) -> Option<Pos2> {
        let previous = self.last.replace(origin);
        if let Some(target) = self.pending {
            if target == origin {
                self.pending = None;
            }
            return None;
        }
        match previous {
            Some(previous) if previous != origin => Some(origin),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Toggle24Hour,
    ToggleShowSeconds,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Toggle {
        action: MenuAction,
        label: &'static str,
        checked: bool,
    },
    Separator,
    Command {
        action: MenuAction,
        label: &'static str,
        shortcut: KeyboardShortcut,
    },
}

/// The context menu as it must look right now. Built from `prefs` every time
/// the menu is drawn so the check marks are never stale.
pub fn menu_entries(prefs: &Preferences) -> [MenuEntry; 4] {
    [
        MenuEntry::Toggle {
            action: MenuAction::Toggle24Hour,
            label: "24-Hour Time",
            checked: prefs.use_24_hour,
        },
        MenuEntry::Toggle {
            action: MenuAction::ToggleShowSeconds,
            label: "Show Seconds",
            checked: prefs.show_seconds,
        },
        MenuEntry::Separator,
        MenuEntry::Command {
            action: MenuAction::Quit,
            label: "Quit",
            shortcut: QUIT_SHORTCUT,
        },
    ]
}

/// Draws the menu and returns the chosen action, if any.
pub fn show_menu(ui: &mut egui::Ui, prefs: &Preferences) -> Option<MenuAction> {
    let mut chosen = None;
    for entry in menu_entries(prefs) {
        match entry {
            MenuEntry::Toggle {
                action,
                label,
                mut checked,
            } => {
                if ui.checkbox(&mut checked, label).clicked() {
                    chosen = Some(action);
                }
            }
            MenuEntry::Separator => {
                ui.separator();
            }
            MenuEntry::Command {
                action,
                label,
                shortcut,
            } => {
                let button =
                    egui::Button::new(label).shortcut_text(ui.ctx().format_shortcut(&shortcut));
                if ui.add(button).clicked() {
                    chosen = Some(action);
                }
            }
        }
    }
    if chosen.is_some() {
        ui.close_menu();
    }
    chosen
}

/// Applies a menu choice. Returns `true` when the process should quit.
pub fn apply(
    action: MenuAction,
    store: &mut PreferenceStore,
    storage: Option<&mut (dyn eframe::Storage + '_)>,
) -> bool {
    log::debug!("menu action {action:?}");
    match action {
        MenuAction::Toggle24Hour => store.toggle_use_24_hour(storage),
        MenuAction::ToggleShowSeconds => store.toggle_show_seconds(storage),
        MenuAction::Quit => return true,
    }
    false
}
