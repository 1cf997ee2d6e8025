use std::time::Duration;

use eframe::egui;
use tokio::{task, time};

/// Re-sample the wall clock twice a second so no second boundary is missed.
pub const CLOCK_TICK: Duration = Duration::from_millis(500);

/// About 15 Hz for the border animation.
pub const BORDER_TICK: Duration = Duration::from_nanos(1_000_000_000 / 15);

/// Wakes the UI thread every `period`. The task only requests a repaint; all
/// state is read and written by the frame that follows.
pub fn spawn_repaint_ticker(ctx: egui::Context, period: Duration) -> task::JoinHandle<()> {
    task::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            ctx.request_repaint();
        }
    })
}
