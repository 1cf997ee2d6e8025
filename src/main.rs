#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

#[tokio::main]
async fn main() -> eframe::Result<()> {
    floating_clock::logging::init_logging();
    log::info!("starting {}", floating_clock::window::APP_NAME);

    eframe::run_native(
        floating_clock::window::APP_NAME,
        floating_clock::window::native_options(),
        Box::new(|cc| Box::new(floating_clock::ClockApp::new(cc))),
    )
}
