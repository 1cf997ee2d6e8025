#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod border;
pub mod clock;
pub mod logging;
pub mod preferences;
pub mod ticker;
pub mod window;

pub use app::ClockApp;
