//! UI layer for the desktop viewer.

pub mod app;

pub use app::DesktopGuiApp;
