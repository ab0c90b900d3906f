//! SketchCode Application
//!
//! Headless driver for the editing engine: imports a sketch, replays scripted
//! input, exports the result and runs code conversion.

mod app;

pub use app::{App, AppConfig, Summary, load_script};
