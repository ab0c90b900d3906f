//! Main application entry point.

use anyhow::Result;
use clap::{ArgAction, Parser};
use sketchcode_app::{App, AppConfig};
use sketchcode_core::{EditorConfig, ShortcutRegistry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sketchcode")]
#[command(version, about = "Sketch editor engine that turns drawings into code")]
struct Cli {
    /// Editor configuration (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sketch to load before replaying the script
    #[arg(long, short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Editor commands to replay (JSON array)
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the resulting sketch here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Convert the sketch to code and write the files into DIR
    #[arg(long, value_name = "DIR")]
    convert: Option<PathBuf>,

    /// Print keyboard shortcuts and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_shortcuts: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_shortcuts {
        println!("Keyboard shortcuts:");
        for shortcut in ShortcutRegistry::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        return Ok(());
    }

    log::info!("Starting SketchCode");

    let editor = match &cli.config {
        Some(path) => AppConfig::load_editor_config(path)?,
        None => EditorConfig::default(),
    };

    let mut app = App::new(AppConfig {
        editor,
        input: cli.input,
        script: cli.script,
        output: cli.output,
        convert_dir: cli.convert,
    });
    let summary = app.run()?;
    log::info!(
        "Session finished: {} shapes, {} commands, {} undo steps",
        summary.shapes,
        summary.commands,
        summary.undo_steps
    );
    Ok(())
}
