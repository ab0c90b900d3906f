//! Headless editing session.
//!
//! Loads a sketch, replays a script of editor commands against it, then
//! writes the result and optionally converts it to code.

use anyhow::{Context, Result};
use sketchcode_core::{Editor, EditorCommand, EditorConfig, MockGenerator};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one session.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    /// Sketch to start from.
    pub input: Option<PathBuf>,
    /// JSON array of editor commands to replay.
    pub script: Option<PathBuf>,
    /// Where to write the final sketch. Stdout when unset.
    pub output: Option<PathBuf>,
    /// Directory to write generated code into.
    pub convert_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read editor settings from a JSON file.
    pub fn load_editor_config(path: &Path) -> Result<EditorConfig> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        EditorConfig::from_json(&json)
            .with_context(|| format!("Failed to load config {}", path.display()))
    }
}

/// What a session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub shapes: usize,
    pub commands: usize,
    pub undo_steps: usize,
    pub generated_files: usize,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    editor: Editor,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let editor = Editor::new(config.editor.clone());
        Self { config, editor }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Run the session. The exported sketch goes to stdout when no output file is set.
    pub fn run(&mut self) -> Result<Summary> {
        if let Some(input) = &self.config.input {
            let json = fs::read_to_string(input)
                .with_context(|| format!("Failed to read sketch {}", input.display()))?;
            self.editor
                .import_json(&json)
                .with_context(|| format!("Failed to import {}", input.display()))?;
        }

        let commands = match &self.config.script {
            Some(script) => load_script(script)?,
            None => Vec::new(),
        };
        let command_count = commands.len();
        for command in commands {
            self.editor.apply(command);
        }
        log::info!("Replayed {} commands", command_count);

        let json = self.editor.export_json()?;
        match &self.config.output {
            Some(output) => {
                fs::write(output, json)
                    .with_context(|| format!("Failed to write sketch {}", output.display()))?;
                log::info!("Saved sketch to {}", output.display());
            }
            None => println!("{json}"),
        }

        let generated_files = match self.config.convert_dir.clone() {
            Some(dir) => self.convert(&dir)?,
            None => 0,
        };

        let document = self.editor.document();
        Ok(Summary {
            shapes: document.len(),
            commands: command_count,
            undo_steps: document.undo_depth(),
            generated_files,
        })
    }

    /// Convert the sketch with the offline generator and write the files into `dir`.
    fn convert(&mut self, dir: &Path) -> Result<usize> {
        if !pollster::block_on(self.editor.convert(&MockGenerator::new()))? {
            log::warn!("Sketch is empty, nothing to convert");
            return Ok(0);
        }

        let conversion = self.editor.conversion();
        if let Some(error) = conversion.error() {
            anyhow::bail!("Conversion failed: {error}");
        }
        let Some(code) = conversion.result() else {
            anyhow::bail!("Conversion produced no result");
        };

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for (name, source) in &code.files {
            let path = dir.join(name);
            fs::write(&path, source)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        let preview = dir.join("preview.html");
        fs::write(&preview, &code.preview_html)
            .with_context(|| format!("Failed to write {}", preview.display()))?;

        log::info!("Wrote {} generated files to {}", code.files.len(), dir.display());
        Ok(code.files.len() + 1)
    }
}

/// Parse a JSON array of editor commands.
pub fn load_script(path: &Path) -> Result<Vec<EditorCommand>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid script {}", path.display()))
}
