//! Sketch-to-code conversion.
//!
//! The editor hands a serialized sketch to a [`CodeGenerator`] and stores
//! whatever comes back. Only the newest request may write its outcome; a
//! result that arrives for a superseded request is dropped.

mod mock;

pub use mock::MockGenerator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Conversion errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Nothing to convert")]
    EmptySketch,
    #[error("Conversion request failed: {0}")]
    Request(String),
    #[error("No content returned from AI")]
    EmptyResponse,
    #[error("Failed to parse AI response as JSON: {0}")]
    MalformedResponse(String),
}

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Boxed future for generator calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Generated project: file name to source, plus an HTML preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub files: BTreeMap<String, String>,
    #[serde(rename = "previewHTML")]
    pub preview_html: String,
}

/// Parse the raw text a language model returned.
pub fn parse_response(raw: &str) -> ConversionResult<GeneratedCode> {
    if raw.trim().is_empty() {
        return Err(ConversionError::EmptyResponse);
    }
    serde_json::from_str(raw).map_err(|_| ConversionError::MalformedResponse(raw.to_string()))
}

/// A backend that turns a serialized sketch into code.
///
/// The sketch is the compact JSON array of shapes captured when the request started.
pub trait CodeGenerator {
    fn generate<'a>(&'a self, sketch: &'a str) -> BoxFuture<'a, ConversionResult<GeneratedCode>>;
}

/// A conversion in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Identifies the request when its outcome comes back.
    pub ticket: u64,
    /// Sketch JSON captured at request time.
    pub sketch: String,
}

/// Conversion status shown next to the sketch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionState {
    busy: bool,
    result: Option<GeneratedCode>,
    error: Option<String>,
    show_preview: bool,
    generation: u64,
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn result(&self) -> Option<&GeneratedCode> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn set_show_preview(&mut self, show: bool) {
        self.show_preview = show;
    }

    /// Start a request for `sketch`. Supersedes any request still in flight.
    pub fn begin(&mut self, sketch: String) -> ConversionRequest {
        self.generation += 1;
        self.busy = true;
        self.error = None;
        log::debug!("Conversion request {} started", self.generation);
        ConversionRequest {
            ticket: self.generation,
            sketch,
        }
    }

    /// Store the outcome of request `ticket`.
    ///
    /// Returns false, changing nothing, if a newer request has started since.
    pub fn finish(&mut self, ticket: u64, outcome: ConversionResult<GeneratedCode>) -> bool {
        if ticket != self.generation {
            log::warn!(
                "Discarding result of conversion request {} (current is {})",
                ticket,
                self.generation
            );
            return false;
        }

        self.busy = false;
        match outcome {
            Ok(code) => {
                log::info!("Conversion produced {} files", code.files.len());
                self.result = Some(code);
                self.show_preview = true;
            }
            Err(e) => {
                log::error!("Error converting sketch: {}", e);
                self.error = Some(e.to_string());
            }
        }
        true
    }
}
