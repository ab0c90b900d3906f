//! Offline generator producing a fixed React project from the sketch.

use super::{BoxFuture, CodeGenerator, ConversionError, ConversionResult, GeneratedCode, parse_response};
use crate::shapes::Shape;
use std::collections::BTreeMap;

const APP_TSX: &str = r#"import React from 'react';
import './App.css';
import { shapes } from './shapes';

const App: React.FC = () => {
  return (
    <div className="app-container">
      <div className="canvas">
        {shapes.map((shape) => {
          switch (shape.type) {
            case 'rectangle':
              return (
                <div
                  key={shape.id}
                  className="shape rectangle"
                  style={{
                    left: `${shape.x}px`,
                    top: `${shape.y}px`,
                    width: `${shape.width}px`,
                    height: `${shape.height}px`,
                    transform: `rotate(${shape.rotation}deg)`,
                    border: `${shape.strokeWidth}px solid ${shape.stroke}`,
                    backgroundColor: shape.fill,
                  }}
                />
              );
            case 'circle':
              return (
                <div
                  key={shape.id}
                  className="shape circle"
                  style={{
                    left: `${shape.x - shape.radius}px`,
                    top: `${shape.y - shape.radius}px`,
                    width: `${shape.radius * 2}px`,
                    height: `${shape.radius * 2}px`,
                    transform: `rotate(${shape.rotation}deg)`,
                    border: `${shape.strokeWidth}px solid ${shape.stroke}`,
                    backgroundColor: shape.fill,
                  }}
                />
              );
            case 'text':
              return (
                <div
                  key={shape.id}
                  className="shape text"
                  style={{
                    left: `${shape.x}px`,
                    top: `${shape.y}px`,
                    transform: `rotate(${shape.rotation}deg)`,
                    color: shape.fill,
                    fontSize: `${shape.fontSize}px`,
                  }}
                >
                  {shape.text}
                </div>
              );
            case 'arrow': {
              const [x1, y1, x2, y2] = shape.points;
              const length = Math.hypot(x2 - x1, y2 - y1);
              const angle = (Math.atan2(y2 - y1, x2 - x1) * 180) / Math.PI;
              return (
                <div
                  key={shape.id}
                  className="shape arrow"
                  style={{ left: `${shape.x}px`, top: `${shape.y}px`, transform: `rotate(${shape.rotation}deg)` }}
                >
                  <div
                    className="arrow-line"
                    style={{
                      width: `${length}px`,
                      height: `${shape.strokeWidth}px`,
                      backgroundColor: shape.stroke,
                      transformOrigin: 'left center',
                      transform: `rotate(${angle}deg)`,
                    }}
                  />
                </div>
              );
            }
            default:
              return null;
          }
        })}
      </div>
    </div>
  );
};

export default App;
"#;

const APP_CSS: &str = r#".app-container {
  width: 100%;
  height: 100vh;
  position: relative;
  overflow: hidden;
  background-color: #ffffff;
}

.canvas {
  width: 100%;
  height: 100%;
  position: relative;
}

.shape {
  position: absolute;
}

.circle {
  border-radius: 50%;
}

.text {
  white-space: pre;
  font-family: Arial, sans-serif;
}

.arrow {
  width: 0;
  height: 0;
}

.arrow-line {
  position: absolute;
}
"#;

/// Deterministic generator that needs no network.
///
/// Emits `App.tsx`, `App.css` and `shapes.ts` plus a static HTML preview of
/// the shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build the project for a sketch without going through the async interface.
    ///
    /// The reply goes through [`parse_response`] like a model's would.
    pub fn render(&self, sketch: &str) -> ConversionResult<GeneratedCode> {
        parse_response(&self.respond(sketch)?)
    }

    /// The raw reply text: a JSON object with `files` and `previewHTML`.
    pub fn respond(&self, sketch: &str) -> ConversionResult<String> {
        let shapes: Vec<Shape> = serde_json::from_str(sketch)
            .map_err(|e| ConversionError::Request(format!("invalid sketch: {e}")))?;
        if shapes.is_empty() {
            return Err(ConversionError::EmptySketch);
        }

        let shapes_json = serde_json::to_string_pretty(&shapes)
            .map_err(|e| ConversionError::Request(format!("invalid sketch: {e}")))?;

        let mut files = BTreeMap::new();
        files.insert("App.tsx".to_string(), APP_TSX.to_string());
        files.insert("App.css".to_string(), APP_CSS.to_string());
        files.insert(
            "shapes.ts".to_string(),
            format!("// Generated shape data\nexport const shapes = {shapes_json};\n"),
        );

        let code = GeneratedCode {
            files,
            preview_html: preview_html(&shapes),
        };
        serde_json::to_string(&code)
            .map_err(|e| ConversionError::Request(format!("invalid reply: {e}")))
    }
}

impl CodeGenerator for MockGenerator {
    fn generate<'a>(&'a self, sketch: &'a str) -> BoxFuture<'a, ConversionResult<GeneratedCode>> {
        Box::pin(async move { self.render(sketch) })
    }
}

fn preview_html(shapes: &[Shape]) -> String {
    let mut ordered: Vec<&Shape> = shapes.iter().collect();
    ordered.sort_by_key(|s| s.z_index());

    let elements: Vec<String> = ordered.into_iter().map(preview_element).collect();
    format!(
        "<div id=\"root\">\n  <div class=\"app-container\">\n    <div class=\"canvas\">\n      {}\n    </div>\n  </div>\n</div>",
        elements.join("\n      ")
    )
}

fn preview_element(shape: &Shape) -> String {
    let rotation = shape.rotation();
    match shape {
        Shape::Rectangle(r) => format!(
            "<div class=\"shape rectangle\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; transform: rotate({}deg); border: {}px solid {}; background-color: {};\"></div>",
            r.base.x, r.base.y, r.width, r.height, rotation, r.stroke_width, r.stroke, r.fill
        ),
        Shape::Circle(c) => format!(
            "<div class=\"shape circle\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; transform: rotate({}deg); border: {}px solid {}; background-color: {};\"></div>",
            c.base.x - c.radius,
            c.base.y - c.radius,
            c.radius * 2.0,
            c.radius * 2.0,
            rotation,
            c.stroke_width,
            c.stroke,
            c.fill
        ),
        Shape::Text(t) => format!(
            "<div class=\"shape text\" style=\"left: {}px; top: {}px; transform: rotate({}deg); color: {}; font-size: {}px;\">{}</div>",
            t.base.x,
            t.base.y,
            rotation,
            t.fill,
            t.font_size,
            escape_html(&t.text)
        ),
        Shape::Arrow(a) => {
            let delta = a.end() - a.start();
            let angle = delta.y.atan2(delta.x).to_degrees();
            format!(
                "<div class=\"shape arrow\" style=\"left: {}px; top: {}px; transform: rotate({}deg);\"><div class=\"arrow-line\" style=\"width: {}px; height: {}px; background-color: {}; transform-origin: left center; transform: rotate({}deg);\"></div></div>",
                a.base.x,
                a.base.y,
                rotation,
                a.length(),
                a.stroke_width,
                a.stroke,
                angle
            )
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
