use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::config::RevealConfig,
    foundation::core::{Edge, Rect, Size},
    foundation::error::{RevealError, RevealResult},
    host::headless::{DocumentSpec, NodeSpec},
};

/// A document plus a script of steps to play against it.
///
/// ```json
/// {
///   "document": { "viewport": {"width": 1000, "height": 800},
///                 "document": {"width": 1000, "height": 10000},
///                 "nodes": [{ "name": "hdr", "rect": {"x0":0,"y0":2000,"x1":1000,"y1":2500},
///                             "classes": ["sticky-reveal"], "position": "sticky",
///                             "offsets": {"top": "20px"} }] },
///   "steps": [{ "op": "scroll", "y": 3000 }, { "op": "scroll", "y": 2900 }]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Runtime settings; defaults when omitted.
    #[serde(default)]
    pub config: RevealConfig,
    /// Initial document.
    pub document: DocumentSpec,
    /// Steps, each followed by one manager frame.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted change to the document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Scroll a container (the root when `target` is omitted). Missing
    /// coordinates keep their current value.
    Scroll {
        /// Scroll container name.
        #[serde(default)]
        target: Option<String>,
        /// Horizontal offset.
        #[serde(default)]
        x: Option<f64>,
        /// Vertical offset.
        #[serde(default)]
        y: Option<f64>,
    },
    /// Resize the window.
    ResizeViewport {
        /// New inner size.
        size: Size,
        /// New visual viewport, if it differs.
        #[serde(default)]
        visual: Option<Size>,
    },
    /// Author or clear an edge offset.
    SetOffset {
        /// Element name.
        node: String,
        /// Edge to change.
        edge: Edge,
        /// New value; `null` clears it.
        #[serde(default)]
        value: Option<String>,
    },
    /// Move or resize an element's plain-flow box.
    SetRect {
        /// Element name.
        node: String,
        /// New box in document coordinates.
        rect: Rect,
    },
    /// Add or remove a class.
    SetClass {
        /// Element name.
        node: String,
        /// Class name.
        class: String,
        /// Whether the class should be present.
        present: bool,
    },
    /// Insert a new element.
    Append {
        /// The element.
        node: NodeSpec,
    },
    /// Remove an element (and its subtree) from the document.
    Detach {
        /// Element name.
        node: String,
    },
}

impl Scenario {
    /// Parse and validate a scenario.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let scenario: Self = serde_json::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn from_path(path: &Path) -> RevealResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scenario '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check settings and obviously broken documents before replay.
    pub fn validate(&self) -> RevealResult<()> {
        self.config.validate()?;
        let doc = &self.document;
        for (what, size) in [("viewport", doc.viewport), ("document", doc.document)] {
            if !(size.width.is_finite() && size.height.is_finite())
                || size.width <= 0.0
                || size.height <= 0.0
            {
                return Err(RevealError::validation(format!(
                    "{what} size must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenario/model.rs"]
mod tests;
