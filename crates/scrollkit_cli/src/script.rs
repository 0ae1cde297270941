//! Replay script format
//!
//! A script describes the scrollable surface and a list of input steps:
//!
//! ```json
//! {
//!   "surface": { "visible_size": 100, "scroll_size": 1000, "scrollbar_size": 200 },
//!   "steps": [
//!     { "kind": "hover", "inside": true },
//!     { "kind": "down", "part": "slider", "x": 305, "y": 10 },
//!     { "kind": "move", "x": 305, "y": 20 },
//!     { "kind": "up", "x": 305, "y": 20 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scrollkit_core::Buttons;

/// Replay script
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Script {
    #[serde(default)]
    pub surface: SurfaceSpec,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let script: Script = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(script)
    }
}

/// Scrollable surface the scrollbar is attached to
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceSpec {
    /// Viewport size along the scrollbar axis
    pub visible_size: f32,
    /// Content size along the scrollbar axis
    pub scroll_size: f32,
    /// Scrollbar length in pixels
    pub scrollbar_size: f32,
    /// Page X of the scrollbar element
    pub x: f32,
    /// Page Y of the scrollbar element
    pub y: f32,
    /// Pixels scrolled per unit of wheel delta
    pub wheel_step: f32,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            visible_size: 100.0,
            scroll_size: 1000.0,
            scrollbar_size: 200.0,
            x: 0.0,
            y: 0.0,
            wheel_step: 16.0,
        }
    }
}

/// Part of the scrollbar a press lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartSpec {
    Track,
    Slider,
    StartArrow,
    EndArrow,
    /// Pressed on the scrollable surface; the scrollbar hit-tests it
    Delegate,
}

fn default_buttons() -> Buttons {
    Buttons::LEFT
}

/// One input step
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Down {
        part: PartSpec,
        x: f32,
        y: f32,
        #[serde(default = "default_buttons")]
        buttons: Buttons,
    },
    Move {
        x: f32,
        y: f32,
        #[serde(default = "default_buttons")]
        buttons: Buttons,
    },
    Up {
        x: f32,
        y: f32,
    },
    /// Pointer entered or left the scrollable surface
    Hover {
        inside: bool,
    },
    /// Let time pass
    Wait {
        ms: u64,
    },
    /// Relayout of the scrollable surface
    Resize {
        visible_size: Option<f32>,
        scroll_size: Option<f32>,
        scrollbar_size: Option<f32>,
    },
    /// Another writer (keyboard, program) scrolled the surface
    Scroll {
        position: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script: Script = serde_json::from_str(
            r#"{
                "surface": { "visible_size": 50, "x": 300 },
                "steps": [
                    { "kind": "down", "part": "delegate", "x": 305, "y": 10 },
                    { "kind": "move", "x": 305, "y": 20, "buttons": 0 },
                    { "kind": "wait", "ms": 250 },
                    { "kind": "resize", "scroll_size": 400 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.surface.visible_size, 50.0);
        assert_eq!(script.surface.scroll_size, 1000.0);
        assert_eq!(script.surface.x, 300.0);
        assert_eq!(script.steps.len(), 4);

        match &script.steps[0] {
            Step::Down { part, buttons, .. } => {
                assert_eq!(*part, PartSpec::Delegate);
                assert!(buttons.left());
            }
            other => panic!("unexpected step {:?}", other),
        }
        match &script.steps[1] {
            Step::Move { buttons, .. } => assert!(!buttons.any()),
            other => panic!("unexpected step {:?}", other),
        }
        match &script.steps[3] {
            Step::Resize {
                visible_size,
                scroll_size,
                ..
            } => {
                assert_eq!(*visible_size, None);
                assert_eq!(*scroll_size, Some(400.0));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let result: std::result::Result<Script, _> =
            serde_json::from_str(r#"{ "steps": [ { "kind": "teleport" } ] }"#);
        assert!(result.is_err());
    }
}
