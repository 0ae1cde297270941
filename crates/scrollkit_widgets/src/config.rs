//! Scrollbar options
//!
//! Construction-time configuration for a [`ScrollbarWidget`](crate::ScrollbarWidget).
//! Options deserialize from TOML; every field is optional:
//!
//! ```toml
//! axis = "horizontal"
//! visibility = "auto"
//! scroll_by_page = true
//! snap_back = true
//! has_arrows = true
//! arrow_size = 11.0
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::Result;
use crate::scrollbar_state::{ScrollbarState, MINIMUM_SLIDER_SIZE};
use crate::visibility::ScrollbarVisibility;

/// Options for one scrollbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarOptions {
    /// Orientation
    pub axis: Axis,
    /// Defer drawing until the owner calls `render()`
    pub lazy_render: bool,
    /// Visibility policy
    pub visibility: ScrollbarVisibility,
    /// Extra class appended to the scrollbar class name
    pub extra_class_name: String,
    /// Track clicks page by one viewport instead of jumping
    pub scroll_by_page: bool,
    /// Restore the pre-drag position when the pointer strays too far
    /// across the track
    pub snap_back: bool,
    /// Cross-axis size in pixels
    pub thickness: f32,
    /// Pixels reserved by each end arrow
    pub arrow_size: f32,
    /// Draw arrow buttons at the track ends
    pub has_arrows: bool,
    /// Lower bound for the slider length
    pub min_slider_size: f32,
    /// Delay before a held arrow starts repeating
    pub arrow_repeat_delay_ms: u64,
    /// Period of a held arrow's repeats
    pub arrow_repeat_interval_ms: f64,
    /// Wheel delta sent per arrow activation
    pub arrow_scroll_delta: f32,
}

impl Default for ScrollbarOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            lazy_render: false,
            visibility: ScrollbarVisibility::Auto,
            extra_class_name: String::new(),
            scroll_by_page: false,
            snap_back: false,
            thickness: 10.0,
            arrow_size: 0.0,
            has_arrows: false,
            min_slider_size: MINIMUM_SLIDER_SIZE,
            arrow_repeat_delay_ms: 200,
            arrow_repeat_interval_ms: 1000.0 / 24.0,
            arrow_scroll_delta: 1.0,
        }
    }
}

impl ScrollbarOptions {
    /// Vertical scrollbar (default axis)
    pub fn vertical() -> Self {
        Self::default()
    }

    /// Horizontal scrollbar
    pub fn horizontal() -> Self {
        Self {
            axis: Axis::Horizontal,
            ..Default::default()
        }
    }

    /// Scrollbar shown whenever the content overflows
    pub fn always_visible() -> Self {
        Self {
            visibility: ScrollbarVisibility::Visible,
            ..Default::default()
        }
    }

    /// Scrollbar that is never shown
    pub fn hidden() -> Self {
        Self {
            visibility: ScrollbarVisibility::Hidden,
            ..Default::default()
        }
    }

    /// Classic desktop scrollbar: arrows, paged track clicks, snap-back
    pub fn classic(arrow_size: f32) -> Self {
        Self {
            has_arrows: true,
            arrow_size,
            scroll_by_page: true,
            snap_back: true,
            ..Default::default()
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_extra_class_name(mut self, extra_class_name: impl Into<String>) -> Self {
        self.extra_class_name = extra_class_name.into();
        self
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Pixels reserved at each end of the track, zero without arrows
    pub fn effective_arrow_size(&self) -> f32 {
        if self.has_arrows {
            self.arrow_size
        } else {
            0.0
        }
    }

    /// Class suffix, `horizontal`/`vertical` plus the extra class
    pub fn class_suffix(&self) -> String {
        let axis = match self.axis {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        };
        if self.extra_class_name.is_empty() {
            axis.to_string()
        } else {
            format!("{axis} {}", self.extra_class_name)
        }
    }

    pub fn arrow_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.arrow_repeat_delay_ms)
    }

    pub fn arrow_repeat_interval(&self) -> Duration {
        // Negative or NaN intervals fall back to the scheduler's minimum
        Duration::try_from_secs_f64(self.arrow_repeat_interval_ms / 1000.0).unwrap_or_default()
    }

    /// Empty geometry model configured from these options
    pub fn build_state(&self) -> ScrollbarState {
        ScrollbarState::new(self.effective_arrow_size(), 0.0)
            .with_thickness(self.thickness)
            .with_min_slider_size(self.min_slider_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScrollbarOptions::default();
        assert_eq!(options.axis, Axis::Vertical);
        assert_eq!(options.visibility, ScrollbarVisibility::Auto);
        assert!(!options.snap_back);
        assert_eq!(options.min_slider_size, 20.0);
        assert_eq!(options.arrow_repeat_delay(), Duration::from_millis(200));
        assert_eq!(options.arrow_repeat_interval().as_millis(), 41);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = ScrollbarOptions::from_toml_str(
            r#"
            axis = "horizontal"
            visibility = "visible"
            snap_back = true
            extra_class_name = "editor"
            "#,
        )
        .unwrap();

        assert_eq!(options.axis, Axis::Horizontal);
        assert_eq!(options.visibility, ScrollbarVisibility::Visible);
        assert!(options.snap_back);
        assert!(!options.scroll_by_page);
        assert_eq!(options.thickness, 10.0);
        assert_eq!(options.class_suffix(), "horizontal editor");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = ScrollbarOptions::from_toml_str("axis = \"diagonal\"").unwrap_err();
        assert!(matches!(err, crate::ScrollbarError::Options(_)));
    }

    #[test]
    fn test_arrow_size_only_with_arrows() {
        let mut options = ScrollbarOptions::default();
        options.arrow_size = 11.0;
        assert_eq!(options.effective_arrow_size(), 0.0);

        let options = ScrollbarOptions::classic(11.0);
        assert_eq!(options.effective_arrow_size(), 11.0);
        assert_eq!(options.build_state().arrow_size(), 11.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ScrollbarOptions::load_from_file(Path::new("/nonexistent/scrollbar.toml"))
            .unwrap_err();
        assert!(matches!(err, crate::ScrollbarError::Io(_)));
    }
}
