//! Decode configuration.

use serde::{Deserialize, Serialize};

/// Options controlling how raw PLY values are interpreted.
///
/// Deserializes from camelCase JSON; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplatOptions {
    /// Scales are stored as natural logarithms (3DGS convention).
    pub assume_log_scale: bool,
    /// Opacity is stored as a logit and needs a sigmoid.
    pub assume_logit_opacity: bool,
    /// Color used when the file has neither RGB nor `f_dc_*` fields. Only
    /// `r, g, b` are taken from it; alpha always comes from opacity.
    #[serde(rename = "defaultRGBA")]
    pub default_rgba: [u8; 4],
    /// Name of the element holding the splats, matched case-insensitively.
    pub vertex_element_name: String,
    /// Fail on malformed ASCII values instead of decoding them as NaN.
    pub strict: bool,
}

impl Default for SplatOptions {
    fn default() -> Self {
        Self {
            assume_log_scale: true,
            assume_logit_opacity: true,
            default_rgba: [255, 255, 255, 255],
            vertex_element_name: "vertex".to_string(),
            strict: false,
        }
    }
}

impl SplatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_scale(mut self, enabled: bool) -> Self {
        self.assume_log_scale = enabled;
        self
    }

    pub fn with_logit_opacity(mut self, enabled: bool) -> Self {
        self.assume_logit_opacity = enabled;
        self
    }

    pub fn with_default_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.default_rgba = rgba;
        self
    }

    pub fn with_vertex_element(mut self, name: impl Into<String>) -> Self {
        self.vertex_element_name = name.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
