//! Field resolution for splat vertex elements
//!
//! Splat exporters disagree on property names, so every field the decoder
//! needs is looked up through an ordered list of accepted synonyms. The
//! lookup happens once per parse; the decode loops only see resolved
//! column/offset/type triples.

use super::header::{PlyElement, PlyProperty, ScalarType};
use crate::error::PlyError;
use std::collections::HashMap;
use tracing::debug;

const POSITION: [(&str, &[&str]); 3] = [
    ("x", &["x", "pos_x", "position_x"]),
    ("y", &["y", "pos_y", "position_y"]),
    ("z", &["z", "pos_z", "position_z"]),
];

const SCALE: [(&str, &[&str]); 3] = [
    ("scale_0", &["scale_0", "sx", "scale_x", "scalex"]),
    ("scale_1", &["scale_1", "sy", "scale_y", "scaley"]),
    ("scale_2", &["scale_2", "sz", "scale_z", "scalez"]),
];

const ROTATION: [(QuatLayout, [&str; 4]); 3] = [
    (QuatLayout::Wxyz, ["rot_0", "rot_1", "rot_2", "rot_3"]),
    (QuatLayout::Xyzw, ["qx", "qy", "qz", "qw"]),
    (QuatLayout::Xyzw, ["rot_x", "rot_y", "rot_z", "rot_w"]),
];

const OPACITY: (&str, &[&str]) = ("opacity", &["opacity", "alpha", "opac"]);

const COLOR: [&[&str]; 3] = [&["red", "r"], &["green", "g"], &["blue", "b"]];

const SH_DC: [&[&str]; 3] = [&["f_dc_0"], &["f_dc_1"], &["f_dc_2"]];

/// Location of one scalar property inside a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldRef {
    /// Column index in declaration order (ASCII rows).
    pub column: usize,
    /// Byte offset inside one binary record.
    pub offset: usize,
    /// Declared scalar type.
    pub ty: ScalarType,
}

/// Component order of the stored quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuatLayout {
    /// `(w, x, y, z)`, the 3DGS convention for `rot_0..rot_3`.
    Wxyz,
    /// `(x, y, z, w)`, used by `qx..qw` and `rot_x..rot_w`.
    Xyzw,
}

impl QuatLayout {
    /// Reorder raw components into `(x, y, z, w)`.
    #[inline]
    pub fn to_xyzw(&self, raw: [f32; 4]) -> [f32; 4] {
        match self {
            QuatLayout::Wxyz => [raw[1], raw[2], raw[3], raw[0]],
            QuatLayout::Xyzw => raw,
        }
    }
}

/// Where per-point color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorSource {
    /// Explicit `red/green/blue` (or `r/g/b`) channels.
    Rgb([FieldRef; 3]),
    /// Zeroth-order spherical harmonic coefficients `f_dc_0..2`.
    ShDc([FieldRef; 3]),
    /// No color fields; the configured default is used.
    Default,
}

/// Case-insensitive name → field index for one element.
#[derive(Debug, Clone)]
pub(crate) struct FieldIndex {
    fields: HashMap<String, FieldRef>,
    stride: usize,
}

impl FieldIndex {
    /// Build the index, computing byte offsets by summing type sizes in
    /// declaration order. Fails on list properties since they make the
    /// record size variable.
    pub fn build(element: &PlyElement) -> Result<Self, PlyError> {
        let mut fields = HashMap::with_capacity(element.properties.len());
        let mut stride = 0;

        for (column, property) in element.properties.iter().enumerate() {
            match property {
                PlyProperty::Scalar { name, ty } => {
                    // last declaration wins on duplicate names
                    fields.insert(
                        name.to_lowercase(),
                        FieldRef {
                            column,
                            offset: stride,
                            ty: *ty,
                        },
                    );
                    stride += ty.size_bytes();
                }
                PlyProperty::List { name, .. } => {
                    return Err(PlyError::UnsupportedListProperty {
                        element: element.name.clone(),
                        property: name.clone(),
                    });
                }
            }
        }

        Ok(Self { fields, stride })
    }

    /// Size in bytes of one binary record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn get(&self, name: &str) -> Option<FieldRef> {
        self.fields.get(&name.to_lowercase()).copied()
    }

    /// First synonym present in the element.
    pub fn pick(&self, names: &[&str]) -> Option<FieldRef> {
        names.iter().find_map(|n| self.get(n))
    }

    fn require(&self, (canonical, names): (&'static str, &[&str])) -> Result<FieldRef, PlyError> {
        self.pick(names)
            .ok_or(PlyError::MissingRequiredField(canonical))
    }

    fn pick_all<const N: usize>(&self, names: [&[&str]; N]) -> Option<[FieldRef; N]> {
        let mut out = [FieldRef {
            column: 0,
            offset: 0,
            ty: ScalarType::Float,
        }; N];
        for (slot, synonyms) in out.iter_mut().zip(names) {
            *slot = self.pick(synonyms)?;
        }
        Some(out)
    }
}

/// Every field the splat decoders read, resolved once per parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SplatFields {
    pub position: [FieldRef; 3],
    pub scale: [FieldRef; 3],
    pub rotation: [FieldRef; 4],
    pub quat_layout: QuatLayout,
    pub opacity: FieldRef,
    pub color: ColorSource,
    /// Number of scalar columns per record.
    pub columns: usize,
    /// Size in bytes of one binary record.
    pub stride: usize,
}

impl SplatFields {
    pub fn resolve(element: &PlyElement) -> Result<Self, PlyError> {
        let index = FieldIndex::build(element)?;

        let position = [
            index.require(POSITION[0])?,
            index.require(POSITION[1])?,
            index.require(POSITION[2])?,
        ];
        let scale = [
            index.require(SCALE[0])?,
            index.require(SCALE[1])?,
            index.require(SCALE[2])?,
        ];

        let (quat_layout, rotation) = ROTATION
            .into_iter()
            .find_map(|(layout, names)| {
                let [a, b, c, d] = names.map(|n| index.get(n));
                Some((layout, [a?, b?, c?, d?]))
            })
            .ok_or(PlyError::MissingRequiredField("rotation"))?;

        let opacity = index.require(OPACITY)?;

        let color = if let Some(rgb) = index.pick_all(COLOR) {
            ColorSource::Rgb(rgb)
        } else if let Some(dc) = index.pick_all(SH_DC) {
            ColorSource::ShDc(dc)
        } else {
            ColorSource::Default
        };

        debug!(
            "Resolved splat fields on '{}': quaternion {:?}, color {}, stride {} bytes",
            element.name,
            quat_layout,
            match color {
                ColorSource::Rgb(_) => "rgb",
                ColorSource::ShDc(_) => "f_dc",
                ColorSource::Default => "default",
            },
            index.stride()
        );

        Ok(Self {
            position,
            scale,
            rotation,
            quat_layout,
            opacity,
            color,
            columns: element.properties.len(),
            stride: index.stride(),
        })
    }
}
