//! Per-point decoding shared by the binary and ASCII paths.

use super::fields::{ColorSource, FieldRef, SplatFields};
use crate::color::{clamp255, sh_dc_to_byte};
use crate::error::PlyError;
use crate::math::{covariance_from_quat_scale, sigmoid};
use crate::options::SplatOptions;
use glam::Vec3;

/// Source of raw scalar values for one record.
pub(crate) trait RecordReader {
    /// Read a field as f32.
    fn read(&mut self, field: FieldRef) -> Result<f32, PlyError>;

    /// Whether explicit RGB values are normalized floats that need scaling
    /// by 255, as opposed to bytes already in 0-255.
    fn rgb_is_normalized(&self, fields: &[FieldRef; 3], values: [f32; 3]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DecodedPoint {
    pub center: Vec3,
    pub covariance: [f32; 6],
    pub rgba: [u8; 4],
}

/// Turns raw field values into center, covariance and color.
pub(crate) struct PointDecoder<'a> {
    fields: &'a SplatFields,
    options: &'a SplatOptions,
}

impl<'a> PointDecoder<'a> {
    pub fn new(fields: &'a SplatFields, options: &'a SplatOptions) -> Self {
        Self { fields, options }
    }

    fn read3<R: RecordReader>(reader: &mut R, f: &[FieldRef; 3]) -> Result<[f32; 3], PlyError> {
        Ok([reader.read(f[0])?, reader.read(f[1])?, reader.read(f[2])?])
    }

    pub fn decode<R: RecordReader>(&self, reader: &mut R) -> Result<DecodedPoint, PlyError> {
        let fields = self.fields;

        let center = Vec3::from_array(Self::read3(reader, &fields.position)?);

        let mut scale = Self::read3(reader, &fields.scale)?;
        if self.options.assume_log_scale {
            scale = scale.map(f32::exp);
        }

        let raw_rot = [
            reader.read(fields.rotation[0])?,
            reader.read(fields.rotation[1])?,
            reader.read(fields.rotation[2])?,
            reader.read(fields.rotation[3])?,
        ];
        let quat = fields.quat_layout.to_xyzw(raw_rot);

        let opacity = reader.read(fields.opacity)?;
        let alpha = if self.options.assume_logit_opacity {
            sigmoid(opacity)
        } else {
            opacity
        };

        let covariance = covariance_from_quat_scale(quat, Vec3::from_array(scale));

        let [r, g, b] = match &fields.color {
            ColorSource::Rgb(rgb) => {
                let values = Self::read3(reader, rgb)?;
                if reader.rgb_is_normalized(rgb, values) {
                    values.map(|v| clamp255(v * 255.0))
                } else {
                    values.map(clamp255)
                }
            }
            ColorSource::ShDc(dc) => Self::read3(reader, dc)?.map(sh_dc_to_byte),
            ColorSource::Default => {
                let [r, g, b, _] = self.options.default_rgba;
                [r, g, b]
            }
        };

        Ok(DecodedPoint {
            center,
            covariance,
            rgba: [r, g, b, clamp255(alpha * 255.0)],
        })
    }
}
