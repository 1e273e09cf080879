//! Decoded splat buffers.
//!
//! These are flat, GPU-upload-ready arrays: no per-point structs, one
//! allocation per attribute. Index `i` in every buffer is record `i` of the
//! vertex element in file order.

use crate::color::pack_rgba;
use crate::ply::PlyFormat;
use glam::Vec3;

/// Axis-aligned bounds of the decoded centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    /// Compute bounds from an iterator of positions. Returns `None` when the
    /// iterator is empty.
    pub fn from_positions(positions: impl Iterator<Item = Vec3>) -> Option<Self> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut count = 0usize;

        for pos in positions {
            min = min.min(pos);
            max = max.max(pos);
            count += 1;
        }

        (count > 0).then_some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the diagonal length.
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Output of a splat PLY parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SplatPlyBuffers {
    /// Number of splats.
    pub count: u32,
    /// Data encoding of the source file.
    pub format: PlyFormat,
    /// `x, y, z` per splat.
    pub center: Vec<f32>,
    /// Upper triangle `m11, m12, m13, m22, m23, m33` per splat.
    pub covariance: Vec<f32>,
    /// `r, g, b, a` bytes per splat.
    pub rgba: Vec<[u8; 4]>,
    /// Bounds of `center`, `None` for an empty file.
    pub bounds: Option<SceneBounds>,
}

impl SplatPlyBuffers {
    /// Allocate zeroed buffers for `count` splats.
    pub(crate) fn with_count(count: usize, format: PlyFormat) -> Self {
        Self {
            count: count as u32,
            format,
            center: vec![0.0; count * 3],
            covariance: vec![0.0; count * 6],
            rgba: vec![[0; 4]; count],
            bounds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn center_at(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.center[i * 3..i * 3 + 3])
    }

    pub fn covariance_at(&self, i: usize) -> [f32; 6] {
        let mut out = [0.0; 6];
        out.copy_from_slice(&self.covariance[i * 6..i * 6 + 6]);
        out
    }

    pub fn rgba_at(&self, i: usize) -> [u8; 4] {
        self.rgba[i]
    }

    /// One `r | g << 8 | b << 16 | a << 24` word per splat.
    pub fn rgba_packed(&self) -> Vec<u32> {
        self.rgba.iter().copied().map(pack_rgba).collect()
    }

    pub fn center_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.center)
    }

    pub fn covariance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.covariance)
    }

    /// Four bytes per splat, `r, g, b, a`.
    pub fn rgba_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rgba)
    }

    pub(crate) fn set(&mut self, i: usize, center: Vec3, covariance: [f32; 6], rgba: [u8; 4]) {
        self.center[i * 3..i * 3 + 3].copy_from_slice(&center.to_array());
        self.covariance[i * 6..i * 6 + 6].copy_from_slice(&covariance);
        self.rgba[i] = rgba;
    }

    pub(crate) fn finish(&mut self) {
        let n = self.len();
        self.bounds = SceneBounds::from_positions((0..n).map(|i| self.center_at(i)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_positions() {
        let bounds = SceneBounds::from_positions(
            [Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 4.0, 2.0)].into_iter(),
        )
        .unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(bounds.size(), Vec3::new(2.0, 6.0, 2.0));
    }

    #[test]
    fn test_bounds_empty() {
        assert!(SceneBounds::from_positions(std::iter::empty()).is_none());
    }

    #[test]
    fn test_buffer_accessors() {
        let mut buffers = SplatPlyBuffers::with_count(2, PlyFormat::Ascii);
        buffers.set(1, Vec3::new(1.0, 2.0, 3.0), [1.0, 0.0, 0.0, 2.0, 0.0, 3.0], [10, 20, 30, 40]);
        buffers.finish();

        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers.center.len(), 6);
        assert_eq!(buffers.covariance.len(), 12);
        assert_eq!(buffers.center_at(1), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buffers.covariance_at(1), [1.0, 0.0, 0.0, 2.0, 0.0, 3.0]);
        assert_eq!(buffers.rgba_at(1), [10, 20, 30, 40]);
        assert_eq!(buffers.rgba_packed()[1], 0x281E_140A);
        assert_eq!(buffers.rgba_bytes(), &[0, 0, 0, 0, 10, 20, 30, 40]);
        assert_eq!(buffers.center_bytes().len(), 6 * 4);
        assert_eq!(buffers.covariance_bytes().len(), 12 * 4);
        assert_eq!(buffers.bounds.unwrap().max, Vec3::new(1.0, 2.0, 3.0));
    }
}
