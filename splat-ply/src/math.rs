//! Gaussian parameter math: opacity activation and covariance assembly.
//!
//! Everything here is pure f32 arithmetic with a fixed evaluation order, so
//! identical inputs always produce bit-identical outputs.

use glam::Vec3;

/// Numerically stable logistic sigmoid.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Normalize a quaternion `(x, y, z, w)`. A zero quaternion is returned as-is.
#[inline]
pub fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let [x, y, z, w] = q;
    let len = (x * x + y * y + z * z + w * w).sqrt();
    let inv = if len > 0.0 { 1.0 / len } else { 1.0 };
    [x * inv, y * inv, z * inv, w * inv]
}

/// Rotation matrix columns for a unit quaternion `(x, y, z, w)`.
pub fn quat_to_mat3_cols(q: [f32; 4]) -> [Vec3; 3] {
    let [x, y, z, w] = q;
    let xx = x * x;
    let yy = y * y;
    let zz = z * z;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;

    [
        Vec3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy)),
        Vec3::new(2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx)),
        Vec3::new(2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy)),
    ]
}

/// Build the 3D covariance `Σ = R · diag(s²) · Rᵀ` from a quaternion
/// `(x, y, z, w)` and per-axis linear scale.
///
/// The quaternion does not need to be normalized. Returns the upper
/// triangle `[m11, m12, m13, m22, m23, m33]`.
pub fn covariance_from_quat_scale(q: [f32; 4], scale: Vec3) -> [f32; 6] {
    let [c0, c1, c2] = quat_to_mat3_cols(normalize_quat(q));

    let sx2 = scale.x * scale.x;
    let sy2 = scale.y * scale.y;
    let sz2 = scale.z * scale.z;

    let m11 = sx2 * c0.x * c0.x + sy2 * c1.x * c1.x + sz2 * c2.x * c2.x;
    let m12 = sx2 * c0.x * c0.y + sy2 * c1.x * c1.y + sz2 * c2.x * c2.y;
    let m13 = sx2 * c0.x * c0.z + sy2 * c1.x * c1.z + sz2 * c2.x * c2.z;

    let m22 = sx2 * c0.y * c0.y + sy2 * c1.y * c1.y + sz2 * c2.y * c2.y;
    let m23 = sx2 * c0.y * c0.z + sy2 * c1.y * c1.z + sz2 * c2.y * c2.z;

    let m33 = sx2 * c0.z * c0.z + sy2 * c1.z * c1.z + sz2 * c2.z * c2.z;

    [m11, m12, m13, m22, m23, m33]
}
