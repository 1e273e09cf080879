//! Splat PLY
//!
//! Decoder for PLY files holding 3D Gaussian splat scenes. Turns raw file
//! bytes into flat center, covariance and RGBA8 buffers ready for GPU upload.
//! This crate performs no I/O and holds no state between calls.

pub mod color;
pub mod error;
pub mod math;
pub mod options;
pub mod ply;
pub mod types;

pub use color::{pack_rgba, unpack_rgba};
pub use error::PlyError;
pub use math::covariance_from_quat_scale;
pub use options::SplatOptions;
pub use ply::{
    ParsedHeader, PlyElement, PlyFormat, PlyHeader, PlyProperty, ScalarType, parse_header,
    parse_splat_ply, parse_splat_ply_with_options,
};
pub use types::{SceneBounds, SplatPlyBuffers};
