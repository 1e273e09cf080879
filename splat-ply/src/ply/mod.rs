//! PLY file parsing and splat decoding

mod ascii;
mod binary;
mod fields;
mod header;
mod loader;
mod record;

pub use header::{
    Newline, ParsedHeader, PlyElement, PlyFormat, PlyHeader, PlyProperty, ScalarType,
    parse_header,
};
pub use loader::{parse_splat_ply, parse_splat_ply_with_options};
