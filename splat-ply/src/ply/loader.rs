//! Splat PLY parsing entry points

use super::ascii::decode_ascii;
use super::binary::decode_binary;
use super::fields::SplatFields;
use super::header::{PlyFormat, parse_header};
use crate::error::PlyError;
use crate::options::SplatOptions;
use crate::types::SplatPlyBuffers;
use tracing::{debug, info};

/// Parse a Gaussian splat PLY file with default options.
pub fn parse_splat_ply(bytes: &[u8]) -> Result<SplatPlyBuffers, PlyError> {
    parse_splat_ply_with_options(bytes, &SplatOptions::default())
}

/// Parse a Gaussian splat PLY file into flat GPU-ready buffers.
///
/// Supports ASCII and both binary encodings. The splat element (by default
/// `vertex`) must not contain list properties; other elements may appear
/// before or after it and are skipped.
#[tracing::instrument(skip_all, fields(len = bytes.len(), element = %options.vertex_element_name))]
pub fn parse_splat_ply_with_options(
    bytes: &[u8],
    options: &SplatOptions,
) -> Result<SplatPlyBuffers, PlyError> {
    let parsed = parse_header(bytes)?;
    let header = &parsed.header;

    let element_index = header
        .element_index(&options.vertex_element_name)
        .ok_or_else(|| PlyError::ElementNotFound(options.vertex_element_name.clone()))?;
    let element = &header.elements[element_index];

    let fields = SplatFields::resolve(element)?;
    debug!(
        "Decoding {} '{}' records ({} columns, {} format)",
        element.count, element.name, fields.columns, header.format
    );

    let buffers = match header.format {
        PlyFormat::BinaryLittleEndian | PlyFormat::BinaryBigEndian => {
            decode_binary(bytes, &parsed, element_index, &fields, options)?
        }
        PlyFormat::Ascii => decode_ascii(bytes, &parsed, element_index, &fields, options)?,
    };

    info!(
        "Decoded {} splats from {} PLY",
        buffers.count, header.format
    );
    Ok(buffers)
}
