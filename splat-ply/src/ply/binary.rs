//! Binary (little/big endian) record decoding

use super::fields::{FieldRef, SplatFields};
use super::header::{ParsedHeader, PlyElement, PlyFormat, PlyProperty, ScalarType};
use super::record::{PointDecoder, RecordReader};
use crate::error::PlyError;
use crate::options::SplatOptions;
use crate::types::SplatPlyBuffers;
use tracing::debug;

#[inline]
fn array<const N: usize>(b: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&b[..N]);
    out
}

/// Read one scalar from the start of `b`, widened to f64.
///
/// `b` must hold at least `ty.size_bytes()` bytes.
pub(crate) fn read_scalar(b: &[u8], ty: ScalarType, little: bool) -> f64 {
    macro_rules! num {
        ($t:ty, $n:literal) => {{
            let arr = array::<$n>(b);
            if little {
                <$t>::from_le_bytes(arr) as f64
            } else {
                <$t>::from_be_bytes(arr) as f64
            }
        }};
    }

    match ty {
        ScalarType::Char => b[0] as i8 as f64,
        ScalarType::UChar => b[0] as f64,
        ScalarType::Short => num!(i16, 2),
        ScalarType::UShort => num!(u16, 2),
        ScalarType::Int => num!(i32, 4),
        ScalarType::UInt => num!(u32, 4),
        ScalarType::Float => num!(f32, 4),
        ScalarType::Double => num!(f64, 8),
    }
}

fn truncated(expected: usize, available: usize) -> PlyError {
    PlyError::TruncatedData {
        expected,
        available,
    }
}

/// Number of bytes occupied by all records of `element` starting at
/// `start`. Elements with list properties are walked record by record.
pub(crate) fn element_byte_len(
    bytes: &[u8],
    start: usize,
    element: &PlyElement,
    little: bool,
) -> Result<usize, PlyError> {
    let available = bytes.len().saturating_sub(start);

    if !element.has_list_properties() {
        let stride: usize = element
            .properties
            .iter()
            .map(|p| match p {
                PlyProperty::Scalar { ty, .. } => ty.size_bytes(),
                PlyProperty::List { .. } => 0,
            })
            .sum();
        let len = stride
            .checked_mul(element.count)
            .ok_or_else(|| truncated(usize::MAX, available))?;
        if len > available {
            return Err(truncated(len, available));
        }
        return Ok(len);
    }

    let mut pos = start;
    for _ in 0..element.count {
        for property in &element.properties {
            match property {
                PlyProperty::Scalar { ty, .. } => pos += ty.size_bytes(),
                PlyProperty::List {
                    count_ty, item_ty, ..
                } => {
                    let end = pos + count_ty.size_bytes();
                    if end > bytes.len() {
                        return Err(truncated(end - start, available));
                    }
                    let n = read_scalar(&bytes[pos..end], *count_ty, little) as usize;
                    pos = n
                        .checked_mul(item_ty.size_bytes())
                        .and_then(|len| end.checked_add(len))
                        .ok_or_else(|| truncated(usize::MAX, available))?;
                }
            }
        }
    }

    if pos > bytes.len() {
        return Err(truncated(pos - start, available));
    }
    Ok(pos - start)
}

struct BinaryRecord<'a> {
    record: &'a [u8],
    little: bool,
}

impl RecordReader for BinaryRecord<'_> {
    #[inline]
    fn read(&mut self, field: FieldRef) -> Result<f32, PlyError> {
        Ok(read_scalar(&self.record[field.offset..], field.ty, self.little) as f32)
    }

    fn rgb_is_normalized(&self, fields: &[FieldRef; 3], _values: [f32; 3]) -> bool {
        !fields.iter().all(|f| f.ty.is_byte())
    }
}

/// Decode the splat element of a binary PLY file.
pub(crate) fn decode_binary(
    bytes: &[u8],
    parsed: &ParsedHeader,
    element_index: usize,
    fields: &SplatFields,
    options: &SplatOptions,
) -> Result<SplatPlyBuffers, PlyError> {
    let header = &parsed.header;
    let little = header.format != PlyFormat::BinaryBigEndian;

    let mut start = parsed.data_offset;
    for skipped in &header.elements[..element_index] {
        let len = element_byte_len(bytes, start, skipped, little)?;
        debug!("Skipping element '{}' ({} bytes)", skipped.name, len);
        start = start
            .checked_add(len)
            .ok_or_else(|| truncated(usize::MAX, bytes.len()))?;
    }

    let element = &header.elements[element_index];
    let count = element.count;
    let stride = fields.stride;
    let available = bytes.len().saturating_sub(start);
    let needed = stride
        .checked_mul(count)
        .ok_or_else(|| truncated(usize::MAX, available))?;
    if needed > available {
        return Err(truncated(needed, available));
    }

    let mut buffers = SplatPlyBuffers::with_count(count, header.format);
    let decoder = PointDecoder::new(fields, options);

    let body = &bytes[start..start + needed];
    // zero-sized records leave chunks_exact without a chunk size
    if stride > 0 {
        for (i, record) in body.chunks_exact(stride).enumerate() {
            let point = decoder.decode(&mut BinaryRecord { record, little })?;
            buffers.set(i, point.center, point.covariance, point.rgba);
        }
    }

    buffers.finish();
    Ok(buffers)
}
