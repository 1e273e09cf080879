//! ASCII record decoding

use super::fields::{FieldRef, SplatFields};
use super::header::ParsedHeader;
use super::record::{PointDecoder, RecordReader};
use crate::error::PlyError;
use crate::options::SplatOptions;
use crate::types::SplatPlyBuffers;
use tracing::{debug, warn};

struct AsciiRecord<'a, 'b> {
    tokens: &'b [&'a str],
    record: usize,
    strict: bool,
    malformed: &'b mut usize,
}

impl RecordReader for AsciiRecord<'_, '_> {
    fn read(&mut self, field: FieldRef) -> Result<f32, PlyError> {
        match self.tokens.get(field.column).map(|t| t.parse::<f32>()) {
            Some(Ok(v)) => Ok(v),
            _ if self.strict => Err(PlyError::MalformedRecord {
                record: self.record,
                column: field.column,
            }),
            _ => {
                *self.malformed += 1;
                Ok(f32::NAN)
            }
        }
    }

    // Text carries no width marker, so small values are taken as normalized.
    fn rgb_is_normalized(&self, _fields: &[FieldRef; 3], values: [f32; 3]) -> bool {
        values.iter().all(|&v| v <= 1.0)
    }
}

/// Decode the splat element of an ASCII PLY file.
///
/// Every record of every element occupies one line; records of elements
/// declared before the splat element are skipped.
pub(crate) fn decode_ascii(
    bytes: &[u8],
    parsed: &ParsedHeader,
    element_index: usize,
    fields: &SplatFields,
    options: &SplatOptions,
) -> Result<SplatPlyBuffers, PlyError> {
    let header = &parsed.header;
    let text = std::str::from_utf8(&bytes[parsed.data_offset..])
        .map_err(|_| PlyError::InvalidAsciiData)?;

    let skip = header.elements[..element_index]
        .iter()
        .fold(0usize, |acc, e| acc.saturating_add(e.count));
    if skip > 0 {
        debug!("Skipping {} records of preceding elements", skip);
    }

    let count = header.elements[element_index].count;
    let lines: Vec<&str> = text
        .split(parsed.newline.as_str())
        .filter(|l| !l.trim().is_empty())
        .skip(skip)
        .take(count)
        .collect();
    if lines.len() < count {
        return Err(PlyError::TruncatedData {
            expected: count,
            available: lines.len(),
        });
    }

    let mut buffers = SplatPlyBuffers::with_count(count, header.format);
    let decoder = PointDecoder::new(fields, options);
    let mut tokens: Vec<&str> = Vec::with_capacity(fields.columns);
    let mut malformed = 0usize;

    for (i, line) in lines.iter().enumerate() {
        tokens.clear();
        tokens.extend(line.split_whitespace());

        let point = decoder.decode(&mut AsciiRecord {
            tokens: &tokens,
            record: i,
            strict: options.strict,
            malformed: &mut malformed,
        })?;
        buffers.set(i, point.center, point.covariance, point.rgba);
    }

    if malformed > 0 {
        warn!(
            "{} malformed or missing ASCII values decoded as NaN",
            malformed
        );
    }

    buffers.finish();
    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::parse_header;

    const HEADER: &str = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty float scale_0\nproperty float scale_1\nproperty float scale_2\nproperty float rot_0\nproperty float rot_1\nproperty float rot_2\nproperty float rot_3\nproperty float opacity\nproperty float red\nproperty float green\nproperty float blue\nend_header\n";

    fn decode(body: &str, options: &SplatOptions) -> Result<SplatPlyBuffers, PlyError> {
        let bytes = format!("{HEADER}{body}").into_bytes();
        let parsed = parse_header(&bytes)?;
        let fields = SplatFields::resolve(&parsed.header.elements[0])?;
        decode_ascii(&bytes, &parsed, 0, &fields, options)
    }

    #[test]
    fn test_decode_two_rows() {
        let body = "1 2 3 0 0 0 1 0 0 0 0 1 0.5 0\n-1 -2 -3 0 0 0 1 0 0 0 20 10 200 255\n";
        let buffers = decode(body, &SplatOptions::default()).unwrap();
        assert_eq!(buffers.count, 2);
        assert_eq!(buffers.center, vec![1.0, 2.0, 3.0, -1.0, -2.0, -3.0]);
        assert_eq!(buffers.covariance_at(0), [1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        // all channels <= 1 are normalized floats
        assert_eq!(buffers.rgba_at(0), [255, 127, 0, 127]);
        // anything above 1 is already a byte
        assert_eq!(buffers.rgba_at(1), [10, 200, 255, 255]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let body = "\n1 2 3 0 0 0 1 0 0 0 0 1 1 1\n\n   \n4 5 6 0 0 0 1 0 0 0 0 1 1 1\n";
        let buffers = decode(body, &SplatOptions::default()).unwrap();
        assert_eq!(buffers.center_at(1).x, 4.0);
    }

    #[test]
    fn test_not_enough_lines() {
        let err = decode("1 2 3 0 0 0 1 0 0 0 0 1 1 1\n", &SplatOptions::default()).unwrap_err();
        assert_eq!(
            err,
            PlyError::TruncatedData {
                expected: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_malformed_token_is_nan() {
        let body = "abc 2 3 0 0 0 1 0 0 0 0 1 1 1\n1 2 3 0 0 0 1 0 0 0 0 1 1\n";
        let buffers = decode(body, &SplatOptions::default()).unwrap();
        assert!(buffers.center[0].is_nan());
        assert_eq!(buffers.center[1], 2.0);
        // missing blue column decodes as NaN, which clamps to 0
        assert_eq!(buffers.rgba_at(1)[2], 0);
    }

    #[test]
    fn test_strict_rejects_malformed_token() {
        let body = "1 2 3 0 0 0 1 0 0 0 0 1 1 1\n1 2 zz 0 0 0 1 0 0 0 0 1 1 1\n";
        let err = decode(body, &SplatOptions::default().with_strict(true)).unwrap_err();
        assert_eq!(err, PlyError::MalformedRecord { record: 1, column: 2 });
    }

    #[test]
    fn test_non_utf8_body() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1 2 3 0 0 0 1 0 0 0 0 1 1 1\n4 5 \xff 0 0 0 1 0 0 0 0 1 1 1\n");
        let parsed = parse_header(&bytes).unwrap();
        let fields = SplatFields::resolve(&parsed.header.elements[0]).unwrap();
        let err = decode_ascii(&bytes, &parsed, 0, &fields, &SplatOptions::default()).unwrap_err();
        assert_eq!(err, PlyError::InvalidAsciiData);
    }

    #[test]
    fn test_crlf_rows() {
        let bytes = format!("{HEADER}1 2 3 0 0 0 1 0 0 0 0 1 1 1\n4 5 6 0 0 0 1 0 0 0 0 1 1 1\n")
            .replace('\n', "\r\n")
            .into_bytes();
        let parsed = parse_header(&bytes).unwrap();
        let fields = SplatFields::resolve(&parsed.header.elements[0]).unwrap();
        let buffers = decode_ascii(&bytes, &parsed, 0, &fields, &SplatOptions::default()).unwrap();
        assert_eq!(buffers.center_at(1).z, 6.0);
    }
}
