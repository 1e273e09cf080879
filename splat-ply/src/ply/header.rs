//! PLY header parsing
//!
//! The header is the textual preamble of every PLY file, terminated by an
//! `end_header` line. It declares the data encoding and the layout of every
//! element that follows.

use crate::error::PlyError;
use serde::Serialize;
use tracing::debug;

const END_HEADER: &[u8] = b"end_header";

/// Data encoding declared by the `format` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(Self::Ascii),
            "binary_little_endian" => Some(Self::BinaryLittleEndian),
            "binary_big_endian" => Some(Self::BinaryBigEndian),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlyFormat::Ascii => "ascii",
            PlyFormat::BinaryLittleEndian => "binary_little_endian",
            PlyFormat::BinaryBigEndian => "binary_big_endian",
        }
    }
}

impl std::fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-width scalar kinds a property can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Parse a type token, accepting both the classic names and the sized
    /// aliases (`uint8`, `float32`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "char" | "int8" => Some(Self::Char),
            "uchar" | "uint8" => Some(Self::UChar),
            "short" | "int16" => Some(Self::Short),
            "ushort" | "uint16" => Some(Self::UShort),
            "int" | "int32" => Some(Self::Int),
            "uint" | "uint32" => Some(Self::UInt),
            "float" | "float32" => Some(Self::Float),
            "double" | "float64" => Some(Self::Double),
            _ => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::Char | ScalarType::UChar => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Char => "char",
            ScalarType::UChar => "uchar",
            ScalarType::Short => "short",
            ScalarType::UShort => "ushort",
            ScalarType::Int => "int",
            ScalarType::UInt => "uint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
        }
    }

    /// Byte-sized types carry colors already in the 0-255 range.
    pub fn is_byte(&self) -> bool {
        matches!(self, ScalarType::Char | ScalarType::UChar)
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property declared on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlyProperty {
    Scalar {
        name: String,
        ty: ScalarType,
    },
    List {
        name: String,
        count_ty: ScalarType,
        item_ty: ScalarType,
    },
}

impl PlyProperty {
    pub fn name(&self) -> &str {
        match self {
            PlyProperty::Scalar { name, .. } | PlyProperty::List { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlyElement {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PlyProperty>,
}

impl PlyElement {
    pub fn has_list_properties(&self) -> bool {
        self.properties
            .iter()
            .any(|p| matches!(p, PlyProperty::List { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub elements: Vec<PlyElement>,
    pub comments: Vec<String>,
}

impl PlyHeader {
    /// Find an element by name, ignoring ASCII case.
    pub fn element(&self, name: &str) -> Option<&PlyElement> {
        self.elements
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Position of an element in declaration order, ignoring ASCII case.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// Line terminator style detected after `end_header`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }
}

/// Result of header parsing: the header itself, where the data section
/// starts, and the terminator style to reuse for ASCII data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub header: PlyHeader,
    pub data_offset: usize,
    pub newline: Newline,
}

/// Locate the `end_header` sentinel.
///
/// Returns the offset of the sentinel, the offset right after its line
/// terminator, and the terminator style.
fn find_header_end(bytes: &[u8]) -> Result<(usize, usize, Newline), PlyError> {
    let pos = bytes
        .windows(END_HEADER.len())
        .position(|window| window == END_HEADER)
        .ok_or(PlyError::HeaderNotFound)?;

    let k = pos + END_HEADER.len();
    match &bytes[k..] {
        [b'\n', ..] => Ok((pos, k + 1, Newline::Lf)),
        [b'\r', b'\n', ..] => Ok((pos, k + 2, Newline::CrLf)),
        _ => {
            // 1-based line of the sentinel, for the error message
            let line = bytes[..pos].iter().filter(|&&b| b == b'\n').count() + 1;
            Err(PlyError::malformed(
                line,
                "end_header must be followed by \\n or \\r\\n",
            ))
        }
    }
}

/// Parse the PLY header from the start of `bytes`.
pub fn parse_header(bytes: &[u8]) -> Result<ParsedHeader, PlyError> {
    let (header_end, data_offset, newline) = find_header_end(bytes)?;
    let header_text =
        std::str::from_utf8(&bytes[..header_end]).map_err(|_| PlyError::InvalidHeaderEncoding)?;

    let mut lines = header_text
        .split(newline.as_str())
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    match lines.next() {
        Some((_, "ply")) => {}
        _ => return Err(PlyError::NotAPlyFile),
    }

    let mut format: Option<(PlyFormat, String)> = None;
    let mut comments = Vec::new();
    let mut elements: Vec<PlyElement> = Vec::new();

    for (line_no, line) in lines {
        let mut it = line.split_whitespace();
        let tag = it.next().unwrap_or("");

        match tag {
            "comment" => {
                let text = line["comment".len()..].trim_start();
                comments.push(text.to_string());
            }
            "obj_info" => {}
            "format" => {
                if format.is_some() {
                    return Err(PlyError::malformed(line_no, "duplicate format line"));
                }
                let fmt = it
                    .next()
                    .ok_or_else(|| PlyError::malformed(line_no, "format line without a format"))?;
                let f = PlyFormat::parse(fmt)
                    .ok_or_else(|| PlyError::UnsupportedFormat(fmt.to_string()))?;
                let version = it.next().unwrap_or("1.0").to_string();
                format = Some((f, version));
            }
            "element" => {
                let name = it
                    .next()
                    .ok_or_else(|| PlyError::malformed(line_no, "element without a name"))?;
                let count = it
                    .next()
                    .ok_or_else(|| PlyError::malformed(line_no, "element without a count"))?
                    .parse::<usize>()
                    .map_err(|_| PlyError::malformed(line_no, "bad element count"))?;
                elements.push(PlyElement {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            "property" => {
                let current = elements.last_mut().ok_or(PlyError::PropertyBeforeElement)?;
                current.properties.push(parse_property(line_no, it)?);
            }
            _ => return Err(PlyError::UnknownHeaderDirective(tag.to_string())),
        }
    }

    let (format, version) = format.ok_or(PlyError::MissingFormat)?;

    debug!(
        "PLY header: format={}, version={}, {} elements, data at byte {}",
        format,
        version,
        elements.len(),
        data_offset
    );

    Ok(ParsedHeader {
        header: PlyHeader {
            format,
            version,
            elements,
            comments,
        },
        data_offset,
        newline,
    })
}

fn parse_property<'a>(
    line_no: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<PlyProperty, PlyError> {
    let scalar = |s: &str| ScalarType::parse(s).ok_or_else(|| PlyError::UnknownScalarType(s.to_string()));
    let mut next = |what: &str| {
        tokens
            .next()
            .ok_or_else(|| PlyError::malformed(line_no, format!("property without {what}")))
    };

    let first = next("a type")?;
    if first == "list" {
        let count_ty = scalar(next("a list count type")?)?;
        let item_ty = scalar(next("a list item type")?)?;
        let name = next("a name")?;
        Ok(PlyProperty::List {
            name: name.to_string(),
            count_ty,
            item_ty,
        })
    } else {
        let ty = scalar(first)?;
        let name = next("a name")?;
        Ok(PlyProperty::Scalar {
            name: name.to_string(),
            ty,
        })
    }
}
