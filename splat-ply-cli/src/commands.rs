//! Subcommand implementations.

use crate::CliError;
use clap::Args;
use serde::Serialize;
use splat_ply::{PlyFormat, PlyHeader, PlyProperty, SplatOptions, SplatPlyBuffers};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    pub file: PathBuf,

    /// JSON file with decode options (camelCase keys)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scales are stored linearly, not as logarithms
    #[arg(long)]
    pub linear_scale: bool,

    /// Opacity is stored linearly, not as a logit
    #[arg(long)]
    pub linear_opacity: bool,

    /// Fail on malformed ASCII values
    #[arg(long)]
    pub strict: bool,

    /// Name of the element holding the splats
    #[arg(long)]
    pub element: Option<String>,

    /// Fallback color as R,G,B,A
    #[arg(long, value_parser = parse_rgba)]
    pub default_rgba: Option<[u8; 4]>,

    /// Directory to write center.bin, covariance.bin and rgba.bin into
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Write rgba.bin as packed u32 words
    #[arg(long)]
    pub packed: bool,
}

impl DecodeArgs {
    /// Options from the config file (or defaults) with flag overrides applied.
    pub fn options(&self) -> Result<SplatOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => serde_json::from_slice(&read(path)?)?,
            None => SplatOptions::default(),
        };

        if self.linear_scale {
            options.assume_log_scale = false;
        }
        if self.linear_opacity {
            options.assume_logit_opacity = false;
        }
        if self.strict {
            options.strict = true;
        }
        if let Some(name) = &self.element {
            options.vertex_element_name = name.clone();
        }
        if let Some(rgba) = self.default_rgba {
            options.default_rgba = rgba;
        }
        Ok(options)
    }
}

/// Parse `R,G,B,A` into four bytes.
pub fn parse_rgba(s: &str) -> Result<[u8; 4], CliError> {
    let bad = || CliError::BadRgba(s.to_string());
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|_| bad()))
        .collect::<Result<Vec<_>, _>>()?;
    <[u8; 4]>::try_from(parts).map_err(|_| bad())
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: PathBuf, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(&path, bytes).map_err(|source| CliError::Write { path, source })?;
    Ok(())
}

pub fn inspect(file: &Path, json: bool) -> Result<(), CliError> {
    let bytes = read(file)?;
    let parsed = splat_ply::parse_header(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.header)?);
    } else {
        print!("{}", header_report(&parsed.header, parsed.data_offset));
    }
    Ok(())
}

fn header_report(header: &PlyHeader, data_offset: usize) -> String {
    let mut out = format!(
        "format: {} {}\ndata offset: {} bytes\n",
        header.format, header.version, data_offset
    );
    for comment in &header.comments {
        out.push_str(&format!("comment: {}\n", comment));
    }
    for element in &header.elements {
        out.push_str(&format!("element {} ({})\n", element.name, element.count));
        for property in &element.properties {
            let line = match property {
                PlyProperty::Scalar { name, ty } => format!("  {} {}\n", ty, name),
                PlyProperty::List {
                    name,
                    count_ty,
                    item_ty,
                } => format!("  list<{}, {}> {}\n", count_ty, item_ty, name),
            };
            out.push_str(&line);
        }
    }
    out
}

#[derive(Serialize, Debug)]
struct DecodeSummary {
    count: u32,
    format: PlyFormat,
    bounds_min: Option<[f32; 3]>,
    bounds_max: Option<[f32; 3]>,
    radius: Option<f32>,
}

impl From<&SplatPlyBuffers> for DecodeSummary {
    fn from(buffers: &SplatPlyBuffers) -> Self {
        Self {
            count: buffers.count,
            format: buffers.format,
            bounds_min: buffers.bounds.map(|b| b.min.to_array()),
            bounds_max: buffers.bounds.map(|b| b.max.to_array()),
            radius: buffers.bounds.map(|b| b.radius()),
        }
    }
}

pub fn decode(args: &DecodeArgs) -> Result<(), CliError> {
    let options = args.options()?;
    let bytes = read(&args.file)?;
    let buffers = splat_ply::parse_splat_ply_with_options(&bytes, &options)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&DecodeSummary::from(&buffers))?
    );

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir).map_err(|source| CliError::Write {
            path: dir.clone(),
            source,
        })?;
        write(dir.join("center.bin"), buffers.center_bytes())?;
        write(dir.join("covariance.bin"), buffers.covariance_bytes())?;
        if args.packed {
            let packed = buffers.rgba_packed();
            write(dir.join("rgba.bin"), bytemuck::cast_slice(&packed))?;
        } else {
            write(dir.join("rgba.bin"), buffers.rgba_bytes())?;
        }
        info!(dir = %dir.display(), packed = args.packed, "Wrote splat buffers");
    }
    Ok(())
}
