//! In-memory PLY writers for integration tests.

#![allow(dead_code)]

/// One splat as stored in a 3DGS file: log-scale, `(w, x, y, z)` rotation
/// and logit opacity.
#[derive(Debug, Clone, Copy)]
pub struct RawSplat {
    pub position: [f32; 3],
    pub log_scale: [f32; 3],
    pub rot_wxyz: [f32; 4],
    pub opacity: f32,
    pub rgb: [u8; 3],
}

impl RawSplat {
    fn values(&self) -> Vec<f64> {
        let mut v: Vec<f64> = Vec::with_capacity(14);
        v.extend(self.position.iter().map(|&x| x as f64));
        v.extend(self.log_scale.iter().map(|&x| x as f64));
        v.extend(self.rot_wxyz.iter().map(|&x| x as f64));
        v.push(self.opacity as f64);
        v.extend(self.rgb.iter().map(|&x| x as f64));
        v
    }
}

pub const SPLAT_PROPS: [(&str, &str); 14] = [
    ("float", "x"),
    ("float", "y"),
    ("float", "z"),
    ("float", "scale_0"),
    ("float", "scale_1"),
    ("float", "scale_2"),
    ("float", "rot_0"),
    ("float", "rot_1"),
    ("float", "rot_2"),
    ("float", "rot_3"),
    ("float", "opacity"),
    ("uchar", "red"),
    ("uchar", "green"),
    ("uchar", "blue"),
];

pub fn sample_splats() -> Vec<RawSplat> {
    vec![
        RawSplat {
            position: [0.5, -1.25, 3.0],
            log_scale: [-1.0, -2.0, -0.5],
            rot_wxyz: [0.9, 0.1, -0.3, 0.2],
            opacity: 0.0,
            rgb: [200, 10, 90],
        },
        RawSplat {
            position: [-4.0, 2.0, 0.125],
            log_scale: [0.0, 0.25, -3.0],
            rot_wxyz: [1.0, 0.0, 0.0, 0.0],
            opacity: 20.0,
            rgb: [0, 255, 128],
        },
        RawSplat {
            position: [10.0, 0.0, -7.5],
            log_scale: [-0.75, -0.75, -0.75],
            rot_wxyz: [0.2, 0.7, 0.1, -0.6],
            opacity: -1.5,
            rgb: [33, 66, 99],
        },
    ]
}

pub fn header(format: &str, elements: &[(&str, usize, &[(&str, &str)])]) -> String {
    let mut out = format!("ply\nformat {format} 1.0\ncomment generated by tests\n");
    for (name, count, props) in elements {
        out.push_str(&format!("element {name} {count}\n"));
        for (ty, prop) in props.iter() {
            out.push_str(&format!("property {ty} {prop}\n"));
        }
    }
    out.push_str("end_header\n");
    out
}

pub fn write_scalar(out: &mut Vec<u8>, ty: &str, v: f64, little: bool) {
    macro_rules! put {
        ($x:expr) => {{
            let x = $x;
            if little {
                out.extend_from_slice(&x.to_le_bytes())
            } else {
                out.extend_from_slice(&x.to_be_bytes())
            }
        }};
    }
    match ty {
        "char" => put!(v as i8),
        "uchar" => put!(v as u8),
        "short" => put!(v as i16),
        "ushort" => put!(v as u16),
        "int" => put!(v as i32),
        "uint" => put!(v as u32),
        "float" => put!(v as f32),
        "double" => put!(v),
        other => panic!("unknown type {other}"),
    }
}

/// Binary file with only a vertex element laid out as [`SPLAT_PROPS`].
pub fn binary_splat_file(splats: &[RawSplat], little: bool) -> Vec<u8> {
    let format = if little {
        "binary_little_endian"
    } else {
        "binary_big_endian"
    };
    let mut out = header(format, &[("vertex", splats.len(), &SPLAT_PROPS[..])]).into_bytes();
    for splat in splats {
        for ((ty, _), v) in SPLAT_PROPS.iter().zip(splat.values()) {
            write_scalar(&mut out, ty, v, little);
        }
    }
    out
}

/// ASCII file with only a vertex element laid out as [`SPLAT_PROPS`].
pub fn ascii_splat_file(splats: &[RawSplat]) -> Vec<u8> {
    let mut out = header("ascii", &[("vertex", splats.len(), &SPLAT_PROPS[..])]);
    for splat in splats {
        let row: Vec<String> = splat.values().iter().map(|v| v.to_string()).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn assert_close(a: &[f32], b: &[f32], eps: f32) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!((x - y).abs() <= eps, "index {}: {} vs {}", i, x, y);
    }
}
