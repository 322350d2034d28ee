//! STL (Stereolithography) support.
//!
//! STL is triangle soup: every facet stores its own three vertices, so a
//! loaded mesh has `3 × faces` vertices and no shared edges. Weld before
//! any topological check.
//!
//! # Binary Layout
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored, recomputed from winding)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! # ASCII Layout
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```

// Mesh indices are u32 and STL coordinates are f32 by format definition
#![allow(clippy::cast_possible_truncation)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Point3, Vector3, Vertex};

use crate::error::{IoError, IoResult, parse_number};

const HEADER_SIZE: usize = 80;
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;
const TRIANGLE_SIZE: usize = 50;

/// STL flavour to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    /// Compact little-endian binary.
    #[default]
    Binary,
    /// Human-readable text.
    Ascii,
}

/// Load an STL file, detecting ASCII or binary content.
///
/// # Errors
///
/// [`IoError::FileNotFound`] if the file is missing, otherwise any parse
/// error from [`parse_stl`].
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::open(path, e))?;
    parse_stl(&bytes)
}

/// Parse STL bytes.
///
/// A file is binary when its size matches the triangle count in the
/// preamble exactly; otherwise text starting with `solid` is parsed as
/// ASCII. Some exporters write binary files whose header starts with
/// `solid`, which the size check catches.
///
/// # Errors
///
/// - [`IoError::InvalidContent`] for unrecognisable or malformed content
/// - [`IoError::Truncated`] for a binary file shorter than declared
/// - [`IoError::BadNumber`] for a bad ASCII coordinate
pub fn parse_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() >= PREAMBLE_SIZE {
        let declared = triangle_count(bytes);
        if PREAMBLE_SIZE + declared as usize * TRIANGLE_SIZE == bytes.len() {
            return parse_binary(bytes);
        }
    }

    let text_start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if bytes[text_start..].starts_with(b"solid") {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| IoError::invalid_content(format!("ASCII STL is not UTF-8: {e}")))?;
        return parse_ascii(text);
    }

    if bytes.len() >= PREAMBLE_SIZE {
        return parse_binary(bytes);
    }
    Err(IoError::invalid_content("file too small to be valid STL"))
}

fn triangle_count(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ])
}

fn parse_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let expected = triangle_count(bytes);
    let body = &bytes[PREAMBLE_SIZE..];
    let available = (body.len() / TRIANGLE_SIZE) as u32;
    if available < expected {
        return Err(IoError::Truncated {
            expected,
            got: available,
        });
    }

    let mut mesh = IndexedMesh::with_capacity(expected as usize * 3, expected as usize);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(expected as usize) {
        let base = mesh.vertices.len() as u32;
        // Bytes 0..12 hold the stored normal
        for corner in record[12..48].chunks_exact(12) {
            mesh.vertices.push(Vertex::new(read_point(corner)));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }
    Ok(mesh)
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let coord = |i: usize| {
        f64::from(f32::from_le_bytes([
            buf[i],
            buf[i + 1],
            buf[i + 2],
            buf[i + 3],
        ]))
    };
    Point3::new(coord(0), coord(4), coord(8))
}

fn parse_ascii(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<Vertex> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => corners.clear(),
            "vertex" => {
                let mut coord = || -> IoResult<f64> {
                    let token = tokens.next().ok_or_else(|| {
                        IoError::invalid_content(format!(
                            "line {}: vertex needs three coordinates",
                            line_no + 1
                        ))
                    })?;
                    parse_number(token, line_no + 1)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                corners.push(Vertex::from_coords(x, y, z));
            }
            "endfacet" => {
                if corners.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: facet has {} vertices, expected 3",
                        line_no + 1,
                        corners.len()
                    )));
                }
                let base = mesh.vertices.len() as u32;
                mesh.vertices.append(&mut corners);
                mesh.faces.push([base, base + 1, base + 2]);
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Write a mesh as STL to any writer.
///
/// # Errors
///
/// Propagates writer failures.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, mut writer: W, encoding: StlEncoding) -> IoResult<()> {
    match encoding {
        StlEncoding::Binary => {
            let mut header = [b' '; HEADER_SIZE];
            let text = b"binary STL written by mesh-io";
            header[..text.len()].copy_from_slice(text);
            writer.write_all(&header)?;
            writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;
        }
        StlEncoding::Ascii => writeln!(writer, "solid mesh")?,
    }

    for &[a, b, c] in &mesh.faces {
        let corners = [a, b, c].map(|i| mesh.vertices[i as usize].position);
        let normal = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        match encoding {
            StlEncoding::Binary => {
                for value in normal.iter().chain(corners.iter().flat_map(|p| p.coords.iter())) {
                    writer.write_all(&(*value as f32).to_le_bytes())?;
                }
                writer.write_all(&0u16.to_le_bytes())?;
            }
            StlEncoding::Ascii => {
                writeln!(
                    writer,
                    "  facet normal {:.6e} {:.6e} {:.6e}",
                    normal.x, normal.y, normal.z
                )?;
                writeln!(writer, "    outer loop")?;
                for p in &corners {
                    writeln!(writer, "      vertex {:.9e} {:.9e} {:.9e}", p.x, p.y, p.z)?;
                }
                writeln!(writer, "    endloop")?;
                writeln!(writer, "  endfacet")?;
            }
        }
    }

    if encoding == StlEncoding::Ascii {
        writeln!(writer, "endsolid mesh")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, encoding: StlEncoding) -> IoResult<()> {
    let file = File::create(path)?;
    write_stl(mesh, BufWriter::new(file), encoding)
}
