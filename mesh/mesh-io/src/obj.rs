//! Wavefront OBJ support (geometry only).
//!
//! Reads `v` and `f` records. Faces may use `v`, `v/vt`, `v//vn` or
//! `v/vt/vn` references, relative (negative) indices, and more than three
//! corners; polygons are fan-triangulated in their stored winding. Texture
//! coordinates, normals, groups and materials are ignored.

// Mesh indices are u32
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};

use crate::error::{IoError, IoResult, parse_number};

/// Load an OBJ file.
///
/// # Errors
///
/// [`IoError::FileNotFound`] if the file is missing, otherwise any parse
/// error from [`parse_obj`].
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| IoError::open(path, e))?;
    parse_obj(&text)
}

/// Parse OBJ text.
///
/// ```
/// use mesh_io::parse_obj;
///
/// let quad = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
/// let mesh = parse_obj(quad)?;
/// assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
/// # Ok::<(), mesh_io::IoError>(())
/// ```
///
/// # Errors
///
/// - [`IoError::BadNumber`] for malformed numbers
/// - [`IoError::InvalidContent`] for short records, zero or out-of-range
///   indices, and faces with fewer than three corners
pub fn parse_obj(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<u32> = Vec::with_capacity(4);

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("");
        let mut tokens = line.split_whitespace();
        let line_no = line_no + 1;

        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(|t| parse_number::<f64>(t, line_no))
                    .collect::<IoResult<Vec<_>>>()?;
                let [x, y, z] = coords[..] else {
                    return Err(IoError::invalid_content(format!(
                        "line {line_no}: vertex needs three coordinates"
                    )));
                };
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            Some("f") => {
                corners.clear();
                for token in tokens {
                    corners.push(resolve_index(token, mesh.vertices.len(), line_no)?);
                }
                if corners.len() < 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {line_no}: face has {} corners",
                        corners.len()
                    )));
                }
                let anchor = corners[0];
                mesh.faces
                    .extend(corners.windows(2).skip(1).map(|w| [anchor, w[0], w[1]]));
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Convert a 1-based (or negative, relative) OBJ reference to a 0-based index.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> IoResult<u32> {
    let position = token.split('/').next().unwrap_or(token);
    let raw: i64 = parse_number(position, line_no)?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertex_count as i64 + r),
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as u32),
        _ => Err(IoError::invalid_content(format!(
            "line {line_no}: vertex reference {raw} out of range (have {vertex_count})"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CUBE: &str = "\
# unit cube
o cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vn 0 0 -1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 4 8 7 3
f 1 5 8 4
f 2//1 3//1 7//1 6//1
";

    #[test]
    fn quad_cube_is_closed_with_unit_volume() {
        let mesh = parse_obj(CUBE).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn relative_indices() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn slash_forms() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1/1 3//1\n").unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn zero_index_rejected() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");
        assert!(matches!(err, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn forward_reference_rejected() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\nv 1 0 0\nv 0 1 0\n");
        assert!(matches!(err, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn degenerate_face_rejected() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n");
        assert!(matches!(err, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn short_vertex_rejected() {
        let err = parse_obj("v 0 0\n");
        assert!(matches!(err, Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn bad_coordinate_rejected() {
        assert!(matches!(
            parse_obj("v 0 0 0\nv 0 x 0\n"),
            Err(IoError::BadNumber { line: 2, .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.obj");
        std::fs::write(&path, CUBE).unwrap();
        assert_eq!(load_obj(&path).unwrap().faces.len(), 12);
    }
}
