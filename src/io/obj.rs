//! Wavefront OBJ format support.
//!
//! Loading goes through `tobj` with triangulation disabled, so quads and
//! larger polygons reach the mesh untouched. Only positions and faces are
//! used; normals, texture coordinates and materials are ignored.
//!
//! Groups and objects are read into one mesh. Vertices keep the order of
//! the file's `v` lines, and `v` lines with identical coordinates become a
//! single vertex.
//!
//! Saved files start with a `# <vertices> <faces>` comment, followed by one
//! `v` line per vertex and one `f` line per face (1-based indices).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex_polygons, HalfEdgeMesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use quadmesh::io::obj;
/// use quadmesh::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("bunny.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader, path)
}

/// Read a mesh in OBJ format from any buffered reader.
///
/// ```
/// use quadmesh::io::obj;
/// use quadmesh::mesh::HalfEdgeMesh;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
/// let mesh: HalfEdgeMesh = obj::read(&mut text.as_bytes()).unwrap();
/// assert!(mesh.is_quad_mesh());
/// ```
pub fn read<R: BufRead, I: MeshIndex>(reader: &mut R) -> Result<HalfEdgeMesh<I>> {
    read_from(reader, Path::new("<stream>"))
}

fn read_from<R: BufRead, I: MeshIndex>(reader: &mut R, path: &Path) -> Result<HalfEdgeMesh<I>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let (models, _) = tobj::load_obj_buf(
        &mut text.as_bytes(),
        &tobj::LoadOptions {
            single_index: false,
            triangulate: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| MeshError::load(path, e.to_string()))?;

    // tobj numbers positions per group and object. Map them back onto the
    // file's `v` list so that groups sharing vertices stay connected.
    let mut vertices = file_positions(&text);
    let mut lookup: HashMap<[u32; 3], usize> = HashMap::with_capacity(vertices.len());
    for (i, p) in vertices.iter().enumerate() {
        lookup.entry(position_key(p)).or_insert(i);
    }

    let mut faces: Vec<Vec<usize>> = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let remap: Vec<usize> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| {
                let p = [p[0], p[1], p[2]];
                *lookup.entry(position_key(&p)).or_insert_with(|| {
                    vertices.push(p);
                    vertices.len() - 1
                })
            })
            .collect();

        // An empty arity list means every face is a triangle
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut cursor = 0usize;
        for arity in arities {
            let end = cursor + arity;
            let Some(indices) = mesh.indices.get(cursor..end) else {
                return Err(MeshError::load(
                    path,
                    format!("object '{}' has a truncated face list", model.name),
                ));
            };
            let mut face = Vec::with_capacity(arity);
            for &i in indices {
                let Some(&v) = remap.get(i as usize) else {
                    return Err(MeshError::load(
                        path,
                        format!("object '{}' references a missing vertex", model.name),
                    ));
                };
                face.push(v);
            }
            faces.push(face);
            cursor = end;
        }
    }

    if faces.is_empty() {
        return Err(MeshError::load(path, "OBJ file contains no faces"));
    }

    log::debug!(
        "read {} vertices and {} faces from {} object(s)",
        vertices.len(),
        faces.len(),
        models.len()
    );

    let vertices: Vec<Point3<f64>> = vertices
        .iter()
        .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64))
        .collect();
    build_from_polygons(&vertices, &faces)
}

/// Every `v` line of the file, in order, parsed the same way tobj does.
fn file_positions(text: &str) -> Vec<[f32; 3]> {
    text.lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("v") {
                return None;
            }
            let x = tokens.next()?.parse().ok()?;
            let y = tokens.next()?.parse().ok()?;
            let z = tokens.next()?.parse().ok()?;
            Some([x, y, z])
        })
        .collect()
}

/// Coincident `v` lines share a key and therefore a vertex.
fn position_key(p: &[f32; 3]) -> [u32; 3] {
    [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()]
}

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use quadmesh::io::obj;
/// use quadmesh::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("bunny.obj").unwrap();
/// obj::save(&mesh, "bunny_copy.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh in OBJ format to any writer.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex_polygons(mesh);

    writeln!(writer, "# {} {}", vertices.len(), faces.len())?;

    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    for face in &faces {
        write!(writer, "f")?;
        for &i in face {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::quadrangulate::{tri_to_quad, QuadOptions};
    use crate::mesh::{FaceId, VertexId};

    const MIXED: &str = "\
# comment
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0.5 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
f 2//1 5//1 3//1
";

    #[test]
    fn test_read_keeps_polygons() {
        let mesh: HalfEdgeMesh = read(&mut MIXED.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(mesh.num_faces(), 2);
        assert!(mesh.is_quad(FaceId::new(0)));
        assert!(mesh.is_triangle(FaceId::new(1)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_write_format() {
        let mesh: HalfEdgeMesh = read(&mut MIXED.as_bytes()).unwrap();
        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# 5 2");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 5);
        assert_eq!(lines[1], "v 0 0 0");
        assert_eq!(lines[6], "f 1 2 3 4");
        assert_eq!(lines[7], "f 2 5 3");
    }

    #[test]
    fn test_file_roundtrip() {
        let mesh: HalfEdgeMesh = read(&mut MIXED.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.obj");

        save(&mesh, &path).unwrap();
        let loaded: HalfEdgeMesh = load(&path).unwrap();

        assert_eq!(loaded.num_vertices(), mesh.num_vertices());
        assert_eq!(loaded.num_faces(), mesh.num_faces());
        assert_eq!(loaded.count_quads(), 1);
        assert!((loaded.surface_area() - mesh.surface_area()).abs() < 1e-6);
    }

    #[test]
    fn test_groups_share_vertices() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng a\nf 1 2 3\ng b\nf 1 3 4\n";
        let mut mesh: HalfEdgeMesh = read(&mut text.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 5);
        mesh.check_correctness().unwrap();

        // The diagonal is interior, so the two triangles pair up
        let report = tri_to_quad(&mut mesh, &QuadOptions::default()).unwrap();
        assert_eq!(report.merged_pairs, 1);
        assert!(mesh.is_quad_mesh());
    }

    #[test]
    fn test_objects_are_concatenated() {
        let text = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 5 0 0
v 6 0 0
v 5 1 0
f 4 5 6
";
        let mesh: HalfEdgeMesh = read(&mut text.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(*mesh.position(VertexId::new(3)), Point3::new(5.0, 0.0, 0.0));
        let second: Vec<usize> = mesh.face_vertices(FaceId::new(1)).map(|v| v.index()).collect();
        assert_eq!(second, vec![3, 4, 5]);
    }

    #[test]
    fn test_vertices_keep_file_order() {
        let text = "v 9 9 9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 4 3 2\n";
        let mesh: HalfEdgeMesh = read(&mut text.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(*mesh.position(VertexId::new(0)), Point3::new(9.0, 9.0, 9.0));
        assert_eq!(*mesh.position(VertexId::new(3)), Point3::new(0.0, 1.0, 0.0));
        let corners: Vec<usize> = mesh.face_vertices(FaceId::new(0)).map(|v| v.index()).collect();
        assert_eq!(corners, vec![3, 2, 1]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_no_faces_is_error() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        let result: Result<HalfEdgeMesh> = read(&mut text.as_bytes());
        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<HalfEdgeMesh> = load(dir.path().join("absent.obj"));
        assert!(matches!(result, Err(MeshError::Io(_))));
    }
}
