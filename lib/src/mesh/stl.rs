//! STL reading and writing.
//!
//! Both ASCII and binary files are handled by `stl_io`, which returns an
//! indexed mesh of `f32` vertices. Each indexed face is expanded back into a
//! [`Facet`] with its own vertex copies, in file order.

use super::{Facet, Model};
use crate::geometry::Point3;
use crate::{CoordF, Error, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

/// Load an STL file (ASCII or binary) into a [`Model`].
///
/// The model is named after the file stem.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    info!("Loading mesh from {:?}", path);

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    read_model(&mut reader, name)
        .map_err(|e| Error::Mesh(format!("{}: {}", path.display(), e)))
}

/// Parse in-memory STL data (ASCII or binary).
pub fn parse_stl(bytes: &[u8], name: impl Into<String>) -> Result<Model> {
    let mut cursor = Cursor::new(bytes);
    read_model(&mut cursor, name.into()).map_err(|e| Error::Mesh(e.to_string()))
}

/// Write a model as binary STL.
pub fn save_stl<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving mesh to {:?}", path);

    let to_f32 = |p: &Point3| [p.x as f32, p.y as f32, p.z as f32];
    let triangles: Vec<stl_io::Triangle> = model
        .facets()
        .iter()
        .map(|facet| stl_io::Triangle {
            normal: stl_io::Normal::new(to_f32(&facet.normal)),
            vertices: [
                stl_io::Vertex::new(to_f32(&facet.vertices[0])),
                stl_io::Vertex::new(to_f32(&facet.vertices[1])),
                stl_io::Vertex::new(to_f32(&facet.vertices[2])),
            ],
        })
        .collect();

    let mut writer = BufWriter::new(File::create(path)?);
    stl_io::write_stl(&mut writer, triangles.iter())?;
    writer.flush()?;
    Ok(())
}

fn read_model<R: Read + Seek>(reader: &mut R, name: String) -> std::io::Result<Model> {
    let stl = stl_io::read_stl(reader)?;
    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let point = |v: &stl_io::Vector<f32>| {
        Point3::new(v.0[0] as CoordF, v.0[1] as CoordF, v.0[2] as CoordF)
    };

    let mut facets = Vec::with_capacity(stl.faces.len());
    for face in &stl.faces {
        let mut corners = [Point3::default(); 3];
        for (corner, &index) in corners.iter_mut().zip(face.vertices.iter()) {
            let vertex = stl.vertices.get(index).ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("face references missing vertex {}", index),
                )
            })?;
            *corner = point(vertex);
        }
        facets.push(Facet::new(point(&face.normal), corners));
    }

    Ok(Model::new(name, facets))
}
