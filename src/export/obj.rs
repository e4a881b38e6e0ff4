//! Wavefront OBJ export.
//!
//! OBJ is a simple, widely-supported text-based 3D format.
//! The structure and the posable parts get separate materials sharing one
//! texture file.

use crate::error::Result;
use crate::mesher::geometry::Mesh;
use crate::rig::RigOutput;
use crate::scene::Material;
use crate::texture::TextureData;
use std::fmt::Write;

/// Export a posed rig to OBJ format.
/// Returns (obj_content, mtl_content) as strings.
pub fn export_obj(output: &RigOutput, name: &str) -> Result<(String, String)> {
    let total_verts = output.total_vertices();
    let total_tris = output.total_triangles();

    // Pre-size buffers: ~60 bytes per vertex line (v/vt/vn) × 3 + ~40 per face
    let obj_capacity = 256 + total_verts * 180 + total_tris * 40;
    let mut obj = String::with_capacity(obj_capacity);
    let mut mtl = String::with_capacity(512);

    // OBJ header
    writeln!(obj, "# Armor Stand Rig OBJ Export")?;
    writeln!(obj, "# Vertices: {}", total_verts)?;
    writeln!(obj, "# Triangles: {}", total_tris)?;
    writeln!(obj)?;

    writeln!(obj, "mtllib {}.mtl", name)?;
    writeln!(obj)?;

    writeln!(obj, "o {}", name)?;
    writeln!(obj)?;

    let groups = [
        (&output.opaque_mesh, format!("{}_structure", name), &output.opaque_material),
        (&output.transparent_mesh, format!("{}_parts", name), &output.transparent_material),
    ];

    // Write all vertices, UVs, and normals globally (OBJ has global pools)
    for (mesh, _, _) in &groups {
        for vertex in &mesh.vertices {
            writeln!(
                obj,
                "v {} {} {}",
                vertex.position[0], vertex.position[1], vertex.position[2]
            )?;
        }
    }
    writeln!(obj)?;

    for (mesh, _, _) in &groups {
        for vertex in &mesh.vertices {
            let [u, v] = obj_uv(&output.texture, vertex.uv);
            writeln!(obj, "vt {} {}", u, v)?;
        }
    }
    writeln!(obj)?;

    for (mesh, _, _) in &groups {
        for vertex in &mesh.vertices {
            writeln!(
                obj,
                "vn {} {} {}",
                vertex.normal[0], vertex.normal[1], vertex.normal[2]
            )?;
        }
    }
    writeln!(obj)?;

    // Write faces per material group
    let mut vertex_offset: usize = 0;
    for (mesh, material_name, _) in &groups {
        if !mesh.is_empty() {
            writeln!(obj, "usemtl {}", material_name)?;
            write_faces(&mut obj, mesh, vertex_offset)?;
            writeln!(obj)?;
        }
        vertex_offset += mesh.vertex_count();
    }

    // MTL file
    writeln!(mtl, "# Armor Stand Rig Material")?;
    for (_, material_name, material) in &groups {
        writeln!(mtl)?;
        write_material(&mut mtl, material_name, material, name)?;
    }

    Ok((obj, mtl))
}

/// OBJ texture coordinates put V=0 at the bottom of the image.
fn obj_uv(texture: &TextureData, uv: [f32; 2]) -> [f32; 2] {
    let [u, v] = texture.image_space_uv(uv);
    [u, 1.0 - v]
}

fn write_faces(obj: &mut String, mesh: &Mesh, vertex_offset: usize) -> Result<()> {
    for tri in mesh.indices.chunks_exact(3) {
        let i0 = tri[0] as usize + vertex_offset + 1;
        let i1 = tri[1] as usize + vertex_offset + 1;
        let i2 = tri[2] as usize + vertex_offset + 1;
        writeln!(
            obj,
            "f {}/{}/{} {}/{}/{} {}/{}/{}",
            i0, i0, i0, i1, i1, i1, i2, i2, i2
        )?;
    }
    Ok(())
}

fn write_material(mtl: &mut String, material_name: &str, material: &Material, name: &str) -> Result<()> {
    // Rough Phong approximation of the PBR parameters
    let specular = material.metalness;
    let shininess = (1.0 - material.roughness) * 100.0;

    writeln!(mtl, "newmtl {}", material_name)?;
    writeln!(mtl, "Ka 1.0 1.0 1.0")?;
    writeln!(mtl, "Kd 1.0 1.0 1.0")?;
    writeln!(mtl, "Ks {} {} {}", specular, specular, specular)?;
    writeln!(mtl, "Ns {}", shininess)?;
    writeln!(mtl, "d 1.0")?;
    writeln!(mtl, "illum 2")?;
    writeln!(mtl, "map_Kd {}", texture_filename(name))?;
    if material.transparent {
        writeln!(mtl, "map_d {}", texture_filename(name))?;
    }
    Ok(())
}

/// Filename the MTL file references for the shared texture.
pub fn texture_filename(name: &str) -> String {
    format!("{}_texture.png", name)
}

/// Export mesh and texture to OBJ format bytes for writing to files.
pub struct ObjExport {
    pub obj: String,
    pub mtl: String,
    pub texture_png: Vec<u8>,
    /// Filename the MTL expects for `texture_png`.
    pub texture_filename: String,
}

impl ObjExport {
    pub fn from_output(output: &RigOutput, name: &str) -> Result<Self> {
        let (obj, mtl) = export_obj(output, name)?;
        let texture_png = output.texture.to_png()?;
        Ok(Self {
            obj,
            mtl,
            texture_png,
            texture_filename: texture_filename(name),
        })
    }
}
