//! glTF/GLB export.

use crate::error::{Result, RigError};
use crate::mesher::geometry::Mesh;
use crate::rig::RigOutput;
use crate::scene::Material;
use crate::texture::{FilterMode, TextureData};
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use std::mem;

/// Export a posed rig to GLB format (binary glTF) with embedded texture.
/// Opaque and transparent geometry become separate primitives with their own
/// materials. UVs are written in image space, so a texture that has not
/// finished loading exports exactly what the live renderer samples.
pub fn export_glb(output: &RigOutput) -> Result<Vec<u8>> {
    let opaque_mesh = &output.opaque_mesh;
    let transparent_mesh = &output.transparent_mesh;
    if opaque_mesh.is_empty() && transparent_mesh.is_empty() {
        return Err(RigError::Export("Cannot export empty mesh".to_string()));
    }

    let texture_png = output.texture.to_png()?;

    // Build the binary buffer incrementally
    let mut buffer_data: Vec<u8> = Vec::new();

    // Track mesh data offsets
    struct MeshOffsets {
        pos_offset: usize,
        pos_bytes: usize,
        norm_offset: usize,
        norm_bytes: usize,
        uv_offset: usize,
        uv_bytes: usize,
        idx_offset: usize,
        idx_bytes: usize,
        vertex_count: usize,
        index_count: usize,
    }

    fn write_mesh(buffer: &mut Vec<u8>, mesh: &Mesh, texture: &TextureData) -> Option<MeshOffsets> {
        if mesh.is_empty() {
            return None;
        }
        let positions = mesh.positions_flat();
        let normals = mesh.normals_flat();
        let uvs: Vec<f32> = mesh
            .vertices
            .iter()
            .flat_map(|v| texture.image_space_uv(v.uv))
            .collect();

        let pos_offset = buffer.len();
        buffer.extend_from_slice(bytemuck_cast_slice(&positions));
        let norm_offset = buffer.len();
        buffer.extend_from_slice(bytemuck_cast_slice(&normals));
        let uv_offset = buffer.len();
        buffer.extend_from_slice(bytemuck_cast_slice(&uvs));
        let idx_offset = buffer.len();
        buffer.extend_from_slice(bytemuck_cast_slice(&mesh.indices));
        let end = buffer.len();

        Some(MeshOffsets {
            pos_offset,
            pos_bytes: norm_offset - pos_offset,
            norm_offset,
            norm_bytes: uv_offset - norm_offset,
            uv_offset,
            uv_bytes: idx_offset - uv_offset,
            idx_offset,
            idx_bytes: end - idx_offset,
            vertex_count: mesh.vertex_count(),
            index_count: mesh.indices.len(),
        })
    }

    let opaque_offsets = write_mesh(&mut buffer_data, opaque_mesh, &output.texture);
    let transparent_offsets = write_mesh(&mut buffer_data, transparent_mesh, &output.texture);

    // Append texture PNG (aligned to 4 bytes)
    let texture_padding = (4 - (buffer_data.len() % 4)) % 4;
    buffer_data.extend(std::iter::repeat(0u8).take(texture_padding));
    let texture_offset = buffer_data.len();
    buffer_data.extend_from_slice(&texture_png);

    let total_buffer_size = buffer_data.len();

    let min = output.bounds.min;
    let max = output.bounds.max;

    // Build glTF arrays
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut primitives = Vec::new();

    let mut buffer_view_idx = 0u32;

    // Helper: add buffer views, accessors, and primitive for a mesh
    fn add_mesh_primitive(
        offsets: &MeshOffsets,
        material_idx: u32,
        bounds_min: [f32; 3],
        bounds_max: [f32; 3],
        buffer_views: &mut Vec<json::buffer::View>,
        accessors: &mut Vec<json::Accessor>,
        primitives: &mut Vec<json::mesh::Primitive>,
        buffer_view_idx: &mut u32,
    ) {
        let accessor_start = accessors.len() as u32;

        // 4 buffer views: positions, normals, uvs, indices
        buffer_views.push(create_buffer_view(offsets.pos_offset, offsets.pos_bytes, Some(json::buffer::Target::ArrayBuffer)));
        let pos_view = *buffer_view_idx; *buffer_view_idx += 1;

        buffer_views.push(create_buffer_view(offsets.norm_offset, offsets.norm_bytes, Some(json::buffer::Target::ArrayBuffer)));
        let norm_view = *buffer_view_idx; *buffer_view_idx += 1;

        buffer_views.push(create_buffer_view(offsets.uv_offset, offsets.uv_bytes, Some(json::buffer::Target::ArrayBuffer)));
        let uv_view = *buffer_view_idx; *buffer_view_idx += 1;

        buffer_views.push(create_buffer_view(offsets.idx_offset, offsets.idx_bytes, Some(json::buffer::Target::ElementArrayBuffer)));
        let idx_view = *buffer_view_idx; *buffer_view_idx += 1;

        accessors.push(create_accessor(pos_view, offsets.vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, Some(bounds_min), Some(bounds_max)));
        accessors.push(create_accessor(norm_view, offsets.vertex_count, json::accessor::Type::Vec3, json::accessor::ComponentType::F32, None, None));
        accessors.push(create_accessor(uv_view, offsets.vertex_count, json::accessor::Type::Vec2, json::accessor::ComponentType::F32, None, None));
        accessors.push(create_accessor(idx_view, offsets.index_count, json::accessor::Type::Scalar, json::accessor::ComponentType::U32, None, None));

        primitives.push(create_primitive(accessor_start, accessor_start + 3, material_idx));
    }

    // Material 0: structure (opaque), material 1: posable parts
    let materials = vec![
        create_material(&output.opaque_material),
        create_material(&output.transparent_material),
    ];

    if let Some(ref offsets) = opaque_offsets {
        add_mesh_primitive(offsets, 0, min, max, &mut buffer_views, &mut accessors, &mut primitives, &mut buffer_view_idx);
    }
    if let Some(ref offsets) = transparent_offsets {
        add_mesh_primitive(offsets, 1, min, max, &mut buffer_views, &mut accessors, &mut primitives, &mut buffer_view_idx);
    }

    // Texture image
    buffer_views.push(create_buffer_view(texture_offset, texture_png.len(), None));
    let image_view = buffer_view_idx;

    let (mag_filter, min_filter) = match output.texture.filter {
        FilterMode::Nearest => (json::texture::MagFilter::Nearest, json::texture::MinFilter::Nearest),
        FilterMode::Linear => (json::texture::MagFilter::Linear, json::texture::MinFilter::Linear),
    };

    // Build glTF JSON
    let root = json::Root {
        accessors,
        buffers: vec![json::Buffer {
            byte_length: USize64(total_buffer_size as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images: vec![json::Image {
            buffer_view: Some(json::Index::new(image_view)),
            mime_type: Some(json::image::MimeType("image/png".to_string())),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        }],
        samplers: vec![json::texture::Sampler {
            mag_filter: Some(Valid(mag_filter)),
            min_filter: Some(Valid(min_filter)),
            wrap_s: Valid(json::texture::WrappingMode::Repeat),
            wrap_t: Valid(json::texture::WrappingMode::Repeat),
            extensions: Default::default(),
            extras: Default::default(),
        }],
        textures: vec![json::Texture {
            sampler: Some(json::Index::new(0)),
            source: json::Index::new(0),
            extensions: Default::default(),
            extras: Default::default(),
        }],
        materials,
        meshes: vec![json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives,
            weights: None,
        }],
        nodes: vec![json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(json::Index::new(0)),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        }],
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    // Serialize JSON
    let json_string = json::serialize::to_string(&root)
        .map_err(|e| RigError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;
    let json_bytes = json_string.as_bytes();

    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    // Calculate total size
    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(b"glTF"); // magic
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_size as u32).to_le_bytes()); // length

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes()); // chunk length
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // chunk type: JSON
    glb.extend_from_slice(json_bytes);
    glb.extend_from_slice(&vec![0x20u8; json_padding]); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes()); // chunk length
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // chunk type: BIN
    glb.extend_from_slice(&buffer_data);
    glb.extend_from_slice(&vec![0u8; buffer_padding]); // padding (zeros)

    Ok(glb)
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<json::buffer::Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(0)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(|m| json::Value::from(m.to_vec())),
        max: max.map(|m| json::Value::from(m.to_vec())),
        normalized: false,
        sparse: None,
    }
}

/// Create a primitive.
fn create_primitive(
    positions_accessor: u32,
    indices_accessor: u32,
    material: u32,
) -> json::mesh::Primitive {
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(
        Valid(json::mesh::Semantic::Positions),
        json::Index::new(positions_accessor),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::Normals),
        json::Index::new(positions_accessor + 1),
    );
    attributes.insert(
        Valid(json::mesh::Semantic::TexCoords(0)),
        json::Index::new(positions_accessor + 2),
    );

    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(indices_accessor)),
        material: Some(json::Index::new(material)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

/// Create a textured PBR material.
fn create_material(material: &Material) -> json::Material {
    let alpha_mode = if material.transparent {
        json::material::AlphaMode::Blend
    } else {
        json::material::AlphaMode::Opaque
    };

    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: Some(json::texture::Info {
                index: json::Index::new(0),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            base_color_factor: json::material::PbrBaseColorFactor([1.0, 1.0, 1.0, 1.0]),
            metallic_factor: json::material::StrengthFactor(material.metalness),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(alpha_mode),
        alpha_cutoff: None,
        double_sided: false,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Cast a slice of T to a slice of bytes.
fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    let ptr = slice.as_ptr() as *const u8;
    let len = slice.len() * mem::size_of::<T>();
    unsafe { std::slice::from_raw_parts(ptr, len) }
}
