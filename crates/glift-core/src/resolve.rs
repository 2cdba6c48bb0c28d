//! Reference resolution: the second pass of the two-phase deserializer.
//!
//! Bounds-checks every reference slot the deserializer wrote, establishes
//! parent back-links on nodes, and computes derived accessor strides. After
//! this pass every set [`Ref`] in the document is guaranteed to point at an
//! existing table entry.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::ids::Ref;
use crate::types::element_size;

/// An optional reference: must be in range when set.
fn check<I: From<u32>>(slot: Ref<I>, len: usize, what: &'static str) -> Result<()> {
    match slot.raw_index() {
        Some(index) if index >= len => Err(Error::InvalidGltf(what)),
        _ => Ok(()),
    }
}

/// A required reference: must be set and in range. Returns the index.
fn require<I: From<u32>>(slot: Ref<I>, len: usize, what: &'static str) -> Result<usize> {
    match slot.raw_index() {
        Some(index) if index < len => Ok(index),
        _ => Err(Error::InvalidGltf(what)),
    }
}

pub(crate) fn resolve(doc: &mut Document) -> Result<()> {
    let accessors_len = doc.accessors.len();
    let buffer_views_len = doc.buffer_views.len();
    let buffers_len = doc.buffers.len();
    let materials_len = doc.materials.len();
    let meshes_len = doc.meshes.len();
    let images_len = doc.images.len();
    let textures_len = doc.textures.len();
    let samplers_len = doc.samplers.len();
    let skins_len = doc.skins.len();
    let cameras_len = doc.cameras.len();
    let lights_len = doc.lights.len();
    let nodes_len = doc.nodes.len();
    let scenes_len = doc.scenes.len();

    for mesh in &doc.meshes {
        for primitive in &mesh.primitives {
            check(primitive.indices, accessors_len, "primitive indices")?;
            check(primitive.material, materials_len, "primitive material")?;

            for attribute in &primitive.attributes {
                require(attribute.data, accessors_len, "attribute accessor")?;
            }
            for target in &primitive.targets {
                for attribute in &target.attributes {
                    require(attribute.data, accessors_len, "morph target accessor")?;
                }
            }
        }
    }

    for accessor in &mut doc.accessors {
        check(accessor.buffer_view, buffer_views_len, "accessor buffer view")?;

        if accessor.is_sparse {
            require(
                accessor.sparse.indices_buffer_view,
                buffer_views_len,
                "sparse indices buffer view",
            )?;
            require(
                accessor.sparse.values_buffer_view,
                buffer_views_len,
                "sparse values buffer view",
            )?;
        }

        if let Some(view) = accessor.buffer_view.get() {
            accessor.stride = doc.buffer_views[view.index()].stride;
        }
        if accessor.stride == 0 {
            accessor.stride = element_size(accessor.element_type, accessor.component_type);
        }
    }

    for texture in &doc.textures {
        check(texture.image, images_len, "texture image")?;
        check(texture.sampler, samplers_len, "texture sampler")?;
    }

    for image in &doc.images {
        check(image.buffer_view, buffer_views_len, "image buffer view")?;
    }

    for material in &doc.materials {
        check(material.normal_texture.texture, textures_len, "normal texture")?;
        check(material.emissive_texture.texture, textures_len, "emissive texture")?;
        check(material.occlusion_texture.texture, textures_len, "occlusion texture")?;
        check(
            material.pbr_metallic_roughness.base_color_texture.texture,
            textures_len,
            "base color texture",
        )?;
        check(
            material.pbr_metallic_roughness.metallic_roughness_texture.texture,
            textures_len,
            "metallic roughness texture",
        )?;
        check(
            material.pbr_specular_glossiness.diffuse_texture.texture,
            textures_len,
            "diffuse texture",
        )?;
        check(
            material
                .pbr_specular_glossiness
                .specular_glossiness_texture
                .texture,
            textures_len,
            "specular glossiness texture",
        )?;
    }

    for view in &doc.buffer_views {
        require(view.buffer, buffers_len, "buffer view buffer")?;
    }

    for skin in &doc.skins {
        for joint in &skin.joints {
            require(*joint, nodes_len, "skin joint")?;
        }
        check(skin.skeleton, nodes_len, "skin skeleton")?;
        check(skin.inverse_bind_matrices, accessors_len, "inverse bind matrices")?;
    }

    for i in 0..nodes_len {
        for j in 0..doc.nodes[i].children.len() {
            let child = require(doc.nodes[i].children[j], nodes_len, "node child")?;
            if doc.nodes[child].parent.is_set() {
                return Err(Error::InvalidGltf("node has more than one parent"));
            }
            doc.nodes[child].parent = Ref::to(i);
        }

        let node = &doc.nodes[i];
        check(node.mesh, meshes_len, "node mesh")?;
        check(node.skin, skins_len, "node skin")?;
        check(node.camera, cameras_len, "node camera")?;
        check(node.light, lights_len, "node light")?;
    }

    for scene in &doc.scenes {
        for root in &scene.nodes {
            let index = require(*root, nodes_len, "scene node")?;
            if doc.nodes[index].parent.is_set() {
                return Err(Error::InvalidGltf("scene root has a parent"));
            }
        }
    }

    check(doc.scene, scenes_len, "default scene")?;

    for animation in &doc.animations {
        let samplers_count = animation.samplers.len();

        for sampler in &animation.samplers {
            require(sampler.input, accessors_len, "animation sampler input")?;
            require(sampler.output, accessors_len, "animation sampler output")?;
        }
        for channel in &animation.channels {
            require(channel.sampler, samplers_count, "animation channel sampler")?;
            check(channel.target_node, nodes_len, "animation channel target")?;
        }
    }

    Ok(())
}
