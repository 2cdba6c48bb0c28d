//! End-to-end parse scenarios over JSON and binary containers.

use glift_core::{
    parse, validate, AccessorId, AnimationPath, AnimationSamplerId, CameraKind, Error, FileKind,
    ImageId, LightId, MaterialId, NodeId, Options, SamplerId, SceneId,
};

const GLB_MAGIC: u32 = 0x46546C67;
const GLB_CHUNK_JSON: u32 = 0x4E4F534A;
const GLB_CHUNK_BIN: u32 = 0x004E4942;

fn glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
    let total = 12 + 8 + json.len() + bin.map_or(0, |b| 8 + b.len());
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    if let Some(bin) = bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(bin);
    }
    out
}

#[test]
fn test_minimal_asset() {
    let doc = parse(&Options::default(), br#"{"asset":{"version":"2.0"}}"#).unwrap();

    assert_eq!(doc.asset.version.as_deref(), Some("2.0"));
    assert_eq!(doc.file_kind, FileKind::Json);
    assert!(doc.meshes.is_empty());
    assert!(doc.nodes.is_empty());
    assert!(doc.buffers.is_empty());
    assert!(doc.scene.get().is_none());
    validate(&doc).unwrap();
}

#[test]
fn test_glb_magic_detection() {
    let data = glb(br#"{"asset":{"version":"2.0"}}"#, None);
    assert_eq!(&data[..4], b"glTF");

    let doc = parse(&Options::default(), &data).unwrap();
    assert_eq!(doc.file_kind, FileKind::Binary);
    assert!(doc.bin.is_none());
    assert_eq!(doc.asset.version.as_deref(), Some("2.0"));
}

#[test]
fn test_glb_retains_bin_chunk() {
    let data = glb(br#"{"asset":{"version":"2.0"}}"#, Some(&[9, 8, 7, 6]));
    let doc = parse(&Options::default(), &data).unwrap();
    assert_eq!(doc.bin.as_deref(), Some(&[9u8, 8, 7, 6][..]));
}

#[test]
fn test_parenthood() {
    let json = br#"{
        "nodes":[{"children":[1,2]},{},{}],
        "scenes":[{"nodes":[0]}],
        "scene":0
    }"#;
    let doc = parse(&Options::default(), json).unwrap();

    assert_eq!(doc.nodes[1].parent.get(), Some(NodeId(0)));
    assert_eq!(doc.nodes[2].parent.get(), Some(NodeId(0)));
    assert!(doc.nodes[0].parent.get().is_none());
    assert_eq!(doc.scenes[0].nodes[0].get(), Some(NodeId(0)));
    assert_eq!(doc.scene.get(), Some(SceneId(0)));
}

#[test]
fn test_duplicate_parent_is_rejected() {
    let json = br#"{"nodes":[{"children":[1]},{},{"children":[1]}]}"#;
    assert!(matches!(
        parse(&Options::default(), json),
        Err(Error::InvalidGltf(_))
    ));
}

#[test]
fn test_scene_root_that_is_a_child_is_rejected() {
    let json = br#"{"nodes":[{"children":[1]},{}],"scenes":[{"nodes":[1]}]}"#;
    assert!(matches!(
        parse(&Options::default(), json),
        Err(Error::InvalidGltf(_))
    ));
}

#[test]
fn test_out_of_range_reference_is_rejected() {
    let json = br#"{"meshes":[{"primitives":[{"attributes":{"POSITION":7}}]}]}"#;
    assert!(matches!(
        parse(&Options::default(), json),
        Err(Error::InvalidGltf(_))
    ));
}

/// A small but fully populated scene touching every table.
const FULL_SCENE: &str = r#"{
    "asset":{"version":"2.0","generator":"test"},
    "buffers":[{"byteLength":120}],
    "bufferViews":[
        {"buffer":0,"byteOffset":0,"byteLength":72},
        {"buffer":0,"byteOffset":72,"byteLength":12,"target":34963},
        {"buffer":0,"byteOffset":84,"byteLength":36}
    ],
    "accessors":[
        {"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,1]},
        {"bufferView":0,"byteOffset":36,"componentType":5126,"count":3,"type":"VEC3"},
        {"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"},
        {"bufferView":2,"componentType":5126,"count":3,"type":"VEC3"}
    ],
    "meshes":[{
        "name":"tri",
        "primitives":[{
            "attributes":{"POSITION":0,"NORMAL":1},
            "indices":2,
            "material":0,
            "targets":[{"POSITION":3}]
        }],
        "weights":[0.25]
    }],
    "materials":[{"name":"mat","pbrMetallicRoughness":{"baseColorTexture":{"index":0}}}],
    "textures":[{"source":0,"sampler":0}],
    "images":[{"uri":"tex.png","mimeType":"image/png"}],
    "samplers":[{"magFilter":9729}],
    "skins":[{"joints":[1,2],"skeleton":0}],
    "cameras":[{"type":"perspective","perspective":{"yfov":0.8,"znear":0.1}}],
    "extensions":{"KHR_lights_punctual":{"lights":[{"type":"point","intensity":1}]}},
    "nodes":[
        {"name":"root","children":[1,2]},
        {"mesh":0,"skin":0,"weights":[0.25]},
        {"camera":0,"extensions":{"KHR_lights_punctual":{"light":0}}}
    ],
    "scenes":[{"nodes":[0]}],
    "scene":0,
    "animations":[{
        "samplers":[{"input":0,"output":3,"interpolation":"STEP"}],
        "channels":[{"sampler":0,"target":{"node":1,"path":"weights"}}]
    }],
    "extensionsUsed":["KHR_lights_punctual"]
}"#;

#[test]
fn test_full_scene_references_resolve_to_original_indices() {
    let doc = parse(&Options::default(), FULL_SCENE.as_bytes()).unwrap();

    let primitive = &doc.meshes[0].primitives[0];
    assert_eq!(primitive.attributes[0].data.get(), Some(AccessorId(0)));
    assert_eq!(primitive.attributes[1].data.get(), Some(AccessorId(1)));
    assert_eq!(primitive.indices.get(), Some(AccessorId(2)));
    assert_eq!(primitive.material.get(), Some(MaterialId(0)));
    assert_eq!(
        primitive.targets[0].attributes[0].data.get(),
        Some(AccessorId(3))
    );

    assert_eq!(doc.textures[0].image.get(), Some(ImageId(0)));
    assert_eq!(doc.textures[0].sampler.get(), Some(SamplerId(0)));
    assert_eq!(
        doc.materials[0]
            .pbr_metallic_roughness
            .base_color_texture
            .texture
            .get()
            .map(|id| doc.texture(id).image.get())
            .flatten(),
        Some(ImageId(0))
    );

    let skin = &doc.skins[0];
    assert_eq!(skin.joints[0].get(), Some(NodeId(1)));
    assert_eq!(skin.joints[1].get(), Some(NodeId(2)));
    assert_eq!(skin.skeleton.get(), Some(NodeId(0)));

    assert_eq!(doc.nodes[2].light.get(), Some(LightId(0)));
    assert_eq!(doc.cameras[0].kind, CameraKind::Perspective);

    let channel = &doc.animations[0].channels[0];
    assert_eq!(channel.sampler.get(), Some(AnimationSamplerId(0)));
    assert_eq!(channel.target_node.get(), Some(NodeId(1)));
    assert_eq!(channel.target_path, AnimationPath::Weights);
}

#[test]
fn test_full_scene_parent_child_agreement() {
    let doc = parse(&Options::default(), FULL_SCENE.as_bytes()).unwrap();

    for (index, node) in doc.nodes.iter().enumerate() {
        if let Some(parent) = node.parent.get() {
            let parent_children: Vec<_> = doc
                .node(parent)
                .children
                .iter()
                .filter_map(|child| child.get())
                .collect();
            assert!(parent_children.contains(&NodeId(index as u32)));
        }
    }

    for scene in &doc.scenes {
        for root in &scene.nodes {
            let root = root.get().unwrap();
            assert!(doc.node(root).parent.get().is_none());
        }
    }
}

#[test]
fn test_full_scene_validates_and_is_idempotent() {
    let doc = parse(&Options::default(), FULL_SCENE.as_bytes()).unwrap();
    validate(&doc).unwrap();
    validate(&doc).unwrap();

    // Attribute accessors of a primitive share one count.
    let primitive = &doc.meshes[0].primitives[0];
    let first = doc.accessor(primitive.attributes[0].data.get().unwrap()).count;
    for attribute in &primitive.attributes {
        assert_eq!(doc.accessor(attribute.data.get().unwrap()).count, first);
    }
    for target in &primitive.targets {
        for attribute in &target.attributes {
            assert_eq!(doc.accessor(attribute.data.get().unwrap()).count, first);
        }
    }
}

#[test]
fn test_full_scene_stride_defaulting() {
    let doc = parse(&Options::default(), FULL_SCENE.as_bytes()).unwrap();
    assert_eq!(doc.accessors[0].stride, 12);
    assert_eq!(doc.accessors[2].stride, 2);
}

#[test]
fn test_extras_copy_from_parsed_document() {
    let json = br#"{"asset":{"version":"2.0"},"nodes":[{"extras":{"visible":false}}]}"#;
    let doc = parse(&Options::default(), json).unwrap();

    let extras = &doc.nodes[0].extras;
    let needed = doc.copy_extras_json(extras, None).unwrap();
    let mut dest = vec![0u8; needed];
    let written = doc.copy_extras_json(extras, Some(&mut dest)).unwrap();
    assert_eq!(&dest[..written], br#"{"visible":false}"#);
    assert_eq!(dest[written], 0);
}

#[test]
fn test_forced_kind_mismatch() {
    let options = Options {
        file_kind: FileKind::Binary,
        ..Options::default()
    };
    assert!(matches!(
        parse(&options, br#"{"asset":{"version":"2.0"}}"#),
        Err(Error::UnknownFormat)
    ));
}
