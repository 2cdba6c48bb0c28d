//! The in-memory document: per-kind entity tables plus the retained JSON.
//!
//! Entities are created en masse by the deserializer (tables are allocated
//! at the exact element count of the corresponding JSON array), mutated by
//! the resolver (parent back-links, stride defaulting) and by buffer
//! loading (filling [`BufferData`]), and dropped together with the
//! [`Document`].

use crate::ids::{
    AccessorId, AnimationSamplerId, BufferId, BufferViewId, CameraId, ImageId, LightId,
    MaterialId, MeshId, NodeId, Ref, SamplerId, SceneId, SkinId, TextureId,
};
use crate::types::{
    AlphaMode, AnimationPath, AttributeSemantic, BufferViewKind, CameraKind, ComponentType,
    ElementType, FileKind, InterpolationType, LightKind, PrimitiveTopology,
};
use crate::error::{Error, Result};

/// Byte range of a literal `extras` value in the retained JSON text.
/// `start == end == 0` means no extras were present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extras {
    pub start: usize,
    pub end: usize,
}

impl Extras {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Payload state of a buffer.
#[derive(Debug, Clone, Default)]
pub enum BufferData {
    /// Not loaded yet; `load_buffers` fills this in.
    #[default]
    Unloaded,
    /// Bytes owned by this buffer (file contents or decoded data URI).
    Owned(Vec<u8>),
    /// Backed by the document's retained binary chunk (GLB buffer 0).
    BinChunk,
}

#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub size: usize,
    pub uri: Option<String>,
    pub data: BufferData,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct BufferView {
    pub buffer: Ref<BufferId>,
    pub offset: usize,
    pub size: usize,
    /// 0 means tightly packed; accessors then derive their own stride.
    pub stride: usize,
    pub kind: BufferViewKind,
    pub extras: Extras,
}

/// Sparse overlay of an accessor: `count` updates whose target indices come
/// from one buffer view and whose values come from another.
#[derive(Debug, Clone, Default)]
pub struct AccessorSparse {
    pub count: usize,
    pub indices_buffer_view: Ref<BufferViewId>,
    pub indices_byte_offset: usize,
    pub indices_component_type: ComponentType,
    pub values_buffer_view: Ref<BufferViewId>,
    pub values_byte_offset: usize,
    pub extras: Extras,
    pub indices_extras: Extras,
    pub values_extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Accessor {
    pub component_type: ComponentType,
    pub normalized: bool,
    pub element_type: ElementType,
    pub offset: usize,
    pub count: usize,
    /// Byte distance between elements. Zero after deserialization; the
    /// resolver replaces it with the buffer view stride or the packed
    /// element size, so it is nonzero in a resolved document.
    pub stride: usize,
    pub buffer_view: Ref<BufferViewId>,
    pub has_min: bool,
    pub min: [f32; 16],
    pub has_max: bool,
    pub max: [f32; 16],
    pub is_sparse: bool,
    pub sparse: AccessorSparse,
    pub extras: Extras,
}

/// One vertex attribute binding of a primitive or morph target.
#[derive(Debug, Clone, Default)]
pub struct Attribute {
    /// Raw attribute name as it appeared in the JSON.
    pub name: String,
    pub semantic: AttributeSemantic,
    pub set_index: i32,
    pub data: Ref<AccessorId>,
}

#[derive(Debug, Clone, Default)]
pub struct MorphTarget {
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default)]
pub struct Primitive {
    pub topology: PrimitiveTopology,
    pub indices: Ref<AccessorId>,
    pub material: Ref<MaterialId>,
    pub attributes: Vec<Attribute>,
    pub targets: Vec<MorphTarget>,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    pub weights: Vec<f32>,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Image {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub buffer_view: Ref<BufferViewId>,
    pub mime_type: Option<String>,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Sampler {
    pub mag_filter: i32,
    pub min_filter: i32,
    /// Defaults to 10497 (REPEAT).
    pub wrap_s: i32,
    /// Defaults to 10497 (REPEAT).
    pub wrap_t: i32,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Texture {
    pub name: Option<String>,
    pub image: Ref<ImageId>,
    pub sampler: Ref<SamplerId>,
    pub extras: Extras,
}

/// KHR_texture_transform payload.
#[derive(Debug, Clone, Default)]
pub struct TextureTransform {
    pub offset: [f32; 2],
    pub rotation: f32,
    pub scale: [f32; 2],
    pub texcoord: i32,
}

/// A material's binding of a texture to a texture coordinate set.
#[derive(Debug, Clone, Default)]
pub struct TextureView {
    pub texture: Ref<TextureId>,
    pub texcoord: i32,
    /// Normal-map scale, or strength for the occlusion texture.
    pub scale: f32,
    pub has_transform: bool,
    pub transform: TextureTransform,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct PbrMetallicRoughness {
    pub base_color_texture: TextureView,
    pub metallic_roughness_texture: TextureView,
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub extras: Extras,
}

/// KHR_materials_pbrSpecularGlossiness payload.
#[derive(Debug, Clone, Default)]
pub struct PbrSpecularGlossiness {
    pub diffuse_texture: TextureView,
    pub specular_glossiness_texture: TextureView,
    pub diffuse_factor: [f32; 4],
    pub specular_factor: [f32; 3],
    pub glossiness_factor: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Material {
    pub name: Option<String>,
    pub has_pbr_metallic_roughness: bool,
    pub has_pbr_specular_glossiness: bool,
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    pub pbr_specular_glossiness: PbrSpecularGlossiness,
    pub normal_texture: TextureView,
    pub occlusion_texture: TextureView,
    pub emissive_texture: TextureView,
    pub emissive_factor: [f32; 3],
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
    /// KHR_materials_unlit was present.
    pub unlit: bool,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: Option<String>,
    pub joints: Vec<Ref<NodeId>>,
    pub skeleton: Ref<NodeId>,
    pub inverse_bind_matrices: Ref<AccessorId>,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct CameraPerspective {
    pub aspect_ratio: f32,
    pub yfov: f32,
    pub zfar: f32,
    pub znear: f32,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct CameraOrthographic {
    pub xmag: f32,
    pub ymag: f32,
    pub zfar: f32,
    pub znear: f32,
    pub extras: Extras,
}

/// Camera parameters. Both parameter blocks are always present so that key
/// order in the JSON cannot clobber previously parsed values; `kind` says
/// which one is meaningful.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub name: Option<String>,
    pub kind: CameraKind,
    pub perspective: CameraPerspective,
    pub orthographic: CameraOrthographic,
    pub extras: Extras,
}

/// KHR_lights_punctual light.
#[derive(Debug, Clone, Default)]
pub struct Light {
    pub name: Option<String>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub kind: LightKind,
    pub range: f32,
    pub spot_inner_cone_angle: f32,
    pub spot_outer_cone_angle: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<String>,
    /// Back-link filled by the resolver; a node has at most one parent.
    pub parent: Ref<NodeId>,
    pub children: Vec<Ref<NodeId>>,
    pub skin: Ref<SkinId>,
    pub mesh: Ref<MeshId>,
    pub camera: Ref<CameraId>,
    pub light: Ref<LightId>,
    pub weights: Vec<f32>,
    pub has_translation: bool,
    pub has_rotation: bool,
    pub has_scale: bool,
    pub has_matrix: bool,
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Column-major.
    pub matrix: [f32; 16],
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: Option<String>,
    pub nodes: Vec<Ref<NodeId>>,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationSampler {
    pub input: Ref<AccessorId>,
    pub output: Ref<AccessorId>,
    pub interpolation: InterpolationType,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationChannel {
    /// Index into the owning animation's sampler table.
    pub sampler: Ref<AnimationSamplerId>,
    pub target_node: Ref<NodeId>,
    pub target_path: AnimationPath,
    pub extras: Extras,
}

#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub name: Option<String>,
    pub samplers: Vec<AnimationSampler>,
    pub channels: Vec<AnimationChannel>,
    pub extras: Extras,
}

/// The glTF asset header.
#[derive(Debug, Clone, Default)]
pub struct Asset {
    pub copyright: Option<String>,
    pub generator: Option<String>,
    pub version: Option<String>,
    pub min_version: Option<String>,
    pub extras: Extras,
}

/// A parsed glTF document. Owns every table, all string copies, the JSON
/// chunk bytes (for extras retrieval) and the optional binary chunk.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub file_kind: FileKind,

    pub asset: Asset,

    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
    pub images: Vec<Image>,
    pub textures: Vec<Texture>,
    pub samplers: Vec<Sampler>,
    pub skins: Vec<Skin>,
    pub cameras: Vec<Camera>,
    pub lights: Vec<Light>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,

    /// Default scene, if declared.
    pub scene: Ref<SceneId>,

    pub animations: Vec<Animation>,

    pub extras: Extras,

    pub extensions_used: Vec<String>,
    pub extensions_required: Vec<String>,

    /// Verbatim copy of the JSON chunk, kept for extras retrieval.
    pub json: Vec<u8>,
    /// Binary chunk of a GLB container, if one was present.
    pub bin: Option<Vec<u8>>,
}

impl Document {
    pub fn buffer(&self, id: BufferId) -> &Buffer {
        &self.buffers[id.index()]
    }

    pub fn buffer_view(&self, id: BufferViewId) -> &BufferView {
        &self.buffer_views[id.index()]
    }

    pub fn accessor(&self, id: AccessorId) -> &Accessor {
        &self.accessors[id.index()]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.index()]
    }

    pub fn image(&self, id: ImageId) -> &Image {
        &self.images[id.index()]
    }

    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.index()]
    }

    pub fn sampler(&self, id: SamplerId) -> &Sampler {
        &self.samplers[id.index()]
    }

    pub fn skin(&self, id: SkinId) -> &Skin {
        &self.skins[id.index()]
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        &self.cameras[id.index()]
    }

    pub fn light(&self, id: LightId) -> &Light {
        &self.lights[id.index()]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn scene(&self, id: SceneId) -> &Scene {
        &self.scenes[id.index()]
    }

    /// Loaded payload bytes of a buffer, if any.
    pub fn buffer_bytes(&self, id: BufferId) -> Option<&[u8]> {
        match &self.buffers[id.index()].data {
            BufferData::Unloaded => None,
            BufferData::Owned(bytes) => Some(bytes),
            BufferData::BinChunk => self.bin.as_deref(),
        }
    }

    /// The literal `extras` value text as raw JSON bytes (never unescaped).
    pub fn extras_json(&self, extras: &Extras) -> &[u8] {
        self.json
            .get(extras.start..extras.end)
            .unwrap_or(&[])
    }

    /// Copies the literal `extras` value text into `dest` as a
    /// NUL-terminated string.
    ///
    /// With `dest == None`, returns the required capacity (value length
    /// plus the NUL terminator) without copying. With a destination of
    /// capacity `c`, writes at most `c - 1` bytes, always NUL-terminates,
    /// and returns the number of bytes written (NUL excluded). An empty
    /// destination is `InvalidOptions`.
    pub fn copy_extras_json(&self, extras: &Extras, dest: Option<&mut [u8]>) -> Result<usize> {
        let text = self.extras_json(extras);

        let dest = match dest {
            None => return Ok(text.len() + 1),
            Some(dest) => dest,
        };
        if dest.is_empty() {
            return Err(Error::InvalidOptions);
        }

        let n = text.len().min(dest.len() - 1);
        dest[..n].copy_from_slice(&text[..n]);
        dest[n] = 0;
        Ok(n)
    }
}
