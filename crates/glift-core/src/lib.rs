//! glift core library
//!
//! Parsing and validation for glTF 2.0 assets: both `.gltf` JSON text and
//! the `.glb` binary container. Produces a [`Document`] of typed tables
//! mirroring the asset's logical structure, with read helpers for accessor
//! data (normalization, stride handling and packed-matrix alignment).
//!
//! File and buffer I/O live in the companion `glift-io` crate; this crate
//! never touches the filesystem.
//!
//! # Example
//!
//! ```
//! use glift_core::{parse, Options};
//!
//! let doc = parse(&Options::default(), br#"{"asset":{"version":"2.0"}}"#).unwrap();
//! assert_eq!(doc.asset.version.as_deref(), Some("2.0"));
//! ```

// =============================================================================
// Modules
// =============================================================================

pub mod accessor;
pub mod container;
pub mod deserialize;
pub mod document;
pub mod error;
pub mod ids;
pub mod json_tokens;
pub mod parse;
pub mod resolve;
pub mod transform;
pub mod types;
pub mod validate;

// =============================================================================
// Re-exports
// =============================================================================

pub use accessor::{read_accessor_float, read_accessor_index};
pub use document::{
    Accessor, AccessorSparse, Animation, AnimationChannel, AnimationSampler, Asset, Attribute,
    Buffer, BufferData, BufferView, Camera, CameraOrthographic, CameraPerspective, Document,
    Extras, Image, Light, Material, Mesh, MorphTarget, Node, PbrMetallicRoughness,
    PbrSpecularGlossiness, Primitive, Sampler, Scene, Skin, Texture, TextureTransform,
    TextureView,
};
pub use error::{Error, Result};
pub use ids::{
    AccessorId, AnimationSamplerId, BufferId, BufferViewId, CameraId, ImageId, LightId,
    MaterialId, MeshId, NodeId, Ref, SamplerId, SceneId, SkinId, TextureId,
};
pub use json_tokens::{Token, TokenKind, TokenizeError, Tokenizer};
pub use parse::{parse, Options};
pub use transform::{node_transform_local, node_transform_world};
pub use types::{
    element_size, AlphaMode, AnimationPath, AttributeSemantic, BufferViewKind, CameraKind,
    ComponentType, ElementType, FileKind, InterpolationType, LightKind, PrimitiveTopology,
};
pub use validate::validate;
