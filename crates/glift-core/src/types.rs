//! Schema enums and element size rules.

/// Container shape of the input: JSON text or the binary container.
/// `Auto` is only meaningful as an options hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    #[default]
    Auto,
    Json,
    Binary,
}

/// Accessor component type (glTF componentType codes 5120..5126).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentType {
    #[default]
    Invalid,
    /// BYTE
    I8,
    /// UNSIGNED_BYTE
    U8,
    /// SHORT
    I16,
    /// UNSIGNED_SHORT
    U16,
    /// UNSIGNED_INT
    U32,
    /// FLOAT
    F32,
}

impl ComponentType {
    /// Decodes a glTF componentType code.
    pub fn from_gl(value: i64) -> ComponentType {
        match value {
            5120 => ComponentType::I8,
            5121 => ComponentType::U8,
            5122 => ComponentType::I16,
            5123 => ComponentType::U16,
            5125 => ComponentType::U32,
            5126 => ComponentType::F32,
            _ => ComponentType::Invalid,
        }
    }

    /// Byte size of one component.
    pub fn size(self) -> usize {
        match self {
            ComponentType::Invalid => 0,
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            ComponentType::U8 | ComponentType::U16 | ComponentType::U32
        )
    }
}

/// Accessor element shape (glTF `type` strings SCALAR..MAT4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementType {
    #[default]
    Invalid,
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    /// Logical component count of one element.
    pub fn num_components(self) -> usize {
        match self {
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 => 4,
            ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
            ElementType::Invalid | ElementType::Scalar => 1,
        }
    }
}

/// Byte size of one unpacked element, honoring the data-alignment rules of
/// the glTF specification: matrix columns are padded to 4-byte boundaries,
/// which affects 1-byte mat2, and 1- and 2-byte mat3.
pub fn element_size(element_type: ElementType, component_type: ComponentType) -> usize {
    let component_size = component_type.size();
    if element_type == ElementType::Mat2 && component_size == 1 {
        return 8 * component_size;
    }
    if element_type == ElementType::Mat3 && (component_size == 1 || component_size == 2) {
        return 12 * component_size;
    }
    component_size * element_type.num_components()
}

/// Buffer view usage hint (glTF `target`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferViewKind {
    #[default]
    Invalid,
    Indices,
    Vertices,
}

impl BufferViewKind {
    /// Decodes a glTF buffer view target code.
    pub fn from_gl(value: i64) -> BufferViewKind {
        match value {
            34962 => BufferViewKind::Vertices,
            34963 => BufferViewKind::Indices,
            _ => BufferViewKind::Invalid,
        }
    }
}

/// Primitive draw topology (glTF `mode` 0..6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveTopology {
    /// Decodes a glTF primitive mode; values outside 0..=6 are rejected.
    pub fn from_gl(value: i64) -> Option<PrimitiveTopology> {
        match value {
            0 => Some(PrimitiveTopology::Points),
            1 => Some(PrimitiveTopology::Lines),
            2 => Some(PrimitiveTopology::LineLoop),
            3 => Some(PrimitiveTopology::LineStrip),
            4 => Some(PrimitiveTopology::Triangles),
            5 => Some(PrimitiveTopology::TriangleStrip),
            6 => Some(PrimitiveTopology::TriangleFan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationType {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraKind {
    #[default]
    Invalid,
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Invalid,
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPath {
    #[default]
    Invalid,
    Translation,
    Rotation,
    Scale,
    Weights,
}

/// Parsed vertex attribute semantic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeSemantic {
    #[default]
    Invalid,
    Position,
    Normal,
    Tangent,
    TexCoord,
    Color,
    Joints,
    Weights,
}

impl AttributeSemantic {
    /// Splits an attribute name at `_` into a known semantic prefix and a
    /// set index (`TEXCOORD_1` -> (TexCoord, 1)). Unknown prefixes yield
    /// `Invalid` with set index 0; a missing suffix means set 0.
    pub fn parse(name: &str) -> (AttributeSemantic, i32) {
        let (prefix, suffix) = match name.find('_') {
            Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
            None => (name, None),
        };

        let semantic = match prefix {
            "POSITION" => AttributeSemantic::Position,
            "NORMAL" => AttributeSemantic::Normal,
            "TANGENT" => AttributeSemantic::Tangent,
            "TEXCOORD" => AttributeSemantic::TexCoord,
            "COLOR" => AttributeSemantic::Color,
            "JOINTS" => AttributeSemantic::Joints,
            "WEIGHTS" => AttributeSemantic::Weights,
            _ => AttributeSemantic::Invalid,
        };

        let mut index = 0;
        if let Some(suffix) = suffix {
            if semantic != AttributeSemantic::Invalid {
                index = suffix.parse().unwrap_or(0);
            }
        }
        (semantic, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_codes() {
        assert_eq!(ComponentType::from_gl(5120), ComponentType::I8);
        assert_eq!(ComponentType::from_gl(5121), ComponentType::U8);
        assert_eq!(ComponentType::from_gl(5122), ComponentType::I16);
        assert_eq!(ComponentType::from_gl(5123), ComponentType::U16);
        assert_eq!(ComponentType::from_gl(5125), ComponentType::U32);
        assert_eq!(ComponentType::from_gl(5126), ComponentType::F32);
        assert_eq!(ComponentType::from_gl(5124), ComponentType::Invalid);
    }

    #[test]
    fn test_element_sizes() {
        // Plain packing.
        assert_eq!(element_size(ElementType::Scalar, ComponentType::U16), 2);
        assert_eq!(element_size(ElementType::Vec3, ComponentType::F32), 12);
        assert_eq!(element_size(ElementType::Mat4, ComponentType::F32), 64);
        // Padded matrix cases.
        assert_eq!(element_size(ElementType::Mat2, ComponentType::I8), 8);
        assert_eq!(element_size(ElementType::Mat3, ComponentType::U8), 12);
        assert_eq!(element_size(ElementType::Mat3, ComponentType::I16), 24);
        // Not padded: 4-byte components are already aligned.
        assert_eq!(element_size(ElementType::Mat2, ComponentType::F32), 16);
        assert_eq!(element_size(ElementType::Mat3, ComponentType::F32), 36);
    }

    #[test]
    fn test_attribute_semantics() {
        assert_eq!(
            AttributeSemantic::parse("POSITION"),
            (AttributeSemantic::Position, 0)
        );
        assert_eq!(
            AttributeSemantic::parse("TEXCOORD_1"),
            (AttributeSemantic::TexCoord, 1)
        );
        assert_eq!(
            AttributeSemantic::parse("WEIGHTS_0"),
            (AttributeSemantic::Weights, 0)
        );
        assert_eq!(
            AttributeSemantic::parse("_CUSTOM"),
            (AttributeSemantic::Invalid, 0)
        );
        assert_eq!(
            AttributeSemantic::parse("POSITIONS"),
            (AttributeSemantic::Invalid, 0)
        );
    }

    #[test]
    fn test_topology_range() {
        assert_eq!(PrimitiveTopology::from_gl(0), Some(PrimitiveTopology::Points));
        assert_eq!(
            PrimitiveTopology::from_gl(4),
            Some(PrimitiveTopology::Triangles)
        );
        assert_eq!(PrimitiveTopology::from_gl(7), None);
        assert_eq!(PrimitiveTopology::from_gl(-1), None);
    }
}
