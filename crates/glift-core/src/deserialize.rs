//! Schema-driven deserializer: walks the token array with key-dispatched
//! handlers per schema object and fills the document tables.
//!
//! Every handler takes the index of the token holding its value and returns
//! the index of the first token after it. Cross-entity references are
//! written unchecked as one-based [`Ref`] slots; the resolver pass performs
//! all range checking. Table allocation is exact: the element count of the
//! JSON array token sizes each table in one shot.

use crate::document::{
    Accessor, AccessorSparse, Animation, AnimationChannel, AnimationSampler, Asset, Attribute,
    Buffer, BufferView, Camera, Document, Extras, Image, Light, Material, Mesh, MorphTarget,
    Node, PbrMetallicRoughness, PbrSpecularGlossiness, Primitive, Sampler, Scene, Skin, Texture,
    TextureTransform, TextureView,
};
use crate::error::{Error, Result};
use crate::ids::Ref;
use crate::json_tokens::{Token, TokenKind};
use crate::types::{
    AlphaMode, AnimationPath, AttributeSemantic, BufferViewKind, CameraKind, ComponentType,
    ElementType, InterpolationType, LightKind, PrimitiveTopology,
};

/// Parses the root object at token 0 into `doc`.
pub(crate) fn parse_document(tokens: &[Token], json: &[u8], doc: &mut Document) -> Result<()> {
    let reader = JsonReader { tokens, json };
    reader.parse_root(0, doc)?;
    Ok(())
}

struct JsonReader<'a> {
    tokens: &'a [Token],
    json: &'a [u8],
}

impl<'a> JsonReader<'a> {
    fn tok(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    fn span(&self, i: usize) -> &'a [u8] {
        let tok = self.tok(i);
        &self.json[tok.start..tok.end]
    }

    fn check_kind(&self, i: usize, kind: TokenKind) -> Result<()> {
        if self.tok(i).kind != kind {
            return Err(Error::InvalidGltf("unexpected value kind"));
        }
        Ok(())
    }

    /// An object key must be a string with at least one value after it.
    fn check_key(&self, i: usize) -> Result<()> {
        let tok = self.tok(i);
        if tok.kind != TokenKind::String || tok.size == 0 {
            return Err(Error::InvalidGltf("malformed object key"));
        }
        Ok(())
    }

    fn str_eq(&self, i: usize, name: &str) -> bool {
        self.tok(i).kind == TokenKind::String && self.span(i) == name.as_bytes()
    }

    /// Integer value of a primitive token, with C `atoi` semantics: leading
    /// sign and digits, anything else terminates at value 0.
    fn to_int(&self, i: usize) -> Result<i64> {
        self.check_kind(i, TokenKind::Primitive)?;
        let span = self.span(i);
        let (neg, digits) = match span.first() {
            Some(b'-') => (true, &span[1..]),
            Some(b'+') => (false, &span[1..]),
            _ => (false, span),
        };
        let mut value: i64 = 0;
        for &b in digits {
            if !b.is_ascii_digit() {
                break;
            }
            value = value.wrapping_mul(10).wrapping_add((b - b'0') as i64);
        }
        Ok(if neg { -value } else { value })
    }

    fn to_size(&self, i: usize) -> Result<usize> {
        Ok(self.to_int(i)? as usize)
    }

    /// Float value of a primitive token, with C `atof` semantics: the
    /// longest leading `[sign] digits [. digits] [exponent]` prefix is
    /// parsed and anything after it is ignored; no digits means 0.
    fn to_float(&self, i: usize) -> Result<f32> {
        self.check_kind(i, TokenKind::Primitive)?;
        let span = self.span(i);

        let mut end = 0;
        if matches!(span.first(), Some(b'-') | Some(b'+')) {
            end = 1;
        }
        let mut saw_digit = false;
        while end < span.len() && span[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
        if end < span.len() && span[end] == b'.' {
            end += 1;
            while end < span.len() && span[end].is_ascii_digit() {
                end += 1;
                saw_digit = true;
            }
        }
        if saw_digit && end < span.len() && matches!(span[end], b'e' | b'E') {
            let mut exponent = end + 1;
            if matches!(span.get(exponent), Some(b'-') | Some(b'+')) {
                exponent += 1;
            }
            let digits_start = exponent;
            while exponent < span.len() && span[exponent].is_ascii_digit() {
                exponent += 1;
            }
            // An exponent marker with no digits is not part of the number.
            if exponent > digits_start {
                end = exponent;
            }
        }

        if !saw_digit {
            return Ok(0.0);
        }
        let value = std::str::from_utf8(&span[..end])
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(0.0);
        Ok(value)
    }

    fn to_bool(&self, i: usize) -> bool {
        self.span(i) == b"true"
    }

    /// Advances past one whole value of any kind.
    fn skip(&self, i: usize) -> Result<usize> {
        let tok = *self.tok(i);
        match tok.kind {
            TokenKind::Array => {
                let mut i = i + 1;
                for _ in 0..tok.size {
                    i = self.skip(i)?;
                }
                Ok(i)
            }
            TokenKind::Object => {
                let mut i = i + 1;
                for _ in 0..tok.size {
                    self.check_key(i)?;
                    i = self.skip(i + 1)?;
                }
                Ok(i)
            }
            TokenKind::String | TokenKind::Primitive => Ok(i + 1),
        }
    }

    /// String token as an owned copy of the raw payload (not unescaped).
    fn string_value(&self, i: usize) -> Result<String> {
        self.check_kind(i, TokenKind::String)?;
        let s = std::str::from_utf8(self.span(i)).map_err(|_| Error::InvalidJson)?;
        Ok(s.to_owned())
    }

    /// Fills a string field; an already-set field means a duplicate key.
    fn parse_string(&self, i: usize, out: &mut Option<String>) -> Result<usize> {
        if out.is_some() {
            return Err(Error::InvalidGltf("duplicate string member"));
        }
        *out = Some(self.string_value(i)?);
        Ok(i + 1)
    }

    /// Fixed-size float array; the JSON array length must match exactly.
    fn parse_float_array(&self, i: usize, out: &mut [f32]) -> Result<usize> {
        self.check_kind(i, TokenKind::Array)?;
        if self.tok(i).size != out.len() {
            return Err(Error::InvalidGltf("unexpected array length"));
        }
        let mut i = i + 1;
        for slot in out.iter_mut() {
            *slot = self.to_float(i)?;
            i += 1;
        }
        Ok(i)
    }

    /// Variable-length float array (mesh and node weights).
    fn parse_float_vec(&self, i: usize, out: &mut Vec<f32>) -> Result<usize> {
        self.check_kind(i, TokenKind::Array)?;
        if !out.is_empty() {
            return Err(Error::InvalidGltf("duplicate array member"));
        }
        out.resize(self.tok(i).size, 0.0);
        self.parse_float_array(i, out.as_mut_slice())
    }

    fn parse_string_array(&self, i: usize, out: &mut Vec<String>) -> Result<usize> {
        self.check_kind(i, TokenKind::Array)?;
        if !out.is_empty() {
            return Err(Error::InvalidGltf("duplicate array member"));
        }
        let count = self.tok(i).size;
        out.reserve_exact(count);
        let mut i = i + 1;
        for _ in 0..count {
            out.push(self.string_value(i)?);
            i += 1;
        }
        Ok(i)
    }

    /// Allocates a table at the exact element count of the array token,
    /// then parses each element in place.
    fn parse_table<T: Default>(
        &self,
        i: usize,
        out: &mut Vec<T>,
        f: impl Fn(&Self, usize, &mut T) -> Result<usize>,
    ) -> Result<usize> {
        self.check_kind(i, TokenKind::Array)?;
        if !out.is_empty() {
            return Err(Error::InvalidGltf("duplicate array member"));
        }
        let count = self.tok(i).size;
        out.resize_with(count, T::default);
        let mut i = i + 1;
        for item in out.iter_mut() {
            i = f(self, i, item)?;
        }
        Ok(i)
    }

    /// Array of table indices (node children, scene roots, skin joints).
    fn parse_ref_array<I: From<u32>>(&self, i: usize, out: &mut Vec<Ref<I>>) -> Result<usize> {
        self.check_kind(i, TokenKind::Array)?;
        if !out.is_empty() {
            return Err(Error::InvalidGltf("duplicate array member"));
        }
        let count = self.tok(i).size;
        out.reserve_exact(count);
        let mut i = i + 1;
        for _ in 0..count {
            out.push(Ref::encode(self.to_int(i)?));
            i += 1;
        }
        Ok(i)
    }

    /// Records the byte range of the value and skips it.
    fn parse_extras(&self, i: usize, out: &mut Extras) -> Result<usize> {
        let tok = self.tok(i);
        out.start = tok.start;
        out.end = tok.end;
        self.skip(i)
    }

    // ========================================================================
    // Mesh geometry
    // ========================================================================

    fn parse_attributes(&self, i: usize, out: &mut Vec<Attribute>) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;
        if !out.is_empty() {
            return Err(Error::InvalidGltf("duplicate attributes member"));
        }
        let count = self.tok(i).size;
        out.reserve_exact(count);
        let mut i = i + 1;
        for _ in 0..count {
            self.check_key(i)?;
            let name = self.string_value(i)?;
            i += 1;
            let (semantic, set_index) = AttributeSemantic::parse(&name);
            let data = Ref::encode(self.to_int(i)?);
            i += 1;
            out.push(Attribute {
                name,
                semantic,
                set_index,
                data,
            });
        }
        Ok(i)
    }

    fn parse_primitive(&self, i: usize, out: &mut Primitive) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "mode") {
                i += 1;
                out.topology = PrimitiveTopology::from_gl(self.to_int(i)?)
                    .ok_or(Error::InvalidGltf("primitive mode out of range"))?;
                i += 1;
            } else if self.str_eq(i, "indices") {
                i += 1;
                out.indices = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "material") {
                i += 1;
                out.material = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "attributes") {
                i = self.parse_attributes(i + 1, &mut out.attributes)?;
            } else if self.str_eq(i, "targets") {
                i = self.parse_table(i + 1, &mut out.targets, |r, i, t: &mut MorphTarget| {
                    r.parse_attributes(i, &mut t.attributes)
                })?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_mesh(&self, i: usize, out: &mut Mesh) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "primitives") {
                i = self.parse_table(i + 1, &mut out.primitives, Self::parse_primitive)?;
            } else if self.str_eq(i, "weights") {
                i = self.parse_float_vec(i + 1, &mut out.weights)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    // ========================================================================
    // Accessors and buffers
    // ========================================================================

    fn parse_accessor_sparse(&self, i: usize, out: &mut AccessorSparse) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "count") {
                i += 1;
                out.count = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "indices") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let indices_size = self.tok(i).size;
                i += 1;

                for _ in 0..indices_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "bufferView") {
                        i += 1;
                        out.indices_buffer_view = Ref::encode(self.to_int(i)?);
                        i += 1;
                    } else if self.str_eq(i, "byteOffset") {
                        i += 1;
                        out.indices_byte_offset = self.to_size(i)?;
                        i += 1;
                    } else if self.str_eq(i, "componentType") {
                        i += 1;
                        out.indices_component_type = ComponentType::from_gl(self.to_int(i)?);
                        i += 1;
                    } else if self.str_eq(i, "extras") {
                        i = self.parse_extras(i + 1, &mut out.indices_extras)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else if self.str_eq(i, "values") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let values_size = self.tok(i).size;
                i += 1;

                for _ in 0..values_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "bufferView") {
                        i += 1;
                        out.values_buffer_view = Ref::encode(self.to_int(i)?);
                        i += 1;
                    } else if self.str_eq(i, "byteOffset") {
                        i += 1;
                        out.values_byte_offset = self.to_size(i)?;
                        i += 1;
                    } else if self.str_eq(i, "extras") {
                        i = self.parse_extras(i + 1, &mut out.values_extras)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_accessor(&self, i: usize, out: &mut Accessor) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "bufferView") {
                i += 1;
                out.buffer_view = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "byteOffset") {
                i += 1;
                out.offset = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "componentType") {
                i += 1;
                out.component_type = ComponentType::from_gl(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "normalized") {
                i += 1;
                out.normalized = self.to_bool(i);
                i += 1;
            } else if self.str_eq(i, "count") {
                i += 1;
                out.count = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "type") {
                i += 1;
                if self.str_eq(i, "SCALAR") {
                    out.element_type = ElementType::Scalar;
                } else if self.str_eq(i, "VEC2") {
                    out.element_type = ElementType::Vec2;
                } else if self.str_eq(i, "VEC3") {
                    out.element_type = ElementType::Vec3;
                } else if self.str_eq(i, "VEC4") {
                    out.element_type = ElementType::Vec4;
                } else if self.str_eq(i, "MAT2") {
                    out.element_type = ElementType::Mat2;
                } else if self.str_eq(i, "MAT3") {
                    out.element_type = ElementType::Mat3;
                } else if self.str_eq(i, "MAT4") {
                    out.element_type = ElementType::Mat4;
                }
                i += 1;
            } else if self.str_eq(i, "min") {
                i += 1;
                out.has_min = true;
                // The element count may not be known yet, so accept whatever
                // is present up to the 16-slot capacity.
                let n = self.tok(i).size.min(16);
                i = self.parse_float_array(i, &mut out.min[..n])?;
            } else if self.str_eq(i, "max") {
                i += 1;
                out.has_max = true;
                let n = self.tok(i).size.min(16);
                i = self.parse_float_array(i, &mut out.max[..n])?;
            } else if self.str_eq(i, "sparse") {
                out.is_sparse = true;
                i = self.parse_accessor_sparse(i + 1, &mut out.sparse)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_buffer_view(&self, i: usize, out: &mut BufferView) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "buffer") {
                i += 1;
                out.buffer = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "byteOffset") {
                i += 1;
                out.offset = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "byteLength") {
                i += 1;
                out.size = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "byteStride") {
                i += 1;
                out.stride = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "target") {
                i += 1;
                out.kind = BufferViewKind::from_gl(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_buffer(&self, i: usize, out: &mut Buffer) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "byteLength") {
                i += 1;
                out.size = self.to_size(i)?;
                i += 1;
            } else if self.str_eq(i, "uri") {
                i = self.parse_string(i + 1, &mut out.uri)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    // ========================================================================
    // Materials and textures
    // ========================================================================

    fn parse_texture_transform(&self, i: usize, out: &mut TextureTransform) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "offset") {
                i = self.parse_float_array(i + 1, &mut out.offset)?;
            } else if self.str_eq(i, "rotation") {
                i += 1;
                out.rotation = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "scale") {
                i = self.parse_float_array(i + 1, &mut out.scale)?;
            } else if self.str_eq(i, "texCoord") {
                i += 1;
                out.texcoord = self.to_int(i)? as i32;
                i += 1;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_texture_view(&self, i: usize, out: &mut TextureView) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        out.scale = 1.0;
        out.transform.scale = [1.0, 1.0];

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "index") {
                i += 1;
                out.texture = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "texCoord") {
                i += 1;
                out.texcoord = self.to_int(i)? as i32;
                i += 1;
            } else if self.str_eq(i, "scale") || self.str_eq(i, "strength") {
                i += 1;
                out.scale = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else if self.str_eq(i, "extensions") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let extensions_size = self.tok(i).size;
                i += 1;

                for _ in 0..extensions_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "KHR_texture_transform") {
                        out.has_transform = true;
                        i = self.parse_texture_transform(i + 1, &mut out.transform)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_pbr_metallic_roughness(
        &self,
        i: usize,
        out: &mut PbrMetallicRoughness,
    ) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "metallicFactor") {
                i += 1;
                out.metallic_factor = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "roughnessFactor") {
                i += 1;
                out.roughness_factor = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "baseColorFactor") {
                i = self.parse_float_array(i + 1, &mut out.base_color_factor)?;
            } else if self.str_eq(i, "baseColorTexture") {
                i = self.parse_texture_view(i + 1, &mut out.base_color_texture)?;
            } else if self.str_eq(i, "metallicRoughnessTexture") {
                i = self.parse_texture_view(i + 1, &mut out.metallic_roughness_texture)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_pbr_specular_glossiness(
        &self,
        i: usize,
        out: &mut PbrSpecularGlossiness,
    ) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "diffuseFactor") {
                i = self.parse_float_array(i + 1, &mut out.diffuse_factor)?;
            } else if self.str_eq(i, "specularFactor") {
                i = self.parse_float_array(i + 1, &mut out.specular_factor)?;
            } else if self.str_eq(i, "glossinessFactor") {
                i += 1;
                out.glossiness_factor = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "diffuseTexture") {
                i = self.parse_texture_view(i + 1, &mut out.diffuse_texture)?;
            } else if self.str_eq(i, "specularGlossinessTexture") {
                i = self.parse_texture_view(i + 1, &mut out.specular_glossiness_texture)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_image(&self, i: usize, out: &mut Image) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "uri") {
                i = self.parse_string(i + 1, &mut out.uri)?;
            } else if self.str_eq(i, "bufferView") {
                i += 1;
                out.buffer_view = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "mimeType") {
                i = self.parse_string(i + 1, &mut out.mime_type)?;
            } else if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_sampler(&self, i: usize, out: &mut Sampler) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        out.wrap_s = 10497;
        out.wrap_t = 10497;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "magFilter") {
                i += 1;
                out.mag_filter = self.to_int(i)? as i32;
                i += 1;
            } else if self.str_eq(i, "minFilter") {
                i += 1;
                out.min_filter = self.to_int(i)? as i32;
                i += 1;
            } else if self.str_eq(i, "wrapS") {
                i += 1;
                out.wrap_s = self.to_int(i)? as i32;
                i += 1;
            } else if self.str_eq(i, "wrapT") {
                i += 1;
                out.wrap_t = self.to_int(i)? as i32;
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_texture(&self, i: usize, out: &mut Texture) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "sampler") {
                i += 1;
                out.sampler = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "source") {
                i += 1;
                out.image = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_material(&self, i: usize, out: &mut Material) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        out.pbr_metallic_roughness.base_color_factor = [1.0; 4];
        out.pbr_metallic_roughness.metallic_factor = 1.0;
        out.pbr_metallic_roughness.roughness_factor = 1.0;
        out.pbr_specular_glossiness.diffuse_factor = [1.0; 4];
        out.pbr_specular_glossiness.specular_factor = [1.0; 3];
        out.pbr_specular_glossiness.glossiness_factor = 1.0;
        out.alpha_cutoff = 0.5;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "pbrMetallicRoughness") {
                out.has_pbr_metallic_roughness = true;
                i = self.parse_pbr_metallic_roughness(i + 1, &mut out.pbr_metallic_roughness)?;
            } else if self.str_eq(i, "emissiveFactor") {
                i = self.parse_float_array(i + 1, &mut out.emissive_factor)?;
            } else if self.str_eq(i, "normalTexture") {
                i = self.parse_texture_view(i + 1, &mut out.normal_texture)?;
            } else if self.str_eq(i, "occlusionTexture") {
                i = self.parse_texture_view(i + 1, &mut out.occlusion_texture)?;
            } else if self.str_eq(i, "emissiveTexture") {
                i = self.parse_texture_view(i + 1, &mut out.emissive_texture)?;
            } else if self.str_eq(i, "alphaMode") {
                i += 1;
                if self.str_eq(i, "OPAQUE") {
                    out.alpha_mode = AlphaMode::Opaque;
                } else if self.str_eq(i, "MASK") {
                    out.alpha_mode = AlphaMode::Mask;
                } else if self.str_eq(i, "BLEND") {
                    out.alpha_mode = AlphaMode::Blend;
                }
                i += 1;
            } else if self.str_eq(i, "alphaCutoff") {
                i += 1;
                out.alpha_cutoff = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "doubleSided") {
                i += 1;
                out.double_sided = self.to_bool(i);
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else if self.str_eq(i, "extensions") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let extensions_size = self.tok(i).size;
                i += 1;

                for _ in 0..extensions_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "KHR_materials_pbrSpecularGlossiness") {
                        out.has_pbr_specular_glossiness = true;
                        i = self
                            .parse_pbr_specular_glossiness(i + 1, &mut out.pbr_specular_glossiness)?;
                    } else if self.str_eq(i, "KHR_materials_unlit") {
                        out.unlit = true;
                        i = self.skip(i + 1)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    // ========================================================================
    // Skins, cameras, lights
    // ========================================================================

    fn parse_skin(&self, i: usize, out: &mut Skin) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "joints") {
                i = self.parse_ref_array(i + 1, &mut out.joints)?;
            } else if self.str_eq(i, "skeleton") {
                i += 1;
                out.skeleton = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "inverseBindMatrices") {
                i += 1;
                out.inverse_bind_matrices = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_camera(&self, i: usize, out: &mut Camera) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "type") {
                i += 1;
                if self.str_eq(i, "perspective") {
                    out.kind = CameraKind::Perspective;
                } else if self.str_eq(i, "orthographic") {
                    out.kind = CameraKind::Orthographic;
                }
                i += 1;
            } else if self.str_eq(i, "perspective") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let data_size = self.tok(i).size;
                i += 1;

                out.kind = CameraKind::Perspective;

                for _ in 0..data_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "aspectRatio") {
                        i += 1;
                        out.perspective.aspect_ratio = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "yfov") {
                        i += 1;
                        out.perspective.yfov = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "zfar") {
                        i += 1;
                        out.perspective.zfar = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "znear") {
                        i += 1;
                        out.perspective.znear = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "extras") {
                        i = self.parse_extras(i + 1, &mut out.perspective.extras)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else if self.str_eq(i, "orthographic") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let data_size = self.tok(i).size;
                i += 1;

                out.kind = CameraKind::Orthographic;

                for _ in 0..data_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "xmag") {
                        i += 1;
                        out.orthographic.xmag = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "ymag") {
                        i += 1;
                        out.orthographic.ymag = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "zfar") {
                        i += 1;
                        out.orthographic.zfar = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "znear") {
                        i += 1;
                        out.orthographic.znear = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "extras") {
                        i = self.parse_extras(i + 1, &mut out.orthographic.extras)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_light(&self, i: usize, out: &mut Light) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "color") {
                i = self.parse_float_array(i + 1, &mut out.color)?;
            } else if self.str_eq(i, "intensity") {
                i += 1;
                out.intensity = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "type") {
                i += 1;
                if self.str_eq(i, "directional") {
                    out.kind = LightKind::Directional;
                } else if self.str_eq(i, "point") {
                    out.kind = LightKind::Point;
                } else if self.str_eq(i, "spot") {
                    out.kind = LightKind::Spot;
                }
                i += 1;
            } else if self.str_eq(i, "range") {
                i += 1;
                out.range = self.to_float(i)?;
                i += 1;
            } else if self.str_eq(i, "spot") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let data_size = self.tok(i).size;
                i += 1;

                for _ in 0..data_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "innerConeAngle") {
                        i += 1;
                        out.spot_inner_cone_angle = self.to_float(i)?;
                        i += 1;
                    } else if self.str_eq(i, "outerConeAngle") {
                        i += 1;
                        out.spot_outer_cone_angle = self.to_float(i)?;
                        i += 1;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    // ========================================================================
    // Nodes, scenes, animations
    // ========================================================================

    fn parse_node(&self, i: usize, out: &mut Node) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        out.rotation[3] = 1.0;
        out.scale = [1.0, 1.0, 1.0];
        out.matrix[0] = 1.0;
        out.matrix[5] = 1.0;
        out.matrix[10] = 1.0;
        out.matrix[15] = 1.0;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "children") {
                i = self.parse_ref_array(i + 1, &mut out.children)?;
            } else if self.str_eq(i, "mesh") {
                i += 1;
                out.mesh = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "skin") {
                i += 1;
                out.skin = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "camera") {
                i += 1;
                out.camera = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "translation") {
                out.has_translation = true;
                i = self.parse_float_array(i + 1, &mut out.translation)?;
            } else if self.str_eq(i, "rotation") {
                out.has_rotation = true;
                i = self.parse_float_array(i + 1, &mut out.rotation)?;
            } else if self.str_eq(i, "scale") {
                out.has_scale = true;
                i = self.parse_float_array(i + 1, &mut out.scale)?;
            } else if self.str_eq(i, "matrix") {
                out.has_matrix = true;
                i = self.parse_float_array(i + 1, &mut out.matrix)?;
            } else if self.str_eq(i, "weights") {
                i = self.parse_float_vec(i + 1, &mut out.weights)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else if self.str_eq(i, "extensions") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let extensions_size = self.tok(i).size;
                i += 1;

                for _ in 0..extensions_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "KHR_lights_punctual") {
                        i += 1;
                        self.check_kind(i, TokenKind::Object)?;
                        let data_size = self.tok(i).size;
                        i += 1;

                        for _ in 0..data_size {
                            self.check_key(i)?;

                            if self.str_eq(i, "light") {
                                i += 1;
                                out.light = Ref::encode(self.to_int(i)?);
                                i += 1;
                            } else {
                                i = self.skip(i + 1)?;
                            }
                        }
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_scene(&self, i: usize, out: &mut Scene) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "nodes") {
                i = self.parse_ref_array(i + 1, &mut out.nodes)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_animation_sampler(&self, i: usize, out: &mut AnimationSampler) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "input") {
                i += 1;
                out.input = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "output") {
                i += 1;
                out.output = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "interpolation") {
                i += 1;
                if self.str_eq(i, "LINEAR") {
                    out.interpolation = InterpolationType::Linear;
                } else if self.str_eq(i, "STEP") {
                    out.interpolation = InterpolationType::Step;
                } else if self.str_eq(i, "CUBICSPLINE") {
                    out.interpolation = InterpolationType::CubicSpline;
                }
                i += 1;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_animation_channel(&self, i: usize, out: &mut AnimationChannel) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "sampler") {
                i += 1;
                out.sampler = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "target") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let target_size = self.tok(i).size;
                i += 1;

                for _ in 0..target_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "node") {
                        i += 1;
                        out.target_node = Ref::encode(self.to_int(i)?);
                        i += 1;
                    } else if self.str_eq(i, "path") {
                        i += 1;
                        if self.str_eq(i, "translation") {
                            out.target_path = AnimationPath::Translation;
                        } else if self.str_eq(i, "rotation") {
                            out.target_path = AnimationPath::Rotation;
                        } else if self.str_eq(i, "scale") {
                            out.target_path = AnimationPath::Scale;
                        } else if self.str_eq(i, "weights") {
                            out.target_path = AnimationPath::Weights;
                        }
                        i += 1;
                    } else if self.str_eq(i, "extras") {
                        i = self.parse_extras(i + 1, &mut out.extras)?;
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_animation(&self, i: usize, out: &mut Animation) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "name") {
                i = self.parse_string(i + 1, &mut out.name)?;
            } else if self.str_eq(i, "samplers") {
                i = self.parse_table(i + 1, &mut out.samplers, Self::parse_animation_sampler)?;
            } else if self.str_eq(i, "channels") {
                i = self.parse_table(i + 1, &mut out.channels, Self::parse_animation_channel)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    fn parse_asset(&self, i: usize, out: &mut Asset) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "copyright") {
                i = self.parse_string(i + 1, &mut out.copyright)?;
            } else if self.str_eq(i, "generator") {
                i = self.parse_string(i + 1, &mut out.generator)?;
            } else if self.str_eq(i, "version") {
                i = self.parse_string(i + 1, &mut out.version)?;
            } else if self.str_eq(i, "minVersion") {
                i = self.parse_string(i + 1, &mut out.min_version)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut out.extras)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }

    // ========================================================================
    // Root object
    // ========================================================================

    fn parse_root(&self, i: usize, doc: &mut Document) -> Result<usize> {
        self.check_kind(i, TokenKind::Object)?;

        let size = self.tok(i).size;
        let mut i = i + 1;

        for _ in 0..size {
            self.check_key(i)?;

            if self.str_eq(i, "asset") {
                i = self.parse_asset(i + 1, &mut doc.asset)?;
            } else if self.str_eq(i, "meshes") {
                i = self.parse_table(i + 1, &mut doc.meshes, Self::parse_mesh)?;
            } else if self.str_eq(i, "accessors") {
                i = self.parse_table(i + 1, &mut doc.accessors, Self::parse_accessor)?;
            } else if self.str_eq(i, "bufferViews") {
                i = self.parse_table(i + 1, &mut doc.buffer_views, Self::parse_buffer_view)?;
            } else if self.str_eq(i, "buffers") {
                i = self.parse_table(i + 1, &mut doc.buffers, Self::parse_buffer)?;
            } else if self.str_eq(i, "materials") {
                i = self.parse_table(i + 1, &mut doc.materials, Self::parse_material)?;
            } else if self.str_eq(i, "images") {
                i = self.parse_table(i + 1, &mut doc.images, Self::parse_image)?;
            } else if self.str_eq(i, "textures") {
                i = self.parse_table(i + 1, &mut doc.textures, Self::parse_texture)?;
            } else if self.str_eq(i, "samplers") {
                i = self.parse_table(i + 1, &mut doc.samplers, Self::parse_sampler)?;
            } else if self.str_eq(i, "skins") {
                i = self.parse_table(i + 1, &mut doc.skins, Self::parse_skin)?;
            } else if self.str_eq(i, "cameras") {
                i = self.parse_table(i + 1, &mut doc.cameras, Self::parse_camera)?;
            } else if self.str_eq(i, "nodes") {
                i = self.parse_table(i + 1, &mut doc.nodes, Self::parse_node)?;
            } else if self.str_eq(i, "scenes") {
                i = self.parse_table(i + 1, &mut doc.scenes, Self::parse_scene)?;
            } else if self.str_eq(i, "scene") {
                i += 1;
                doc.scene = Ref::encode(self.to_int(i)?);
                i += 1;
            } else if self.str_eq(i, "animations") {
                i = self.parse_table(i + 1, &mut doc.animations, Self::parse_animation)?;
            } else if self.str_eq(i, "extras") {
                i = self.parse_extras(i + 1, &mut doc.extras)?;
            } else if self.str_eq(i, "extensions") {
                i += 1;
                self.check_kind(i, TokenKind::Object)?;
                let extensions_size = self.tok(i).size;
                i += 1;

                for _ in 0..extensions_size {
                    self.check_key(i)?;

                    if self.str_eq(i, "KHR_lights_punctual") {
                        i += 1;
                        self.check_kind(i, TokenKind::Object)?;
                        let data_size = self.tok(i).size;
                        i += 1;

                        for _ in 0..data_size {
                            self.check_key(i)?;

                            if self.str_eq(i, "lights") {
                                i = self.parse_table(i + 1, &mut doc.lights, Self::parse_light)?;
                            } else {
                                i = self.skip(i + 1)?;
                            }
                        }
                    } else {
                        i = self.skip(i + 1)?;
                    }
                }
            } else if self.str_eq(i, "extensionsUsed") {
                i = self.parse_string_array(i + 1, &mut doc.extensions_used)?;
            } else if self.str_eq(i, "extensionsRequired") {
                i = self.parse_string_array(i + 1, &mut doc.extensions_required)?;
            } else {
                i = self.skip(i + 1)?;
            }
        }

        Ok(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_tokens::Tokenizer;

    fn parse(json: &str) -> Result<Document> {
        let count = Tokenizer::new().count(json.as_bytes()).unwrap();
        let mut tokens = vec![Token::default(); count];
        Tokenizer::new()
            .tokenize(json.as_bytes(), &mut tokens)
            .unwrap();
        let mut doc = Document::default();
        parse_document(&tokens, json.as_bytes(), &mut doc)?;
        Ok(doc)
    }

    #[test]
    fn test_asset_strings() {
        let doc = parse(
            r#"{"asset":{"version":"2.0","generator":"test gen","copyright":"none"}}"#,
        )
        .unwrap();
        assert_eq!(doc.asset.version.as_deref(), Some("2.0"));
        assert_eq!(doc.asset.generator.as_deref(), Some("test gen"));
        assert_eq!(doc.asset.copyright.as_deref(), Some("none"));
        assert_eq!(doc.asset.min_version, None);
    }

    #[test]
    fn test_unknown_members_are_skipped() {
        let doc = parse(
            r#"{"asset":{"version":"2.0"},"unknown":{"nested":[1,2,{"x":true}]},"meshes":[]}"#,
        )
        .unwrap();
        assert!(doc.meshes.is_empty());
    }

    #[test]
    fn test_duplicate_string_member_fails() {
        let err = parse(r#"{"asset":{"version":"2.0","version":"2.0"}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidGltf(_)));
    }

    #[test]
    fn test_accessor_fields() {
        let doc = parse(
            r#"{"accessors":[{"bufferView":0,"byteOffset":8,"componentType":5126,
                "count":4,"type":"VEC3","normalized":true,
                "min":[0,0,0],"max":[1,1,1]}]}"#,
        )
        .unwrap();
        let accessor = &doc.accessors[0];
        assert_eq!(accessor.component_type, ComponentType::F32);
        assert_eq!(accessor.element_type, ElementType::Vec3);
        assert_eq!(accessor.offset, 8);
        assert_eq!(accessor.count, 4);
        assert!(accessor.normalized);
        assert!(accessor.has_min && accessor.has_max);
        assert_eq!(accessor.min[..3], [0.0, 0.0, 0.0]);
        assert_eq!(accessor.max[..3], [1.0, 1.0, 1.0]);
        assert!(accessor.buffer_view.is_set());
    }

    #[test]
    fn test_sparse_accessor() {
        let doc = parse(
            r#"{"accessors":[{"componentType":5126,"count":10,"type":"SCALAR",
                "sparse":{"count":2,
                    "indices":{"bufferView":0,"byteOffset":4,"componentType":5123},
                    "values":{"bufferView":1,"byteOffset":8}}}]}"#,
        )
        .unwrap();
        let sparse = &doc.accessors[0].sparse;
        assert!(doc.accessors[0].is_sparse);
        assert_eq!(sparse.count, 2);
        assert_eq!(sparse.indices_byte_offset, 4);
        assert_eq!(sparse.indices_component_type, ComponentType::U16);
        assert_eq!(sparse.values_byte_offset, 8);
        assert!(sparse.indices_buffer_view.is_set());
        assert!(sparse.values_buffer_view.is_set());
    }

    #[test]
    fn test_material_defaults_and_extensions() {
        let doc = parse(
            r#"{"materials":[
                {"name":"plain"},
                {"alphaMode":"MASK","alphaCutoff":0.25,"doubleSided":true,
                 "pbrMetallicRoughness":{"baseColorFactor":[0.5,0.5,0.5,1],"metallicFactor":0},
                 "extensions":{
                    "KHR_materials_unlit":{},
                    "KHR_materials_pbrSpecularGlossiness":{"glossinessFactor":0.25},
                    "VENDOR_unknown":{"x":1}}}]}"#,
        )
        .unwrap();

        let plain = &doc.materials[0];
        assert!(!plain.has_pbr_metallic_roughness);
        assert_eq!(plain.pbr_metallic_roughness.base_color_factor, [1.0; 4]);
        assert_eq!(plain.pbr_metallic_roughness.metallic_factor, 1.0);
        assert_eq!(plain.alpha_cutoff, 0.5);
        assert_eq!(plain.alpha_mode, AlphaMode::Opaque);
        assert!(!plain.unlit);

        let fancy = &doc.materials[1];
        assert_eq!(fancy.alpha_mode, AlphaMode::Mask);
        assert_eq!(fancy.alpha_cutoff, 0.25);
        assert!(fancy.double_sided);
        assert!(fancy.has_pbr_metallic_roughness);
        assert_eq!(fancy.pbr_metallic_roughness.metallic_factor, 0.0);
        assert!(fancy.unlit);
        assert!(fancy.has_pbr_specular_glossiness);
        assert_eq!(fancy.pbr_specular_glossiness.glossiness_factor, 0.25);
        assert_eq!(fancy.pbr_specular_glossiness.diffuse_factor, [1.0; 4]);
    }

    #[test]
    fn test_texture_transform_extension() {
        let doc = parse(
            r#"{"materials":[{"pbrMetallicRoughness":{"baseColorTexture":{
                "index":0,"texCoord":1,
                "extensions":{"KHR_texture_transform":{
                    "offset":[0.5,0.25],"rotation":1.5,"scale":[2,3],"texCoord":0}}}}}]}"#,
        )
        .unwrap();
        let view = &doc.materials[0].pbr_metallic_roughness.base_color_texture;
        assert_eq!(view.texcoord, 1);
        assert!(view.has_transform);
        assert_eq!(view.transform.offset, [0.5, 0.25]);
        assert_eq!(view.transform.rotation, 1.5);
        assert_eq!(view.transform.scale, [2.0, 3.0]);
    }

    #[test]
    fn test_texture_view_default_scales() {
        let doc = parse(
            r#"{"materials":[{"occlusionTexture":{"index":0},
                             "normalTexture":{"index":1,"scale":0.5}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.materials[0].occlusion_texture.scale, 1.0);
        assert_eq!(doc.materials[0].occlusion_texture.transform.scale, [1.0, 1.0]);
        assert_eq!(doc.materials[0].normal_texture.scale, 0.5);
    }

    #[test]
    fn test_occlusion_strength_maps_to_scale() {
        let doc = parse(r#"{"materials":[{"occlusionTexture":{"index":0,"strength":0.75}}]}"#)
            .unwrap();
        assert_eq!(doc.materials[0].occlusion_texture.scale, 0.75);
    }

    #[test]
    fn test_primitive_attributes_and_targets() {
        let doc = parse(
            r#"{"meshes":[{"primitives":[{
                "attributes":{"POSITION":0,"NORMAL":1,"TEXCOORD_1":2,"_CUSTOM":3},
                "indices":4,"material":0,"mode":1,
                "targets":[{"POSITION":5},{"POSITION":6}]}],
                "weights":[0.5,0.5]}]}"#,
        )
        .unwrap();
        let prim = &doc.meshes[0].primitives[0];
        assert_eq!(prim.topology, PrimitiveTopology::Lines);
        assert_eq!(prim.attributes.len(), 4);
        assert_eq!(prim.attributes[0].semantic, AttributeSemantic::Position);
        assert_eq!(prim.attributes[2].semantic, AttributeSemantic::TexCoord);
        assert_eq!(prim.attributes[2].set_index, 1);
        assert_eq!(prim.attributes[2].name, "TEXCOORD_1");
        assert_eq!(prim.attributes[3].semantic, AttributeSemantic::Invalid);
        assert_eq!(prim.targets.len(), 2);
        assert_eq!(prim.targets[0].attributes.len(), 1);
        assert_eq!(doc.meshes[0].weights, vec![0.5, 0.5]);
    }

    #[test]
    fn test_primitive_mode_out_of_range() {
        let err = parse(r#"{"meshes":[{"primitives":[{"mode":9}]}]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidGltf(_)));
    }

    #[test]
    fn test_node_defaults_and_extension() {
        let doc = parse(
            r#"{"nodes":[
                {"translation":[1,2,3]},
                {"extensions":{"KHR_lights_punctual":{"light":0}}}],
              "extensions":{"KHR_lights_punctual":{"lights":[
                {"type":"spot","intensity":2,"color":[1,0,0],
                 "spot":{"innerConeAngle":0.2,"outerConeAngle":0.7}}]}}}"#,
        )
        .unwrap();
        let node = &doc.nodes[0];
        assert!(node.has_translation);
        assert!(!node.has_rotation);
        assert_eq!(node.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(node.scale, [1.0, 1.0, 1.0]);
        assert_eq!(node.matrix[0], 1.0);
        assert_eq!(node.matrix[15], 1.0);
        assert!(doc.nodes[1].light.is_set());

        assert_eq!(doc.lights.len(), 1);
        assert_eq!(doc.lights[0].kind, LightKind::Spot);
        assert_eq!(doc.lights[0].intensity, 2.0);
        assert_eq!(doc.lights[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(doc.lights[0].spot_outer_cone_angle, 0.7);
    }

    #[test]
    fn test_sampler_wrap_defaults() {
        let doc = parse(r#"{"samplers":[{"magFilter":9729}]}"#).unwrap();
        assert_eq!(doc.samplers[0].wrap_s, 10497);
        assert_eq!(doc.samplers[0].wrap_t, 10497);
        assert_eq!(doc.samplers[0].mag_filter, 9729);
    }

    #[test]
    fn test_extensions_used_lists() {
        let doc = parse(
            r#"{"extensionsUsed":["KHR_lights_punctual","VENDOR_thing"],
               "extensionsRequired":["VENDOR_thing"]}"#,
        )
        .unwrap();
        assert_eq!(doc.extensions_used.len(), 2);
        assert_eq!(doc.extensions_used[1], "VENDOR_thing");
        assert_eq!(doc.extensions_required, vec!["VENDOR_thing".to_string()]);
    }

    #[test]
    fn test_extras_ranges() {
        let json = r#"{"asset":{"version":"2.0","extras":{"custom":42}}}"#;
        let doc = parse(json).unwrap();
        assert!(!doc.asset.extras.is_empty());
        assert_eq!(
            &json.as_bytes()[doc.asset.extras.start..doc.asset.extras.end],
            br#"{"custom":42}"#
        );
    }

    #[test]
    fn test_animation() {
        let doc = parse(
            r#"{"animations":[{"name":"spin",
                "samplers":[{"input":0,"output":1,"interpolation":"CUBICSPLINE"}],
                "channels":[{"sampler":0,"target":{"node":2,"path":"rotation"}}]}]}"#,
        )
        .unwrap();
        let animation = &doc.animations[0];
        assert_eq!(animation.name.as_deref(), Some("spin"));
        assert_eq!(
            animation.samplers[0].interpolation,
            InterpolationType::CubicSpline
        );
        assert_eq!(animation.channels[0].target_path, AnimationPath::Rotation);
        assert!(animation.channels[0].target_node.is_set());
    }

    #[test]
    fn test_camera_kinds() {
        let doc = parse(
            r#"{"cameras":[
                {"type":"perspective","perspective":{"yfov":0.7,"znear":0.01}},
                {"type":"orthographic","orthographic":{"xmag":2,"ymag":2,"zfar":100,"znear":0.1}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.cameras[0].kind, CameraKind::Perspective);
        assert_eq!(doc.cameras[0].perspective.yfov, 0.7);
        assert_eq!(doc.cameras[1].kind, CameraKind::Orthographic);
        assert_eq!(doc.cameras[1].orthographic.zfar, 100.0);
    }

    #[test]
    fn test_float_values_parse_as_longest_prefix() {
        // Malformed-but-tokenizable numbers keep their leading numeric
        // prefix; the trailing garbage is ignored rather than zeroing the
        // value.
        let doc = parse(
            r#"{"materials":[{"alphaCutoff":0.25xyz}],
               "extensions":{"KHR_lights_punctual":{"lights":[
                   {"intensity":5x,"range":1.2.3,"color":[1e1z,.5,2.e2]}]}}}"#,
        )
        .unwrap();
        assert_eq!(doc.materials[0].alpha_cutoff, 0.25);
        assert_eq!(doc.lights[0].intensity, 5.0);
        assert_eq!(doc.lights[0].range, 1.2);
        assert_eq!(doc.lights[0].color, [10.0, 0.5, 200.0]);

        // Entirely non-numeric primitives fall back to zero.
        let doc = parse(r#"{"extensions":{"KHR_lights_punctual":{"lights":[{"range":null}]}}}"#)
            .unwrap();
        assert_eq!(doc.lights[0].range, 0.0);
    }

    #[test]
    fn test_wrong_value_kind_fails() {
        assert!(parse(r#"{"meshes":{"not":"an array"}}"#).is_err());
        assert!(parse(r#"{"accessors":[{"count":"nan"}]}"#).is_err());
        assert!(parse(r#"[1,2,3]"#).is_err());
    }
}
