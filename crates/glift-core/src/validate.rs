//! Post-resolution semantic validation.
//!
//! All checks are read-only; `validate` can be called any number of times,
//! before or after buffer loading. Range violations report `DataTooShort`,
//! schema rule violations report `InvalidGltf`, matching the parser's error
//! taxonomy.

use crate::document::{BufferView, Document};
use crate::error::{Error, Result};
use crate::types::{element_size, ComponentType, ElementType};

/// Largest value stored in an index run, decoded from loaded buffer bytes.
fn index_bound(
    doc: &Document,
    view: &BufferView,
    offset: usize,
    component_type: ComponentType,
    count: usize,
) -> Result<usize> {
    let buffer = match view.buffer.get() {
        Some(id) => id,
        None => return Ok(0),
    };
    let bytes = match doc.buffer_bytes(buffer) {
        Some(bytes) => bytes,
        None => return Ok(0),
    };

    let start = view.offset + offset;
    let component_size = component_type.size();
    let end = start + component_size * count;
    let data = bytes.get(start..end).ok_or(Error::DataTooShort)?;

    let mut bound = 0usize;
    for chunk in data.chunks_exact(component_size) {
        let value = match component_type {
            ComponentType::U8 => chunk[0] as usize,
            ComponentType::U16 => u16::from_le_bytes([chunk[0], chunk[1]]) as usize,
            ComponentType::U32 => {
                u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize
            }
            _ => 0,
        };
        bound = bound.max(value);
    }
    Ok(bound)
}

/// Validates accessor ranges, sparse overlays, buffer view ranges, and
/// per-mesh consistency rules.
pub fn validate(doc: &Document) -> Result<()> {
    for accessor in &doc.accessors {
        let accessor_element_size = element_size(accessor.element_type, accessor.component_type);

        if let Some(view) = accessor.buffer_view.get() {
            let view = doc.buffer_view(view);
            if accessor.count == 0 {
                return Err(Error::DataTooShort);
            }
            let required =
                accessor.offset + accessor.stride * (accessor.count - 1) + accessor_element_size;
            if view.size < required {
                return Err(Error::DataTooShort);
            }
        }

        if accessor.is_sparse {
            let sparse = &accessor.sparse;

            let indices_component_size =
                element_size(ElementType::Scalar, sparse.indices_component_type);
            let indices_required =
                sparse.indices_byte_offset + indices_component_size * sparse.count;
            let values_required = sparse.values_byte_offset + accessor_element_size * sparse.count;

            let indices_view = match sparse.indices_buffer_view.get() {
                Some(id) => doc.buffer_view(id),
                None => return Err(Error::InvalidGltf("sparse overlay without indices view")),
            };
            let values_view = match sparse.values_buffer_view.get() {
                Some(id) => doc.buffer_view(id),
                None => return Err(Error::InvalidGltf("sparse overlay without values view")),
            };

            if indices_view.size < indices_required || values_view.size < values_required {
                return Err(Error::DataTooShort);
            }

            if !sparse.indices_component_type.is_unsigned_integer() {
                return Err(Error::InvalidGltf("sparse index component type"));
            }

            if has_loaded_bytes(doc, indices_view) {
                let bound = index_bound(
                    doc,
                    indices_view,
                    sparse.indices_byte_offset,
                    sparse.indices_component_type,
                    sparse.count,
                )?;
                if bound >= accessor.count {
                    return Err(Error::DataTooShort);
                }
            }
        }
    }

    for view in &doc.buffer_views {
        let required = view.offset + view.size;
        if let Some(buffer) = view.buffer.get() {
            if doc.buffer(buffer).size < required {
                return Err(Error::DataTooShort);
            }
        }
    }

    for mesh in &doc.meshes {
        if !mesh.weights.is_empty()
            && !mesh.primitives.is_empty()
            && mesh.primitives[0].targets.len() != mesh.weights.len()
        {
            return Err(Error::InvalidGltf("mesh weights count"));
        }

        for primitive in &mesh.primitives {
            if primitive.targets.len() != mesh.primitives[0].targets.len() {
                return Err(Error::InvalidGltf("morph target count mismatch"));
            }

            if primitive.attributes.is_empty() {
                continue;
            }

            let first = match primitive.attributes[0].data.get() {
                Some(id) => doc.accessor(id),
                None => return Err(Error::InvalidGltf("attribute without accessor")),
            };

            for attribute in &primitive.attributes {
                let accessor = attribute
                    .data
                    .get()
                    .map(|id| doc.accessor(id))
                    .ok_or(Error::InvalidGltf("attribute without accessor"))?;
                if accessor.count != first.count {
                    return Err(Error::InvalidGltf("attribute count mismatch"));
                }
            }

            for target in &primitive.targets {
                for attribute in &target.attributes {
                    let accessor = attribute
                        .data
                        .get()
                        .map(|id| doc.accessor(id))
                        .ok_or(Error::InvalidGltf("attribute without accessor"))?;
                    if accessor.count != first.count {
                        return Err(Error::InvalidGltf("morph target count"));
                    }
                }
            }

            if let Some(indices) = primitive.indices.get() {
                let indices = doc.accessor(indices);

                if !indices.component_type.is_unsigned_integer() {
                    return Err(Error::InvalidGltf("index component type"));
                }

                if let Some(view) = indices.buffer_view.get() {
                    let view = doc.buffer_view(view);
                    if has_loaded_bytes(doc, view) {
                        let bound = index_bound(
                            doc,
                            view,
                            indices.offset,
                            indices.component_type,
                            indices.count,
                        )?;
                        if bound >= first.count {
                            return Err(Error::DataTooShort);
                        }
                    }
                }
            }
        }
    }

    for node in &doc.nodes {
        if node.weights.is_empty() {
            continue;
        }
        if let Some(mesh) = node.mesh.get() {
            let mesh = doc.mesh(mesh);
            if !mesh.primitives.is_empty()
                && mesh.primitives[0].targets.len() != node.weights.len()
            {
                return Err(Error::InvalidGltf("node weights count"));
            }
        }
    }

    Ok(())
}

fn has_loaded_bytes(doc: &Document, view: &BufferView) -> bool {
    view.buffer
        .get()
        .and_then(|id| doc.buffer_bytes(id))
        .is_some()
}
