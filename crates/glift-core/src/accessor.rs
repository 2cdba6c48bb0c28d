//! Typed readout of accessor elements from loaded buffer bytes.
//!
//! Pure functions over a resolved document whose buffer payloads have been
//! loaded. Reads never allocate; a read that cannot be satisfied (sparse
//! accessor, missing view, unloaded buffer, short output) reports failure
//! instead of panicking. All decoding is little-endian, as mandated by the
//! container format.

use crate::document::{Accessor, Document};
use crate::types::{ComponentType, ElementType};

/// Decodes one component as an index-sized integer. Signed types sign
/// extend; floats truncate.
fn component_read_index(bytes: &[u8], component_type: ComponentType) -> usize {
    match component_type {
        ComponentType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as usize,
        ComponentType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as usize,
        ComponentType::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize,
        ComponentType::F32 => {
            f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize
        }
        ComponentType::I8 => bytes[0] as i8 as usize,
        ComponentType::U8 | ComponentType::Invalid => bytes[0] as usize,
    }
}

/// Decodes one component as a float, dividing normalized integers by the
/// type's maximum magnitude.
fn component_read_float(bytes: &[u8], component_type: ComponentType, normalized: bool) -> f32 {
    if component_type == ComponentType::F32 {
        return f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    if normalized {
        return match component_type {
            ComponentType::U32 => {
                u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32
                    / u32::MAX as f32
            }
            ComponentType::I16 => {
                i16::from_le_bytes([bytes[0], bytes[1]]) as f32 / i16::MAX as f32
            }
            ComponentType::U16 => {
                u16::from_le_bytes([bytes[0], bytes[1]]) as f32 / u16::MAX as f32
            }
            ComponentType::I8 => bytes[0] as i8 as f32 / i8::MAX as f32,
            _ => bytes[0] as f32 / u8::MAX as f32,
        };
    }

    match component_type {
        ComponentType::I8 => bytes[0] as i8 as f32,
        ComponentType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
        ComponentType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
        ComponentType::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32,
        _ => bytes[0] as f32,
    }
}

/// Decodes one whole element into `out`, honoring the packed-matrix
/// layouts from the data-alignment rules: matrix columns are padded to
/// 4-byte boundaries for 1-byte mat2 and 1- and 2-byte mat3.
fn element_read_float(
    element: &[u8],
    element_type: ElementType,
    component_type: ComponentType,
    normalized: bool,
    out: &mut [f32],
) -> bool {
    let num_components = element_type.num_components();
    if out.len() < num_components {
        return false;
    }

    let component_size = component_type.size();

    if element_type == ElementType::Mat2 && component_size == 1 {
        for (slot, offset) in out[..4].iter_mut().zip([0, 1, 4, 5]) {
            *slot = component_read_float(&element[offset..], component_type, normalized);
        }
        return true;
    }

    if element_type == ElementType::Mat3 && component_size == 1 {
        for (slot, offset) in out[..9].iter_mut().zip([0, 1, 2, 4, 5, 6, 8, 9, 10]) {
            *slot = component_read_float(&element[offset..], component_type, normalized);
        }
        return true;
    }

    if element_type == ElementType::Mat3 && component_size == 2 {
        for (slot, offset) in out[..9].iter_mut().zip([0, 2, 4, 8, 10, 12, 16, 18, 20]) {
            *slot = component_read_float(&element[offset..], component_type, normalized);
        }
        return true;
    }

    for (k, slot) in out[..num_components].iter_mut().enumerate() {
        *slot = component_read_float(&element[component_size * k..], component_type, normalized);
    }
    true
}

/// Reads element `index` of `accessor` as floats into `out`.
///
/// Returns false for sparse accessors, accessors without a buffer view,
/// unloaded buffers, out-of-range reads, or an output slice shorter than
/// the element's component count.
pub fn read_accessor_float(
    doc: &Document,
    accessor: &Accessor,
    index: usize,
    out: &mut [f32],
) -> bool {
    if accessor.is_sparse {
        return false;
    }
    let view = match accessor.buffer_view.get() {
        Some(id) => doc.buffer_view(id),
        None => return false,
    };
    let buffer = match view.buffer.get() {
        Some(id) => id,
        None => return false,
    };
    let bytes = match doc.buffer_bytes(buffer) {
        Some(bytes) => bytes,
        None => return false,
    };

    let offset = accessor.offset + view.offset + accessor.stride * index;
    let element_size = crate::types::element_size(accessor.element_type, accessor.component_type);
    let element = match bytes.get(offset..offset + element_size) {
        Some(element) => element,
        None => return false,
    };

    element_read_float(
        element,
        accessor.element_type,
        accessor.component_type,
        accessor.normalized,
        out,
    )
}

/// Reads element `index` of a scalar accessor as an integer index.
/// Returns 0 when no buffer view or payload is available.
pub fn read_accessor_index(doc: &Document, accessor: &Accessor, index: usize) -> usize {
    let view = match accessor.buffer_view.get() {
        Some(id) => doc.buffer_view(id),
        None => return 0,
    };
    let buffer = match view.buffer.get() {
        Some(id) => id,
        None => return 0,
    };
    let bytes = match doc.buffer_bytes(buffer) {
        Some(bytes) => bytes,
        None => return 0,
    };

    let offset = accessor.offset + view.offset + accessor.stride * index;
    let component_size = accessor.component_type.size().max(1);
    match bytes.get(offset..offset + component_size) {
        Some(element) => component_read_index(element, accessor.component_type),
        None => 0,
    }
}
