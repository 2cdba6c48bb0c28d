//! Node transform composition.
//!
//! Matrices are column-major `[f32; 16]` with translation in the last
//! column, matching the container format's node matrix layout.

use crate::document::{Document, Node};

/// The node's local transform: its explicit matrix when one was given,
/// otherwise translation * rotation * scale composed from the TRS triple.
/// The quaternion is assumed to be unit length.
pub fn node_transform_local(node: &Node) -> [f32; 16] {
    if node.has_matrix {
        return node.matrix;
    }

    let [tx, ty, tz] = node.translation;
    let [qx, qy, qz, qw] = node.rotation;
    let [sx, sy, sz] = node.scale;

    let mut m = [0.0f32; 16];

    m[0] = (1.0 - 2.0 * qy * qy - 2.0 * qz * qz) * sx;
    m[1] = (2.0 * qx * qy + 2.0 * qz * qw) * sy;
    m[2] = (2.0 * qx * qz - 2.0 * qy * qw) * sz;

    m[4] = (2.0 * qx * qy - 2.0 * qz * qw) * sx;
    m[5] = (1.0 - 2.0 * qx * qx - 2.0 * qz * qz) * sy;
    m[6] = (2.0 * qy * qz + 2.0 * qx * qw) * sz;

    m[8] = (2.0 * qx * qz + 2.0 * qy * qw) * sx;
    m[9] = (2.0 * qy * qz - 2.0 * qx * qw) * sy;
    m[10] = (1.0 - 2.0 * qx * qx - 2.0 * qy * qy) * sz;

    m[12] = tx;
    m[13] = ty;
    m[14] = tz;
    m[15] = 1.0;

    m
}

/// The root-to-node transform: the local matrix multiplied through every
/// ancestor's local matrix along the parent links.
///
/// Each step multiplies the accumulator by the ancestor's rotation/scale
/// 3x3 block and adds its translation column, which equals a full 4x4
/// multiplication for affine TRS matrices with last row (0,0,0,1).
pub fn node_transform_world(doc: &Document, node: &Node) -> [f32; 16] {
    let mut m = node_transform_local(node);

    let mut parent = node.parent.get();
    while let Some(id) = parent {
        let ancestor = doc.node(id);
        let pm = node_transform_local(ancestor);

        for column in 0..4 {
            let l0 = m[column * 4];
            let l1 = m[column * 4 + 1];
            let l2 = m[column * 4 + 2];

            m[column * 4] = l0 * pm[0] + l1 * pm[4] + l2 * pm[8];
            m[column * 4 + 1] = l0 * pm[1] + l1 * pm[5] + l2 * pm[9];
            m[column * 4 + 2] = l0 * pm[2] + l1 * pm[6] + l2 * pm[10];
        }

        m[12] += pm[12];
        m[13] += pm[13];
        m[14] += pm[14];

        parent = ancestor.parent.get();
    }

    m
}
