//! Geometry of the textured quad: texture coordinates, window coordinates, the
//! interleaved vertex layout and the orthographic projection.

use std::mem;

use crate::math::{self, Matrix4, Vector2};
use crate::utils::Rect;

/// Number of vertices of the triangle strip.
pub const VERTICES: usize = 4;
/// Number of floats per vertex, a `vec2` position followed by a `vec2` texcoord.
pub const COMPONENTS: usize = 4;
/// Size in bytes of a single interleaved vertex.
pub const STRIDE: usize = COMPONENTS * mem::size_of::<f32>();
/// Byte offset of the texcoord inside a vertex.
pub const TEXCOORD_OFFSET: usize = 2 * mem::size_of::<f32>();

/// Interleaved vertex data of a quad.
pub type QuadVertices = [f32; VERTICES * COMPONENTS];

/// Returns `[u1, v1, u2, v2]`, the normalized texture coordinates of `src`. The whole
/// texture is used if there is no source rectangle.
pub fn uv_coords(src: Option<Rect>, dimensions: Vector2<u32>) -> [f32; 4] {
    match src {
        Some(src) if dimensions.x > 0 && dimensions.y > 0 => {
            let (w, h) = (dimensions.x as f32, dimensions.y as f32);
            let u1 = src.min.x as f32 / w;
            let v1 = src.min.y as f32 / h;
            [
                u1,
                v1,
                u1 + src.width() as f32 / w,
                v1 + src.height() as f32 / h,
            ]
        }
        _ => [0.0, 0.0, 1.0, 1.0],
    }
}

/// Returns `[x1, y1, x2, y2]`, the window coordinates of `dst`.
pub fn vertex_coords(dst: Rect) -> [f32; 4] {
    [
        dst.min.x as f32,
        dst.min.y as f32,
        dst.max.x as f32,
        dst.max.y as f32,
    ]
}

/// Interleaves positions and texture coordinates in triangle strip order: top-left,
/// top-right, bottom-left, bottom-right.
pub fn interleave(xy: [f32; 4], uv: [f32; 4]) -> QuadVertices {
    let [x1, y1, x2, y2] = xy;
    let [u1, v1, u2, v2] = uv;

    [
        x1, y1, u1, v1,
        x2, y1, u2, v1,
        x1, y2, u1, v2,
        x2, y2, u2, v2,
    ]
}

/// Reinterprets the vertex data as raw bytes, ready to be uploaded.
pub fn as_bytes(vertices: &QuadVertices) -> &[u8] {
    unsafe {
        ::std::slice::from_raw_parts(
            vertices.as_ptr() as *const u8,
            vertices.len() * mem::size_of::<f32>(),
        )
    }
}

/// Builds the orthographic projection mapping the viewport `[x, y, w, h]` in pixels
/// to clip space. When `flip_y` is set the origin is moved to the top-left corner,
/// which is what a window framebuffer needs. Render targets keep GL's bottom-left
/// origin since SDL samples them upside down.
pub fn projection(viewport: [i32; 4], flip_y: bool) -> Matrix4<f32> {
    let w = viewport[2] as f32;
    let h = viewport[3] as f32;

    if flip_y {
        math::ortho(0.0, w, h, 0.0, -1.0, 1.0)
    } else {
        math::ortho(0.0, w, 0.0, h, -1.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vector4;

    #[test]
    fn vertices() {
        let xy = vertex_coords(Rect::from_xywh(10, 20, 30, 40));
        let data = interleave(xy, [0.0, 0.0, 1.0, 1.0]);

        let positions: Vec<_> = data.chunks(COMPONENTS).map(|v| (v[0], v[1])).collect();
        assert_eq!(
            positions,
            vec![(10.0, 20.0), (40.0, 20.0), (10.0, 60.0), (40.0, 60.0)]
        );
    }

    #[test]
    fn full_texture_uvs() {
        let dims = Vector2::new(100, 200);
        let uv = uv_coords(Some(Rect::from_xywh(0, 0, 100, 200)), dims);
        let data = interleave([0.0; 4], uv);

        let uvs: Vec<_> = data.chunks(COMPONENTS).map(|v| (v[2], v[3])).collect();
        assert_eq!(uvs, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(uv_coords(None, dims), uv);
    }

    #[test]
    fn partial_uvs() {
        let uv = uv_coords(Some(Rect::from_xywh(25, 50, 50, 100)), Vector2::new(100, 200));
        assert_eq!(uv, [0.25, 0.25, 0.75, 0.75]);
    }

    #[test]
    fn empty_texture() {
        let uv = uv_coords(Some(Rect::from_xywh(1, 1, 2, 2)), Vector2::new(0, 0));
        assert_eq!(uv, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn bytes() {
        let data = interleave([1.0; 4], [2.0; 4]);
        assert_eq!(as_bytes(&data).len(), VERTICES * STRIDE);
    }

    #[test]
    fn window_projection() {
        let m = projection([0, 0, 640, 480], true);

        let top_left = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_ulps_eq!(top_left.x, -1.0);
        assert_ulps_eq!(top_left.y, 1.0);

        let bottom_right = m * Vector4::new(640.0, 480.0, 0.0, 1.0);
        assert_ulps_eq!(bottom_right.x, 1.0);
        assert_ulps_eq!(bottom_right.y, -1.0);
    }

    #[test]
    fn target_projection() {
        let m = projection([0, 0, 256, 128], false);

        let origin = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_ulps_eq!(origin.x, -1.0);
        assert_ulps_eq!(origin.y, -1.0);

        let top = m * Vector4::new(256.0, 128.0, 0.0, 1.0);
        assert_ulps_eq!(top.x, 1.0);
        assert_ulps_eq!(top.y, 1.0);
    }
}
