use glam::Vec3;

/// Number of triangles in the open cube the sphere starts from.
pub const CUBE_TRIANGLES: usize = 12;

/// Largest subdivision depth callers should request.
///
/// Vertex count is `36 * 4^depth`; [`generate_sphere`] itself does not check.
pub const MAX_SPHERE_DEPTH: u32 = 6;

/// Two triangles `(a, b, c)` and `(b, c, d)` sharing the `b`-`c` diagonal.
///
/// `a` and `d` must be opposite corners of the quad.
#[inline]
pub fn quad_vertices(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> [Vec3; 6] {
    [a, b, c, b, c, d]
}

/// The six faces of the cube with corners at `(±1, ±1, ±1)` as 12 triangles.
pub fn cube_triangles() -> Vec<Vec3> {
    let v = Vec3::new;
    let faces = [
        // +Z
        quad_vertices(v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0), v(-1.0, 1.0, 1.0), v(-1.0, -1.0, 1.0)),
        // -Z
        quad_vertices(v(-1.0, 1.0, -1.0), v(-1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, -1.0, -1.0)),
        // +X
        quad_vertices(v(1.0, 1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0)),
        // -X
        quad_vertices(v(-1.0, 1.0, 1.0), v(-1.0, -1.0, 1.0), v(-1.0, 1.0, -1.0), v(-1.0, -1.0, -1.0)),
        // +Y
        quad_vertices(v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(1.0, 1.0, 1.0)),
        // -Y
        quad_vertices(v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0)),
    ];

    faces.iter().flatten().copied().collect()
}

/// Replaces every triangle by four, `depth` times over.
///
/// Each triangle `(a, b, c)` is split at its edge midpoints into the three
/// corner triangles and the center one.
pub fn subdivide(triangles: &[Vec3], depth: u32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(triangles.len() * 4usize.pow(depth));
    for tri in triangles.chunks_exact(3) {
        subdivide_into(&mut out, tri[0], tri[1], tri[2], depth);
    }
    out
}

fn subdivide_into(out: &mut Vec<Vec3>, a: Vec3, b: Vec3, c: Vec3, depth: u32) {
    if depth == 0 {
        out.extend_from_slice(&[a, b, c]);
        return;
    }

    let ab = (a + b) * 0.5;
    let bc = (b + c) * 0.5;
    let ca = (c + a) * 0.5;

    subdivide_into(out, a, ab, ca, depth - 1);
    subdivide_into(out, ab, b, bc, depth - 1);
    subdivide_into(out, ca, bc, c, depth - 1);
    subdivide_into(out, ab, bc, ca, depth - 1);
}

/// Scales every vertex to unit length.
pub fn normalize_onto_sphere(vertices: &mut [Vec3]) {
    for v in vertices {
        *v = v.normalize_or_zero();
    }
}

/// Unit sphere approximated by a subdivided cube.
///
/// Returns `36 * 4^depth` vertices. Triangles are denser near the original
/// cube edges and corners.
pub fn generate_sphere(depth: u32) -> Vec<Vec3> {
    let mut vertices = subdivide(&cube_triangles(), depth);
    normalize_onto_sphere(&mut vertices);
    vertices
}

/// Flattens vertices into `x, y, z` components for upload.
pub fn flatten(vertices: &[Vec3]) -> Vec<f32> {
    vertices.iter().flat_map(|v| v.to_array()).collect()
}
