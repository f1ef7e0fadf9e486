use glam::Vec3;

// Generate a UV sphere centered at origin, scaled by radius.
// stacks: latitude segments (>= 3), slices: longitude segments (>= 3)
pub fn generate_uv_sphere(radius: f32, stacks: u32, slices: u32) -> (Vec<Vec3>, Vec<u32>) {
    let stacks = stacks.max(3);
    let slices = slices.max(3);
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=stacks {
        let theta = i as f32 / stacks as f32 * std::f32::consts::PI; // 0..PI
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..=slices {
            let phi = j as f32 / slices as f32 * std::f32::consts::TAU; // 0..2PI
            let (sin_p, cos_p) = phi.sin_cos();
            positions.push(Vec3::new(sin_t * cos_p, sin_t * sin_p, cos_t) * radius);
        }
    }

    let stride = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * stride + j;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    (positions, indices)
}

// Axis-aligned box centered at origin with the given half extents, 12 triangles.
pub fn generate_box(half: Vec3) -> (Vec<Vec3>, Vec<u32>) {
    let positions = crate::scene::Aabb::new(-half, half).corners().to_vec();
    // Corner index bits: x = 1, y = 2, z = 4.
    let indices = vec![
        0, 2, 3, 0, 3, 1, // -z
        4, 5, 7, 4, 7, 6, // +z
        0, 1, 5, 0, 5, 4, // -y
        2, 6, 7, 2, 7, 3, // +y
        0, 4, 6, 0, 6, 2, // -x
        1, 3, 7, 1, 7, 5, // +x
    ];
    (positions, indices)
}
