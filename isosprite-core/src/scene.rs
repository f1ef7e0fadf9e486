//! Per-run scene state: mesh instances with their world transforms.
//!
//! A `Scene` is built empty for every render invocation and dropped when the
//! invocation ends; nothing about it is global.

use glam::{Mat4, Vec3, Vec4};

/// Axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Component-wise min/max over the points. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self::new(acc.min.min(p), acc.max.max(p))))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance from the center to any corner.
    pub fn half_diagonal(&self) -> f32 {
        self.extent().length() * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

/// One renderable mesh: object-space triangles plus a local-to-world transform.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub name: String,
    pub transform: Mat4,
    pub local_bounds: Aabb,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Linear RGBA; `None` falls back to the renderer's default color.
    pub base_color: Option<Vec4>,
}

impl MeshInstance {
    /// Returns `None` when there are no positions to bound.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> Option<Self> {
        let local_bounds = Aabb::from_points(positions.iter().copied())?;
        Some(Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            local_bounds,
            positions,
            indices,
            base_color: None,
        })
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = Some(color);
        self
    }

    /// The 8 corners of the object-space box, carried into world space.
    pub fn world_corners(&self) -> [Vec3; 8] {
        self.local_bounds.corners().map(|c| self.transform.transform_point3(c))
    }

    /// Moves the instance in world space.
    pub fn translate(&mut self, offset: Vec3) {
        self.transform = Mat4::from_translation(offset) * self.transform;
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<MeshInstance>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshInstance) {
        self.meshes.push(mesh);
    }

    pub fn meshes(&self) -> &[MeshInstance] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [MeshInstance] {
        &mut self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshInstance::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_points() {
        let points = [Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 4.0, 0.0)];
        let b = Aabb::from_points(points).expect("bounds");
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
        assert_eq!(b.center(), Vec3::new(0.0, 1.0, 1.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn corners_are_distinct_extremes() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let corners = b.corners();
        for (i, a) in corners.iter().enumerate() {
            for c in &corners[i + 1..] { assert_ne!(a, c); }
        }
        assert_eq!(Aabb::from_points(corners), Some(b));
    }

    #[test]
    fn world_corners_follow_transform() {
        let mesh = MeshInstance::new("m", vec![Vec3::splat(-1.0), Vec3::splat(1.0)], vec![])
            .expect("mesh")
            .with_transform(Mat4::from_scale_rotation_translation(
                Vec3::splat(2.0),
                glam::Quat::IDENTITY,
                Vec3::new(10.0, 0.0, 0.0),
            ));
        let bounds = Aabb::from_points(mesh.world_corners()).expect("bounds");
        assert_eq!(bounds.min, Vec3::new(8.0, -2.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn translate_moves_world_position() {
        let mut mesh = MeshInstance::new("m", vec![Vec3::ZERO], vec![]).expect("mesh");
        mesh.translate(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(mesh.world_corners()[0], Vec3::new(0.0, 3.0, 0.0));
        assert!(MeshInstance::new("empty", vec![], vec![]).is_none());
    }
}
