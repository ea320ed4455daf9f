//! Primitive library: parametric shape descriptors and their tessellation.
//!
//! A [`Primitive`] is an immutable description of one shape (kind, dimensions
//! and an optional orientation that is baked into its vertices). Every shape the
//! tableau needs is created exactly once by [`PrimitiveLibrary::new`] and then
//! shared through `Arc` by every part that draws it.
//!
//! All shapes are Y-up, centred at the origin and wound counter-clockwise when
//! seen from outside.

use std::{collections::BTreeMap, f32::consts::PI, sync::Arc};

use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};

use crate::error::{Result, TableauError, ensure_at_least, ensure_positive};

/// Tessellated geometry, ready to be packed into vertex/index buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        (self.positions.len() - 1) as u32
    }

    fn rotate(&mut self, rotation: Quaternion<f32>) {
        for p in self.positions.iter_mut() {
            *p = (rotation * Vector3::from(*p)).into();
        }
        for n in self.normals.iter_mut() {
            *n = (rotation * Vector3::from(*n)).normalize().into();
        }
    }
}

/// Shape kinds and their dimensional parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A (possibly tapered) cylinder along Y.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// A regular tetrahedron inscribed in a sphere of `radius`.
    Tetrahedron { radius: f32 },
    Cuboid { width: f32, height: f32, depth: f32 },
    /// A rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// A disc in the XY plane facing +Z.
    Circle { radius: f32, segments: u32 },
}

/// An immutable shape descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    shape: Shape,
    orientation: Option<Quaternion<f32>>,
}

impl Primitive {
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Result<Self> {
        Self::new(Shape::Cylinder {
            radius_top: ensure_positive("radius_top", radius_top)?,
            radius_bottom: ensure_positive("radius_bottom", radius_bottom)?,
            height: ensure_positive("height", height)?,
            radial_segments: ensure_at_least("radial_segments", radial_segments, 3)?,
        })
    }

    pub fn tetrahedron(radius: f32) -> Result<Self> {
        Self::new(Shape::Tetrahedron {
            radius: ensure_positive("radius", radius)?,
        })
    }

    /// A tetrahedron turned so that one face lies flat on the ground and the
    /// opposite vertex points straight up.
    ///
    /// The turn is `arccos(1/√3)` around the normalised axis `(1, 0, -1)`,
    /// applied once to the geometry itself.
    pub fn grounded_tetrahedron(radius: f32) -> Result<Self> {
        Self::tetrahedron(radius)?.oriented(grounding_rotation())
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Self> {
        Self::new(Shape::Cuboid {
            width: ensure_positive("width", width)?,
            height: ensure_positive("height", height)?,
            depth: ensure_positive("depth", depth)?,
        })
    }

    pub fn plane(width: f32, height: f32) -> Result<Self> {
        Self::new(Shape::Plane {
            width: ensure_positive("width", width)?,
            height: ensure_positive("height", height)?,
        })
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        Self::new(Shape::Sphere {
            radius: ensure_positive("radius", radius)?,
            width_segments: ensure_at_least("width_segments", width_segments, 3)?,
            height_segments: ensure_at_least("height_segments", height_segments, 2)?,
        })
    }

    pub fn circle(radius: f32, segments: u32) -> Result<Self> {
        Self::new(Shape::Circle {
            radius: ensure_positive("radius", radius)?,
            segments: ensure_at_least("segments", segments, 3)?,
        })
    }

    fn new(shape: Shape) -> Result<Self> {
        Ok(Self {
            shape,
            orientation: None,
        })
    }

    /// Bakes `rotation` into the shape. Orientations compose: the new rotation
    /// is applied after any existing one.
    pub fn oriented(mut self, rotation: Quaternion<f32>) -> Result<Self> {
        let q = [rotation.s, rotation.v.x, rotation.v.y, rotation.v.z];
        if q.iter().any(|c| !c.is_finite()) || (rotation.magnitude() - 1.0).abs() > 1e-3 {
            return Err(TableauError::invalid(
                "orientation",
                format!("expected a finite unit quaternion, got {q:?}"),
            ));
        }
        self.orientation = Some(match self.orientation {
            Some(existing) => rotation * existing,
            None => rotation,
        });
        Ok(self)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn orientation(&self) -> Option<Quaternion<f32>> {
        self.orientation
    }

    pub fn tessellate(&self) -> GeometryData {
        let mut data = match self.shape {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            Shape::Tetrahedron { radius } => generate_tetrahedron(radius),
            Shape::Cuboid {
                width,
                height,
                depth,
            } => generate_cuboid(width, height, depth),
            Shape::Plane { width, height } => generate_plane(width, height),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
            Shape::Circle { radius, segments } => generate_circle(radius, segments),
        };
        if let Some(rotation) = self.orientation {
            data.rotate(rotation);
        }
        data
    }
}

pub(crate) fn grounding_rotation() -> Quaternion<f32> {
    let axis = Vector3::new(1.0, 0.0, -1.0).normalize();
    Quaternion::from_axis_angle(axis, Rad((1.0f32 / 3.0f32.sqrt()).acos()))
}

fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // two rings: row 0 at the top, row 1 at the bottom
    for row in 0..=1u32 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let y = half - v * height;
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let theta = u * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let normal = Vector3::new(sin, slope, cos).normalize();
            data.push([radius * sin, y, radius * cos], normal.into(), [u, 1.0 - v]);
        }
    }
    let ring = segments + 1;
    for i in 0..segments {
        let a = i;
        let b = ring + i;
        let c = ring + i + 1;
        let d = i + 1;
        data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (top, radius, y) in [(true, radius_top, half), (false, radius_bottom, -half)] {
        let sign = if top { 1.0 } else { -1.0 };
        let centre = data.push([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]);
        let start = data.vertex_count() as u32;
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            data.push(
                [radius * sin, y, radius * cos],
                [0.0, sign, 0.0],
                [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
            );
        }
        for i in 0..segments {
            let (p, q) = (start + i, start + i + 1);
            if top {
                data.indices.extend_from_slice(&[p, q, centre]);
            } else {
                data.indices.extend_from_slice(&[q, p, centre]);
            }
        }
    }
    data
}

fn generate_tetrahedron(radius: f32) -> GeometryData {
    const CORNERS: [[f32; 3]; 4] = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    const FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let corner = |i: usize| Vector3::from(CORNERS[i]).normalize() * radius;
    let mut data = GeometryData::default();
    // flat shading: every face gets its own three vertices
    for face in FACES {
        let [a, b, c] = face.map(corner);
        let normal = (b - a).cross(c - a).normalize();
        for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.5, 1.0])] {
            let idx = data.push(p.into(), normal.into(), uv);
            data.indices.push(idx);
        }
    }
    data
}

fn generate_cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
        ([0.0, 0.0, -1.0], [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
        ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
        ([1.0, 0.0, 0.0], [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
        ([0.0, 1.0, 0.0], [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
        ([0.0, -1.0, 0.0], [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut data = GeometryData::default();
    for (normal, corners) in faces {
        let base = data.vertex_count() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            data.push(corner, normal, uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    data
}

fn generate_plane(width: f32, height: f32) -> GeometryData {
    let (x, y) = (width * 0.5, height * 0.5);
    let mut data = GeometryData::default();
    let normal = [0.0, 0.0, 1.0];
    data.push([-x, -y, 0.0], normal, [0.0, 1.0]);
    data.push([x, -y, 0.0], normal, [1.0, 1.0]);
    data.push([-x, y, 0.0], normal, [0.0, 0.0]);
    data.push([x, y, 0.0], normal, [1.0, 0.0]);
    data.indices.extend_from_slice(&[0, 1, 2, 1, 3, 2]);
    data
}

fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();
            let (sin_theta, cos_theta) = (v * PI).sin_cos();
            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            data.push(normal.map(|c| c * radius), normal, [u, 1.0 - v]);
        }
    }
    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // the pole rows degenerate to a single triangle per quad
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    data
}

fn generate_circle(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    let normal = [0.0, 0.0, 1.0];
    data.push([0.0, 0.0, 0.0], normal, [0.5, 0.5]);
    for i in 0..=segments {
        let (sin, cos) = (i as f32 / segments as f32 * 2.0 * PI).sin_cos();
        data.push(
            [radius * cos, radius * sin, 0.0],
            normal,
            [(cos + 1.0) * 0.5, (sin + 1.0) * 0.5],
        );
    }
    for i in 1..=segments {
        data.indices.extend_from_slice(&[i, i + 1, 0]);
    }
    data
}

/// Every shape the tableau is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveId {
    TowerDrum,
    TowerSegment,
    TowerHead,
    PyramidLarge,
    PyramidSmall,
    SpireOuter,
    SpireMiddle,
    SpireInner,
    Finial,
    FacadeTower,
    FacadeCentre,
    RoseWindow,
    StripVertical,
    StripHorizontal,
    PlatformBase,
    Pillar,
    BeamLong,
    BeamShort,
}

impl PrimitiveId {
    pub const ALL: [PrimitiveId; 18] = [
        PrimitiveId::TowerDrum,
        PrimitiveId::TowerSegment,
        PrimitiveId::TowerHead,
        PrimitiveId::PyramidLarge,
        PrimitiveId::PyramidSmall,
        PrimitiveId::SpireOuter,
        PrimitiveId::SpireMiddle,
        PrimitiveId::SpireInner,
        PrimitiveId::Finial,
        PrimitiveId::FacadeTower,
        PrimitiveId::FacadeCentre,
        PrimitiveId::RoseWindow,
        PrimitiveId::StripVertical,
        PrimitiveId::StripHorizontal,
        PrimitiveId::PlatformBase,
        PrimitiveId::Pillar,
        PrimitiveId::BeamLong,
        PrimitiveId::BeamShort,
    ];

    fn build(self) -> Result<Primitive> {
        match self {
            PrimitiveId::TowerDrum => Primitive::cylinder(1.0, 1.0, 2.0, 64),
            PrimitiveId::TowerSegment => Primitive::cylinder(1.0, 0.97, 0.8, 20),
            PrimitiveId::TowerHead => Primitive::cylinder(0.75, 0.75, 0.7, 64),
            PrimitiveId::PyramidLarge => Primitive::grounded_tetrahedron(1.5),
            PrimitiveId::PyramidSmall => Primitive::grounded_tetrahedron(1.0),
            PrimitiveId::SpireOuter => Primitive::cylinder(0.1, 0.8, 6.0, 64),
            PrimitiveId::SpireMiddle => Primitive::cylinder(0.1, 0.8, 7.0, 64),
            PrimitiveId::SpireInner => Primitive::cylinder(0.1, 0.8, 4.5, 64),
            PrimitiveId::Finial => Primitive::sphere(0.2, 64, 64),
            PrimitiveId::FacadeTower => Primitive::cuboid(1.5, 5.0, 1.5),
            PrimitiveId::FacadeCentre => Primitive::cuboid(1.5, 3.5, 1.5),
            PrimitiveId::RoseWindow => Primitive::circle(0.5, 16),
            PrimitiveId::StripVertical => Primitive::plane(0.08, 1.0),
            PrimitiveId::StripHorizontal => Primitive::plane(1.2, 0.08),
            PrimitiveId::PlatformBase => Primitive::cuboid(9.0, 0.5, 4.5),
            PrimitiveId::Pillar => Primitive::cylinder(0.15, 0.15, 3.0, 64),
            PrimitiveId::BeamLong => Primitive::cuboid(8.0, 0.5, 0.5),
            PrimitiveId::BeamShort => Primitive::cuboid(0.5, 0.5, 4.0),
        }
    }
}

/// The shared, constructed-once table of primitives.
#[derive(Debug, Clone)]
pub struct PrimitiveLibrary {
    primitives: BTreeMap<PrimitiveId, Arc<Primitive>>,
}

impl PrimitiveLibrary {
    pub fn new() -> Result<Self> {
        let primitives = PrimitiveId::ALL
            .into_iter()
            .map(|id| Ok((id, Arc::new(id.build()?))))
            .collect::<Result<_>>()?;
        Ok(Self { primitives })
    }

    pub fn get(&self, id: PrimitiveId) -> &Arc<Primitive> {
        // every id is inserted by `new`
        &self.primitives[&id]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Arc<Primitive>)> {
        self.primitives.iter().map(|(id, p)| (*id, p))
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn rejects_malformed_parameters() {
        assert!(matches!(
            Primitive::cylinder(1.0, 0.0, 2.0, 16),
            Err(TableauError::InvalidParameter { what: "radius_bottom", .. })
        ));
        assert!(Primitive::cylinder(1.0, 1.0, 2.0, 2).is_err());
        assert!(Primitive::cuboid(1.0, f32::NAN, 1.0).is_err());
        assert!(Primitive::sphere(0.2, 8, 1).is_err());
        assert!(Primitive::circle(-0.5, 16).is_err());
        assert!(Primitive::plane(1.0, f32::INFINITY).is_err());
    }

    #[test]
    fn rejects_non_unit_orientation() {
        let skewed = Quaternion::new(2.0, 0.0, 0.0, 0.0);
        assert!(Primitive::tetrahedron(1.0).unwrap().oriented(skewed).is_err());
    }

    #[test]
    fn cylinder_spans_its_height_and_radii() {
        let geometry = Primitive::cylinder(0.1, 0.8, 6.0, 16).unwrap().tessellate();
        let max_y = geometry.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        let min_y = geometry.positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        assert!(close(max_y, 3.0));
        assert!(close(min_y, -3.0));
        // side: 2 rings, caps: centre + ring each
        assert_eq!(geometry.vertex_count(), 2 * 17 + 2 * 18);
        assert_eq!(geometry.triangle_count(), 2 * 16 + 2 * 16);
        for p in geometry.positions.iter().filter(|p| close(p[1], -3.0)) {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!(close(r, 0.8) || close(r, 0.0));
        }
    }

    #[test]
    fn side_faces_point_outwards() {
        let geometry = Primitive::cylinder(1.0, 1.0, 2.0, 8).unwrap().tessellate();
        for tri in geometry.indices.chunks(3).take(16) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vector3::from(geometry.positions[i as usize]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            let radial = Vector3::new(centroid.x, 0.0, centroid.z);
            assert!(normal.dot(radial) > 0.0);
        }
    }

    #[test]
    fn grounded_tetrahedron_rests_on_a_face() {
        let geometry = Primitive::grounded_tetrahedron(1.5).unwrap().tessellate();
        let mut heights: Vec<f32> = geometry.positions.iter().map(|p| p[1]).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let floor = heights[0];
        assert!(close(floor, -0.5));
        assert!(close(*heights.last().unwrap(), 1.5));
        // one face (three vertices of it) lies entirely at the floor height
        let flat_faces = geometry
            .indices
            .chunks(3)
            .filter(|tri| tri.iter().all(|&i| close(geometry.positions[i as usize][1], floor)))
            .count();
        assert_eq!(flat_faces, 1);
    }

    #[test]
    fn orientation_is_baked_once() {
        let plain = Primitive::tetrahedron(1.0).unwrap();
        let grounded = Primitive::grounded_tetrahedron(1.0).unwrap();
        assert!(plain.orientation().is_none());
        assert!(grounded.orientation().is_some());
        assert_eq!(plain.shape(), grounded.shape());
        assert_ne!(plain.tessellate().positions, grounded.tessellate().positions);
    }

    #[test]
    fn flat_shapes_face_forward() {
        for primitive in [Primitive::plane(1.0, 2.0).unwrap(), Primitive::circle(0.5, 16).unwrap()] {
            let geometry = primitive.tessellate();
            assert!(geometry.positions.iter().all(|p| p[2] == 0.0));
            for tri in geometry.indices.chunks(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vector3::from(geometry.positions[i as usize]));
                assert!((b - a).cross(c - a).z > 0.0);
            }
        }
    }

    #[test]
    fn cuboid_has_six_quads() {
        let geometry = Primitive::cuboid(9.0, 0.5, 4.5).unwrap().tessellate();
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.triangle_count(), 12);
        let max_x = geometry.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        assert!(close(max_x, 4.5));
        for tri in geometry.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vector3::from(geometry.positions[i as usize]));
            let centroid = (a + b + c) / 3.0;
            assert!((b - a).cross(c - a).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let geometry = Primitive::sphere(0.2, 12, 8).unwrap().tessellate();
        for p in &geometry.positions {
            assert!(close(Vector3::from(*p).magnitude(), 0.2));
        }
        assert_eq!(geometry.triangle_count() as u32, 12 * (2 * 8 - 2));
    }

    #[test]
    fn library_builds_every_shape_once() {
        let library = PrimitiveLibrary::new().unwrap();
        assert_eq!(library.len(), PrimitiveId::ALL.len());
        let pillar = library.get(PrimitiveId::Pillar);
        assert!(Arc::ptr_eq(pillar, library.get(PrimitiveId::Pillar)));
        assert!(matches!(pillar.shape(), Shape::Cylinder { radial_segments: 64, .. }));
    }
}
