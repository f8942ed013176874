//! Scene: the object arena, the light list and the tracing entry points.
//!
//! Objects are created detached with [`Scene::spawn`], collected into groups
//! with [`Scene::group`] or [`Scene::bound`], and made visible with
//! [`Scene::add_root`]. Tracing walks the roots depth-first with a single
//! shared ray, so every primitive in the forest competes for the closest hit
//! through `ray.t_max`.

use std::sync::Arc;

use lume_core::{Color, Light};
use lume_math::{Ray, Vec3, HIT_EPSILON};

use crate::object::{BoundingVolume, Composite, Object, ObjectId, Shape, Surface};
use crate::{Camera, Circle, Cone, Cylinder, Material, Mesh, SceneError, Sphere, Triangle};

/// Closest intersection found by [`Scene::trace_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The primitive that was hit
    pub object: ObjectId,
    /// Distance along the ray
    pub t: f32,
    pub point: Vec3,
}

/// A collection of objects and lights to render.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<Object>,
    roots: Vec<ObjectId>,
    lights: Vec<Light>,
    shadows: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with shadows enabled.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            roots: Vec::new(),
            lights: Vec::new(),
            shadows: true,
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a detached primitive.
    pub fn spawn(&mut self, shape: impl Into<Shape>, material: Arc<Material>) -> ObjectId {
        self.insert(shape.into(), material)
    }

    /// Create a primitive and add it to the scene root.
    pub fn add(&mut self, shape: impl Into<Shape>, material: Arc<Material>) -> ObjectId {
        let id = self.spawn(shape, material);
        self.roots.push(id);
        id
    }

    /// Make a detached object visible.
    pub fn add_root(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.ensure_detached(id)?;
        self.roots.push(id);
        Ok(())
    }

    /// Group detached objects into a composite. The composite itself starts detached.
    pub fn group(&mut self, children: &[ObjectId]) -> Result<ObjectId, SceneError> {
        self.ensure_all_detached(children)?;

        let id = self.insert(
            Shape::Composite(Composite {
                children: children.to_vec(),
            }),
            Arc::new(Material::default()),
        );
        self.adopt(id, children);
        Ok(id)
    }

    /// Wrap detached `children` in a bounding volume tested through `bounds`.
    ///
    /// `bounds` must enclose every child; it is only used to skip the
    /// children, never reported as a hit.
    pub fn bound(&mut self, bounds: ObjectId, children: &[ObjectId]) -> Result<ObjectId, SceneError> {
        if let Shape::Bounding(_) = self.get(bounds)?.shape {
            return Err(SceneError::NestedBoundingVolume(bounds));
        }
        let mut owned = Vec::with_capacity(children.len() + 1);
        owned.push(bounds);
        owned.extend_from_slice(children);
        self.ensure_all_detached(&owned)?;

        let id = self.insert(
            Shape::Bounding(BoundingVolume {
                bounds,
                children: children.to_vec(),
            }),
            Arc::new(Material::default()),
        );
        self.adopt(id, &owned);
        Ok(id)
    }

    /// Cylinder with both ends closed by disks, as a detached composite.
    pub fn capped_cylinder(
        &mut self,
        base: Vec3,
        axis: Vec3,
        height: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> Result<ObjectId, SceneError> {
        let side = Cylinder::new(base, axis, height, radius)?;
        let bottom = Circle::new(side.base(), -side.axis(), radius)?;
        let top = Circle::new(side.top(), side.axis(), radius)?;

        let parts = [
            self.spawn(side, material.clone()),
            self.spawn(bottom, material.clone()),
            self.spawn(top, material),
        ];
        self.group(&parts)
    }

    /// Cone with its open end closed by a disk, as a detached composite.
    pub fn capped_cone(
        &mut self,
        apex: Vec3,
        axis: Vec3,
        height: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> Result<ObjectId, SceneError> {
        let side = Cone::new(apex, axis, height, radius)?;
        let base = Circle::new(side.base_center(), side.axis(), radius)?;

        let parts = [self.spawn(side, material.clone()), self.spawn(base, material)];
        self.group(&parts)
    }

    /// Expand a mesh into triangles inside a bounding sphere, as a detached object.
    ///
    /// With a camera, faces turned away from it are skipped. Degenerate faces
    /// are always skipped.
    pub fn mesh(
        &mut self,
        mesh: &Mesh,
        material: Arc<Material>,
        cull: Option<&Camera>,
    ) -> Result<ObjectId, SceneError> {
        let len = mesh.vertices.len();
        for (face, indices) in mesh.faces.iter().enumerate() {
            if let Some(&vertex) = indices.iter().find(|&&i| i >= len) {
                return Err(SceneError::InvalidFace { face, vertex, len });
            }
        }

        let center = mesh.centroid();
        let view = cull.map(|camera| {
            if camera.is_perpendicular() {
                camera.direction()
            } else {
                (center - camera.position()).normalize_or_zero()
            }
        });

        let mut triangles = Vec::with_capacity(mesh.faces.len());
        for (face, &[a, b, c]) in mesh.faces.iter().enumerate() {
            let triangle = Triangle::new(mesh.vertices[a], mesh.vertices[b], mesh.vertices[c]);
            if triangle.is_degenerate() {
                log::warn!("Skipping degenerate mesh face {}", face);
                continue;
            }
            if let Some(view) = view {
                if triangle.normal().dot(view) >= 0.0 {
                    continue;
                }
            }
            triangles.push(self.spawn(triangle, material.clone()));
        }

        log::debug!(
            "Mesh: {} of {} faces kept",
            triangles.len(),
            mesh.faces.len()
        );

        // Slightly inflated so hits on the outermost vertices aren't lost to the epsilon
        let radius = mesh.bounding_radius() * 1.001 + 2.0 * HIT_EPSILON;
        let bounds = self.spawn(Sphere::new(center, radius)?, Arc::new(Material::default()));
        self.bound(bounds, &triangles)
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn set_shadows(&mut self, enabled: bool) {
        self.shadows = enabled;
    }

    pub fn shadows(&self) -> bool {
        self.shadows
    }

    /// Move an object and everything it owns.
    pub fn translate(&mut self, id: ObjectId, offset: Vec3) -> Result<(), SceneError> {
        self.for_each_primitive_mut(id, &mut |surface: &mut dyn Surface| surface.translate(offset))
    }

    /// Rotate an object and everything it owns by `angle` radians about
    /// `axis` through `pivot`.
    pub fn rotate(&mut self, id: ObjectId, pivot: Vec3, axis: Vec3, angle: f32) -> Result<(), SceneError> {
        self.for_each_primitive_mut(id, &mut |surface: &mut dyn Surface| {
            surface.rotate(pivot, axis, angle)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Number of objects in the arena, including groups.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The outermost group containing `id`, or `id` itself if it has no parent.
    pub fn containing(&self, id: ObjectId) -> Option<ObjectId> {
        let mut current = id;
        loop {
            match self.object(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    // ========================================================================
    // Tracing
    // ========================================================================

    /// Find the closest primitive along `ray`, leaving `ray.t_max` at its distance.
    pub fn trace_nearest(&self, ray: &mut Ray) -> Option<Hit> {
        let mut nearest = None;
        for &root in &self.roots {
            if let Some(object) = self.intersect_object(root, ray) {
                nearest = Some(object);
            }
        }
        nearest.map(|object| Hit {
            object,
            t: ray.t_max,
            point: ray.hit_point(),
        })
    }

    fn intersect_object(&self, id: ObjectId, ray: &mut Ray) -> Option<ObjectId> {
        let object = self.object(id)?;
        match &object.shape {
            Shape::Composite(composite) => self.intersect_children(&composite.children, ray),
            Shape::Bounding(volume) => {
                // Probe with a fresh t_max: from inside the bounds the exit
                // point may be farther than the current closest hit.
                let mut probe = *ray;
                probe.t_max = f32::INFINITY;
                self.intersect_object(volume.bounds, &mut probe)?;
                self.intersect_children(&volume.children, ray)
            }
            shape => shape
                .as_surface()
                .and_then(|surface| surface.intersect(ray))
                .map(|_| id),
        }
    }

    fn intersect_children(&self, children: &[ObjectId], ray: &mut Ray) -> Option<ObjectId> {
        let mut nearest = None;
        for &child in children {
            if let Some(hit) = self.intersect_object(child, ray) {
                nearest = Some(hit);
            }
        }
        nearest
    }

    /// Light reaching `point`, with shadow rays toward every shadow-casting light.
    ///
    /// `view_dir` is the direction of the incoming ray.
    pub fn lightness(&self, point: Vec3, normal: Vec3, view_dir: Vec3, shininess: f32) -> Color {
        let mut total = Color::ZERO;
        for light in self.lights.iter().filter(|light| light.enabled) {
            if self.shadows && light.casts_shadows() {
                let Some(sample) = light.direction_from(point) else {
                    continue;
                };
                let mut shadow_ray = Ray::with_t_max(point, sample.direction, sample.distance);
                if self.trace_nearest(&mut shadow_ray).is_some() {
                    continue;
                }
            }
            total += light.contribution(point, normal, view_dir, shininess);
        }
        total
    }

    /// Surface normal at a hit, flipped to face the incoming ray.
    pub fn face_normal(&self, hit: &Hit, ray: &Ray) -> Vec3 {
        let Some(surface) = self.object(hit.object).and_then(|o| o.shape.as_surface()) else {
            return Vec3::ZERO;
        };
        let outward = surface.normal_at(hit.point);
        if ray.direction.dot(outward) > 0.0 {
            -outward
        } else {
            outward
        }
    }

    /// Direct illumination at a hit: surface color times lightness.
    pub fn shade(&self, hit: &Hit, ray: &Ray) -> Color {
        let Some(object) = self.object(hit.object) else {
            return Color::ZERO;
        };
        let Some(surface) = object.shape.as_surface() else {
            return Color::ZERO;
        };

        let normal = self.face_normal(hit, ray);
        let color = object.material.color_at(surface.surface_uv(hit.point));
        color * self.lightness(hit.point, normal, ray.direction, object.material.shininess)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn insert(&mut self, shape: Shape, material: Arc<Material>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Object {
            shape,
            material,
            parent: None,
        });
        id
    }

    fn get(&self, id: ObjectId) -> Result<&Object, SceneError> {
        self.object(id).ok_or(SceneError::UnknownObject(id))
    }

    fn ensure_detached(&self, id: ObjectId) -> Result<(), SceneError> {
        if self.get(id)?.parent.is_some() || self.roots.contains(&id) {
            return Err(SceneError::AlreadyAttached(id));
        }
        Ok(())
    }

    fn ensure_all_detached(&self, ids: &[ObjectId]) -> Result<(), SceneError> {
        for (i, &id) in ids.iter().enumerate() {
            self.ensure_detached(id)?;
            if ids[..i].contains(&id) {
                return Err(SceneError::AlreadyAttached(id));
            }
        }
        Ok(())
    }

    fn adopt(&mut self, parent: ObjectId, children: &[ObjectId]) {
        for child in children {
            if let Some(object) = self.objects.get_mut(child.0) {
                object.parent = Some(parent);
            }
        }
    }

    fn for_each_primitive_mut(
        &mut self,
        id: ObjectId,
        f: &mut dyn FnMut(&mut dyn Surface),
    ) -> Result<(), SceneError> {
        let owned = self.get(id)?.shape.owned();
        if let Some(surface) = self.objects[id.0].shape.as_surface_mut() {
            f(surface);
        }
        for child in owned {
            self.for_each_primitive_mut(child, f)?;
        }
        Ok(())
    }
}
