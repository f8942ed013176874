//! The object model: primitive surfaces, groups and bounding volumes.
//!
//! Objects live in an arena owned by [`Scene`](crate::Scene) and refer to one
//! another by [`ObjectId`]. A group owns its children; a child's `parent`
//! link is only a handle back up the tree.

use std::fmt;
use std::sync::Arc;

use lume_math::{Ray, Vec2, Vec3};

use crate::{Circle, Cone, Cylinder, Material, Plane, Sphere, Triangle};

/// Trait for primitives that can be hit by rays.
pub trait Surface: Send + Sync {
    /// Intersect `ray`, lowering `ray.t_max` to the hit distance when this is
    /// the closest hit so far.
    fn intersect(&self, ray: &mut Ray) -> Option<f32>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Texture coordinates of a point on the surface.
    fn surface_uv(&self, point: Vec3) -> Vec2;

    fn translate(&mut self, offset: Vec3);

    /// Rotate by `angle` radians about `axis` through `pivot`.
    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32);
}

/// Handle to an object in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    /// Position of the object in the scene's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A group whose children all compete for the closest hit.
#[derive(Debug)]
pub struct Composite {
    pub(crate) children: Vec<ObjectId>,
}

impl Composite {
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// A group that is only visited when its cheap `bounds` object is hit.
#[derive(Debug)]
pub struct BoundingVolume {
    pub(crate) bounds: ObjectId,
    pub(crate) children: Vec<ObjectId>,
}

impl BoundingVolume {
    pub fn bounds(&self) -> ObjectId {
        self.bounds
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// Every kind of object a scene can hold.
#[derive(Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Circle(Circle),
    Triangle(Triangle),
    Cone(Cone),
    Cylinder(Cylinder),
    Composite(Composite),
    Bounding(BoundingVolume),
}

impl Shape {
    /// The primitive surface, or `None` for groups.
    pub fn as_surface(&self) -> Option<&dyn Surface> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Plane(s) => Some(s),
            Shape::Circle(s) => Some(s),
            Shape::Triangle(s) => Some(s),
            Shape::Cone(s) => Some(s),
            Shape::Cylinder(s) => Some(s),
            Shape::Composite(_) | Shape::Bounding(_) => None,
        }
    }

    pub(crate) fn as_surface_mut(&mut self) -> Option<&mut dyn Surface> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Plane(s) => Some(s),
            Shape::Circle(s) => Some(s),
            Shape::Triangle(s) => Some(s),
            Shape::Cone(s) => Some(s),
            Shape::Cylinder(s) => Some(s),
            Shape::Composite(_) | Shape::Bounding(_) => None,
        }
    }

    /// Objects owned by this shape: children, plus the bounds of a bounding volume.
    pub(crate) fn owned(&self) -> Vec<ObjectId> {
        match self {
            Shape::Composite(c) => c.children.clone(),
            Shape::Bounding(b) => std::iter::once(b.bounds)
                .chain(b.children.iter().copied())
                .collect(),
            _ => Vec::new(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Shape {
                fn from(shape: $ty) -> Self {
                    Shape::$ty(shape)
                }
            }
        )*
    };
}

impl_from_primitive!(Sphere, Plane, Circle, Triangle, Cone, Cylinder);

/// An entry in the scene arena.
#[derive(Debug)]
pub struct Object {
    pub shape: Shape,
    pub material: Arc<Material>,
    pub(crate) parent: Option<ObjectId>,
}

impl Object {
    /// The group this object belongs to, if any.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }
}
