//! Light models.
//!
//! Each light answers two questions for a shaded point: which way (and how
//! far) is the light, for the shadow ray, and how much does it contribute
//! given the surface normal, the view direction and the material shininess.

use lume_math::{Vec3, Vec3Ext};

use crate::Color;

/// The kind of light and its placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Radiates from a point, attenuated by `sqrt(distance)`.
    Point { position: Vec3 },
    /// Parallel rays travelling along `direction`, no attenuation.
    Directional { direction: Vec3 },
    /// A point light restricted to a cone around `direction`.
    Spot {
        position: Vec3,
        direction: Vec3,
        cos_cutoff: f32,
    },
    /// Constant fill light. Has no direction and is never shadowed.
    Ambient,
}

/// Unit direction from a shaded point toward a light, and the distance to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: Vec3,
    pub distance: f32,
}

/// A light source.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub intensity: f32,
    pub color: Color,
    pub enabled: bool,
}

impl Light {
    fn with_kind(kind: LightKind, intensity: f32) -> Self {
        Self {
            kind,
            intensity,
            color: Color::ONE,
            enabled: true,
        }
    }

    /// Create a white point light.
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Self::with_kind(LightKind::Point { position }, intensity)
    }

    /// Create a white directional light shining along `direction`.
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        Self::with_kind(
            LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            intensity,
        )
    }

    /// Create a white spot light with a half-angle of `cutoff` radians.
    pub fn spot(position: Vec3, direction: Vec3, intensity: f32, cutoff: f32) -> Self {
        Self::with_kind(
            LightKind::Spot {
                position,
                direction: direction.normalize_or_zero(),
                cos_cutoff: cutoff.cos(),
            },
            intensity,
        )
    }

    /// Create a white ambient light.
    pub fn ambient(intensity: f32) -> Self {
        Self::with_kind(LightKind::Ambient, intensity)
    }

    /// Set the light color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Whether occluders between a point and this light matter.
    pub fn casts_shadows(&self) -> bool {
        !matches!(self.kind, LightKind::Ambient)
    }

    /// Direction and distance from `point` to the light.
    ///
    /// Ambient lights have no direction. Directional lights are infinitely far.
    pub fn direction_from(&self, point: Vec3) -> Option<LightSample> {
        match self.kind {
            LightKind::Ambient => None,
            LightKind::Directional { direction } => Some(LightSample {
                direction: -direction,
                distance: f32::INFINITY,
            }),
            LightKind::Point { position } | LightKind::Spot { position, .. } => {
                let to_light = position - point;
                let distance = to_light.length();
                if distance == 0.0 {
                    return None;
                }
                Some(LightSample {
                    direction: to_light / distance,
                    distance,
                })
            }
        }
    }

    /// Light reaching `point`, ignoring occlusion.
    ///
    /// `view_dir` is the direction of the incoming camera ray. An infinite
    /// `shininess` disables the specular highlight.
    pub fn contribution(&self, point: Vec3, normal: Vec3, view_dir: Vec3, shininess: f32) -> Color {
        if !self.enabled {
            return Color::ZERO;
        }

        let sample = match self.kind {
            LightKind::Ambient => return self.color * self.intensity,
            _ => match self.direction_from(point) {
                Some(sample) => sample,
                None => return Color::ZERO,
            },
        };

        if let LightKind::Spot {
            direction,
            cos_cutoff,
            ..
        } = self.kind
        {
            if (-sample.direction).dot(direction) < cos_cutoff {
                return Color::ZERO;
            }
        }

        let dot = sample.direction.dot(normal);
        if dot <= 0.0 {
            return Color::ZERO;
        }

        let falloff = match self.kind {
            LightKind::Directional { .. } => 1.0,
            _ => sample.distance.sqrt(),
        };

        let mut lightness = self.intensity * dot / falloff;

        if shininess.is_finite() {
            let reflected = (-sample.direction).reflect(normal);
            let reflected_dot = reflected.dot(-view_dir);
            if reflected_dot > 0.0 {
                lightness += self.intensity * reflected_dot.powf(shininess) / falloff;
            }
        }

        self.color * lightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_is_unconditional() {
        let light = Light::ambient(0.2).with_color(Color::new(1.0, 0.5, 0.0));
        assert!(!light.casts_shadows());
        assert!(light.direction_from(Vec3::ZERO).is_none());

        // Even facing away from everything
        let c = light.contribution(Vec3::ZERO, -Vec3::Y, Vec3::Y, f32::INFINITY);
        assert_eq!(c, Color::new(0.2, 0.1, 0.0));
    }

    #[test]
    fn test_point_light_diffuse() {
        let light = Light::point(Vec3::new(0.0, 4.0, 0.0), 1.0);
        let sample = light.direction_from(Vec3::ZERO).unwrap();
        assert_eq!(sample.direction, Vec3::Y);
        assert_eq!(sample.distance, 4.0);

        // intensity * dot / sqrt(distance) = 1 * 1 / 2
        let c = light.contribution(Vec3::ZERO, Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert!((c.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_point_light_behind_surface() {
        let light = Light::point(Vec3::new(0.0, -4.0, 0.0), 1.0);
        let c = light.contribution(Vec3::ZERO, Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_specular_only_with_finite_shininess() {
        let light = Light::point(Vec3::new(0.0, 4.0, 0.0), 1.0);
        // Looking straight down at the surface: mirror direction points at the viewer
        let view_dir = -Vec3::Y;
        let matte = light.contribution(Vec3::ZERO, Vec3::Y, view_dir, f32::INFINITY);
        let shiny = light.contribution(Vec3::ZERO, Vec3::Y, view_dir, 10.0);
        assert!(shiny.x > matte.x);
    }

    #[test]
    fn test_directional_light() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), 0.8);
        let sample = light.direction_from(Vec3::new(5.0, 0.0, 5.0)).unwrap();
        assert_eq!(sample.direction, Vec3::Y);
        assert_eq!(sample.distance, f32::INFINITY);

        let c = light.contribution(Vec3::ZERO, Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert!((c.x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_spot_light_cone() {
        let light = Light::spot(Vec3::new(0.0, 4.0, 0.0), -Vec3::Y, 1.0, 20f32.to_radians());

        let inside = light.contribution(Vec3::ZERO, Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert!(inside.x > 0.0);

        let outside = light.contribution(Vec3::new(10.0, 0.0, 0.0), Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert_eq!(outside, Color::ZERO);
    }

    #[test]
    fn test_disabled_light() {
        let mut light = Light::point(Vec3::new(0.0, 4.0, 0.0), 1.0);
        light.enabled = false;
        let c = light.contribution(Vec3::ZERO, Vec3::Y, -Vec3::Y, f32::INFINITY);
        assert_eq!(c, Color::ZERO);
    }
}
