use crate::config::{AnimationConfig, ShowcaseConfig};
use crate::material::{MaterialParams, SharedMaterial};
use glam::Vec3;
use lumen_common::{EulerRotation, ObjectId, Rgb, Transform};

/// Tessellated primitive shapes the showcase draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// UV sphere centred on the origin.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Plane in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// Torus in the XY plane around the Z axis.
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere { .. } => "sphere",
            Primitive::Plane { .. } => "plane",
            Primitive::Torus { .. } => "torus",
        }
    }
}

/// An object in the scene. Every object uses the scene's shared material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub primitive: Primitive,
    pub transform: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

/// Angular rates (radians per second) shared by every object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRates {
    pub x: f64,
    pub y: f64,
}

impl Default for RotationRates {
    fn default() -> Self {
        Self { x: 0.15, y: 0.1 }
    }
}

impl From<&AnimationConfig> for RotationRates {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            x: config.rotation_x_rate,
            y: config.rotation_y_rate,
        }
    }
}

impl RotationRates {
    /// Orientation at `elapsed` seconds. A pure function of time.
    pub fn at(&self, elapsed: f64) -> EulerRotation {
        EulerRotation {
            x: self.x * elapsed,
            y: self.y * elapsed,
            z: 0.0,
        }
    }
}

/// The showcase scene: three primitives sharing one material, an ambient
/// light and a point light.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    material: SharedMaterial,
    ambient: AmbientLight,
    point_light: PointLight,
    rates: RotationRates,
    elapsed: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::showcase(&ShowcaseConfig::default())
    }
}

impl Scene {
    /// Build the sphere / plane / torus layout.
    pub fn showcase(config: &ShowcaseConfig) -> Self {
        let m = &config.material;
        let material = SharedMaterial::new(MaterialParams {
            metalness: m.metalness,
            roughness: m.roughness,
            color: Rgb::new(m.color[0], m.color[1], m.color[2]),
            env_map_intensity: m.env_map_intensity,
        });

        let mut scene = Self {
            objects: Vec::with_capacity(3),
            material,
            ambient: AmbientLight {
                color: Rgb::WHITE,
                intensity: 1.0,
            },
            point_light: PointLight {
                color: Rgb::from_hex(0xFFC0CB),
                intensity: 1.0,
                position: Vec3::new(2.0, 3.0, 4.0),
            },
            rates: RotationRates::from(&config.animation),
            elapsed: 0.0,
        };

        scene.add(
            "sphere",
            Primitive::Sphere {
                radius: 0.5,
                width_segments: 16,
                height_segments: 16,
            },
            Vec3::new(-1.5, 0.0, 0.0),
        );
        scene.add(
            "plane",
            Primitive::Plane {
                width: 1.0,
                height: 1.0,
            },
            Vec3::ZERO,
        );
        scene.add(
            "torus",
            Primitive::Torus {
                radius: 0.3,
                tube: 0.2,
                radial_segments: 16,
                tubular_segments: 32,
            },
            Vec3::new(1.5, 0.0, 0.0),
        );

        tracing::debug!("showcase scene built with {} objects", scene.objects.len());
        scene
    }

    fn add(&mut self, name: &str, primitive: Primitive, position: Vec3) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            name: name.to_string(),
            primitive,
            transform: Transform::at(position),
        });
        id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }

    pub fn ambient_light(&self) -> AmbientLight {
        self.ambient
    }

    pub fn point_light(&self) -> PointLight {
        self.point_light
    }

    pub fn rotation_rates(&self) -> RotationRates {
        self.rates
    }

    /// Elapsed time last applied with [`apply_elapsed`](Self::apply_elapsed).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Set every object's orientation for `elapsed` seconds.
    ///
    /// Assignment is absolute: applying the same time twice yields the same
    /// orientation regardless of what was applied before.
    pub fn apply_elapsed(&mut self, elapsed: f64) {
        let rotation = self.rates.at(elapsed);
        for object in &mut self.objects {
            object.transform.rotation = rotation;
        }
        self.elapsed = elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_layout() {
        let scene = Scene::default();
        let names: Vec<&str> = scene.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["sphere", "plane", "torus"]);
        assert_eq!(
            scene.object("sphere").unwrap().transform.position,
            Vec3::new(-1.5, 0.0, 0.0)
        );
        assert_eq!(
            scene.object("torus").unwrap().transform.position,
            Vec3::new(1.5, 0.0, 0.0)
        );
        assert_eq!(scene.object("plane").unwrap().primitive.kind(), "plane");
    }

    #[test]
    fn lights_match_showcase() {
        let scene = Scene::default();
        assert_eq!(scene.ambient_light().intensity, 1.0);
        assert_eq!(scene.ambient_light().color, Rgb::WHITE);
        assert_eq!(scene.point_light().position, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(scene.point_light().color, Rgb::from_hex(0xFFC0CB));
    }

    #[test]
    fn rotations_are_zero_at_start() {
        let mut scene = Scene::default();
        scene.apply_elapsed(0.0);
        for object in scene.objects() {
            assert_eq!(object.transform.rotation.x, 0.0);
            assert_eq!(object.transform.rotation.y, 0.0);
        }
    }

    #[test]
    fn rotations_at_ten_seconds() {
        let mut scene = Scene::default();
        scene.apply_elapsed(10.0);
        for object in scene.objects() {
            assert_eq!(object.transform.rotation.y, 1.0);
            assert_eq!(object.transform.rotation.x, 1.5);
        }
    }

    #[test]
    fn rotation_is_a_pure_function_of_time() {
        let mut scene = Scene::default();
        for &t in &[3.25, 100.0, 0.5, 3.25, 7.0, 3.25] {
            scene.apply_elapsed(t);
            for object in scene.objects() {
                assert_eq!(object.transform.rotation.y, 0.1 * t);
                assert_eq!(object.transform.rotation.x, 0.15 * t);
            }
        }
    }

    #[test]
    fn objects_share_one_material() {
        let scene = Scene::default();
        let clone = scene.clone();
        assert!(scene.material().same_as(clone.material()));
    }

    #[test]
    fn rates_follow_config() {
        let mut config = ShowcaseConfig::default();
        config.animation.rotation_y_rate = 1.0;
        let mut scene = Scene::showcase(&config);
        scene.apply_elapsed(2.0);
        assert_eq!(scene.objects()[0].transform.rotation.y, 2.0);
        assert_eq!(scene.objects()[0].transform.rotation.x, 0.3);
    }
}
