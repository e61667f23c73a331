//! YAML configuration for the showcase.
//!
//! Every field is optional. Missing sections and fields take the values the
//! showcase was designed around, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowcaseConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub material: MaterialConfig,
    pub animation: AnimationConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lumen".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [1.0, 1.0, 2.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialConfig {
    pub metalness: f32,
    pub roughness: f32,
    pub color: [f32; 3],
    pub env_map_intensity: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            metalness: 0.7,
            roughness: 0.2,
            color: [1.0, 1.0, 1.0],
            env_map_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Radians per second about the X axis.
    pub rotation_x_rate: f64,
    /// Radians per second about the Y axis.
    pub rotation_y_rate: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_x_rate: 0.15,
            rotation_y_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Directory holding `px`, `nx`, `py`, `ny`, `pz`, `nz` face images.
    /// `None` keeps the procedural gradient.
    pub directory: Option<PathBuf>,
    /// Edge length of the procedural gradient cube-map.
    pub fallback_size: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            directory: Some(PathBuf::from("textures/environmentMaps/0")),
            fallback_size: 64,
        }
    }
}

/// Largest accepted edge length for the procedural gradient cube-map.
pub const MAX_FALLBACK_SIZE: u32 = 2048;

impl ShowcaseConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return invalid(format!("camera.fov_degrees {} not in (0, 180)", cam.fov_degrees));
        }
        if !(cam.near > 0.0 && cam.far > cam.near && cam.far.is_finite()) {
            return invalid(format!(
                "camera clip range [{}, {}] must satisfy 0 < near < far < inf",
                cam.near, cam.far
            ));
        }
        if !cam.position.iter().chain(&cam.target).all(|v| v.is_finite()) {
            return invalid("camera position and target must be finite".into());
        }
        let offset: f32 = cam
            .position
            .iter()
            .zip(&cam.target)
            .map(|(p, t)| (p - t) * (p - t))
            .sum();
        if offset <= 0.0 {
            return invalid("camera.position must differ from camera.target".into());
        }

        let ctl = &self.controls;
        if !(ctl.damping_factor > 0.0 && ctl.damping_factor <= 1.0) {
            return invalid(format!(
                "controls.damping_factor {} not in (0, 1]",
                ctl.damping_factor
            ));
        }
        if !(ctl.min_distance >= 0.0 && ctl.max_distance >= ctl.min_distance) {
            return invalid(format!(
                "controls distance range [{}, {}] is empty",
                ctl.min_distance, ctl.max_distance
            ));
        }

        let mat = &self.material;
        for (name, v) in [("metalness", mat.metalness), ("roughness", mat.roughness)] {
            if !(0.0..=1.0).contains(&v) {
                return invalid(format!("material.{name} {v} not in [0, 1]"));
            }
        }
        if !mat.color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return invalid(format!("material.color {:?} not in [0, 1]", mat.color));
        }
        if !(mat.env_map_intensity >= 0.0 && mat.env_map_intensity.is_finite()) {
            return invalid(format!(
                "material.env_map_intensity {} must be finite and non-negative",
                mat.env_map_intensity
            ));
        }

        let anim = &self.animation;
        if !(anim.rotation_x_rate.is_finite() && anim.rotation_y_rate.is_finite()) {
            return invalid("animation rates must be finite".into());
        }

        let size = self.environment.fallback_size;
        if !(1..=MAX_FALLBACK_SIZE).contains(&size) {
            return invalid(format!(
                "environment.fallback_size {size} not in [1, {MAX_FALLBACK_SIZE}]"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ShowcaseConfig::from_yaml_str("").unwrap();
        assert_eq!(config, ShowcaseConfig::default());
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.animation.rotation_x_rate, 0.15);
        assert_eq!(config.animation.rotation_y_rate, 0.1);
    }

    #[test]
    fn partial_document_overrides_named_fields_only() {
        let yaml = "material:\n  roughness: 0.5\ncamera:\n  fov_degrees: 60\n";
        let config = ShowcaseConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.material.roughness, 0.5);
        assert_eq!(config.material.metalness, 0.7);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.position, [1.0, 1.0, 2.0]);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = ShowcaseConfig::from_yaml_str("material: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ShowcaseConfig::from_yaml_str("material:\n  shininess: 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        let err = ShowcaseConfig::from_yaml_str("material:\n  metalness: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ShowcaseConfig::from_yaml_str("camera:\n  near: 5\n  far: 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            ShowcaseConfig::from_yaml_str("controls:\n  damping_factor: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn fallback_size_is_bounded() {
        let err = ShowcaseConfig::from_yaml_str("environment:\n  fallback_size: 40000\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            ShowcaseConfig::from_yaml_str("environment:\n  fallback_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = format!("environment:\n  fallback_size: {MAX_FALLBACK_SIZE}\n");
        let config = ShowcaseConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.environment.fallback_size, MAX_FALLBACK_SIZE);
    }

    #[test]
    fn degenerate_camera_is_invalid() {
        for yaml in [
            "camera:\n  position: [0, 0, 0]\n",
            "camera:\n  position: [2, 2, 2]\n  target: [2, 2, 2]\n",
            "camera:\n  far: .inf\n",
            "camera:\n  position: [.nan, 1, 2]\n",
            "camera:\n  target: [0, -.inf, 0]\n",
        ] {
            let err = ShowcaseConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{yaml}");
        }
    }

    #[test]
    fn material_color_and_intensity_are_checked() {
        for yaml in [
            "material:\n  env_map_intensity: -1\n",
            "material:\n  env_map_intensity: .nan\n",
            "material:\n  color: [1.5, 0, 0]\n",
            "material:\n  color: [0, -0.1, 0]\n",
        ] {
            let err = ShowcaseConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{yaml}");
        }
        let config =
            ShowcaseConfig::from_yaml_str("material:\n  env_map_intensity: 2.5\n").unwrap();
        assert_eq!(config.material.env_map_intensity, 2.5);
    }

    #[test]
    fn yaml_roundtrip_of_defaults() {
        let yaml = ShowcaseConfig::default().to_yaml_string().unwrap();
        let back = ShowcaseConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, ShowcaseConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "environment:\n  directory: null\n  fallback_size: 16").unwrap();
        let config = ShowcaseConfig::load(tmp.path()).unwrap();
        assert_eq!(config.environment.directory, None);
        assert_eq!(config.environment.fallback_size, 16);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ShowcaseConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_or_default_without_path() {
        let config = ShowcaseConfig::load_or_default(None).unwrap();
        assert_eq!(config, ShowcaseConfig::default());
    }
}
