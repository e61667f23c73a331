use glam::{Mat4, Vec3};
use lumen_scene::{CameraConfig, ControlsConfig};
use std::f32::consts::PI;

const EPS: f32 = 1e-6;

/// Perspective camera looking at a target point.
///
/// The projection matrix is cached; anything that changes the frustum goes
/// through a setter that recomputes it.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), 1.0)
    }
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            up: Vec3::Y,
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the aspect ratio and recompute the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn set_fov_degrees(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }
}

/// Orbit controls with optional exponential damping.
///
/// Input (drags, wheel, pans) accumulates into pending deltas. Each
/// [`update`](Self::update) applies a fraction of the pending delta and decays
/// the rest, so the camera glides to rest after input stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&ControlsConfig::default(), Vec3::ZERO)
    }
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig, target: Vec3) -> Self {
        Self {
            target,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Queue a rotation about the vertical axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a rotation towards the pole.
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Translate a pointer drag in logical pixels into a rotation.
    /// A drag across the full viewport height is one full turn.
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let h = viewport_height.max(1) as f32;
        self.rotate_left(2.0 * PI * dx / h * self.rotate_speed);
        self.rotate_up(2.0 * PI * dy / h * self.rotate_speed);
    }

    /// Zoom by wheel notches; positive moves towards the target.
    pub fn dolly(&mut self, notches: f32) {
        if notches.is_finite() {
            self.scale *= 0.95_f32.powf(self.zoom_speed * notches);
        }
    }

    /// Translate a pointer drag in logical pixels into a screen-space pan.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: u32, camera: &PerspectiveCamera) {
        let h = viewport_height.max(1) as f32;
        let distance = (camera.position - self.target).length()
            * (camera.fov_degrees().to_radians() / 2.0).tan();
        let right = camera.right();
        let up = right.cross(camera.forward()).normalize_or_zero();
        self.pan_offset -= right * (2.0 * dx * distance / h * self.pan_speed);
        self.pan_offset += up * (2.0 * dy * distance / h * self.pan_speed);
    }

    /// Whether input is still being applied.
    pub fn is_settled(&self) -> bool {
        self.delta_theta.abs() < EPS
            && self.delta_phi.abs() < EPS
            && (self.scale - 1.0).abs() < EPS
            && self.pan_offset.length_squared() < EPS * EPS
    }

    /// Advance the controls by one step and move the camera.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let last_position = camera.position;
        let last_target = camera.target;

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * step;
        phi += self.delta_phi * step;
        phi = phi.clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        last_position.distance_squared(camera.position) > EPS
            || last_target.distance_squared(camera.target) > EPS
    }
}
