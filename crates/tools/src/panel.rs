use lumen_scene::SharedMaterial;

/// Material fields exposed on the debug panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialParam {
    Metalness,
    Roughness,
}

impl MaterialParam {
    pub const ALL: [MaterialParam; 2] = [MaterialParam::Metalness, MaterialParam::Roughness];

    pub fn label(self) -> &'static str {
        match self {
            MaterialParam::Metalness => "metalness",
            MaterialParam::Roughness => "roughness",
        }
    }
}

/// Range and granularity of one numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamSpec {
    /// The [0, 1] range with 0.0001 steps used by both material sliders.
    pub const UNIT: ParamSpec = ParamSpec {
        min: 0.0,
        max: 1.0,
        step: 0.0001,
    };

    /// Clamp into range and snap to the nearest step. NaN yields `None`.
    pub fn sanitize(&self, value: f32) -> Option<f32> {
        if value.is_nan() {
            return None;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        Some((self.min + steps * self.step).clamp(self.min, self.max))
    }
}

/// Binds the debug panel's controls to the shared material.
///
/// Every write goes through [`set`](Self::set), which sanitizes the value
/// against the control's [`ParamSpec`] before committing it.
#[derive(Debug, Clone)]
pub struct MaterialPanel {
    material: SharedMaterial,
    visible: bool,
}

impl MaterialPanel {
    pub fn new(material: SharedMaterial) -> Self {
        Self {
            material,
            visible: true,
        }
    }

    pub fn spec(&self, _param: MaterialParam) -> ParamSpec {
        ParamSpec::UNIT
    }

    pub fn get(&self, param: MaterialParam) -> f32 {
        let params = self.material.snapshot();
        match param {
            MaterialParam::Metalness => params.metalness,
            MaterialParam::Roughness => params.roughness,
        }
    }

    /// Write a control value. Out-of-range input is clamped; NaN is
    /// rejected and leaves the material untouched. Returns the committed
    /// value, or `None` when rejected.
    pub fn set(&self, param: MaterialParam, value: f32) -> Option<f32> {
        let Some(value) = self.spec(param).sanitize(value) else {
            tracing::warn!("rejected non-numeric {} input", param.label());
            return None;
        };
        let committed = match param {
            MaterialParam::Metalness => self.material.set_metalness(value),
            MaterialParam::Roughness => self.material.set_roughness(value),
        };
        tracing::trace!("{} = {committed}", param.label());
        Some(committed)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn out_of_range_is_clamped_before_reaching_material() {
        let material = SharedMaterial::default();
        let panel = MaterialPanel::new(material.clone());

        assert_eq!(panel.set(MaterialParam::Metalness, -0.5), Some(0.0));
        assert_eq!(material.snapshot().metalness, 0.0);

        assert_eq!(panel.set(MaterialParam::Metalness, 1.5), Some(1.0));
        assert_eq!(material.snapshot().metalness, 1.0);

        assert_eq!(panel.set(MaterialParam::Roughness, 7.0), Some(1.0));
        assert_eq!(material.snapshot().roughness, 1.0);
    }

    #[test]
    fn nan_is_rejected() {
        let material = SharedMaterial::default();
        let panel = MaterialPanel::new(material.clone());
        assert_eq!(panel.set(MaterialParam::Roughness, f32::NAN), None);
        assert_eq!(material.snapshot().roughness, 0.2);
    }

    #[test]
    fn values_snap_to_step() {
        let spec = ParamSpec::UNIT;
        assert!(close(spec.sanitize(0.123456).unwrap(), 0.1235));
        assert!(close(spec.sanitize(0.5).unwrap(), 0.5));
        assert_eq!(spec.sanitize(1.0), Some(1.0));
        assert_eq!(spec.sanitize(0.0), Some(0.0));
    }

    #[test]
    fn in_range_values_pass_through() {
        let panel = MaterialPanel::new(SharedMaterial::default());
        let committed = panel.set(MaterialParam::Metalness, 0.42).unwrap();
        assert!(close(committed, 0.42));
        assert!(close(panel.get(MaterialParam::Metalness), 0.42));
    }

    #[test]
    fn every_param_uses_unit_range() {
        let panel = MaterialPanel::new(SharedMaterial::default());
        for param in MaterialParam::ALL {
            let spec = panel.spec(param);
            assert_eq!((spec.min, spec.max, spec.step), (0.0, 1.0, 0.0001));
        }
    }

    #[test]
    fn toggle_visibility() {
        let mut panel = MaterialPanel::new(SharedMaterial::default());
        assert!(panel.is_visible());
        panel.toggle();
        assert!(!panel.is_visible());
    }
}
