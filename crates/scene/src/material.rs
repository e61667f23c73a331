use lumen_common::Rgb;
use parking_lot::RwLock;
use std::sync::Arc;

/// Parameters of the standard metal/rough material shared by every object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// In [0, 1].
    pub metalness: f32,
    /// In [0, 1].
    pub roughness: f32,
    pub color: Rgb,
    pub env_map_intensity: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            metalness: 0.7,
            roughness: 0.2,
            color: Rgb::WHITE,
            env_map_intensity: 1.0,
        }
    }
}

impl MaterialParams {
    /// Copy with metalness and roughness forced into [0, 1]. NaN fields take
    /// the default value.
    pub fn clamped(mut self) -> Self {
        let defaults = Self::default();
        self.metalness = unit_clamp(self.metalness, defaults.metalness);
        self.roughness = unit_clamp(self.roughness, defaults.roughness);
        self
    }
}

/// Clamp into [0, 1]; NaN resolves to `fallback`.
fn unit_clamp(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback.clamp(0.0, 1.0)
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Material state shared between the debug panel (writer) and the renderer
/// (reader).
///
/// Readers take a [`snapshot`](Self::snapshot) so a frame always sees one
/// committed set of values. Writes hold the lock only for the field update.
#[derive(Debug, Clone, Default)]
pub struct SharedMaterial {
    inner: Arc<RwLock<MaterialParams>>,
}

impl SharedMaterial {
    pub fn new(params: MaterialParams) -> Self {
        Self {
            inner: Arc::new(RwLock::new(params.clamped())),
        }
    }

    pub fn snapshot(&self) -> MaterialParams {
        *self.inner.read()
    }

    /// Store a new metalness, clamped into [0, 1]. NaN leaves the value
    /// unchanged. Returns the committed value.
    pub fn set_metalness(&self, value: f32) -> f32 {
        let mut params = self.inner.write();
        params.metalness = unit_clamp(value, params.metalness);
        params.metalness
    }

    /// Store a new roughness, clamped into [0, 1]. NaN leaves the value
    /// unchanged. Returns the committed value.
    pub fn set_roughness(&self, value: f32) -> f32 {
        let mut params = self.inner.write();
        params.roughness = unit_clamp(value, params.roughness);
        params.roughness
    }

    pub fn set_env_map_intensity(&self, value: f32) {
        if value.is_finite() {
            self.inner.write().env_map_intensity = value.max(0.0);
        }
    }

    /// Whether both handles point at the same material.
    pub fn same_as(&self, other: &SharedMaterial) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_showcase() {
        let p = MaterialParams::default();
        assert_eq!(p.metalness, 0.7);
        assert_eq!(p.roughness, 0.2);
    }

    #[test]
    fn setters_clamp_out_of_range() {
        let m = SharedMaterial::default();
        assert_eq!(m.set_metalness(-0.5), 0.0);
        assert_eq!(m.set_metalness(1.5), 1.0);
        assert_eq!(m.set_roughness(2.0), 1.0);
        let snap = m.snapshot();
        assert_eq!(snap.metalness, 1.0);
        assert_eq!(snap.roughness, 1.0);
    }

    #[test]
    fn nan_is_ignored() {
        let m = SharedMaterial::default();
        m.set_metalness(f32::NAN);
        assert_eq!(m.snapshot().metalness, 0.7);
    }

    #[test]
    fn clones_share_state() {
        let writer = SharedMaterial::default();
        let reader = writer.clone();
        writer.set_roughness(0.55);
        assert!(reader.same_as(&writer));
        assert_eq!(reader.snapshot().roughness, 0.55);
    }

    #[test]
    fn snapshot_is_detached() {
        let m = SharedMaterial::default();
        let before = m.snapshot();
        m.set_metalness(0.1);
        assert_eq!(before.metalness, 0.7);
        assert_eq!(m.snapshot().metalness, 0.1);
    }

    #[test]
    fn concurrent_writer_and_reader_see_committed_values() {
        let m = SharedMaterial::default();
        let writer = m.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..1000 {
                writer.set_metalness((i % 2) as f32);
            }
        });
        for _ in 0..1000 {
            let v = m.snapshot().metalness;
            assert!(v == 0.0 || v == 1.0 || v == 0.7);
        }
        handle.join().unwrap();
    }

    #[test]
    fn construction_clamps() {
        let m = SharedMaterial::new(MaterialParams {
            metalness: 4.0,
            roughness: -1.0,
            ..MaterialParams::default()
        });
        let p = m.snapshot();
        assert_eq!((p.metalness, p.roughness), (1.0, 0.0));
    }
}
