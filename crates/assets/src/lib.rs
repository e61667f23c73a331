//! Environment cube-map assets.
//!
//! A cube-map is six square RGBA8 faces in `+X, -X, +Y, -Y, +Z, -Z` order,
//! the layer order GPU cube textures expect. Faces are read from image files
//! named `px`, `nx`, `py`, `ny`, `pz`, `nz`, or generated as a sky gradient
//! when no images are available.
//!
//! Loads can run on a background thread so that rendering never waits for
//! disk; see [`spawn_cube_map_load`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// File stems of the six faces, in layer order.
pub const FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

const FACE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors from cube-map operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("cube-map face `{face}` not found in {dir}")]
    MissingFace { face: &'static str, dir: PathBuf },
    #[error("cube-map face `{face}` is {width}x{height}, faces must be square")]
    NotSquare {
        face: &'static str,
        width: u32,
        height: u32,
    },
    #[error("cube-map face `{face}` is {found}px, expected {expected}px")]
    SizeMismatch {
        face: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("cube-map loader exited without a result")]
    LoaderGone,
}

/// Six square RGBA8 faces of equal size.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMapImage {
    size: u32,
    faces: [Vec<u8>; 6],
}

impl CubeMapImage {
    /// Build from raw faces, checking that every face is `size * size * 4`
    /// bytes.
    pub fn from_rgba_faces(size: u32, faces: [Vec<u8>; 6]) -> Result<Self, AssetError> {
        let expected = (size as usize) * (size as usize) * 4;
        for (i, face) in faces.iter().enumerate() {
            if face.len() != expected {
                let found = ((face.len() / 4) as f64).sqrt() as u32;
                return Err(AssetError::SizeMismatch {
                    face: FACE_NAMES[i],
                    expected: size,
                    found,
                });
            }
        }
        Ok(Self { size, faces })
    }

    /// Load the six faces from `dir`. Each face may be a JPEG or PNG file.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let mut size = None;
        let mut faces: [Vec<u8>; 6] = Default::default();

        for (i, &name) in FACE_NAMES.iter().enumerate() {
            let path = find_face(dir, name).ok_or_else(|| AssetError::MissingFace {
                face: name,
                dir: dir.to_path_buf(),
            })?;
            let img = image::open(&path)?.to_rgba8();
            let (width, height) = img.dimensions();
            if width != height {
                return Err(AssetError::NotSquare {
                    face: name,
                    width,
                    height,
                });
            }
            let expected = *size.get_or_insert(width);
            if width != expected {
                return Err(AssetError::SizeMismatch {
                    face: name,
                    expected,
                    found: width,
                });
            }
            faces[i] = img.into_raw();
        }

        let size = size.unwrap_or(0);
        tracing::info!("loaded {size}px cube-map from {}", dir.display());
        Ok(Self { size, faces })
    }

    /// Procedural sky: `zenith` overhead, `horizon` at eye level, `ground`
    /// below, blended linearly on the vertical component of each direction.
    pub fn gradient(size: u32, zenith: [u8; 3], horizon: [u8; 3], ground: [u8; 3]) -> Self {
        let size = size.max(1);
        let faces = std::array::from_fn(|face| {
            let mut data = Vec::with_capacity(size as usize * size as usize * 4);
            for y in 0..size {
                for x in 0..size {
                    let u = (x as f32 + 0.5) / size as f32;
                    let v = (y as f32 + 0.5) / size as f32;
                    let d = face_direction(face, u, v);
                    let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
                    let up = d[1] / len;
                    let rgb = if up >= 0.0 {
                        mix(horizon, zenith, up)
                    } else {
                        mix(horizon, ground, -up)
                    };
                    data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
                }
            }
            data
        });
        Self { size, faces }
    }

    /// Edge length of each face in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw RGBA8 bytes of face `index` (layer order).
    pub fn face(&self, index: usize) -> &[u8] {
        &self.faces[index]
    }

    pub fn texel(&self, face: usize, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.size + x) * 4) as usize;
        let f = &self.faces[face];
        [f[i], f[i + 1], f[i + 2], f[i + 3]]
    }

    /// Number of mip levels down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.size.max(1).leading_zeros()
    }

    /// Box-filtered mip chain, level 0 first. Odd edges round down.
    pub fn mip_chain(&self) -> Vec<CubeMapImage> {
        let mut chain = vec![self.clone()];
        while let Some(prev) = chain.last() {
            if prev.size <= 1 {
                break;
            }
            let next = prev.downsample();
            chain.push(next);
        }
        chain
    }

    fn downsample(&self) -> CubeMapImage {
        let src = self.size;
        let dst = (src / 2).max(1);
        let faces = std::array::from_fn(|face| {
            let mut data = Vec::with_capacity(dst as usize * dst as usize * 4);
            for y in 0..dst {
                for x in 0..dst {
                    let mut acc = [0u32; 4];
                    for (sx, sy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                        let px = (x * 2 + sx).min(src - 1);
                        let py = (y * 2 + sy).min(src - 1);
                        let t = self.texel(face, px, py);
                        for c in 0..4 {
                            acc[c] += t[c] as u32;
                        }
                    }
                    data.extend(acc.iter().map(|&c| ((c + 2) / 4) as u8));
                }
            }
            data
        });
        CubeMapImage { size: dst, faces }
    }
}

fn find_face(dir: &Path, stem: &str) -> Option<PathBuf> {
    FACE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8)
}

/// World-space direction through texel coordinate `(u, v)` in [0, 1] of
/// cube face `face`.
pub fn face_direction(face: usize, u: f32, v: f32) -> [f32; 3] {
    let s = 2.0 * u - 1.0;
    let t = 2.0 * v - 1.0;
    match face {
        0 => [1.0, -t, -s],
        1 => [-1.0, -t, s],
        2 => [s, 1.0, t],
        3 => [s, -1.0, -t],
        4 => [s, -t, 1.0],
        _ => [-s, -t, -1.0],
    }
}

/// Handle to a cube-map load running on a background thread.
#[derive(Debug)]
pub struct CubeMapLoad {
    rx: Receiver<Result<CubeMapImage, AssetError>>,
    finished: bool,
}

impl CubeMapLoad {
    /// Take the result if the load has finished. Returns `None` while the
    /// load is running and after the result has been taken.
    pub fn try_take(&mut self) -> Option<Result<CubeMapImage, AssetError>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(AssetError::LoaderGone))
            }
        }
    }

    /// Block until the load finishes.
    pub fn wait(mut self) -> Result<CubeMapImage, AssetError> {
        if self.finished {
            return Err(AssetError::LoaderGone);
        }
        self.finished = true;
        self.rx.recv().unwrap_or(Err(AssetError::LoaderGone))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Start loading the cube-map in `dir` on a background thread.
pub fn spawn_cube_map_load(dir: impl Into<PathBuf>) -> Result<CubeMapLoad, AssetError> {
    let dir = dir.into();
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("cubemap-loader".into())
        .spawn(move || {
            let _ = tx.send(CubeMapImage::load_dir(&dir));
        })?;
    Ok(CubeMapLoad {
        rx,
        finished: false,
    })
}

pub fn crate_info() -> &'static str {
    "lumen-assets v0.1.0"
}
