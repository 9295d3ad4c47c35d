//! Viewer options with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the values
//! it overrides. Key bindings map a single character to a motion preset
//! that is queued on the model whenever that key is pressed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anim3d_core::{CurveKind, MotionRequest, ProjectionMode, ShearAxis};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys handled by the viewer itself (camera movement and quit).
pub const RESERVED_KEYS: [char; 5] = ['w', 'a', 's', 'd', 'q'];

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options from {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize options: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid key binding: {0}")]
    InvalidBinding(String),
    #[error("{0}")]
    Invalid(String),
}

/// Top-level viewer options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppOptions {
    /// Target frames per second.
    pub fps: u32,
    /// Uniform scale applied after the model's own transform.
    pub model_scale: f32,
    pub camera: CameraOptions,
    pub bindings: Vec<KeyBinding>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            model_scale: 1.0,
            camera: CameraOptions::default(),
            bindings: default_bindings(),
        }
    }
}

impl AppOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&content)?;
        log::info!(
            "loaded options from {} ({} bindings)",
            path.display(),
            options.bindings.len()
        );
        Ok(options)
    }

    /// Parse and validate options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Pretty-printed TOML, suitable as a starting config file.
    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the viewer cannot run with.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.fps == 0 {
            return Err(OptionsError::Invalid("fps must be at least 1".into()));
        }
        if !(self.model_scale.is_finite() && self.model_scale > 0.0) {
            return Err(OptionsError::Invalid(format!(
                "model_scale must be positive, got {}",
                self.model_scale
            )));
        }

        let mut seen = HashSet::new();
        for binding in &self.bindings {
            let key = binding.key.to_ascii_lowercase();
            if RESERVED_KEYS.contains(&key) {
                return Err(OptionsError::InvalidBinding(format!(
                    "'{}' is reserved for camera movement or quit",
                    binding.key
                )));
            }
            if !binding.motion.is_finite() {
                return Err(OptionsError::InvalidBinding(format!(
                    "'{}' has a non-finite angle, duration or coordinate",
                    binding.key
                )));
            }
            if !seen.insert(key) {
                return Err(OptionsError::InvalidBinding(format!(
                    "'{}' is bound more than once",
                    binding.key
                )));
            }
        }
        Ok(())
    }
}

/// Initial camera placement and movement speed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Distance moved per key press.
    pub move_speed: f32,
    pub projection: Projection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl From<Projection> for ProjectionMode {
    fn from(projection: Projection) -> Self {
        match projection {
            Projection::Perspective => ProjectionMode::Perspective,
            Projection::Orthographic => ProjectionMode::Orthographic,
        }
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            move_speed: 0.25,
            projection: Projection::Perspective,
        }
    }
}

/// One key and the motion it queues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBinding {
    pub key: char,
    pub motion: MotionPreset,
}

impl KeyBinding {
    pub fn new(key: char, motion: MotionPreset) -> Self {
        Self { key, motion }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AxisName {
    X,
    Y,
    Z,
}

impl From<AxisName> for ShearAxis {
    fn from(axis: AxisName) -> Self {
        match axis {
            AxisName::X => ShearAxis::X,
            AxisName::Y => ShearAxis::Y,
            AxisName::Z => ShearAxis::Z,
        }
    }
}

/// A motion request as written in the options file.
///
/// Angles are in degrees and durations in seconds. Shear factors are the two
/// other coordinates in x, y, z order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionPreset {
    Translate {
        target: [f32; 3],
        duration: f32,
    },
    Scale {
        target: [f32; 3],
        duration: f32,
    },
    RotateAxis {
        degrees: f32,
        duration: f32,
        axis: [f32; 3],
    },
    RotateAroundPoint {
        degrees: f32,
        duration: f32,
        pivot: [f32; 3],
        #[serde(default = "vertical")]
        axis: [f32; 3],
    },
    Shear {
        axis: AxisName,
        a: f32,
        b: f32,
        duration: f32,
    },
    Bezier {
        points: [[f32; 3]; 4],
        duration: f32,
    },
    #[serde(rename = "bspline")]
    BSpline {
        points: [[f32; 3]; 4],
        duration: f32,
    },
}

fn vertical() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn curve_points(points: &[[f32; 3]; 4]) -> [Vector3<f32>; 4] {
    points.map(Vector3::from)
}

impl MotionPreset {
    /// True when every angle, duration and coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        let finite = |values: &[f32]| values.iter().all(|v| v.is_finite());
        match self {
            MotionPreset::Translate { target, duration }
            | MotionPreset::Scale { target, duration } => finite(target) && duration.is_finite(),
            MotionPreset::RotateAxis {
                degrees,
                duration,
                axis,
            } => finite(&[*degrees, *duration]) && finite(axis),
            MotionPreset::RotateAroundPoint {
                degrees,
                duration,
                pivot,
                axis,
            } => finite(&[*degrees, *duration]) && finite(pivot) && finite(axis),
            MotionPreset::Shear { a, b, duration, .. } => finite(&[*a, *b, *duration]),
            MotionPreset::Bezier { points, duration }
            | MotionPreset::BSpline { points, duration } => {
                points.iter().all(|p| finite(p)) && duration.is_finite()
            }
        }
    }

    /// The scheduler request this preset stands for.
    pub fn to_request(&self) -> MotionRequest {
        match self {
            MotionPreset::Translate { target, duration } => MotionRequest::Translate {
                target: Vector3::from(*target),
                duration: *duration,
            },
            MotionPreset::Scale { target, duration } => MotionRequest::Scale {
                target: Vector3::from(*target),
                duration: *duration,
            },
            MotionPreset::RotateAxis {
                degrees,
                duration,
                axis,
            } => MotionRequest::RotateAxis {
                angle: degrees.to_radians(),
                duration: *duration,
                axis: Vector3::from(*axis),
            },
            MotionPreset::RotateAroundPoint {
                degrees,
                duration,
                pivot,
                axis,
            } => MotionRequest::RotateAroundPoint {
                angle: degrees.to_radians(),
                duration: *duration,
                axis: Vector3::from(*axis),
                pivot: Point3::from(*pivot),
            },
            MotionPreset::Shear {
                axis,
                a,
                b,
                duration,
            } => MotionRequest::shear((*axis).into(), *a, *b, *duration),
            MotionPreset::Bezier { points, duration } => MotionRequest::Path {
                kind: CurveKind::Bezier,
                points: curve_points(points),
                duration: *duration,
            },
            MotionPreset::BSpline { points, duration } => MotionRequest::Path {
                kind: CurveKind::BSpline,
                points: curve_points(points),
                duration: *duration,
            },
        }
    }
}

fn translate(target: [f32; 3], duration: f32) -> MotionPreset {
    MotionPreset::Translate { target, duration }
}

fn scale(target: [f32; 3], duration: f32) -> MotionPreset {
    MotionPreset::Scale { target, duration }
}

fn rotate(degrees: f32, duration: f32, axis: [f32; 3]) -> MotionPreset {
    MotionPreset::RotateAxis {
        degrees,
        duration,
        axis,
    }
}

fn pivot(degrees: f32, duration: f32, pivot: [f32; 3]) -> MotionPreset {
    MotionPreset::RotateAroundPoint {
        degrees,
        duration,
        pivot,
        axis: vertical(),
    }
}

fn shear(axis: AxisName, a: f32, b: f32, duration: f32) -> MotionPreset {
    MotionPreset::Shear {
        axis,
        a,
        b,
        duration,
    }
}

/// The demo key map: T/Y/U/I translate, G/H/J/K scale, V/B/N/M rotate,
/// P pivots, X/C/Z shear, 1 and 2 follow curves.
pub fn default_bindings() -> Vec<KeyBinding> {
    let arc = [
        [0.0, 0.0, 0.0],
        [0.0, 1.5, 0.0],
        [1.5, 1.5, 0.0],
        [1.5, 0.0, 0.0],
    ];

    vec![
        KeyBinding::new('t', translate([0.5, 0.5, 0.5], 3.0)),
        KeyBinding::new('y', translate([-0.5, -0.5, 0.5], 3.0)),
        KeyBinding::new('u', translate([0.0, 0.0, 0.0], 0.0)),
        KeyBinding::new('i', translate([1.0, -1.0, 1.0], 5.0)),
        KeyBinding::new('g', scale([0.5, 0.5, 0.5], 5.0)),
        KeyBinding::new('h', scale([0.7, 0.5, 0.25], 4.0)),
        KeyBinding::new('j', scale([1.0, 1.0, 1.0], 0.0)),
        KeyBinding::new('k', scale([1.5, 1.5, 1.5], 2.0)),
        KeyBinding::new('v', rotate(90.0, 5.0, [0.0, 1.0, 0.0])),
        KeyBinding::new('b', rotate(180.0, 5.0, [1.0, 0.0, 0.0])),
        KeyBinding::new('n', rotate(60.0, 5.0, [0.0, -1.0, 0.0])),
        KeyBinding::new('m', rotate(310.0, 2.0, [0.71, -0.45, 1.1])),
        KeyBinding::new('p', pivot(180.0, 4.0, [1.0, 0.0, 0.0])),
        KeyBinding::new('x', shear(AxisName::X, 0.5, 0.0, 2.0)),
        KeyBinding::new('c', shear(AxisName::Y, 0.0, 0.5, 2.0)),
        KeyBinding::new('z', shear(AxisName::Z, 0.0, 0.0, 1.0)),
        KeyBinding::new(
            '1',
            MotionPreset::Bezier {
                points: arc,
                duration: 3.0,
            },
        ),
        KeyBinding::new(
            '2',
            MotionPreset::BSpline {
                points: arc,
                duration: 3.0,
            },
        ),
    ]
}
