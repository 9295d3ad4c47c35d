//! anim3d core library - model geometry, asset loading and timed motion
//!
//! Models are loaded once from STL or OBJ files, then moved by queueing
//! translate, scale, rotate, shear and curve-following requests on their
//! transform scheduler. Each frame the scheduler is evaluated at the current
//! time to produce the model matrix.

pub mod assets;
pub mod camera;
pub mod geometry;
pub mod model;
pub mod motion;
pub mod transform;

// Re-export commonly used types
pub use assets::{AssetLoadError, AssetResult};
pub use camera::{project_clip, Camera, CameraMovement, ProjectionMode};
pub use geometry::{Mesh, Triangle, Vertex};
pub use model::Model;
pub use motion::{CurveKind, MotionRequest, TransformScheduler};
pub use transform::ShearAxis;
