//! Time-driven model motion.
//!
//! A [`TransformScheduler`] turns queued requests (translate, scale, rotate,
//! shear, follow a curve) and the current frame time into a model matrix.

pub mod channel;
pub mod curve;
pub mod ops;
pub mod request;
pub mod scheduler;

pub use channel::{Channel, ChannelState, Motion, Segment};
pub use curve::CurveKind;
pub use ops::Shear;
pub use request::MotionRequest;
pub use scheduler::TransformScheduler;
