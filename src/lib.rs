//! Head-tracked stereoscopic viewer core.
//!
//! Per frame: sample a predicted head pose, fold in the floor offset,
//! advance the scene animation, resolve the gaze against the interactive
//! target, and compose one draw matrix per (object, eye) pair for the
//! external renderer. Asset loading, GL state, and the distortion backend
//! live behind the [`platform`] traits.

pub mod core;
pub mod gaze;
pub mod math;
pub mod platform;
pub mod pose;
pub mod scene;
pub mod stereo;
pub mod viewer;

pub use crate::core::error::{Result, ViewerError};
pub use math::Matrix4x4;
pub use scene::{SceneAssets, SceneState, TargetShape};
pub use stereo::{DrawCall, Eye, EyeFrame, FrameDraws, StereoRig};
pub use viewer::{CommandQueue, Viewer, ViewerConfig};
