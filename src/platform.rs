//! Collaborator interfaces the core drives but does not implement: the head
//! tracker, the saved-viewer-parameter store, the lens/distortion backend,
//! and the rasterizing renderer.

use crate::stereo::{DrawCall, Eye, StereoRig};

/// Opaque renderer-owned mesh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Opaque renderer-owned texture id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenSize {
	pub width: u32,
	pub height: u32,
}
impl ScreenSize {
	pub const fn new(width: u32, height: u32) -> Self {
		ScreenSize { width, height }
	}
	pub const fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

/// A single tracked head sample, in the tracker's conventions (unit
/// quaternion + meters). Mint types keep the boundary math-crate-agnostic.
#[derive(Debug, Clone, Copy)]
pub struct HeadPoseSample {
	pub orientation: mint::Quaternion<f32>,
	pub position: mint::Vector3<f32>,
}

/// The external head tracker. `pose` may return `None` until the underlying
/// sensor fusion has converged; callers skip the frame in that case.
pub trait HeadTracker {
	fn pose(&mut self, monotonic_time_ns: u64) -> Option<HeadPoseSample>;
	fn pause(&mut self);
	fn resume(&mut self);
}

/// Persistent storage for the physical viewer's calibration blob.
///
/// `request_configuration` kicks off the external scan-and-save flow (a QR
/// code scan on headset hardware); the store stays empty until that flow
/// completes out-of-band.
pub trait DeviceParamsStore {
	fn saved_params(&mut self) -> Option<Vec<u8>>;
	fn request_configuration(&mut self);
}

/// Lens/distortion black box: turns a calibration blob and a screen size
/// into the per-eye transform pair. Distortion-mesh state stays inside the
/// backend; the core only consumes the matrices.
pub trait LensBackend {
	fn build_rig(
		&mut self,
		device_params: &[u8],
		screen: ScreenSize,
		z_near: f32,
		z_far: f32,
	) -> StereoRig;
}

/// Consumes one eye's draw list per call; rasterization and final display
/// composition are out of core scope.
pub trait Renderer {
	fn draw(&mut self, eye: Eye, calls: &[DrawCall]);
}
