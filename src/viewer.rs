use crate::core::dirty::Dirty;
use crate::core::error::{Result, ViewerError};
use crate::gaze::{DEFAULT_ANGLE_LIMIT, GazeResolver};
use crate::platform::{DeviceParamsStore, HeadTracker, LensBackend, Renderer, ScreenSize};
use crate::pose::{DEFAULT_PREDICTION_OFFSET_NS, PoseProvider};
use crate::scene::{DEFAULT_FLOOR_HEIGHT, PlacementBounds, SceneState, SpinMode};
use crate::stereo::{FrameDraws, StereoRig, project};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const DEFAULT_Z_NEAR: f32 = 0.1;
pub const DEFAULT_Z_FAR: f32 = 100.0;

/// Every tunable in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
	pub prediction_offset_ns: u64,
	pub floor_height: f32,
	/// Gaze tolerance in radians.
	pub gaze_angle_limit: f32,
	pub z_near: f32,
	pub z_far: f32,
	pub spin_mode: SpinMode,
	pub placement: PlacementBounds,
}
impl Default for ViewerConfig {
	fn default() -> Self {
		ViewerConfig {
			prediction_offset_ns: DEFAULT_PREDICTION_OFFSET_NS,
			floor_height: DEFAULT_FLOOR_HEIGHT,
			gaze_angle_limit: DEFAULT_ANGLE_LIMIT,
			z_near: DEFAULT_Z_NEAR,
			z_far: DEFAULT_Z_FAR,
			spin_mode: SpinMode::default(),
			placement: PlacementBounds::default(),
		}
	}
}

#[derive(Debug, Default)]
struct PendingCommands {
	trigger: bool,
	screen: Option<ScreenSize>,
}

/// Clonable handle for platform threads to queue one-shot events. Events are
/// consumed at the start of the next frame, never mid-frame.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue(Arc<Mutex<PendingCommands>>);
impl CommandQueue {
	pub fn trigger(&self) {
		self.0.lock().trigger = true;
	}
	pub fn set_screen_size(&self, size: ScreenSize) {
		self.0.lock().screen = Some(size);
	}
	fn take_screen(&self) -> Option<ScreenSize> {
		self.0.lock().screen.take()
	}
	fn take_trigger(&self) -> bool {
		std::mem::take(&mut self.0.lock().trigger)
	}
}

/// The frame loop owner: gates on device parameters, samples the predicted
/// pose, advances the scene, and produces per-eye draw lists.
///
/// Single-threaded and frame-synchronous; the only cross-thread surface is
/// the [`CommandQueue`].
pub struct Viewer<T, S, L> {
	config: ViewerConfig,
	pose: PoseProvider<T>,
	params: S,
	lens: L,
	commands: CommandQueue,
	screen: Dirty<ScreenSize>,
	device_params_changed: bool,
	rig: Option<StereoRig>,
	pub scene: SceneState,
	gaze: GazeResolver,
	rng: StdRng,
	last_frame_ns: Option<u64>,
}

impl<T: HeadTracker, S: DeviceParamsStore, L: LensBackend> Viewer<T, S, L> {
	pub fn new(config: ViewerConfig, tracker: T, params: S, lens: L, mut scene: SceneState) -> Self {
		scene.floor_height = config.floor_height;
		scene.spin_mode = config.spin_mode;
		scene.bounds = config.placement;
		let gaze = GazeResolver::new(config.gaze_angle_limit);
		Viewer {
			pose: PoseProvider::new(tracker, config.prediction_offset_ns),
			config,
			params,
			lens,
			commands: CommandQueue::default(),
			screen: Dirty::new(ScreenSize::default()),
			device_params_changed: true,
			rig: None,
			scene,
			gaze,
			rng: StdRng::from_os_rng(),
			last_frame_ns: None,
		}
	}

	/// Handle for input/UI threads; see [`CommandQueue`].
	pub fn commands(&self) -> CommandQueue {
		self.commands.clone()
	}

	/// For callers on the render thread; other threads go through
	/// [`CommandQueue::set_screen_size`].
	pub fn set_screen_size(&mut self, size: ScreenSize) {
		self.screen.set(size);
	}

	pub fn pause(&mut self) {
		self.pose.tracker_mut().pause();
	}

	/// Resumes tracking. Device parameters may have changed while suspended,
	/// so the rig is rebuilt; if none are saved at all, the external
	/// configuration flow is kicked off once.
	pub fn resume(&mut self) {
		self.pose.tracker_mut().resume();
		self.device_params_changed = true;
		if self.params.saved_params().is_none() {
			debug!("no saved device params, requesting configuration flow");
			self.params.request_configuration();
		}
	}

	/// Rebuilds the stereo rig when the screen size or device parameters
	/// changed. Fails with [`ViewerError::DeviceParamsMissing`] (and leaves
	/// the change flags set, so the rebuild is retried) until the store has
	/// a calibration blob and the screen size is known.
	fn update_device_params(&mut self) -> Result<()> {
		if !self.screen.is_changed() && !self.device_params_changed && self.rig.is_some() {
			return Ok(());
		}
		if self.screen.get().is_empty() {
			debug!("screen size not known yet, skipping frame");
			return Err(ViewerError::DeviceParamsMissing);
		}
		let Some(params) = self.params.saved_params() else {
			debug!("device params missing, skipping frame");
			return Err(ViewerError::DeviceParamsMissing);
		};
		self.rig = Some(self.lens.build_rig(
			&params,
			*self.screen.get(),
			self.config.z_near,
			self.config.z_far,
		));
		self.screen.take_changed();
		self.device_params_changed = false;
		debug!(screen = ?self.screen.get(), "stereo rig rebuilt");
		Ok(())
	}

	/// Runs one frame at the given monotonic time: drain commands, gate on
	/// device params, sample the pose, animate, apply a queued trigger, and
	/// project.
	///
	/// Transient failures (`PoseUnavailable`, `DeviceParamsMissing`) mean
	/// "nothing rendered this frame"; the caller just invokes again next
	/// frame. A queued trigger survives skipped frames.
	#[instrument(level = "debug", skip_all)]
	pub fn frame(&mut self, now_ns: u64) -> Result<FrameDraws> {
		if let Some(size) = self.commands.take_screen() {
			self.screen.set(size);
		}
		self.update_device_params()?;
		let pose = self.pose.sample(now_ns)?;

		let dt_seconds = match self.last_frame_ns.replace(now_ns) {
			Some(last) => now_ns.saturating_sub(last) as f32 / 1e9,
			None => 0.0,
		};
		let head_view = self.scene.with_floor_offset(&pose);
		self.scene.animate(dt_seconds);
		if self.commands.take_trigger() {
			self.gaze.trigger(&head_view, &mut self.scene, &mut self.rng);
		}
		let selected = self
			.gaze
			.is_pointing_at_target(&head_view, &self.scene.target.model_transform());

		let Some(rig) = self.rig.as_ref() else {
			return Err(ViewerError::DeviceParamsMissing);
		};
		Ok(project(rig, &head_view, &self.scene, selected))
	}

	/// [`Viewer::frame`] plus submission to the renderer.
	pub fn render(&mut self, now_ns: u64, renderer: &mut impl Renderer) -> Result<()> {
		self.frame(now_ns)?.submit(renderer);
		Ok(())
	}
}
