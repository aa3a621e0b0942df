use crate::math::Matrix4x4;
use crate::scene::SceneState;
use glam::Vec3;
use rand::Rng;
use tracing::debug;

/// Maximum angle between the gaze ray and the target direction that still
/// counts as pointing at it, in radians.
pub const DEFAULT_ANGLE_LIMIT: f32 = 0.2;

/// The forward gaze ray in head space.
const FORWARD: Vec3 = Vec3::NEG_Z;

/// Per-frame gaze hit-testing against the interactive target.
///
/// The hit state is recomputed every frame from the current head view and
/// target placement; nothing is stored, and there is no hysteresis. A
/// trigger landing on a freshly placed target can reselect it immediately.
#[derive(Debug, Clone, Copy)]
pub struct GazeResolver {
	pub angle_limit: f32,
}

impl Default for GazeResolver {
	fn default() -> Self {
		GazeResolver {
			angle_limit: DEFAULT_ANGLE_LIMIT,
		}
	}
}

impl GazeResolver {
	pub fn new(angle_limit: f32) -> Self {
		GazeResolver { angle_limit }
	}

	/// Whether the forward ray passes within the angular tolerance of the
	/// target. A target coincident with the head origin has no direction and
	/// counts as a miss.
	pub fn is_pointing_at_target(&self, head_view: &Matrix4x4, target_model: &Matrix4x4) -> bool {
		let head_from_target = *head_view * *target_model;
		let to_target = head_from_target.transform_point3(Vec3::ZERO);
		if to_target.length_squared() <= f32::EPSILON {
			return false;
		}
		FORWARD.angle_between(to_target) < self.angle_limit
	}

	/// Consumes a trigger event: if the target is currently gazed at, it is
	/// reshuffled to a fresh shape and position. Returns whether it was hit.
	pub fn trigger(
		&self,
		head_view: &Matrix4x4,
		scene: &mut SceneState,
		rng: &mut impl Rng,
	) -> bool {
		if !self.is_pointing_at_target(head_view, &scene.target.model_transform()) {
			return false;
		}
		scene.retarget(rng);
		debug!(
			shape = ?scene.target.shape,
			position = %scene.target.position,
			"target selected, reshuffled"
		);
		true
	}
}
