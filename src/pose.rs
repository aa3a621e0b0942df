use crate::core::error::{Result, ViewerError};
use crate::math::Matrix4x4;
use crate::platform::HeadTracker;
use glam::{Quat, Vec3};

/// How far ahead of "now" the tracker is asked to predict, to compensate for
/// display pipeline latency. A fixed constant, not derived from vsync.
pub const DEFAULT_PREDICTION_OFFSET_NS: u64 = 50_000_000;

/// Samples the external head tracker and folds the result into a single
/// world-to-head transform for the frame.
pub struct PoseProvider<T> {
	tracker: T,
	prediction_offset_ns: u64,
}

impl<T: HeadTracker> PoseProvider<T> {
	pub fn new(tracker: T, prediction_offset_ns: u64) -> Self {
		PoseProvider {
			tracker,
			prediction_offset_ns,
		}
	}

	pub fn tracker_mut(&mut self) -> &mut T {
		&mut self.tracker
	}

	/// World-to-head transform at `now_ns` plus the prediction offset:
	/// `translation(position) * rotation(orientation)`.
	///
	/// Fails with [`ViewerError::PoseUnavailable`] until the tracker has
	/// converged; callers skip the frame rather than render from an
	/// undefined matrix.
	pub fn sample(&mut self, now_ns: u64) -> Result<Matrix4x4> {
		let predicted_ns = now_ns + self.prediction_offset_ns;
		let sample = self
			.tracker
			.pose(predicted_ns)
			.ok_or(ViewerError::PoseUnavailable)?;
		let orientation = Quat::from(sample.orientation);
		let position = Vec3::from(sample.position);
		Ok(Matrix4x4::from_translation(position) * Matrix4x4::from_quat(orientation))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::platform::HeadPoseSample;
	use glam::vec3;

	struct FakeTracker {
		sample: Option<HeadPoseSample>,
		last_query_ns: Option<u64>,
	}
	impl HeadTracker for FakeTracker {
		fn pose(&mut self, monotonic_time_ns: u64) -> Option<HeadPoseSample> {
			self.last_query_ns = Some(monotonic_time_ns);
			self.sample
		}
		fn pause(&mut self) {}
		fn resume(&mut self) {}
	}

	#[test]
	fn sample_composes_translation_then_rotation() {
		let quarter_turn = Quat::from_rotation_y(90.0f32.to_radians());
		let mut provider = PoseProvider::new(
			FakeTracker {
				sample: Some(HeadPoseSample {
					orientation: quarter_turn.into(),
					position: mint::Vector3 {
						x: 1.0,
						y: 0.0,
						z: 0.0,
					},
				}),
				last_query_ns: None,
			},
			0,
		);
		let pose = provider.sample(0).unwrap();
		// Rotation applies before the translation.
		let p = pose.transform_point3(vec3(0.0, 0.0, 1.0));
		assert!((p - vec3(2.0, 0.0, 0.0)).length() < 1e-5, "got {p}");
	}

	#[test]
	fn query_timestamp_carries_the_prediction_offset() {
		let mut provider = PoseProvider::new(
			FakeTracker {
				sample: None,
				last_query_ns: None,
			},
			DEFAULT_PREDICTION_OFFSET_NS,
		);
		assert_eq!(provider.sample(1_000), Err(ViewerError::PoseUnavailable));
		assert_eq!(
			provider.tracker_mut().last_query_ns,
			Some(1_000 + DEFAULT_PREDICTION_OFFSET_NS)
		);
	}
}
