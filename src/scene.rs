use crate::math::Matrix4x4;
use crate::platform::{MeshHandle, TextureHandle};
use glam::{Vec3, vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::Index;

// The scene objects are about a meter in radius and the room about 5 meters
// across, so these bounds keep the target inside the room and farther out
// than the reticle.
pub const MIN_TARGET_DISTANCE: f32 = 2.5;
pub const MAX_TARGET_DISTANCE: f32 = 3.5;
pub const MIN_TARGET_HEIGHT: f32 = 0.5;
pub const MAX_TARGET_HEIGHT: f32 = MIN_TARGET_HEIGHT + 3.0;

/// Vertical offset from the tracked head origin down to the floor plane.
pub const DEFAULT_FLOOR_HEIGHT: f32 = -1.7;

/// Default spin advance for animated props, in degrees per frame.
pub const DEFAULT_SPIN_RATE: f32 = 0.7;

/// Where the target first appears: directly in front of the user.
pub const INITIAL_TARGET_POSITION: Vec3 = vec3(1.0, 1.5, MIN_TARGET_DISTANCE);

pub const TARGET_SCALE: f32 = 2.0;

/// How animated props advance their spin phase.
///
/// `PerFrame` adds the rate once per frame, so perceived speed varies with
/// refresh rate; `DegreesPerSecond` scales the rate by the frame delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinMode {
	#[default]
	PerFrame,
	DegreesPerSecond,
}

/// Horizontal-ring sampling bounds for [`SceneState::retarget`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementBounds {
	pub min_distance: f32,
	pub max_distance: f32,
	pub min_height: f32,
	pub max_height: f32,
}
impl Default for PlacementBounds {
	fn default() -> Self {
		PlacementBounds {
			min_distance: MIN_TARGET_DISTANCE,
			max_distance: MAX_TARGET_DISTANCE,
			min_height: MIN_TARGET_HEIGHT,
			max_height: MAX_TARGET_HEIGHT,
		}
	}
}

/// Whether an object stays world-fixed or follows the head at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
	World,
	Head(Vec3),
}

/// A non-interactive scene object: the room or a decoration.
#[derive(Debug, Clone)]
pub struct Prop {
	pub label: &'static str,
	pub anchor: Anchor,
	pub position: Vec3,
	pub scale: f32,
	/// Spin rate for animated props; units depend on [`SpinMode`].
	pub spin_rate: Option<f32>,
	spin_deg: f32,
	pub mesh: MeshHandle,
	pub texture: TextureHandle,
}

impl Prop {
	pub fn new(label: &'static str, mesh: MeshHandle, texture: TextureHandle) -> Self {
		Prop {
			label,
			anchor: Anchor::World,
			position: Vec3::ZERO,
			scale: 1.0,
			spin_rate: None,
			spin_deg: 0.0,
			mesh,
			texture,
		}
	}
	pub fn at(mut self, position: Vec3) -> Self {
		self.position = position;
		self
	}
	pub fn head_anchored(mut self, offset: Vec3) -> Self {
		self.anchor = Anchor::Head(offset);
		self
	}
	pub fn with_scale(mut self, scale: f32) -> Self {
		self.scale = scale;
		self
	}
	pub fn spinning(mut self, rate: f32) -> Self {
		self.spin_rate = Some(rate);
		self
	}

	pub fn spin_deg(&self) -> f32 {
		self.spin_deg
	}

	/// Current model transform. Spin composes with the placement instead of
	/// replacing it, so animated props stay where they were put.
	pub fn model_transform(&self) -> Matrix4x4 {
		Matrix4x4::from_translation(self.position) * Matrix4x4::from_rotation_y(self.spin_deg)
	}
}

/// The closed set of interactive target shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
	Icosahedron,
	QuadSphere,
	TriSphere,
}
impl TargetShape {
	pub const ALL: [TargetShape; 3] = [
		TargetShape::Icosahedron,
		TargetShape::QuadSphere,
		TargetShape::TriSphere,
	];

	pub fn random(rng: &mut impl Rng) -> Self {
		Self::ALL[rng.random_range(0..Self::ALL.len())]
	}
}

/// Mesh plus the texture pair for one target shape.
#[derive(Debug, Clone, Copy)]
pub struct TargetVisual {
	pub mesh: MeshHandle,
	pub idle: TextureHandle,
	pub selected: TextureHandle,
}

/// Per-shape visuals, indexed by [`TargetShape`].
#[derive(Debug, Clone)]
pub struct TargetAssets {
	pub icosahedron: TargetVisual,
	pub quad_sphere: TargetVisual,
	pub tri_sphere: TargetVisual,
}
impl Index<TargetShape> for TargetAssets {
	type Output = TargetVisual;

	fn index(&self, shape: TargetShape) -> &TargetVisual {
		match shape {
			TargetShape::Icosahedron => &self.icosahedron,
			TargetShape::QuadSphere => &self.quad_sphere,
			TargetShape::TriSphere => &self.tri_sphere,
		}
	}
}

/// The one interactive object. Its model transform is a pure translation;
/// scale is applied downstream by the projector.
#[derive(Debug, Clone)]
pub struct TargetState {
	pub shape: TargetShape,
	pub position: Vec3,
	pub scale: f32,
}
impl TargetState {
	pub fn model_transform(&self) -> Matrix4x4 {
		Matrix4x4::from_translation(self.position)
	}
}

/// Mesh/texture handles for the stock demo scene.
#[derive(Debug, Clone)]
pub struct SceneAssets {
	pub room: (MeshHandle, TextureHandle),
	pub dog: (MeshHandle, TextureHandle),
	pub cat: (MeshHandle, TextureHandle),
	pub sky: (MeshHandle, TextureHandle),
	pub targets: TargetAssets,
}

/// All per-object placement and animation state, owned by the frame loop and
/// advanced exactly once per frame.
#[derive(Debug, Clone)]
pub struct SceneState {
	pub floor_height: f32,
	pub spin_mode: SpinMode,
	pub bounds: PlacementBounds,
	pub props: Vec<Prop>,
	pub target: TargetState,
	pub target_assets: TargetAssets,
}

impl SceneState {
	pub fn new(target_assets: TargetAssets, initial_shape: TargetShape) -> Self {
		SceneState {
			floor_height: DEFAULT_FLOOR_HEIGHT,
			spin_mode: SpinMode::default(),
			bounds: PlacementBounds::default(),
			props: Vec::new(),
			target: TargetState {
				shape: initial_shape,
				position: INITIAL_TARGET_POSITION,
				scale: TARGET_SCALE,
			},
			target_assets,
		}
	}

	/// The stock scene: a room, two floor animals that follow the head, a
	/// sky sphere, and the target.
	pub fn demo(assets: SceneAssets, rng: &mut impl Rng) -> Self {
		let floor = DEFAULT_FLOOR_HEIGHT;
		let mut scene = SceneState::new(assets.targets, TargetShape::random(rng));
		scene.props = vec![
			Prop::new("room", assets.room.0, assets.room.1),
			Prop::new("dog", assets.dog.0, assets.dog.1)
				.head_anchored(vec3(0.0, floor + 1.66, -3.0))
				.at(vec3(1.0, floor - 0.01, 1.0 - MAX_TARGET_DISTANCE))
				.with_scale(0.025)
				.spinning(DEFAULT_SPIN_RATE),
			Prop::new("cat", assets.cat.0, assets.cat.1)
				.head_anchored(vec3(-1.7, floor + 1.66, -3.0))
				.at(vec3(1.0, floor, 1.0 - MAX_TARGET_DISTANCE))
				.with_scale(0.025)
				.spinning(DEFAULT_SPIN_RATE),
			Prop::new("sky", assets.sky.0, assets.sky.1)
				.head_anchored(vec3(1.0, 2.0, -1.0))
				.at(vec3(1.0, 1.5, MAX_TARGET_DISTANCE))
				.with_scale(0.55)
				.spinning(DEFAULT_SPIN_RATE),
		];
		scene
	}

	/// Folds the floor offset into the world-to-head pose, yielding the
	/// frame's head view. Applied once per frame before any per-object work.
	pub fn with_floor_offset(&self, pose: &Matrix4x4) -> Matrix4x4 {
		*pose * Matrix4x4::from_translation(vec3(0.0, self.floor_height, 0.0))
	}

	/// Advances every animated prop's spin phase. `dt_seconds` only matters
	/// in [`SpinMode::DegreesPerSecond`].
	pub fn animate(&mut self, dt_seconds: f32) {
		for prop in &mut self.props {
			let Some(rate) = prop.spin_rate else { continue };
			prop.spin_deg += match self.spin_mode {
				SpinMode::PerFrame => rate,
				SpinMode::DegreesPerSecond => rate * dt_seconds,
			};
		}
	}

	/// Re-rolls the target: a fresh shape and a uniformly random spot on a
	/// horizontal ring around the user. The resulting model transform is a
	/// pure translation; nothing of the old placement survives.
	pub fn retarget(&mut self, rng: &mut impl Rng) {
		self.target.shape = TargetShape::random(rng);
		let angle = rng.random_range(-PI..PI);
		let distance = rng.random_range(self.bounds.min_distance..self.bounds.max_distance);
		let height = rng.random_range(self.bounds.min_height..self.bounds.max_height);
		self.target.position = vec3(angle.cos() * distance, height, angle.sin() * distance);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn test_assets() -> TargetAssets {
		let visual = |n: u32| TargetVisual {
			mesh: MeshHandle(n),
			idle: TextureHandle(n * 10),
			selected: TextureHandle(n * 10 + 1),
		};
		TargetAssets {
			icosahedron: visual(1),
			quad_sphere: visual(2),
			tri_sphere: visual(3),
		}
	}

	#[test]
	fn retarget_stays_inside_the_ring_and_covers_all_angles() {
		let mut scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		let mut rng = StdRng::seed_from_u64(7);
		let mut angle_bins = [0u32; 8];
		for _ in 0..10_000 {
			scene.retarget(&mut rng);
			let p = scene.target.position;
			let horizontal = p.x.hypot(p.z);
			assert!(
				horizontal >= MIN_TARGET_DISTANCE - 1e-4
					&& horizontal <= MAX_TARGET_DISTANCE + 1e-4,
				"distance {horizontal} out of bounds"
			);
			assert!(
				(MIN_TARGET_HEIGHT..=MAX_TARGET_HEIGHT).contains(&p.y),
				"height {} out of bounds",
				p.y
			);
			let angle = p.z.atan2(p.x);
			let bin = (((angle + PI) / (2.0 * PI) * 8.0) as usize).min(7);
			angle_bins[bin] += 1;
		}
		for (bin, count) in angle_bins.iter().enumerate() {
			assert!(*count > 0, "angle bin {bin} never hit");
		}
	}

	#[test]
	fn demo_scene_has_the_stock_layout() {
		let assets = SceneAssets {
			room: (MeshHandle(100), TextureHandle(100)),
			dog: (MeshHandle(101), TextureHandle(101)),
			cat: (MeshHandle(102), TextureHandle(102)),
			sky: (MeshHandle(103), TextureHandle(103)),
			targets: test_assets(),
		};
		let mut rng = StdRng::seed_from_u64(5);
		let scene = SceneState::demo(assets, &mut rng);

		let room = &scene.props[0];
		assert_eq!(room.anchor, Anchor::World);
		assert_eq!(room.model_transform(), Matrix4x4::IDENTITY);
		assert_eq!(room.scale, 1.0);
		assert!(room.spin_rate.is_none());

		for prop in &scene.props[1..] {
			assert!(matches!(prop.anchor, Anchor::Head(_)), "{} is world-fixed", prop.label);
			assert_eq!(prop.spin_rate, Some(DEFAULT_SPIN_RATE));
		}
		assert_eq!(scene.target.position, INITIAL_TARGET_POSITION);
		assert_eq!(scene.target.scale, TARGET_SCALE);
	}

	#[test]
	fn retarget_produces_a_pure_translation() {
		let mut scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		let mut rng = StdRng::seed_from_u64(1);
		scene.retarget(&mut rng);
		let model = scene.target.model_transform();
		let expected = Matrix4x4::from_translation(scene.target.position);
		assert_eq!(model, expected);
	}

	#[test]
	fn retarget_rolls_every_shape_eventually() {
		let mut scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		let mut rng = StdRng::seed_from_u64(3);
		let mut seen = [false; 3];
		for _ in 0..100 {
			scene.retarget(&mut rng);
			seen[TargetShape::ALL
				.iter()
				.position(|s| *s == scene.target.shape)
				.unwrap()] = true;
		}
		assert_eq!(seen, [true; 3]);
	}

	#[test]
	fn spin_composes_with_placement() {
		let prop = {
			let mut p = Prop::new("spinner", MeshHandle(0), TextureHandle(0))
				.at(vec3(1.0, 2.0, 3.0))
				.spinning(DEFAULT_SPIN_RATE);
			p.spin_deg = 90.0;
			p
		};
		let model = prop.model_transform();
		// Translation survives the spin.
		assert!((model.transform_point3(Vec3::ZERO) - vec3(1.0, 2.0, 3.0)).length() < 1e-5);
		// And the rotation still happens, around the prop's own origin.
		let p = model.transform_point3(vec3(0.0, 0.0, 1.0));
		assert!((p - vec3(2.0, 2.0, 3.0)).length() < 1e-5, "got {p}");
	}

	#[test]
	fn per_frame_spin_ignores_dt() {
		let mut scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		scene.props = vec![
			Prop::new("spinner", MeshHandle(0), TextureHandle(0)).spinning(DEFAULT_SPIN_RATE),
			Prop::new("static", MeshHandle(1), TextureHandle(1)),
		];
		scene.animate(100.0);
		scene.animate(0.0);
		assert!((scene.props[0].spin_deg() - 2.0 * DEFAULT_SPIN_RATE).abs() < 1e-6);
		assert_eq!(scene.props[1].spin_deg(), 0.0);
	}

	#[test]
	fn per_second_spin_scales_with_dt() {
		let mut scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		scene.spin_mode = SpinMode::DegreesPerSecond;
		scene.props = vec![Prop::new("spinner", MeshHandle(0), TextureHandle(0)).spinning(42.0)];
		scene.animate(0.5);
		assert!((scene.props[0].spin_deg() - 21.0).abs() < 1e-5);
	}

	#[test]
	fn floor_offset_folds_below_the_head() {
		let scene = SceneState::new(test_assets(), TargetShape::Icosahedron);
		let head_view = scene.with_floor_offset(&Matrix4x4::IDENTITY);
		let origin = head_view.transform_point3(Vec3::ZERO);
		assert!((origin - vec3(0.0, DEFAULT_FLOOR_HEIGHT, 0.0)).length() < 1e-6);
	}
}
