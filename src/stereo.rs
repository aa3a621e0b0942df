use crate::math::Matrix4x4;
use crate::platform::{MeshHandle, Renderer, TextureHandle};
use crate::scene::{Anchor, SceneState};
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
	Left,
	Right,
}
impl Eye {
	pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

	pub const fn index(self) -> usize {
		match self {
			Eye::Left => 0,
			Eye::Right => 1,
		}
	}
}

/// One eye's fixed offset from the head plus its projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeFrame {
	pub eye_from_head: Matrix4x4,
	pub projection: Matrix4x4,
}

/// Both eyes' frames. Only valid as a pair: the lens backend rebuilds the
/// whole rig whenever the screen size or device parameters change.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoRig {
	eyes: [EyeFrame; 2],
}
impl StereoRig {
	pub fn new(left: EyeFrame, right: EyeFrame) -> Self {
		StereoRig {
			eyes: [left, right],
		}
	}
}
impl Index<Eye> for StereoRig {
	type Output = EyeFrame;

	fn index(&self, eye: Eye) -> &EyeFrame {
		&self.eyes[eye.index()]
	}
}

/// One object in one eye, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
	pub matrix: Matrix4x4,
	pub mesh: MeshHandle,
	pub texture: TextureHandle,
}

/// Per-eye draw lists for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameDraws {
	eyes: [Vec<DrawCall>; 2],
}
impl FrameDraws {
	pub fn for_eye(&self, eye: Eye) -> &[DrawCall] {
		&self.eyes[eye.index()]
	}
	pub fn submit(&self, renderer: &mut impl Renderer) {
		for eye in Eye::BOTH {
			renderer.draw(eye, self.for_eye(eye));
		}
	}
}

/// Composes the final draw matrix for every (object, eye) pair.
///
/// Per eye: `eye_view = eye_from_head * head_view`, with head-anchored props
/// folding their fixed offset into the head view first; then
/// `projection * scale(eye_view * model)`. Pure function of its inputs, so
/// identical inputs produce bit-identical output.
pub fn project(
	rig: &StereoRig,
	head_view: &Matrix4x4,
	scene: &SceneState,
	target_selected: bool,
) -> FrameDraws {
	let mut out = FrameDraws::default();
	for eye in Eye::BOTH {
		let frame = &rig[eye];
		let eye_view = frame.eye_from_head * *head_view;
		let calls = &mut out.eyes[eye.index()];

		for prop in &scene.props {
			let view = match prop.anchor {
				Anchor::World => eye_view,
				Anchor::Head(offset) => {
					frame.eye_from_head * (*head_view * Matrix4x4::from_translation(offset))
				}
			};
			let model_view = (view * prop.model_transform()).scaled(prop.scale);
			calls.push(DrawCall {
				matrix: frame.projection * model_view,
				mesh: prop.mesh,
				texture: prop.texture,
			});
		}

		let visual = scene.target_assets[scene.target.shape];
		let model_view = (eye_view * scene.target.model_transform()).scaled(scene.target.scale);
		calls.push(DrawCall {
			matrix: frame.projection * model_view,
			mesh: visual.mesh,
			texture: if target_selected {
				visual.selected
			} else {
				visual.idle
			},
		});
	}
	out
}
