use crate::core::error::{Result, ViewerError};
use glam::{Quat, Vec3, Vec4};
use std::ops::Mul;

/// 4x4 homogeneous transform, row-major with the translation in column 3.
///
/// Column-vector convention throughout: `A * B` applies B first, then A, and
/// `M * v` treats `v` as a column. Every constructor produces an affine
/// matrix; projective terms only enter through [`Matrix4x4::from_gl_array`]
/// when the lens backend hands over a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
	pub m: [[f32; 4]; 4],
}

impl Matrix4x4 {
	pub const IDENTITY: Self = Matrix4x4 {
		m: [
			[1.0, 0.0, 0.0, 0.0],
			[0.0, 1.0, 0.0, 0.0],
			[0.0, 0.0, 1.0, 0.0],
			[0.0, 0.0, 0.0, 1.0],
		],
	};

	pub fn from_translation(v: Vec3) -> Self {
		let mut out = Self::IDENTITY;
		out.m[0][3] = v.x;
		out.m[1][3] = v.y;
		out.m[2][3] = v.z;
		out
	}

	/// Rotation from a unit quaternion.
	pub fn from_quat(q: Quat) -> Self {
		let (x, y, z, w) = (q.x, q.y, q.z, q.w);
		let mut out = Self::IDENTITY;
		out.m[0][0] = 1.0 - 2.0 * (y * y + z * z);
		out.m[0][1] = 2.0 * (x * y - z * w);
		out.m[0][2] = 2.0 * (x * z + y * w);
		out.m[1][0] = 2.0 * (x * y + z * w);
		out.m[1][1] = 1.0 - 2.0 * (x * x + z * z);
		out.m[1][2] = 2.0 * (y * z - x * w);
		out.m[2][0] = 2.0 * (x * z - y * w);
		out.m[2][1] = 2.0 * (y * z + x * w);
		out.m[2][2] = 1.0 - 2.0 * (x * x + y * y);
		out
	}

	/// Rotation of `angle_deg` degrees around `axis`.
	///
	/// The three cardinal axes take a closed-form shortcut; any other axis is
	/// normalized and goes through the general axis-angle formula. A
	/// degenerate (near-zero or non-finite) axis is rejected rather than
	/// letting the normalization produce NaNs.
	pub fn from_axis_angle(angle_deg: f32, axis: Vec3) -> Result<Self> {
		if !angle_deg.is_finite() {
			return Err(ViewerError::InvalidArgument("non-finite rotation angle"));
		}
		if !axis.is_finite() || axis.length_squared() < 1e-12 {
			return Err(ViewerError::InvalidArgument("degenerate rotation axis"));
		}
		Ok(if axis == Vec3::X {
			Self::from_rotation_x(angle_deg)
		} else if axis == Vec3::Y {
			Self::from_rotation_y(angle_deg)
		} else if axis == Vec3::Z {
			Self::from_rotation_z(angle_deg)
		} else {
			Self::general_axis_angle(angle_deg.to_radians(), axis.normalize())
		})
	}

	// Cardinal-axis closed forms. Angles in degrees and must be finite.
	pub fn from_rotation_x(angle_deg: f32) -> Self {
		let (s, c) = angle_deg.to_radians().sin_cos();
		let mut out = Self::IDENTITY;
		out.m[1][1] = c;
		out.m[1][2] = -s;
		out.m[2][1] = s;
		out.m[2][2] = c;
		out
	}
	pub fn from_rotation_y(angle_deg: f32) -> Self {
		let (s, c) = angle_deg.to_radians().sin_cos();
		let mut out = Self::IDENTITY;
		out.m[0][0] = c;
		out.m[0][2] = s;
		out.m[2][0] = -s;
		out.m[2][2] = c;
		out
	}
	pub fn from_rotation_z(angle_deg: f32) -> Self {
		let (s, c) = angle_deg.to_radians().sin_cos();
		let mut out = Self::IDENTITY;
		out.m[0][0] = c;
		out.m[0][1] = -s;
		out.m[1][0] = s;
		out.m[1][1] = c;
		out
	}

	// Rodrigues' formula; `axis` must already be normalized.
	fn general_axis_angle(rad: f32, axis: Vec3) -> Self {
		let (s, c) = rad.sin_cos();
		let nc = 1.0 - c;
		let (x, y, z) = (axis.x, axis.y, axis.z);
		let xy = x * y;
		let yz = y * z;
		let zx = z * x;
		let mut out = Self::IDENTITY;
		out.m[0][0] = x * x * nc + c;
		out.m[0][1] = xy * nc - z * s;
		out.m[0][2] = zx * nc + y * s;
		out.m[1][0] = xy * nc + z * s;
		out.m[1][1] = y * y * nc + c;
		out.m[1][2] = yz * nc - x * s;
		out.m[2][0] = zx * nc - y * s;
		out.m[2][1] = yz * nc + x * s;
		out.m[2][2] = z * z * nc + c;
		out
	}

	/// Uniform scale of the upper-left 3x3 block. Translation column and
	/// bottom row pass through untouched.
	pub fn scaled(self, scale: f32) -> Self {
		self.scaled_axes(Vec3::splat(scale))
	}

	/// Per-axis scale of the upper-left 3x3 block, equivalent to
	/// right-multiplying the linear part by `diag(scale)`.
	pub fn scaled_axes(self, scale: Vec3) -> Self {
		let mut out = self;
		for row in &mut out.m[..3] {
			row[0] *= scale.x;
			row[1] *= scale.y;
			row[2] *= scale.z;
		}
		out
	}

	/// Applies the full homogeneous transform to a point (w = 1), without a
	/// perspective divide.
	pub fn transform_point3(&self, p: Vec3) -> Vec3 {
		let v = *self * Vec4::new(p.x, p.y, p.z, 1.0);
		v.truncate()
	}

	/// Applies only the linear part to a direction (w = 0).
	pub fn transform_vector3(&self, v: Vec3) -> Vec3 {
		let v = *self * Vec4::new(v.x, v.y, v.z, 0.0);
		v.truncate()
	}

	/// Reads a column-major GL float array (what the lens backend and GL
	/// uniform uploads speak) into the row-major layout.
	pub fn from_gl_array(a: &[f32; 16]) -> Self {
		let mut out = Self::IDENTITY;
		for (i, row) in out.m.iter_mut().enumerate() {
			for (j, cell) in row.iter_mut().enumerate() {
				*cell = a[j * 4 + i];
			}
		}
		out
	}

	pub fn to_gl_array(&self) -> [f32; 16] {
		let mut out = [0.0; 16];
		for (i, row) in self.m.iter().enumerate() {
			for (j, cell) in row.iter().enumerate() {
				out[j * 4 + i] = *cell;
			}
		}
		out
	}
}

impl Default for Matrix4x4 {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Mul for Matrix4x4 {
	type Output = Matrix4x4;

	fn mul(self, rhs: Matrix4x4) -> Matrix4x4 {
		let mut out = Matrix4x4 { m: [[0.0; 4]; 4] };
		for i in 0..4 {
			for j in 0..4 {
				out.m[i][j] = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
			}
		}
		out
	}
}

impl Mul<Vec4> for Matrix4x4 {
	type Output = Vec4;

	fn mul(self, v: Vec4) -> Vec4 {
		Vec4::new(
			self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z + self.m[0][3] * v.w,
			self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z + self.m[1][3] * v.w,
			self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z + self.m[2][3] * v.w,
			self.m[3][0] * v.x + self.m[3][1] * v.y + self.m[3][2] * v.z + self.m[3][3] * v.w,
		)
	}
}
