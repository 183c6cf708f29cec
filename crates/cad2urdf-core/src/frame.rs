//! Frame conversion between homogeneous transforms and URDF origin strings
//!
//! URDF describes an origin as two space separated triples: the translation in
//! meters (`xyz`) and the rotation as roll/pitch/yaw in radians (`rpy`), where
//! the rotation matrix is `Rz(yaw) * Ry(pitch) * Rx(roll)`. Every value is
//! rounded to six decimal places before it is printed.

use nalgebra::{Matrix3, Matrix4, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Divisor converting host centimeters to URDF meters
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// Number of decimal places kept in every serialized value
pub const DECIMAL_PLACES: i32 = 6;

/// Below this cos(pitch) the rotation is treated as gimbal locked
const GIMBAL_EPSILON: f64 = 1e-9;

/// A 4x4 homogeneous transform (rotation + translation, bottom row `0 0 0 1`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Matrix4<f64>);

impl Transform {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    /// Build from a row-major 4x4 array, the layout hosts usually report
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_parts(Matrix3::identity(), Vector3::new(x, y, z))
    }

    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self(matrix)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.0.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Express this transform in the frame of `parent` (`parent⁻¹ * self`).
    ///
    /// Returns `None` when `parent` is singular.
    pub fn relative_to(&self, parent: &Transform) -> Option<Transform> {
        parent.0.try_inverse().map(|inverse| Self(inverse * self.0))
    }

    /// Decompose the rotation into `[roll, pitch, yaw]` radians.
    ///
    /// At gimbal lock (pitch = ±π/2) yaw is fixed to zero and roll carries the
    /// remaining rotation about the locked axis.
    pub fn rpy_angles(&self) -> [f64; 3] {
        let r = self.rotation();
        let cos_pitch = r[(0, 0)].hypot(r[(1, 0)]);

        if cos_pitch > GIMBAL_EPSILON {
            let roll = r[(2, 1)].atan2(r[(2, 2)]);
            let pitch = (-r[(2, 0)]).atan2(cos_pitch);
            let yaw = r[(1, 0)].atan2(r[(0, 0)]);
            [roll, pitch, yaw]
        } else if r[(2, 0)] < 0.0 {
            [r[(0, 1)].atan2(r[(1, 1)]), FRAC_PI_2, 0.0]
        } else {
            [(-r[(0, 1)]).atan2(r[(1, 1)]), -FRAC_PI_2, 0.0]
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Translation of `transform` divided by `unit_divisor`, as `"x y z"`
pub fn xyz(transform: &Transform, unit_divisor: f64) -> String {
    let t = transform.translation() / unit_divisor;
    format_triple([t.x, t.y, t.z])
}

/// Rotation of `transform` as `"roll pitch yaw"` radians
pub fn rpy(transform: &Transform) -> String {
    format_triple(transform.rpy_angles())
}

/// Round to [`DECIMAL_PLACES`] decimal places
pub fn round6(value: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES);
    (value * scale).round() / scale
}

/// Round and print a value in plain decimal notation.
///
/// At least one fractional digit is kept (`2.0`, `-1.0`) and negative zero
/// prints as `0.0`.
pub fn format_number(value: f64) -> String {
    let mut rounded = round6(value);
    if rounded == 0.0 {
        rounded = 0.0;
    }

    let mut text = format!("{:.*}", DECIMAL_PLACES as usize, rounded);
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    text
}

/// Format three values separated by single spaces
pub fn format_triple(values: [f64; 3]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}
