//! Principal-axis rotation matrices
//!
//! All rotations in this crate use the frame-rotation (passive) sign
//! convention: `rot_z(theta)` expresses a vector's components in a frame
//! rotated by `theta` about +z, not a rotation of the vector itself. This
//! matches the convention of the sidereal and polar-motion matrices in
//! `framelib`, where `M.transpose()` is always the inverse transform.

use nalgebra::Matrix3;

/// Rotation matrix about the x axis by `angle` radians (frame rotation)
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation matrix about the y axis by `angle` radians (frame rotation)
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation matrix about the z axis by `angle` radians (frame rotation)
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Maximum absolute deviation of `M^T * M` from the identity
///
/// Every rotation matrix produced by the frame engine must keep this below
/// 1e-12; the graph tests enforce it.
pub fn orthogonality_defect(matrix: &Matrix3<f64>) -> f64 {
    let residual = matrix.transpose() * matrix - Matrix3::identity();
    residual.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rot_z_quarter_turn() {
        let r = rot_z(FRAC_PI_2);
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(v.y, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_transpose_is_inverse() {
        let mut rng = StdRng::seed_from_u64(7041957);
        for _ in 0..50 {
            let angle = rng.gen::<f64>() * 2.0 * PI - PI;
            for r in [rot_x(angle), rot_y(angle), rot_z(angle)] {
                let round_trip = r.transpose() * r;
                for i in 0..3 {
                    for j in 0..3 {
                        let expected = if i == j { 1.0 } else { 0.0 };
                        assert_relative_eq!(round_trip[(i, j)], expected, epsilon = 1e-14);
                    }
                }
            }
        }
    }

    #[test]
    fn test_orthogonality_defect() {
        assert!(orthogonality_defect(&rot_z(1.234)) < 1e-14);

        let skewed = rot_z(0.5) * 1.001;
        assert!(orthogonality_defect(&skewed) > 1e-4);
    }

    #[test]
    fn test_opposite_angles_compose_to_identity() {
        let composed = rot_z(0.7) * rot_z(-0.7);
        assert!(orthogonality_defect(&composed) < 1e-15);
        assert_relative_eq!(composed[(0, 0)], 1.0, epsilon = 1e-15);
        assert_relative_eq!(composed[(0, 1)], 0.0, epsilon = 1e-15);
    }
}
