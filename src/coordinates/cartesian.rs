//! # Cartesian Coordinate Module
//!
//! Three-dimensional Cartesian vectors used throughout the crate for
//! satellite positions (kilometers) and velocities (kilometers/second).
//!
//! ## Design Philosophy
//!
//! `Cartesian3` is a plain value type with full `f64` precision and no
//! hidden normalization: what you store is what you get back. It is the
//! common currency between the propagator boundary, the frame
//! transformation engine, and the trajectory interpolator.
//!
//! ## Units
//!
//! Components are dimensionless as far as the type is concerned. The crate
//! convention (documented on every API that produces one) is kilometers
//! for positions and kilometers/second for velocities; nothing is enforced
//! internally.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Three-dimensional Cartesian vector
///
/// Represents a position, velocity, or direction in 3D space. Frame
/// transformations treat values of this type as column vectors multiplied
/// by 3x3 rotation matrices.
///
/// # Examples
///
/// ```rust
/// use satpass::coordinates::Cartesian3;
///
/// let r = Cartesian3::new(6378.0, 0.0, 0.0);
/// assert_eq!(r.magnitude(), 6378.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartesian3 {
    /// X-component
    pub x: f64,
    /// Y-component
    pub y: f64,
    /// Z-component
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Cartesian3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Calculates the magnitude (Euclidean length) of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Calculates the dot product with another vector
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculates the cross product with another vector
    ///
    /// Used by the frame engine for the rotating-frame velocity term
    /// `omega x r`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use satpass::coordinates::Cartesian3;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
    /// let z_axis = x_axis.cross(&y_axis);
    /// assert!((z_axis.z - 1.0).abs() < 1e-15);
    /// ```
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Applies a 3x3 matrix to this vector, returning the transformed vector
    ///
    /// This is the single place where rotation matrices meet vectors, so
    /// every frame transformation funnels through it.
    pub fn transform(&self, matrix: &Matrix3<f64>) -> Cartesian3 {
        Cartesian3::from_vector3(matrix * self.to_vector3())
    }

    /// Converts to nalgebra `Vector3` for linear algebra operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from nalgebra `Vector3`
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

// Arithmetic operations for convenience
impl std::ops::Add for Cartesian3 {
    type Output = Cartesian3;

    fn add(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl std::ops::Neg for Cartesian3 {
    type Output = Cartesian3;

    fn neg(self) -> Cartesian3 {
        Cartesian3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
