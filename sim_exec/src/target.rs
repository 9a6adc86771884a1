//! Circular navigation target
//!
//! The target is the goal region the controller drives the vehicle into. It
//! is immutable once constructed and only answers geometric queries.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A circular target region defined by its centre and radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleTarget {
    /// Centre of the target.
    ///
    /// Units: meters
    centre_m: Point2<f64>,

    /// Radius of the target, always non-negative.
    ///
    /// Units: meters
    radius_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when constructing a target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Target must be in the format 'x,y,radius', found {0} field(s)")]
    WrongFieldCount(usize),

    #[error("Could not parse '{0}' as a number")]
    InvalidValue(String),

    #[error("Target radius must be non-negative, found {0}")]
    NegativeRadius(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CircleTarget {
    /// Create a new target from a centre position and radius.
    ///
    /// A negative radius is rejected, a zero radius gives a point target.
    pub fn new(centre_m: Point2<f64>, radius_m: f64) -> Result<Self, TargetError> {
        if radius_m < 0.0 {
            return Err(TargetError::NegativeRadius(radius_m));
        }

        Ok(Self { centre_m, radius_m })
    }

    /// X coordinate of the target centre in meters.
    pub fn x_m(&self) -> f64 {
        self.centre_m[0]
    }

    /// Y coordinate of the target centre in meters.
    pub fn y_m(&self) -> f64 {
        self.centre_m[1]
    }

    /// Radius of the target in meters.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Determine if the given point lies inside the target.
    ///
    /// Points exactly on the boundary count as inside.
    pub fn contains(&self, x_m: f64, y_m: f64) -> bool {
        self.distance_to_centre(x_m, y_m) <= self.radius_m
    }

    /// Get the distance between the given point and the target centre.
    pub fn distance_to_centre(&self, x_m: f64, y_m: f64) -> f64 {
        nalgebra::distance(&self.centre_m, &Point2::new(x_m, y_m))
    }

    /// Get the signed distance between the given point and the target
    /// boundary.
    ///
    /// Positive outside the target, negative inside, zero exactly on the
    /// boundary.
    pub fn boundary_distance(&self, x_m: f64, y_m: f64) -> f64 {
        self.distance_to_centre(x_m, y_m) - self.radius_m
    }
}

impl FromStr for CircleTarget {
    type Err = TargetError;

    /// Parse a target from a `"x,y,radius"` literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(',').collect();

        if fields.len() != 3 {
            return Err(TargetError::WrongFieldCount(fields.len()));
        }

        let mut values = [0f64; 3];
        for (i, field) in fields.iter().enumerate() {
            values[i] = field
                .trim()
                .parse()
                .map_err(|_| TargetError::InvalidValue(field.trim().to_string()))?;
        }

        CircleTarget::new(Point2::new(values[0], values[1]), values[2])
    }
}

impl Default for CircleTarget {
    /// The default target used when the user doesn't provide one.
    fn default() -> Self {
        Self {
            centre_m: Point2::new(10.0, 8.0),
            radius_m: 2.0,
        }
    }
}

impl fmt::Display for CircleTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "centre ({}, {}) m, radius {} m",
            self.x_m(),
            self.y_m(),
            self.radius_m
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let target: CircleTarget = "10,8,2".parse().unwrap();
        assert_eq!(target.x_m(), 10.0);
        assert_eq!(target.y_m(), 8.0);
        assert_eq!(target.radius_m(), 2.0);

        // Whitespace is tolerated
        let target: CircleTarget = " 1.5 , -2.25 , 0.5 ".parse().unwrap();
        assert_eq!(target.x_m(), 1.5);
        assert_eq!(target.y_m(), -2.25);
        assert_eq!(target.radius_m(), 0.5);
    }

    #[test]
    fn test_parse_invalid() {
        // Wrong arity
        assert!(matches!(
            "1,2".parse::<CircleTarget>(),
            Err(TargetError::WrongFieldCount(2))
        ));
        assert!(matches!(
            "1,2,3,4".parse::<CircleTarget>(),
            Err(TargetError::WrongFieldCount(4))
        ));

        // Non-numeric fields
        assert!(matches!(
            "a,b,c".parse::<CircleTarget>(),
            Err(TargetError::InvalidValue(_))
        ));

        // Negative radius
        assert!(matches!(
            "0,0,-1".parse::<CircleTarget>(),
            Err(TargetError::NegativeRadius(_))
        ));
    }

    #[test]
    fn test_geometry_queries() {
        let target = CircleTarget::new(Point2::new(3.0, 4.0), 2.0).unwrap();

        assert!(target.contains(3.0, 4.0));
        assert!(target.contains(3.0, 6.0));
        assert!(!target.contains(3.0, 6.1));

        assert_eq!(target.distance_to_centre(0.0, 0.0), 5.0);

        // Signed boundary distance: positive outside, negative inside, zero
        // on the boundary
        assert_eq!(target.boundary_distance(0.0, 0.0), 3.0);
        assert_eq!(target.boundary_distance(3.0, 4.0), -2.0);
        assert_eq!(target.boundary_distance(3.0, 6.0), 0.0);
    }

    #[test]
    fn test_zero_radius() {
        let target = CircleTarget::new(Point2::new(1.0, 1.0), 0.0).unwrap();
        assert!(target.contains(1.0, 1.0));
        assert!(!target.contains(1.0, 1.0001));
    }
}
