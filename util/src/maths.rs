//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Return the euclidian norm (distance between) of two points.
///
/// If the points do not have the same number of dimentions then `None` is
/// returned.
pub fn norm<T>(point_0: &[T], point_1: &[T]) -> Option<T>
where
    T: Float + std::ops::AddAssign
{
    // Check that the dimentions match
    if point_0.len() != point_1.len() {
        return None;
    }

    // Sum all elements of the points
    let mut sum = T::from(0).unwrap();

    for i in 0..point_0.len() {
        sum += (point_0[i] - point_1[i]).powi(2);
    }

    // Return the squareroot of the sum
    Some(sum.sqrt())
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::AddAssign
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle into the range (-pi, pi].
///
/// The wrap is done with the two-argument arctangent of the angle's sine and
/// cosine, which is continuous over multiple turns and so avoids the
/// discontinuity artifacts a naive modulo would produce.
pub fn wrap_to_pi<T>(angle_rad: T) -> T
where
    T: Float
{
    angle_rad.sin().atan2(angle_rad.cos())
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_wrap_to_pi() {
        assert!((wrap_to_pi(0f64)).abs() < 1e-12);
        assert!((wrap_to_pi(PI / 2f64) - PI / 2f64).abs() < 1e-12);
        assert!((wrap_to_pi(-PI / 2f64) + PI / 2f64).abs() < 1e-12);

        // Values past pi wrap round to the negative side
        assert!((wrap_to_pi(PI + 0.5f64) - (-PI + 0.5f64)).abs() < 1e-12);
        assert!((wrap_to_pi(-PI - 0.5f64) - (PI - 0.5f64)).abs() < 1e-12);

        // Whole turns collapse to zero
        assert!(wrap_to_pi(3f64 * std::f64::consts::TAU).abs() < 1e-9);

        // Result is always within (-pi, pi]
        for i in -100..100 {
            let wrapped = wrap_to_pi(0.37f64 * i as f64);
            assert!(wrapped > -PI && wrapped <= PI);
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-5f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5f64);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[0f64, 0f64], &[3f64, 4f64]), Some(5f64));
        assert_eq!(norm(&[0f64], &[1f64, 2f64]), None);
    }
}
