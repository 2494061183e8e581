//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

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

/// Clamp a value between a minimum and maximum.
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

/// Convert cartesian coordinates into polar (radius, angle) form.
///
/// The angle is measured from the positive x axis and lies in [-pi, pi].
pub fn to_polar<T>(x: T, y: T) -> (T, T)
where
    T: Float
{
    ((x.powi(2) + y.powi(2)).sqrt(), y.atan2(x))
}

/// Wrap an angle into the range [-pi, pi].
pub fn wrap_to_pi<T>(angle: T) -> T
where
    T: Float + std::ops::Rem
{
    let pi_t = T::from(std::f64::consts::PI).unwrap();
    let tau_t = T::from(std::f64::consts::TAU).unwrap();

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    wrapped
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::Sub + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[0f64, 0f64], &[3f64, 4f64]), Some(5f64));
        assert_eq!(norm(&[1f64], &[1f64, 2f64]), None);
    }

    #[test]
    fn test_to_polar() {
        let (rho, theta) = to_polar(3f64, 0f64);
        assert!((rho - 3f64).abs() < 1e-12);
        assert!(theta.abs() < 1e-12);

        let (rho, theta) = to_polar(0f64, -2f64);
        assert!((rho - 2f64).abs() < 1e-12);
        assert!((theta + PI / 2f64).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_to_pi() {
        assert!((wrap_to_pi(0f64)).abs() < 1e-12);
        assert!((wrap_to_pi(3f64 * PI).abs() - PI).abs() < 1e-9);
        assert!((wrap_to_pi(-3f64 * PI).abs() - PI).abs() < 1e-9);
        assert!((wrap_to_pi(5f64 * PI / 2f64) - PI / 2f64).abs() < 1e-9);
        assert!((wrap_to_pi(PI / 4f64) - PI / 4f64).abs() < 1e-12);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&2f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-2f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5f64);
    }
}
