//! Bicycle shape projection for rendering collaborators

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Point2, Vector2};

// Internal
use super::BikeModel;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The bicycle rendered as three line segments.
///
/// Purely a geometric projection of the current state, computed on demand
/// and never stored by the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BikeShape {
    /// Segment from the rear axle to the front axle.
    pub body: [Point2<f64>; 2],

    /// Rear wheel segment, centred on the rear axle and aligned with the
    /// body heading.
    pub rear_wheel: [Point2<f64>; 2],

    /// Front wheel segment, centred on the front axle and aligned with the
    /// body heading plus the steering angle.
    pub front_wheel: [Point2<f64>; 2],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BikeModel {
    /// Get the bicycle shape for the current state.
    pub fn shape(&self) -> BikeShape {
        let state = self.state;

        // Rear axle is the state's reference point
        let rear = Point2::new(state.x_m, state.y_m);

        // Front axle sits one body length ahead along the heading
        let front = rear
            + self.params.body_length_m
                * Vector2::new(state.heading_rad.cos(), state.heading_rad.sin());

        // Each wheel is a segment of half-length wheel_radius about its axle
        let rear_half = self.params.wheel_radius_m
            * Vector2::new(state.heading_rad.cos(), state.heading_rad.sin());

        let front_wheel_angle_rad = state.heading_rad + state.steering_rad;
        let front_half = self.params.wheel_radius_m
            * Vector2::new(front_wheel_angle_rad.cos(), front_wheel_angle_rad.sin());

        BikeShape {
            body: [rear, front],
            rear_wheel: [rear - rear_half, rear + rear_half],
            front_wheel: [front - front_half, front + front_half],
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::bike_model::Params;

    #[test]
    fn test_shape_at_origin() {
        let model = BikeModel::with_params(Params::default()).unwrap();
        let shape = model.shape();

        // Heading zero: body lies along +x from the origin
        assert_eq!(shape.body[0], Point2::new(0.0, 0.0));
        assert_eq!(shape.body[1], Point2::new(1.5, 0.0));

        // Wheels are wheel_radius either side of their axles
        assert_eq!(shape.rear_wheel[0], Point2::new(-0.25, 0.0));
        assert_eq!(shape.rear_wheel[1], Point2::new(0.25, 0.0));
        assert_eq!(shape.front_wheel[0], Point2::new(1.25, 0.0));
        assert_eq!(shape.front_wheel[1], Point2::new(1.75, 0.0));
    }

    #[test]
    fn test_front_wheel_follows_steering() {
        let mut model = BikeModel::with_params(Params::default()).unwrap();
        model.state.steering_rad = std::f64::consts::FRAC_PI_4;

        let shape = model.shape();

        // Rear wheel stays aligned with the body, front wheel rotates by the
        // steering angle about the front axle
        assert_eq!(shape.rear_wheel[1].y, 0.0);

        let half = 0.25 * std::f64::consts::FRAC_PI_4.sin();
        assert!((shape.front_wheel[1].y - half).abs() < 1e-12);
        assert!((shape.front_wheel[0].y + half).abs() < 1e-12);
    }
}
