//! Linkage parameters and the vector loop.
use crate::{AngleBound, Assembly, LinkageError, LinkageTy};
use nalgebra as na;
use std::f64::consts::{PI, TAU};

/// Wrap an angle into `(−π, π]`.
pub fn wrap_angle(a: f64) -> f64 {
    let a = (a + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a + TAU
    } else {
        a
    }
}

/// Signed shortest difference `a − b` of two angles, in `(−π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_angle(a - b)
}

/// Tracer point rigidly attached to the coupler.
///
/// Stored in polar form relative to joint A: the distance `r6 = |AE|` and the
/// angle `β` from the coupler line A→B to A→E.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Tracer {
    /// Distance from joint A to the tracer point
    pub r6: f64,
    /// Angle offset from the coupler line (rad)
    pub beta: f64,
}

impl Tracer {
    /// Create from the polar form.
    pub const fn new(r6: f64, beta: f64) -> Self {
        Self { r6, beta }
    }

    /// Create from the local coordinates `(u, v)` in the coupler frame, whose
    /// origin is joint A and x axis points to joint B.
    pub fn from_local(u: f64, v: f64) -> Self {
        Self { r6: u.hypot(v), beta: v.atan2(u) }
    }

    /// Local coordinates in the coupler frame.
    pub fn local(&self) -> [f64; 2] {
        let (s, c) = self.beta.sin_cos();
        [self.r6 * c, self.r6 * s]
    }
}

/// Solution of the loop at one crank angle.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Angles {
    /// Coupler link angle (rad)
    pub theta3: f64,
    /// Output link angle (rad)
    pub theta4: f64,
}

impl From<[f64; 2]> for Angles {
    fn from([theta3, theta4]: [f64; 2]) -> Self {
        Self { theta3, theta4 }
    }
}

impl From<na::Vector2<f64>> for Angles {
    fn from(v: na::Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Angles {
    /// Create a new instance.
    pub const fn new(theta3: f64, theta4: f64) -> Self {
        Self { theta3, theta4 }
    }

    /// Both angles wrapped into `(−π, π]`.
    pub fn wrapped(self) -> Self {
        Self::new(wrap_angle(self.theta3), wrap_angle(self.theta4))
    }

    /// Largest wrapped difference to another solution.
    pub fn dist(&self, rhs: &Self) -> f64 {
        angle_diff(self.theta3, rhs.theta3)
            .abs()
            .max(angle_diff(self.theta4, rhs.theta4).abs())
    }

    /// Return true if both angles are finite.
    pub fn is_finite(&self) -> bool {
        self.theta3.is_finite() && self.theta4.is_finite()
    }

    /// Angles in degrees.
    pub fn to_degrees(self) -> [f64; 2] {
        [self.theta3.to_degrees(), self.theta4.to_degrees()]
    }

    pub(crate) fn to_vector(self) -> na::Vector2<f64> {
        na::Vector2::new(self.theta3, self.theta4)
    }
}

/// Fixed parameters of a planar four-bar linkage.
///
/// # Parameters
///
/// + Ground link `r1`, from the crank pivot O_A to the output pivot O_B
/// + Crank (input) link `r2`
/// + Coupler link `r3`, from joint A to joint B
/// + Output link `r4`
/// + Ground link angle `theta1`
/// + Tracer point on the coupler `tracer`
/// + Assembly mode `sigma`
///
/// The crank pivot sits at the origin.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct Linkage {
    /// Length of the ground link
    pub r1: f64,
    /// Length of the crank link
    pub r2: f64,
    /// Length of the coupler link
    pub r3: f64,
    /// Length of the output link
    pub r4: f64,
    /// Angle of the ground link (rad)
    pub theta1: f64,
    /// Tracer point on the coupler
    pub tracer: Tracer,
    /// Assembly mode
    pub sigma: Assembly,
}

impl Default for Linkage {
    fn default() -> Self {
        Self::example()
    }
}

impl Linkage {
    /// Create a linkage from the loop `[r1, r2, r3, r4]` and the ground link
    /// angle, without tracer offset and with `σ = +1`.
    pub const fn new(planar_loop: [f64; 4], theta1: f64) -> Self {
        let [r1, r2, r3, r4] = planar_loop;
        Self {
            r1,
            r2,
            r3,
            r4,
            theta1,
            tracer: Tracer::new(0., 0.),
            sigma: Assembly::Plus,
        }
    }

    /// An example drag-link with the tracer point at local `(2, 1)`.
    pub fn example() -> Self {
        Self::new([1., 2., 3.5, 4.], 0.).with_tracer(Tracer::from_local(2., 1.))
    }

    /// Build with a tracer point.
    pub fn with_tracer(self, tracer: Tracer) -> Self {
        Self { tracer, ..self }
    }

    /// Build with an assembly mode.
    pub fn with_sigma(self, sigma: Assembly) -> Self {
        Self { sigma, ..self }
    }

    /// Check the parameters.
    pub fn validate(&self) -> Result<(), LinkageError> {
        let lengths = [("r1", self.r1), ("r2", self.r2), ("r3", self.r3), ("r4", self.r4)];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.) {
                return Err(LinkageError::Length { name, value });
            }
        }
        if !(self.tracer.r6.is_finite() && self.tracer.r6 >= 0.) {
            return Err(LinkageError::Length { name: "r6", value: self.tracer.r6 });
        }
        let angles = [("theta1", self.theta1), ("beta", self.tracer.beta)];
        for (name, value) in angles {
            if !value.is_finite() {
                return Err(LinkageError::Angle { name, value });
            }
        }
        Ok(())
    }

    /// Get the planar loop `[r1, r2, r3, r4]`.
    pub const fn planar_loop(&self) -> [f64; 4] {
        [self.r1, self.r2, self.r3, self.r4]
    }

    /// Return the type of this linkage.
    pub fn ty(&self) -> LinkageTy {
        LinkageTy::from_loop(self.planar_loop())
    }

    /// Input angle bounds of the linkage.
    pub fn angle_bound(&self) -> AngleBound {
        AngleBound::from_planar_loop(self.planar_loop(), self.theta1)
    }

    /// Position of the output pivot O_B.
    pub fn output_pivot(&self) -> na::Point2<f64> {
        let (s, c) = self.theta1.sin_cos();
        na::Point2::new(self.r1 * c, self.r1 * s)
    }

    /// Residual of the vector loop, `[x, y]`.
    ///
    /// ```text
    /// r2·e(θ2) + r3·e(θ3) − r4·e(θ4) − r1·e(θ1)
    /// ```
    ///
    /// Zero for an assembled configuration.
    pub fn residual(&self, theta2: f64, angles: Angles) -> [f64; 2] {
        let r = self.residual_vec(theta2, angles);
        [r.x, r.y]
    }

    pub(crate) fn residual_vec(&self, theta2: f64, angles: Angles) -> na::Vector2<f64> {
        let e = |a: f64| {
            let (s, c) = a.sin_cos();
            na::Vector2::new(c, s)
        };
        self.r2 * e(theta2) + self.r3 * e(angles.theta3)
            - self.r4 * e(angles.theta4)
            - self.r1 * e(self.theta1)
    }

    /// Jacobian of the residual with respect to `[θ3, θ4]`.
    ///
    /// The determinant is `r3·r4·sin(θ3 − θ4)`, singular when the coupler and
    /// the output link are collinear.
    pub fn jacobian(&self, angles: Angles) -> na::Matrix2<f64> {
        let (s3, c3) = angles.theta3.sin_cos();
        let (s4, c4) = angles.theta4.sin_cos();
        na::Matrix2::new(
            -self.r3 * s3, self.r4 * s4,
            self.r3 * c3, -self.r4 * c4,
        )
    }

    /// Return true if the solution closes the loop within `tol`.
    pub fn check(&self, theta2: f64, angles: Angles, tol: f64) -> bool {
        let norm = self.residual_vec(theta2, angles).norm();
        norm.is_finite() && norm < tol
    }
}
