use thiserror::Error;

/// Failure of a single crank angle sample.
///
/// The sweep driver decides whether to abort on it or to record it in the
/// [`Trajectory`](crate::Trajectory) at the same index.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SolveError {
    /// The loop cannot be assembled at this crank angle.
    #[error("unreachable configuration at θ2 = {:.4}° (radicand {radicand:.3e})", .theta2.to_degrees())]
    Unreachable {
        /// Crank angle (rad)
        theta2: f64,
        /// Negative radicand of the position equation
        radicand: f64,
    },
    /// Both forms of the closed-form root vanish, the output angle is
    /// undetermined.
    #[error("degenerate configuration at θ2 = {:.4}°", .theta2.to_degrees())]
    Degenerate {
        /// Crank angle (rad)
        theta2: f64,
    },
    /// The Newton step cannot be solved.
    #[error("singular Jacobian at θ2 = {:.4}° (det {det:.3e})", .theta2.to_degrees())]
    SingularJacobian {
        /// Crank angle (rad)
        theta2: f64,
        /// Determinant of the Jacobian
        det: f64,
    },
    /// The iteration budget ran out before the residual tolerance was met.
    #[error(
        "no convergence at θ2 = {:.4}° after {iter} iterations (residual {residual:.3e})",
        .theta2.to_degrees()
    )]
    NonConvergence {
        /// Crank angle (rad)
        theta2: f64,
        /// Iterations spent
        iter: usize,
        /// Residual norm of the last iterate
        residual: f64,
    },
}

impl SolveError {
    /// The crank angle of the failed sample.
    pub const fn theta2(&self) -> f64 {
        match *self {
            Self::Unreachable { theta2, .. }
            | Self::Degenerate { theta2 }
            | Self::SingularJacobian { theta2, .. }
            | Self::NonConvergence { theta2, .. } => theta2,
        }
    }

    /// Short name of the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "unreachable",
            Self::Degenerate { .. } => "degenerate",
            Self::SingularJacobian { .. } => "singular-jacobian",
            Self::NonConvergence { .. } => "non-convergence",
        }
    }
}

/// Invalid linkage or sweep parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinkageError {
    /// Link lengths must be positive and finite.
    #[error("link length `{name}` must be positive and finite, got {value}")]
    Length {
        /// Field name
        name: &'static str,
        /// Given value
        value: f64,
    },
    /// Angles must be finite.
    #[error("angle `{name}` must be finite, got {value}")]
    Angle {
        /// Field name
        name: &'static str,
        /// Given value
        value: f64,
    },
    /// The assembly sign is not ±1.
    #[error("assembly sign must be +1 or -1, got {0}")]
    Sign(i8),
    /// The sweep range is empty or malformed.
    #[error("invalid sweep: {0}")]
    Sweep(String),
}
