use crate::LinkageError;
use std::f64::consts::TAU;

/// Assembly mode of the linkage, the sign `σ` of the closed-form root.
///
/// The mode is chosen once per run and selects the open or the crossed
/// configuration of the loop.
#[repr(i8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Assembly {
    /// σ = +1
    #[default]
    Plus = 1,
    /// σ = −1
    Minus = -1,
}

impl std::fmt::Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "σ=+1"),
            Self::Minus => write!(f, "σ=-1"),
        }
    }
}

impl TryFrom<i8> for Assembly {
    type Error = LinkageError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Plus),
            -1 => Ok(Self::Minus),
            _ => Err(LinkageError::Sign(value)),
        }
    }
}

impl Assembly {
    /// The sign as a number.
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Plus => 1.,
            Self::Minus => -1.,
        }
    }

    /// Switch to the other mode.
    pub fn switch(&mut self) {
        *self = match self {
            Self::Plus => Self::Minus,
            Self::Minus => Self::Plus,
        };
    }
}

/// Input angle range over which the loop can be assembled.
///
/// Ranges are absolute crank angles `[start, end]` in radians, walked
/// counterclockwise from `start`.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub enum AngleBound {
    /// The crank fully rotates
    Closed,
    /// One continuous range
    Open([f64; 2]),
    /// Two disjoint ranges, one per circuit
    Split([[f64; 2]; 2]),
    /// The loop never closes
    #[default]
    Invalid,
}

impl AngleBound {
    /// Tolerance of the range check (rad).
    pub const EPS: f64 = 1e-9;

    /// Name of the angle bound.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Closed => "Full rotation",
            Self::Open(_) => "Limited rotation",
            Self::Split(_) => "Limited rotation on two circuits",
            Self::Invalid => "Invalid",
        }
    }

    /// Check angle bound from a planar loop `[r1, r2, r3, r4]` and the ground
    /// link angle `θ1`.
    ///
    /// The crank pivot distance `d = |r1·e(θ1) − r2·e(θ2)|` must stay between
    /// `|r3 − r4|` and `r3 + r4`.
    pub fn from_planar_loop(planar_loop: [f64; 4], theta1: f64) -> Self {
        if !LinkageTy::from_loop(planar_loop).is_valid() {
            return Self::Invalid;
        }
        let [r1, r2, r3, r4] = planar_loop;
        // Crank angle relative to the ground link where d = l
        let rel = |l: f64| ((r1 * r1 + r2 * r2 - l * l) / (2. * r1 * r2)).clamp(-1., 1.).acos();
        let near = (r1 - r2).abs() >= (r3 - r4).abs();
        let far = r1 + r2 <= r3 + r4;
        match (far, near) {
            (true, true) => Self::Closed,
            (true, false) => {
                let a = rel(r3 - r4);
                Self::Open([theta1 + a, theta1 + TAU - a])
            }
            (false, true) => {
                let a = rel(r3 + r4);
                Self::Open([theta1 - a, theta1 + a])
            }
            (false, false) => {
                let a1 = rel(r3 - r4);
                let a2 = rel(r3 + r4);
                Self::Split([
                    [theta1 + a1, theta1 + a2],
                    [theta1 + TAU - a2, theta1 + TAU - a1],
                ])
            }
        }
    }

    /// Return true if the crank angle lies in the bound.
    pub fn contains(&self, theta2: f64) -> bool {
        let in_range = |[start, end]: [f64; 2]| {
            let span = (end - start).rem_euclid(TAU);
            (theta2 - start + Self::EPS).rem_euclid(TAU) <= span + 2. * Self::EPS
        };
        match *self {
            Self::Closed => true,
            Self::Open(r) => in_range(r),
            Self::Split([r1, r2]) => in_range(r1) || in_range(r2),
            Self::Invalid => false,
        }
    }

    /// Return true if the crank fully rotates.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Check if the data is valid.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// Type of the four-bar linkage.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[allow(clippy::upper_case_acronyms)]
pub enum LinkageTy {
    /// Grashof double crank (Drag-link)
    GCCC,
    /// Grashof crank rocker
    GCRR,
    /// Grashof double rocker
    GRCR,
    /// Grashof rocker crank
    GRRC,
    /// Non-Grashof triple rocker (ground link is the longest)
    RRR1,
    /// Non-Grashof triple rocker (crank link is the longest)
    RRR2,
    /// Non-Grashof triple rocker (coupler link is the longest)
    RRR3,
    /// Non-Grashof triple rocker (output link is the longest)
    RRR4,
    /// The longest link exceeds the sum of the others
    Invalid,
}

impl LinkageTy {
    /// Detect from the loop `[r1, r2, r3, r4]`.
    pub fn from_loop(planar_loop: [f64; 4]) -> Self {
        let mut sorted = planar_loop;
        sorted.sort_unstable_by(f64::total_cmp);
        let [s, p, q, l] = sorted;
        if l > s + p + q {
            return Self::Invalid;
        }
        // The position of a link in the loop, searched from the ground link
        let pos = |d: f64| planar_loop.iter().position(|&x| x == d).unwrap_or(0);
        if s + l <= p + q {
            [Self::GCCC, Self::GCRR, Self::GRCR, Self::GRRC][pos(s)]
        } else {
            [Self::RRR1, Self::RRR2, Self::RRR3, Self::RRR4][pos(l)]
        }
    }

    /// Name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GCCC => "Grashof double crank (Drag-link, GCCC)",
            Self::GCRR => "Grashof crank rocker (GCRR)",
            Self::GRCR => "Grashof double rocker (GRCR)",
            Self::GRRC => "Grashof rocker crank (GRRC)",
            Self::RRR1 => "Non-Grashof triple rocker (RRR1)",
            Self::RRR2 => "Non-Grashof triple rocker (RRR2)",
            Self::RRR3 => "Non-Grashof triple rocker (RRR3)",
            Self::RRR4 => "Non-Grashof triple rocker (RRR4)",
            Self::Invalid => "Invalid",
        }
    }

    /// Check if the type is valid.
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Return true if the type is Grashof linkage.
    pub const fn is_grashof(&self) -> bool {
        matches!(self, Self::GCCC | Self::GCRR | Self::GRCR | Self::GRRC)
    }

    /// Return true if the crank (`r2`) can fully rotate.
    pub const fn is_crank_rotatable(&self) -> bool {
        matches!(self, Self::GCCC | Self::GCRR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn grashof_types() {
        use LinkageTy::*;
        assert_eq!(LinkageTy::from_loop([1., 2., 3.5, 4.]), GCCC);
        assert_eq!(LinkageTy::from_loop([4., 1., 3.5, 3.]), GCRR);
        assert_eq!(LinkageTy::from_loop([3., 4., 1., 3.5]), GRCR);
        assert_eq!(LinkageTy::from_loop([3., 3.5, 4., 1.]), GRRC);
        assert_eq!(LinkageTy::from_loop([2., 2., 1., 1.5]), GRCR);
        assert_eq!(LinkageTy::from_loop([5., 2., 3., 3.5]), RRR1);
        assert_eq!(LinkageTy::from_loop([1., 7., 2., 3.]), Invalid);
        assert!(GCCC.is_crank_rotatable());
        assert!(!RRR1.is_grashof());
    }

    #[test]
    fn angle_bounds() {
        let closed = AngleBound::from_planar_loop([1., 2., 3.5, 4.], 0.);
        assert_eq!(closed, AngleBound::Closed);
        assert!(closed.is_closed() && closed.contains(PI));
        assert_eq!(AngleBound::from_planar_loop([1., 7., 2., 3.], 0.), AngleBound::Invalid);
        let bound = AngleBound::from_planar_loop([2., 2., 1., 1.5], 0.);
        let AngleBound::Split([c1, c2]) = bound else {
            panic!("expect two ranges, got {bound:?}");
        };
        assert!(c1[0] > 0. && c1[1] < PI);
        assert!(c2[0] > PI && c2[1] < 2. * PI);
        assert!(!bound.is_closed() && bound.is_valid());
        assert!(bound.contains(60f64.to_radians()));
        assert!(bound.contains(-60f64.to_radians()));
        assert!(!bound.contains(0.));
        assert!(!bound.contains(PI));
    }

    #[test]
    fn assembly_sign() {
        let mut s = Assembly::try_from(-1).unwrap();
        assert_eq!(s.sign(), -1.);
        s.switch();
        assert_eq!(s, Assembly::Plus);
        assert_eq!(Assembly::try_from(0), Err(LinkageError::Sign(0)));
    }
}
