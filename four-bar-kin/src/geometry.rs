use crate::{Angles, Linkage};
use nalgebra as na;

/// Joint that the position of B is derived from.
///
/// Both give the same point when the loop closes.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Anchor {
    /// `B = A + r3·e(θ3)`
    #[default]
    Coupler,
    /// `B = O_B + r4·e(θ4)`
    Output,
}

/// Moving joint positions of one configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pose {
    /// Crank joint A
    pub a: [f64; 2],
    /// Output joint B
    pub b: [f64; 2],
    /// Tracer point E
    pub e: [f64; 2],
}

fn angle(p: na::Point2<f64>, d: f64, a: f64) -> na::Point2<f64> {
    p + d * na::Vector2::new(a.cos(), a.sin())
}

impl Pose {
    /// Compute the joints from the crank angle and a loop solution.
    pub fn new(lk: &Linkage, theta2: f64, angles: Angles, anchor: Anchor) -> Self {
        let Angles { theta3, theta4 } = angles;
        let a = angle(na::Point2::origin(), lk.r2, theta2);
        let b = match anchor {
            Anchor::Coupler => angle(a, lk.r3, theta3),
            Anchor::Output => angle(lk.output_pivot(), lk.r4, theta4),
        };
        let e = angle(a, lk.tracer.r6, theta3 + lk.tracer.beta);
        macro_rules! build_coords {
            [$($p:ident),+] => { Self { $($p: [$p.x, $p.y]),+ } }
        }
        build_coords![a, b, e]
    }

    /// Distance between joint B reached through the coupler and through the
    /// output link.
    pub fn loop_gap(lk: &Linkage, theta2: f64, angles: Angles) -> f64 {
        let [b1, b2] = [Anchor::Coupler, Anchor::Output].map(|anchor| {
            let [x, y] = Self::new(lk, theta2, angles, anchor).b;
            na::Point2::new(x, y)
        });
        na::distance(&b1, &b2)
    }

    /// Return true if all coordinates are finite.
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.e].iter().flatten().all(|x| x.is_finite())
    }

    /// The linkage outline for drawing, O_A → A → E → B → A, B → O_B.
    pub fn outline(&self, lk: &Linkage) -> [[f64; 2]; 7] {
        let ob = lk.output_pivot();
        [[0., 0.], self.a, self.e, self.b, self.a, self.b, [ob.x, ob.y]]
    }
}
