//! Four🍀bar kinematics: position analysis of planar four-bar linkages.
//!
//! Given the link lengths `r1..r4`, the ground angle `θ1` and a crank angle
//! `θ2`, the solvers find the coupler angle `θ3` and the output angle `θ4`
//! that close the vector loop
//!
//! ```text
//! r2·e(θ2) + r3·e(θ3) − r4·e(θ4) − r1·e(θ1) = 0
//! ```
//!
//! Two strategies are provided behind the [`Solver`] trait:
//!
//! + [`Analytical`]: closed form, tangent half-angle reduction.
//! + [`Newton`]: Newton iteration on the loop residual, warm started from
//!   the previous sample of a sweep.
//!
//! ```
//! use four_bar_kin::*;
//!
//! let lk = Linkage::example();
//! let traj = Analytical.sweep(&lk, &Sweep::default(), Policy::FailFast).unwrap();
//! assert_eq!(traj.len(), 361);
//! assert!(traj.is_complete());
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
pub use self::{error::*, geometry::*, linkage::*, solver::*, stat::*, sweep::*, trajectory::*};
pub use nalgebra as na;

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod error;
mod geometry;
mod linkage;
pub mod solver;
mod stat;
mod sweep;
#[cfg(test)]
mod tests;
mod trajectory;
