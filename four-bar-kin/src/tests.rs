use crate::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::TAU;

const CLOSURE_TOL: f64 = 1e-9;

fn linkages() -> Vec<Linkage> {
    vec![
        Linkage::example(),
        // Crank rocker
        Linkage::new([4., 1., 3.5, 3.], 0.),
        // Crank rocker with a tilted ground link
        Linkage::new([4., 1.2, 3.8, 2.5], 0.4).with_tracer(Tracer::from_local(1., -0.5)),
        // Drag-link with a tilted ground link
        Linkage::new([1., 2.5, 3., 3.2], -1.),
    ]
}

#[test]
fn analytical_closes_the_loop() {
    for lk in linkages() {
        assert!(lk.ty().is_crank_rotatable(), "{lk:?}");
        for sigma in [Assembly::Plus, Assembly::Minus] {
            let lk = lk.clone().with_sigma(sigma);
            let traj = Analytical.sweep(&lk, &Sweep::default(), Policy::FailFast).unwrap();
            assert!(traj.is_complete());
            assert!(traj.max_residual(&lk) < CLOSURE_TOL, "{lk:?}");
        }
    }
}

#[test]
fn newton_closes_the_loop() {
    for lk in linkages() {
        let newton = Newton::seeded_by_analytical(NewtonCfg::new());
        let traj = newton.sweep(&lk, &Sweep::default(), Policy::FailFast).unwrap();
        assert!(traj.max_residual(&lk) < newton.cfg.tol, "{lk:?}");
        // B through the output link matches B through the coupler
        for s in traj.samples() {
            let gap = Pose::loop_gap(&lk, s.theta2, s.angles().unwrap());
            assert!(gap < newton.cfg.tol);
        }
    }
}

#[test]
fn branch_continuity() {
    let sweep = Sweep::default();
    for lk in linkages() {
        for sigma in [Assembly::Plus, Assembly::Minus] {
            let lk = lk.clone().with_sigma(sigma);
            let a = Analytical.sweep(&lk, &sweep, Policy::FailFast).unwrap();
            let n = Newton::seeded_by_analytical(NewtonCfg::new())
                .sweep(&lk, &sweep, Policy::FailFast)
                .unwrap();
            assert!(a.max_jump() < 5f64.to_radians(), "{lk:?}");
            assert!(n.max_jump() < 5f64.to_radians(), "{lk:?}");
            // Warm start keeps the branch chosen by σ
            assert!(a.max_diff(&n) < 1e-6, "{lk:?}");
        }
    }
}

#[test]
fn cross_validation() {
    let lk = Linkage::example();
    let sweep = Sweep::default();
    let a = Analytical.sweep(&lk, &sweep, Policy::FailFast).unwrap();
    let n = Newton::default().sweep(&lk, &sweep, Policy::FailFast).unwrap();
    assert_eq!(a.len(), n.len());
    assert!(a.max_diff(&n) < 1e-4);
    for (sa, sn) in a.samples().iter().zip(n.samples()) {
        assert_eq!(sa.theta2, sn.theta2);
        let (pa, pn) = (sa.pose().unwrap(), sn.pose().unwrap());
        assert_abs_diff_eq!(pa.e[0], pn.e[0], epsilon = 1e-6);
        assert_abs_diff_eq!(pa.e[1], pn.e[1], epsilon = 1e-6);
        assert_abs_diff_eq!(pa.b[0], pn.b[0], epsilon = 1e-6);
        assert_abs_diff_eq!(pa.b[1], pn.b[1], epsilon = 1e-6);
    }
}

#[test]
fn cross_validation_on_both_branches() {
    let sweep = Sweep::default();
    for sigma in [Assembly::Plus, Assembly::Minus] {
        let lk = Linkage::example().with_sigma(sigma);
        let a = Method::Analytical.solver(NewtonCfg::new());
        let n = Method::Newton.solver(NewtonCfg::new());
        let ta = a.sweep(&lk, &sweep, Policy::FailFast).unwrap();
        let tn = n.sweep(&lk, &sweep, Policy::FailFast).unwrap();
        assert!(ta.max_diff(&tn) < 1e-4, "{sigma}");
        let t4 = tn.angles()[0].unwrap().theta4;
        assert_eq!(t4.signum(), sigma.sign(), "{sigma}");
    }
    // A fixed guess picks its own branch, the one it converges to
    let lk = Linkage::example();
    let guess = Angles::new(std::f64::consts::FRAC_PI_3, std::f64::consts::FRAC_PI_4);
    let n = Newton::seeded_by(NewtonCfg::new(), guess)
        .sweep(&lk, &sweep, Policy::FailFast)
        .unwrap();
    let a = Analytical.sweep(&lk, &sweep, Policy::FailFast).unwrap();
    assert!(a.max_diff(&n) < 1e-4);
}

#[test]
fn periodicity() {
    let lk = Linkage::example();
    let newton = Newton::default();
    let n = newton.sweep(&lk, &Sweep::default(), Policy::FailFast).unwrap();
    let solvers: [&dyn Solver; 2] = [&Analytical, &newton];
    for solver in solvers {
        let first = solver.solve(&lk, 0., None).unwrap();
        let last = solver.solve(&lk, TAU, Some(first)).unwrap();
        assert!(first.dist(&last) < 1e-9, "{}", solver.name());
    }
    let [first, .., last] = n.angles()[..] else {
        unreachable!()
    };
    assert!(first.unwrap().dist(&last.unwrap()) < 1e-9);
    // The drag-link output makes one full turn
    let t4 = n.unwrapped_theta4();
    assert_abs_diff_eq!(t4[360].unwrap() - t4[0].unwrap(), TAU, epsilon = 1e-9);
}

#[test]
fn regression_baseline() {
    let lk = Linkage::example();
    let traj = Analytical
        .sweep(&lk, &Sweep::new(0., 0., 1.).unwrap(), Policy::FailFast)
        .unwrap();
    let s = &traj.samples()[0];
    let Angles { theta3, theta4 } = s.angles().unwrap();
    assert_abs_diff_eq!(theta3, 1.167059845750668, epsilon = 1e-12);
    assert_abs_diff_eq!(theta4, 0.9350850413935945, epsilon = 1e-12);
    let pose = s.pose().unwrap();
    assert_eq!(pose.a, [2., 0.]);
    let e = [
        2. + lk.tracer.r6 * (theta3 + lk.tracer.beta).cos(),
        lk.tracer.r6 * (theta3 + lk.tracer.beta).sin(),
    ];
    assert_abs_diff_eq!(pose.e[0], e[0], epsilon = 1e-12);
    assert_abs_diff_eq!(pose.e[1], e[1], epsilon = 1e-12);
}

#[test]
fn unreachable_configurations_are_flagged() {
    // Grashof double rocker, the crank cannot fully rotate
    let lk = Linkage::new([2., 2., 1., 1.5], 0.);
    assert!(!lk.ty().is_crank_rotatable());
    let bound = lk.angle_bound();
    let sweep = Sweep::default();
    let traj = Analytical.sweep(&lk, &sweep, Policy::Record).unwrap();
    assert_eq!(traj.len(), sweep.len());
    assert!(!traj.is_complete());
    for s in traj.samples() {
        assert_eq!(bound.contains(s.theta2), s.is_valid(), "θ2 = {}", s.theta2);
        match &s.state {
            Ok(solved) => {
                assert!(solved.angles.is_finite() && solved.pose.is_finite());
                assert!(lk.check(s.theta2, solved.angles, CLOSURE_TOL));
            }
            Err(e) => {
                assert!(matches!(e, SolveError::Unreachable { .. }));
                assert_eq!(e.theta2(), s.theta2);
            }
        }
    }
    // Indices of the failures follow the sweep
    let angles = sweep.angles().collect::<Vec<_>>();
    assert_eq!(traj.theta2(), angles);
    for (i, e) in traj.failures() {
        assert_eq!(angles[i], e.theta2());
    }
    assert_eq!(traj.coupler_curve().iter().filter(|p| p.is_none()).count(), traj.failures().count());
}

#[test]
fn newton_flags_unreachable_samples() {
    let lk = Linkage::new([2., 2., 1., 1.5], 0.);
    let bound = lk.angle_bound();
    let newton = Newton::seeded_by_analytical(NewtonCfg::new());
    let traj = newton.sweep(&lk, &Sweep::default(), Policy::Record).unwrap();
    assert_eq!(traj.len(), 361);
    for s in traj.samples() {
        match s.angles() {
            Some(x) => assert!(lk.check(s.theta2, x, newton.cfg.tol)),
            None => assert!(!bound.contains(s.theta2) || s.error().is_some()),
        }
        if !bound.contains(s.theta2) {
            assert!(!s.is_valid());
        }
    }
}

#[test]
fn fail_fast() {
    let lk = Linkage::new([2., 2., 1., 1.5], 0.);
    let sweep = Sweep::new(60., 120., 1.).unwrap();
    let err = Analytical.sweep(&lk, &sweep, Policy::FailFast).unwrap_err();
    // The first sample past the upper limit of the first circuit
    let AngleBound::Split([[_, end], _]) = lk.angle_bound() else {
        panic!("expect two ranges");
    };
    let expected = sweep.angles().find(|&t| t > end).unwrap();
    assert_eq!(err.theta2(), expected);
    assert!(Newton::default().sweep(&lk, &sweep, Policy::FailFast).is_err());
}

#[test]
fn parallel_sweep_is_ordered() {
    let lk = Linkage::new([2., 2., 1., 1.5], 0.);
    let sweep = Sweep::default();
    let seq = Analytical.sweep(&lk, &sweep, Policy::Record).unwrap();
    assert_eq!(Analytical.par_sweep(&lk, &sweep), seq);
}

#[test]
fn method_selection() {
    let lk = Linkage::example();
    let sweep = Sweep::new(0., 360., 10.).unwrap();
    let a = Method::Analytical.solver(NewtonCfg::new());
    let n = Method::Newton.solver(NewtonCfg::new());
    assert_eq!(a.anchor(), Anchor::Coupler);
    assert_eq!(n.anchor(), Anchor::Output);
    let ta = a.sweep(&lk, &sweep, Policy::FailFast).unwrap();
    let tn = n.sweep(&lk, &sweep, Policy::FailFast).unwrap();
    assert_eq!(ta.len(), 37);
    assert!(ta.max_diff(&tn) < 1e-4);
}
