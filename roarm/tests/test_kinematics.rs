use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use std::thread;

use approx::assert_abs_diff_eq;
use kinematics::inverse::error_twist;
use kinematics::pose::{from_rotation_translation, rotation, translation};
use kinematics::{ErrorFrame, IkConfig, NewtonRaphsonSolver, RobotModel};
use nalgebra::{Matrix3, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use roarm::{ServoAngles, reach, roarm_m3};

fn random_joints(rng: &mut StdRng, bound: f64) -> Vec<f64> {
    (0..roarm::JOINT_COUNT).map(|_| rng.gen_range(-bound..bound)).collect()
}

#[test]
fn test_forward_kinematics_simple() {
    let model = roarm_m3().unwrap();
    let pose = model.forward_kinematics(&[0.0; 5]).unwrap();
    assert_abs_diff_eq!(pose, *model.home(), epsilon = 1e-9);
}

#[test]
fn test_forward_kinematics_arm_straight() {
    let model = roarm_m3().unwrap();
    let home = *model.home();
    let pose = model
        .forward_kinematics(&[0.0, FRAC_PI_2, -FRAC_PI_2, 0.0, 0.0])
        .unwrap();

    // Rotation should be the same
    assert_abs_diff_eq!(rotation(&pose), rotation(&home), epsilon = 1e-6);

    // x position shall be higher than from zero config
    assert!(pose[(0, 3)] > home[(0, 3)]);
    assert_abs_diff_eq!(pose[(0, 3)], roarm::L2A + roarm::L3 + roarm::L4A + roarm::L5, epsilon = 1e-9);
}

#[test]
fn test_forward_kinematics_rotation_is_orthonormal() {
    let model = roarm_m3().unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let joints = random_joints(&mut rng, 2.0 * PI);
        let r = rotation(&model.forward_kinematics(&joints).unwrap());
        assert_abs_diff_eq!(r.transpose() * r, Matrix3::identity(), epsilon = 1e-6);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_inverse_kinematics_at_solution() {
    let model = roarm_m3().unwrap();
    let solver = NewtonRaphsonSolver::with_defaults();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let joints = random_joints(&mut rng, PI);
        let target = model.forward_kinematics(&joints).unwrap();
        let solution = solver.solve(&model, &target, Some(&joints[..])).unwrap();

        assert!(solution.converged);
        assert_eq!(solution.iterations, 0);
        assert_abs_diff_eq!(solution.joints.as_slice(), joints.as_slice(), epsilon = 1e-12);
    }
}

#[test]
fn test_inverse_kinematics_round_trip() {
    let model = roarm_m3().unwrap();
    let config = IkConfig::default();
    let solver = NewtonRaphsonSolver::new(config);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let joints = random_joints(&mut rng, 0.5);
        let target = model.forward_kinematics(&joints).unwrap();
        let solution = solver.solve(&model, &target, None).unwrap();
        assert!(solution.converged, "no solution for {joints:?}");

        let reached = model.forward_kinematics(solution.joints.as_slice()).unwrap();
        let twist = error_twist(ErrorFrame::Body, &reached, &target);
        assert!(twist.fixed_rows::<3>(0).norm() <= config.angular_tolerance);
        assert!(twist.fixed_rows::<3>(3).norm() <= config.linear_tolerance);
        assert!(solution.joints.iter().all(|a| *a > -PI && *a <= PI));
    }
}

#[test]
fn test_inverse_kinematics_space_frame_round_trip() {
    let model = roarm_m3().unwrap();
    let solver = NewtonRaphsonSolver::new(IkConfig {
        frame: ErrorFrame::Space,
        ..Default::default()
    });
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..20 {
        let joints = random_joints(&mut rng, 0.5);
        let target = model.forward_kinematics(&joints).unwrap();
        let solution = solver.solve(&model, &target, None).unwrap();
        assert!(solution.converged, "no solution for {joints:?}");
        assert_abs_diff_eq!(
            translation(&model.forward_kinematics(solution.joints.as_slice()).unwrap()),
            translation(&target),
            epsilon = 1e-2
        );
    }
}

#[test]
fn test_unreachable_target() {
    let model = roarm_m3().unwrap();
    let config = IkConfig::default();
    let target = from_rotation_translation(&Matrix3::identity(), &Vector3::new(2.0 * reach(), 0.0, 0.3));

    let solution = NewtonRaphsonSolver::new(config).solve(&model, &target, None).unwrap();

    assert!(!solution.converged);
    assert_eq!(solution.iterations, config.max_iterations);
    assert!(solution.linear_error > config.linear_tolerance);
    assert!(solution.joints.iter().all(|a| *a > -PI && *a <= PI));
}

#[test]
fn test_solvers_share_model_across_threads() {
    let model: Arc<RobotModel> = Arc::new(roarm_m3().unwrap());
    let solver = Arc::new(NewtonRaphsonSolver::with_defaults());

    thread::scope(|scope| {
        for seed in 0..4 {
            let model = Arc::clone(&model);
            let solver = Arc::clone(&solver);
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let joints = random_joints(&mut rng, 0.4);
                let target = model.forward_kinematics(&joints).unwrap();
                let solution = solver.solve(&model, &target, None).unwrap();
                assert!(solution.converged);
            });
        }
    });
}

#[test]
fn test_servo_angles_from_solution() {
    let model = roarm_m3().unwrap();
    let joints = [0.2, 0.3, -0.4, 0.1, 0.0];
    let target = model.forward_kinematics(&joints).unwrap();
    let solution = NewtonRaphsonSolver::with_defaults()
        .solve(&model, &target, Some(&joints[..]))
        .unwrap();

    let servo = ServoAngles::from_joints(solution.joints.as_slice()).unwrap();
    assert_abs_diff_eq!(servo.elbow, -0.4 + FRAC_PI_2, epsilon = 1e-12);
}
