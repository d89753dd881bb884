use std::error::Error;
use std::f64::consts::FRAC_PI_2;
use std::fs;

use kinematics::pose::{from_rotation_translation, pose_to_isometry, rotation};
use kinematics::{IkConfig, NewtonRaphsonSolver, Pose};
use log::{info, warn};
use nalgebra::Vector3;
use roarm::{ServoAngles, roarm_m3};
use serde::Deserialize;

/// Solver settings plus a stroke of Cartesian points (metres) for the pen tip.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DriverConfig {
    ik: IkConfig,
    stroke: Vec<[f64; 3]>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ik: IkConfig::default(),
            stroke: (0..5).map(|i| [0.30 + 0.025 * i as f64, 0.0, 0.20]).collect(),
        }
    }
}

fn load_config() -> Result<DriverConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {path}");
            Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
        }
        None => Ok(DriverConfig::default()),
    }
}

fn describe(pose: &Pose) -> Result<String, Box<dyn Error>> {
    let isometry = pose_to_isometry(pose)?;
    let p = isometry.translation.vector;
    let (roll, pitch, yaw) = isometry.rotation.euler_angles();
    Ok(format!(
        "x={:.4} y={:.4} z={:.4} roll={roll:.4} pitch={pitch:.4} yaw={yaw:.4}",
        p.x, p.y, p.z
    ))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("Initializing RoArm-M3 kinematics...");

    let config = load_config()?;
    let model = roarm_m3()?;

    println!("Zero configuration: {}", describe(model.home())?);
    let straight = model.forward_kinematics(&[0.0, FRAC_PI_2, -FRAC_PI_2, 0.0, 0.0])?;
    println!("Arm straight:       {}", describe(&straight)?);

    // Keep the tool in its zero-configuration orientation along the stroke.
    let orientation = rotation(model.home());
    let solver = NewtonRaphsonSolver::new(config.ik);

    let mut joints = vec![0.0; model.joint_count()];
    for [x, y, z] in config.stroke {
        let target = from_rotation_translation(&orientation, &Vector3::new(x, y, z));
        let solution = solver.solve(&model, &target, Some(&joints[..]))?;
        if !solution.converged {
            warn!(
                "target x={x:.3} y={y:.3} z={z:.3} not reached after {} iterations",
                solution.iterations
            );
            continue;
        }

        let servo = ServoAngles::from_joints(solution.joints.as_slice())?;
        println!(
            "Moving to x={x:.3}, y={y:.3}, z={z:.3}: {servo:?} ({} iterations)",
            solution.iterations
        );
        // Warm-start the next point of the stroke from this one.
        joints = solution.joints.iter().copied().collect();
    }

    println!("Stroke complete.");
    Ok(())
}
