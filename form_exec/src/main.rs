//! Main formation control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the scene from the scenario file
//!     - Main loop:
//!         - Advance the scripted reference signal (if any)
//!         - Tick the scene (trajectory generation, formation control,
//!           integration for every robot)
//!     - Write the final robot states into the session directory
//!
//! # Modules
//!
//! All modules (e.g. `form_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::WrapErr,
    Report,
};
use log::info;
use serde::Serialize;

// Internal
use form_lib::{
    kin::KinState,
    scenario::{RefDrive, Scenario},
    scene::{RefSignal, Scene},
};
use util::{
    logger::{logger_init, LevelFilter},
    raise_error,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Scenario parameter file, relative to the parameters directory.
const SCENARIO_FILE: &str = "scenario.toml";

/// Number of ticks between progress log messages.
const LOG_DECIMATION: u64 = 100;

/// File the final robot states are written into, relative to the session
/// directory.
const FINAL_STATES_FILE: &str = "final_states.json";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-robot record written at the end of the run.
#[derive(Serialize)]
struct FinalState {
    actual: KinState,
    desired: KinState,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("form_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Formation Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let scenario: Scenario =
        util::params::load(SCENARIO_FILE).wrap_err("Could not load the scenario")?;

    scenario.validate().wrap_err("Scenario validation failed")?;

    info!(
        "Scenario loaded: {} robots, dt = {} s, duration = {} s",
        scenario.robots.len(),
        scenario.dt_s,
        scenario.duration_s
    );

    // ---- BUILD THE SCENE ----

    let mut scene =
        Scene::from_scenario(&scenario, &session).wrap_err("Could not build the scene")?;

    let mut ref_signal = match scenario.reference {
        Some(RefDrive { initial_pose, s_dot_ms, theta_dot_rads }) => RefSignal {
            x_m: initial_pose[0],
            y_m: initial_pose[1],
            theta_rad: initial_pose[2],
            s_dot_ms,
            theta_dot_rads,
        },
        None => RefSignal::default(),
    };
    scene.set_reference(ref_signal);

    // ---- MAIN LOOP ----

    let num_ticks = (scenario.duration_s / scenario.dt_s).ceil() as u64;
    let dt_s = scenario.dt_s;

    info!("Begin execution: {} ticks", num_ticks);

    for tick in 0..num_ticks {
        scene
            .tick()
            .wrap_err_with(|| format!("Tick {} failed", tick))?;

        // Advance the scripted reference for the next tick
        if scenario.reference.is_some() {
            ref_signal.theta_rad += ref_signal.theta_dot_rads * dt_s;
            ref_signal.x_m += ref_signal.s_dot_ms * ref_signal.theta_rad.cos() * dt_s;
            ref_signal.y_m += ref_signal.s_dot_ms * ref_signal.theta_rad.sin() * dt_s;
            scene.set_reference(ref_signal);
        }

        // A non-finite state means the control law has diverged, there is no
        // recovery from this
        for (i, robot) in scene.robots.iter().enumerate() {
            if !robot.actual.x_m.is_finite()
                || !robot.actual.y_m.is_finite()
                || !robot.actual.theta_rad.is_finite()
            {
                raise_error!("Robot {} state is non-finite at t = {} s", i, scene.t_s);
            }
        }

        if tick % LOG_DECIMATION == 0 {
            let robot = &scene.robots[0];
            info!(
                "t = {:6.2} s: robot 0 at ({:7.3}, {:7.3}) m, heading {:6.3} rad",
                scene.t_s, robot.actual.x_m, robot.actual.y_m, robot.actual.theta_rad
            );
        }
    }

    // ---- FINAL STATE OUTPUT ----

    let final_states: Vec<FinalState> = scene
        .robots
        .iter()
        .map(|r| FinalState {
            actual: r.actual,
            desired: r.desired,
        })
        .collect();

    let final_states_path = session.session_root.join(FINAL_STATES_FILE);
    let file = std::fs::File::create(&final_states_path)
        .wrap_err("Could not create the final states file")?;
    serde_json::to_writer_pretty(file, &final_states)
        .wrap_err("Could not write the final states")?;

    info!("Final states written to {:?}", final_states_path);
    info!("End of execution");

    Ok(())
}
