//! Scenario configuration
//!
//! A scenario file describes one full simulation run: the step size, the
//! formation graph and one entry per robot. Scenarios are TOML files loaded
//! through `util::params`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::DMatrix;
use serde::Deserialize;

// Internal
use crate::robot::{DynamicsMode, Gains, Robot, Role};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Configuration of a full simulation run.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Simulation step size.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Total simulated duration.
    ///
    /// Units: seconds
    pub duration_s: f64,

    /// The adjacency matrix of the formation graph, row major. Entry
    /// `[i][j]` nonzero means robot `j` is a neighbour of robot `i`.
    pub adjacency: Vec<Vec<u8>>,

    /// Optional scripted reference signal for the linear-reference mode.
    #[serde(default)]
    pub reference: Option<RefDrive>,

    /// One entry per robot.
    pub robots: Vec<RobotConfig>,
}

/// A constant-rate script for the scene-level reference signal.
///
/// The executable advances the reference pose at these rates each tick; the
/// core only ever reads the resulting signal.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefDrive {
    /// Initial reference pose `[x_m, y_m, theta_rad]`.
    pub initial_pose: [f64; 3],

    /// Translational speed of the reference.
    ///
    /// Units: meters/second
    pub s_dot_ms: f64,

    /// Turn rate of the reference.
    ///
    /// Units: radians/second
    pub theta_dot_rads: f64,
}

/// Configuration of a single robot.
#[derive(Debug, Deserialize)]
pub struct RobotConfig {
    /// Initial pose `[x_m, y_m, theta_rad]` of the actual state.
    pub initial_pose: [f64; 3],

    /// Anchor pose `[x_m, y_m, theta_rad]` of the initial desired state.
    pub anchor_pose: [f64; 3],

    /// Dynamics mode. An unrecognised mode name fails deserialisation,
    /// which is where the "unknown dynamics mode" configuration error is
    /// caught.
    pub mode: DynamicsMode,

    /// Formation role, absent for robots outside any formation.
    #[serde(default)]
    pub role: Option<Role>,

    /// Axle length.
    ///
    /// Units: meters
    #[serde(default = "default_axle_m")]
    pub axle_m: f64,

    /// Amplitude pair for the open-loop test-signal modes.
    #[serde(default)]
    pub amplitude: [f64; 2],

    /// Legacy point-tracking gains.
    #[serde(default)]
    pub gains: Gains,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised when validating a scenario. All of these are
/// fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("The scenario contains no robots")]
    NoRobots,

    #[error("The step size must be positive, found {0}")]
    InvalidStep(f64),

    #[error(
        "Adjacency row {row} has {len} entries, expected one per robot ({expected})"
    )]
    AdjacencyRowMismatch {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error(
        "The adjacency matrix has {rows} rows but the scenario has \
         {num_robots} robots"
    )]
    AdjacencySizeMismatch { rows: usize, num_robots: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

fn default_axle_m() -> f64 {
    0.331
}

impl Scenario {
    /// Check the scenario for internal consistency.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.robots.is_empty() {
            return Err(ScenarioError::NoRobots);
        }

        if !(self.dt_s > 0.0) {
            return Err(ScenarioError::InvalidStep(self.dt_s));
        }

        let num_robots = self.robots.len();

        if self.adjacency.len() != num_robots {
            return Err(ScenarioError::AdjacencySizeMismatch {
                rows: self.adjacency.len(),
                num_robots,
            });
        }

        for (row, entries) in self.adjacency.iter().enumerate() {
            if entries.len() != num_robots {
                return Err(ScenarioError::AdjacencyRowMismatch {
                    row,
                    len: entries.len(),
                    expected: num_robots,
                });
            }
        }

        Ok(())
    }

    /// Build the adjacency matrix.
    ///
    /// The scenario must have been validated first.
    pub fn adjacency_matrix(&self) -> DMatrix<u8> {
        let n = self.robots.len();
        DMatrix::from_fn(n, n, |i, j| self.adjacency[i][j])
    }

    /// Build the robot collection from the per-robot configurations.
    ///
    /// The robots' modules are left unconfigured, see
    /// `Scene::from_scenario`.
    pub fn build_robots(&self) -> Vec<Robot> {
        self.robots
            .iter()
            .map(|cfg| {
                let mut robot = Robot::new(
                    cfg.initial_pose,
                    cfg.anchor_pose,
                    cfg.axle_m,
                    cfg.mode,
                    cfg.role,
                );
                robot.amplitude = cfg.amplitude;
                robot.gains = cfg.gains;
                robot
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
