//! Robot composition root

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::eqpt::{Perception, PoseSensor, WheelActuator};
use crate::form_ctrl::FormCtrl;
use crate::kin::KinState;
use crate::traj_gen::TrajGen;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The role a robot plays in the formation.
///
/// A leader has access to its own absolute desired position. A follower is
/// under the decentralisation constraint: it only uses relative neighbour
/// information plus the desired-velocity feedforward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    Follower,
}

/// The dynamics mode of a robot, selecting both the trajectory branch and
/// the control branch executed each cycle.
///
/// The formation modes run the consensus control law, the remaining modes
/// are open-loop test signals kept for actuator characterisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicsMode {
    /// Desired state fixed at the anchor, terminal reference.
    FixedPoint,

    /// Time-parameterised circular desired trajectory (legacy).
    Circular,

    /// Desired state derived from the scene-level reference signal.
    LinearRef,

    /// Open loop: zero until t = 1 s, then the amplitude pair.
    Step,

    /// Open loop: amplitude pair with sign flips at 1, 4 and 7 s.
    StepSequence,

    /// Open loop: sinusoidal wheel speeds scaled by the amplitude pair.
    SineWave,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Scalar gains for the legacy point-tracking controllers.
///
/// These are not used by the formation control law, they are retained so
/// that scenarios written for the older single-robot modes keep loading.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Gains {
    pub k_rho: f64,
    pub k_alpha: f64,
    pub k_phi: f64,
    pub k_v: f64,
    pub gamma: f64,
}

/// A single robot in the scene.
///
/// The robot owns its kinematic states and its per-robot module instances.
/// It never owns references to other robots: neighbour and leader are
/// resolved by index into the scene's robot collection every tick.
pub struct Robot {
    /// Distance between the two wheels.
    ///
    /// Units: meters
    pub axle_m: f64,

    /// The dynamics mode, fixed at configuration time.
    pub mode: DynamicsMode,

    /// Formation role, `None` for robots outside any formation.
    pub role: Option<Role>,

    /// Legacy point-tracking gains.
    pub gains: Gains,

    /// Amplitude pair for the open-loop test-signal modes.
    pub amplitude: [f64; 2],

    /// The actual state, advanced by integration or seeded from the sensor.
    pub actual: KinState,

    /// The desired state, advanced by the trajectory generator.
    pub desired: KinState,

    /// The initial desired state. Set once at construction and never
    /// mutated, it anchors the fixed offsets used by the trajectory modes.
    pub anchor: KinState,

    /// Trajectory generation module.
    pub traj_gen: TrajGen,

    /// Formation control module (control law plus actuator shaping).
    pub form_ctrl: FormCtrl,

    /// Optional live actuator. When present shaped demands are sent here
    /// instead of being integrated kinematically.
    pub actuator: Option<Box<dyn WheelActuator>>,

    /// Optional pose/velocity sensing, used to seed the actual state at the
    /// start of each tick when running against a live actuator.
    pub pose_sensor: Option<Box<dyn PoseSensor>>,

    /// Optional perception source, consumed by the learned controller.
    pub perception: Option<Box<dyn Perception>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Gains {
    fn default() -> Self {
        Gains {
            k_rho: 1.0,
            k_alpha: 6.0,
            k_phi: -1.0,
            k_v: 3.8,
            gamma: 0.15,
        }
    }
}

impl DynamicsMode {
    /// True for the modes which run the formation (consensus) control law.
    pub fn is_formation(&self) -> bool {
        matches!(
            self,
            DynamicsMode::FixedPoint | DynamicsMode::Circular | DynamicsMode::LinearRef
        )
    }
}

impl Robot {
    /// Create a new robot at the given initial and anchor poses.
    ///
    /// The module instances start unconfigured, see
    /// `Scene::from_scenario` for the usual initialisation path.
    pub fn new(
        initial_pose: [f64; 3],
        anchor_pose: [f64; 3],
        axle_m: f64,
        mode: DynamicsMode,
        role: Option<Role>,
    ) -> Self {
        let anchor = KinState::new(anchor_pose[0], anchor_pose[1], anchor_pose[2]);

        Robot {
            axle_m,
            mode,
            role,
            gains: Gains::default(),
            amplitude: [0.0; 2],
            actual: KinState::new(initial_pose[0], initial_pose[1], initial_pose[2]),
            desired: anchor,
            anchor,
            traj_gen: TrajGen::default(),
            form_ctrl: FormCtrl::default(),
            actuator: None,
            pose_sensor: None,
            perception: None,
        }
    }

    /// The axle-to-point offset of the feedback linearisation.
    ///
    /// Units: meters
    pub fn offset_c_m(&self) -> f64 {
        self.axle_m / 2.0
    }
}
