//! Scene management
//!
//! The scene owns the robot collection, the formation graph and the global
//! simulation clock, and advances the whole simulation by one fixed step at
//! a time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::DMatrix;

// Internal
use crate::eqpt::EqptError;
use crate::form_ctrl::{self, FormCtrlError};
use crate::form_graph::{self, FormGraphError};
use crate::kin::{KinError, KinState};
use crate::robot::{Robot, Role};
use crate::scenario::{Scenario, ScenarioError};
use crate::traj_gen::{self, TrajGenError};
use util::{module::State, params::LoadError, session::Session};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Parameter file for the trajectory generation modules.
const TRAJ_GEN_PARAMS: &str = "traj_gen.toml";

/// Parameter file for the formation control modules.
const FORM_CTRL_PARAMS: &str = "form_ctrl.toml";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The scene-level reference signal consumed by the linear-reference
/// trajectory mode. The embedding (the external stepping authority) updates
/// this between ticks; the core only reads it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefSignal {
    /// Reference position, x component.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Reference position, y component.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Reference heading.
    ///
    /// Units: radians
    pub theta_rad: f64,

    /// Reference translational speed.
    ///
    /// Units: meters/second
    pub s_dot_ms: f64,

    /// Reference turn rate.
    ///
    /// Units: radians/second
    pub theta_dot_rads: f64,
}

/// The simulation scene.
pub struct Scene {
    /// All robots in the scene. The scene is the sole owner, neighbour and
    /// leader relations are index lookups into this vector.
    pub robots: Vec<Robot>,

    /// The adjacency matrix of the formation graph.
    adjacency: DMatrix<u8>,

    /// Global simulation time.
    ///
    /// Units: seconds
    pub t_s: f64,

    /// Simulation step size.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// The scene-level reference signal.
    ref_signal: RefSignal,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised while building a scene from a scenario.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Could not load module parameters: {0}")]
    ParamLoad(#[from] LoadError),
}

/// Possible errors raised during a tick. Every variant aborts the tick:
/// there is no partial-success mode for a single robot's control
/// computation.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Formation graph violation: {0}")]
    Graph(#[from] FormGraphError),

    #[error("Trajectory generation failed: {0}")]
    TrajGen(#[from] TrajGenError),

    #[error("Formation control failed: {0}")]
    FormCtrl(#[from] FormCtrlError),

    #[error("Kinematic state error: {0}")]
    Kin(#[from] KinError),

    #[error("Equipment error: {0}")]
    Eqpt(#[from] EqptError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scene {
    /// Create a scene from pre-built robots.
    ///
    /// The robots' modules must already be configured. Most callers should
    /// use [`Scene::from_scenario`] instead.
    pub fn new(robots: Vec<Robot>, adjacency: DMatrix<u8>, dt_s: f64) -> Self {
        Scene {
            robots,
            adjacency,
            t_s: 0.0,
            dt_s,
            ref_signal: RefSignal::default(),
        }
    }

    /// Build a scene from a scenario, initialising every robot's modules
    /// from their parameter files.
    pub fn from_scenario(scenario: &Scenario, session: &Session) -> Result<Self, BuildError> {
        scenario.validate()?;

        let mut robots = scenario.build_robots();

        for robot in robots.iter_mut() {
            robot.traj_gen.init(TRAJ_GEN_PARAMS, session)?;
            robot.form_ctrl.init(FORM_CTRL_PARAMS, session)?;
        }

        Ok(Scene::new(
            robots,
            scenario.adjacency_matrix(),
            scenario.dt_s,
        ))
    }

    /// Set the scene-level reference signal for the next tick.
    pub fn set_reference(&mut self, ref_signal: RefSignal) {
        self.ref_signal = ref_signal;
    }

    /// Get the current scene-level reference signal.
    pub fn reference(&self) -> RefSignal {
        self.ref_signal
    }

    /// Advance the whole scene by one step.
    ///
    /// The tick is an explicit two-phase update: all wheel commands are
    /// computed against an immutable snapshot of the states as they were at
    /// the end of the previous tick, and only then are the integrations
    /// applied. A robot's command therefore never depends on whether a
    /// sibling has already been advanced within the same tick.
    pub fn tick(&mut self) -> Result<(), SceneError> {
        // ---- SENSOR SEEDING ----

        // When a robot runs against a live actuator its actual state comes
        // from the sensor, not from our own integration
        for robot in self.robots.iter_mut() {
            if let Some(sensor) = robot.pose_sensor.as_mut() {
                let pose = sensor.read_pose()?;
                robot.actual.set_pose(&pose)?;

                let vel = sensor.read_velocity()?;
                robot.actual.vx_ms = vel[0];
                robot.actual.vy_ms = vel[1];
            }
        }

        // ---- DESIRED STATE PROPAGATION ----

        let t_s = self.t_s;
        let ref_signal = self.ref_signal;

        for robot in self.robots.iter_mut() {
            if robot.mode.is_formation() {
                let input = traj_gen::InputData {
                    mode: robot.mode,
                    t_s,
                    axle_m: robot.axle_m,
                    anchor: robot.anchor,
                    prev: robot.desired,
                    ref_signal: Some(ref_signal),
                };

                let (out, report) = robot.traj_gen.proc(&input)?;
                robot.desired = out.desired;

                if report.heading_held {
                    trace!("Desired heading held at {:.3} rad", robot.desired.theta_rad);
                }
            }

            // Refresh the transformed coordinates before any control runs
            let c_m = robot.offset_c_m();
            robot.actual.transform(c_m);
            robot.desired.transform(c_m);
        }

        // ---- STATE SNAPSHOT ----

        let snapshot: Vec<(KinState, KinState)> = self
            .robots
            .iter()
            .map(|r| (r.actual, r.desired))
            .collect();
        let roles: Vec<Option<Role>> = self.robots.iter().map(|r| r.role).collect();

        // ---- COMMAND COMPUTATION ----

        let mut outputs = Vec::with_capacity(self.robots.len());

        for (i, robot) in self.robots.iter_mut().enumerate() {
            let nbr_set = form_graph::resolve_neighbours(&self.adjacency, &roles, i)?;

            if let Some(leader) = nbr_set.leader {
                trace!("Robot {} sees leader {}", i, leader);
            }

            let neighbours = nbr_set
                .neighbours
                .iter()
                .map(|&j| snapshot[j])
                .collect();

            let observation = robot
                .perception
                .as_mut()
                .map(|p| p.get_observation());

            let input = form_ctrl::InputData {
                mode: robot.mode,
                role: robot.role,
                t_s,
                dt_s: self.dt_s,
                amplitude: robot.amplitude,
                self_actual: snapshot[i].0,
                self_desired: snapshot[i].1,
                neighbours,
                observation,
            };

            let (out, _report) = robot.form_ctrl.proc(&input)?;
            outputs.push(out);
        }

        // ---- COMMAND APPLICATION ----

        let dt_s = self.dt_s;

        for (robot, out) in self.robots.iter_mut().zip(outputs) {
            match robot.actuator.as_mut() {
                Some(actuator) => {
                    actuator.set_wheel_velocities(out.demand.left, out.demand.right)?
                }
                None => robot.actual.integrate(out.wheel_speeds_ms, robot.axle_m, dt_s),
            }
        }

        self.t_s += self.dt_s;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::{PoseSensor, WheelActuator};
    use crate::form_ctrl::FormCtrl;
    use crate::robot::DynamicsMode;
    use crate::traj_gen::TrajGen;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PI: f64 = std::f64::consts::PI;

    fn formation_robot(
        initial_pose: [f64; 3],
        anchor_pose: [f64; 3],
        role: Role,
    ) -> Robot {
        let mut robot = Robot::new(
            initial_pose,
            anchor_pose,
            0.331,
            DynamicsMode::FixedPoint,
            Some(role),
        );
        robot.traj_gen = TrajGen::with_params(Default::default());
        robot.form_ctrl = FormCtrl::with_params(Default::default());
        robot
    }

    fn two_robot_scene() -> Scene {
        let leader = formation_robot([0.0, 0.0, 0.0], [3.0, 0.0, PI / 4.0], Role::Leader);
        let follower = formation_robot([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], Role::Follower);

        let adjacency = DMatrix::from_row_slice(2, 2, &[0, 1, 1, 0]);

        Scene::new(vec![leader, follower], adjacency, 0.01)
    }

    /// The follower must converge to the leader's transformed position
    /// minus the initial relative desired offset.
    #[test]
    fn test_two_robot_convergence() {
        let mut scene = two_robot_scene();

        for _ in 0..5000 {
            scene.tick().unwrap();
        }

        // Refresh the transformed points for the final comparison
        for robot in scene.robots.iter_mut() {
            let c_m = robot.offset_c_m();
            robot.actual.transform(c_m);
        }

        let leader = &scene.robots[0];
        let follower = &scene.robots[1];

        // The leader tracks its own anchor
        assert!((leader.actual.xp_m - leader.desired.xp_m).abs() < 1.0e-2);
        assert!((leader.actual.yp_m - leader.desired.yp_m).abs() < 1.0e-2);

        // The follower holds the desired relative offset to the leader
        let offset_x_m = leader.desired.xp_m - follower.desired.xp_m;
        let offset_y_m = leader.desired.yp_m - follower.desired.yp_m;

        assert!((follower.actual.xp_m - (leader.actual.xp_m - offset_x_m)).abs() < 1.0e-2);
        assert!((follower.actual.yp_m - (leader.actual.yp_m - offset_y_m)).abs() < 1.0e-2);
    }

    /// Commands within a tick must be computed from the states as they
    /// were at the end of the previous tick, regardless of robot order.
    #[test]
    fn test_tick_uses_pre_tick_snapshot() {
        let mut scene = two_robot_scene();

        // Build the snapshot the follower's command must be based on: the
        // initial states with fresh desired and transformed coordinates
        let c_m = scene.robots[0].offset_c_m();

        let mut leader_actual = scene.robots[0].actual;
        leader_actual.transform(c_m);
        let mut leader_desired = scene.robots[0].anchor;
        leader_desired.x_m = 3.0;
        leader_desired.y_m = 0.0;
        leader_desired.theta_rad = 0.0;
        leader_desired.transform(c_m);

        let mut follower_actual = scene.robots[1].actual;
        follower_actual.transform(c_m);
        let mut follower_desired = scene.robots[1].anchor;
        follower_desired.theta_rad = 0.0;
        follower_desired.transform(c_m);

        let mut ctrl = FormCtrl::with_params(Default::default());
        let input = crate::form_ctrl::InputData {
            mode: DynamicsMode::FixedPoint,
            role: Some(Role::Follower),
            t_s: 0.0,
            dt_s: 0.01,
            amplitude: [0.0; 2],
            self_actual: follower_actual,
            self_desired: follower_desired,
            neighbours: vec![(leader_actual, leader_desired)],
            observation: None,
        };
        let (expected, _) = ctrl.proc(&input).unwrap();

        let mut follower_expected = follower_actual;
        follower_expected.integrate(expected.wheel_speeds_ms, 0.331, 0.01);

        // Run the real tick, in which the leader (index 0) is integrated
        // before the follower's command is applied
        scene.tick().unwrap();

        let follower = &scene.robots[1];
        assert!((follower.actual.x_m - follower_expected.x_m).abs() < 1.0e-12);
        assert!((follower.actual.y_m - follower_expected.y_m).abs() < 1.0e-12);
    }

    #[test]
    fn test_two_adjacent_leaders_abort_the_tick() {
        let leader_a = formation_robot([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], Role::Leader);
        let leader_b = formation_robot([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], Role::Leader);
        let follower = formation_robot([2.0, 0.0, 0.0], [3.0, 0.0, 0.0], Role::Follower);

        // The follower sees both leaders
        let adjacency = DMatrix::from_row_slice(3, 3, &[
            0, 0, 1,
            0, 0, 1,
            1, 1, 0,
        ]);

        let mut scene = Scene::new(vec![leader_a, leader_b, follower], adjacency, 0.01);

        assert!(matches!(
            scene.tick(),
            Err(SceneError::Graph(FormGraphError::MultipleLeaders { .. }))
        ));
    }

    struct CapturingActuator {
        demands: Rc<RefCell<Vec<(f64, f64)>>>,
    }

    impl WheelActuator for CapturingActuator {
        fn set_wheel_velocities(&mut self, left: f64, right: f64) -> Result<(), EqptError> {
            self.demands.borrow_mut().push((left, right));
            Ok(())
        }
    }

    #[test]
    fn test_actuator_receives_demands_instead_of_integration() {
        let mut scene = two_robot_scene();

        let demands = Rc::new(RefCell::new(vec![]));
        scene.robots[0].actuator = Some(Box::new(CapturingActuator {
            demands: demands.clone(),
        }));

        let before = (scene.robots[0].actual.x_m, scene.robots[0].actual.y_m);
        scene.tick().unwrap();

        // The demand went to the actuator and the pose was not integrated
        assert_eq!(demands.borrow().len(), 1);
        assert_eq!(
            (scene.robots[0].actual.x_m, scene.robots[0].actual.y_m),
            before
        );

        // The other robot still integrates kinematically
        assert!(scene.robots[1].actual.x_m != 0.0);
    }

    struct FixedSensor;

    impl PoseSensor for FixedSensor {
        fn read_pose(&mut self) -> Result<[f64; 3], EqptError> {
            Ok([5.0, -2.0, 0.1])
        }

        fn read_velocity(&mut self) -> Result<[f64; 3], EqptError> {
            Ok([0.05, 0.0, 0.0])
        }
    }

    #[test]
    fn test_pose_sensor_seeds_actual_state() {
        let mut scene = two_robot_scene();
        scene.robots[1].pose_sensor = Some(Box::new(FixedSensor));

        scene.tick().unwrap();

        // The follower's state was seeded from the sensor before the
        // (single) integration step moved it on
        let follower = &scene.robots[1];
        assert!((follower.actual.x_m - 5.0).abs() < 0.01);
        assert!((follower.actual.y_m + 2.0).abs() < 0.01);
    }

    #[test]
    fn test_time_advances_by_dt() {
        let mut scene = two_robot_scene();

        scene.tick().unwrap();
        scene.tick().unwrap();

        assert!((scene.t_s - 0.02).abs() < 1.0e-12);
    }
}
