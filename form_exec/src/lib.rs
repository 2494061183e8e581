//! # Formation control library
//!
//! This library allows other crates in the workspace (and the tests) to
//! access items defined inside the formation control executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment interfaces - call contracts with the actuator, sensing and perception collaborators
pub mod eqpt;

/// Formation control module - computes wheel speed demands from self and neighbour states
pub mod form_ctrl;

/// Formation graph - resolves neighbours and the leader from the adjacency matrix
pub mod form_graph;

/// Kinematic state - planar pose, velocity and the feedback-linearised point
pub mod kin;

/// Robot - composition root owning the states and per-robot modules
pub mod robot;

/// Scenario - configuration of a full simulation run
pub mod scenario;

/// Scene - owns the robot collection and steps the simulation
pub mod scene;

/// Trajectory generation module - produces the desired state for each robot
pub mod traj_gen;
