//! Trajectory generation module
//!
//! Produces the next desired state for a robot from the global simulation
//! time, the robot's anchor (initial desired state) and, for the
//! linear-reference mode, the scene-level reference signal.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_circular;
mod calc_fixed_point;
mod calc_linear_ref;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during trajectory generation.
#[derive(Debug, thiserror::Error)]
pub enum TrajGenError {
    #[error(
        "The linear-reference mode needs the scene reference signal but none \
         was provided"
    )]
    NoReferenceSignal,
}
