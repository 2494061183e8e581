//! Formation control module
//!
//! Maps the current and desired states of a robot and its neighbours into
//! shaped wheel speed demands. The analytic branch is a feedback
//! linearisation control law with a neighbour-consensus term; a learned
//! controller, if attached, replaces it entirely.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_consensus;
mod calc_test_signal;
mod params;
mod shape;
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

/// Possible errors that can occur during FormCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum FormCtrlError {
    #[error(
        "A learned controller is attached but no perception observation was \
         supplied"
    )]
    NoObservation,
}
