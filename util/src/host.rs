//! Host environment utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the environment variable giving the root of the software tree.
///
/// The `params` and `sessions` directories are resolved relative to this
/// root.
pub const SW_ROOT_ENV_VAR: &str = "FORM_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software tree.
///
/// Fails if the `FORM_SW_ROOT` environment variable is not set.
pub fn get_form_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
