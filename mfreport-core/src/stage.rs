//! Boundary helper wrapped around every pipeline stage.
//!
//! Logs `start:`/`end  :` lines at debug level and converts the stage's
//! error into [`PipelineError`], leaving the error kind untouched.

use tracing::{debug, warn};

use crate::error::PipelineError;

/// Run `op` as the named stage.
pub fn run_stage<T, E, F>(name: &str, op: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<PipelineError>,
{
    debug!("start: {}", name);
    match op() {
        Ok(value) => {
            debug!("end  : {}", name);
            Ok(value)
        }
        Err(e) => {
            let err: PipelineError = e.into();
            warn!(stage = name, error = %err, "stage failed");
            Err(err)
        }
    }
}
