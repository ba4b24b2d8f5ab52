//! Patient registration form validated with `formguard`.
//!
//! Provides the form's rule table and custom checks, a JSON submission format
//! for headless validation and the review summary shown before submitting.

pub mod checks;
pub mod error;
pub mod form;
pub mod review;
pub mod submission;

use std::fs;
use std::path::Path;

use formguard::{FormSpec, RuleSet};

pub use error::AppError;
pub use form::{patient_rules, registry};
pub use submission::Submission;

/// Load a JSON rule table, or the built-in form when no path is given.
///
/// Checks named in the table resolve against [`registry`].
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet, AppError> {
    let Some(path) = path else {
        return Ok(patient_rules()?);
    };

    let json = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loading rule table from {}", path.display());
    Ok(FormSpec::from_json(&json)?.into_rules(&registry())?)
}
