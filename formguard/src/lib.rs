//! Field validation engine for interactive forms.
//!
//! A [`RuleSet`] declares how each field is validated. The [`Orchestrator`]
//! owns the per-field [`ValidationState`], reacts to input events coming from
//! a host (anything implementing [`FormView`] and [`FormDisplay`]), publishes
//! error messages to display slots and gates submission on aggregate validity.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use formguard::{MemoryHost, Orchestrator, Rule, RuleSet};
//!
//! let rules = RuleSet::builder()
//!     .field(
//!         "username",
//!         Rule::new()
//!             .required("Username is required.")
//!             .min_length(5, "Username must be at least 5 characters.")
//!             .slot("username-error"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let host = MemoryHost::new().with_field("username", "");
//! let mut form = Orchestrator::new(Arc::new(rules), host);
//!
//! form.on_field_changed("username", "ab1").unwrap();
//! assert_eq!(
//!     form.host().error("username-error"),
//!     Some("Username must be at least 5 characters.")
//! );
//! assert!(!form.all_valid());
//! ```

mod error;
mod evaluate;
mod group;
mod host;
mod normalize;
mod orchestrator;
mod rule;
mod rules;
mod spec;
mod state;

pub use error::{ConfigError, FormError};
pub use evaluate::{EvaluationResult, FieldEvaluator};
pub use group::{ExclusiveGroup, ExclusiveGroupEvaluator, GroupReport};
pub use host::{FormDisplay, FormHost, FormView, MemoryHost, ValidityClass};
pub use normalize::{DigitGroups, normalize};
pub use orchestrator::{Orchestrator, Verdict};
pub use rule::{Check, EventKind, FieldEvent, Formatter, Rule, RuleKind, Siblings};
pub use rules::{FieldEntry, Member, RuleSet, RuleSetBuilder};
pub use spec::{FieldSpec, FormSpec, Registry};
pub use state::ValidationState;
