//! Structural validation run before a flow is saved or published.

pub mod cycle;
pub mod save;
pub mod validator;

pub use cycle::find_cycle;
pub use save::{SaveReport, validate_for_save};
pub use validator::{PublishReport, validate, validate_value};
