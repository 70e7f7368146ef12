//! Blueprint library: design a database schema with an LLM, one revision at a time.
//!
//! The user describes an application idea, the configured provider proposes
//! an abstract schema, and the user refines it with free-text feedback until
//! they approve it.
//!
//! ## Modules
//!
//! - [`schema`] - the abstract schema model, its validator and text rendering
//! - [`config`] - provider selection and API keys persisted as YAML
//! - [`providers`] - provider lookup table and rig-core clients
//! - [`architect`] - the generate / revise model calls
//! - [`session`] - the interactive revision loop
//! - [`interaction`] - the terminal seam used by the wizard and the loop

pub mod architect;
pub mod config;
mod error;
pub mod interaction;
pub mod providers;
pub mod schema;
pub mod session;

pub use architect::{SchemaArchitect, SchemaDesigner};
pub use config::{Config, ConfigStore, run_first_run_wizard};
pub use error::BlueprintError;
pub use interaction::{InquirePrompter, Prompter};
pub use session::{ApprovedDesign, run_session};
