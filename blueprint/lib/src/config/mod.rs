//! Provider selection and credential storage.

mod store;
mod types;
mod wizard;

pub use store::{CONFIG_PATH_ENV, ConfigStore};
pub use types::Config;
pub use wizard::run_first_run_wizard;
