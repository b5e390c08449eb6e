pub mod cfg;
pub mod command;
pub mod compat;
pub mod driver;
pub mod error;
pub mod log_to_file;
pub mod module;
#[cfg(feature = "driver")]
pub mod mongo;
pub mod msg;
pub mod version;

pub use compat::{check, CompatibilityResult, CompatibilityRule, CompatibilityTable};
pub use driver::{Driver, Session};
pub use error::{Error, Result};
pub use module::{Connection, MongoModule};
pub use version::Version;
