//! Temporary directories for tests.
//!
//! [`temp_dir`] allocates a uniquely named directory under the OS temp root,
//! applies any [`DirOption`]s in order and hands back a [`ProvisionedDir`]
//! whose [`release`](ProvisionedDir::release) removes the whole tree.
//!
//! ```no_run
//! use tutil::{temp_dir, with_nested_levels};
//!
//! # fn main() -> Result<(), tutil::TempDirError> {
//! let dir = temp_dir([with_nested_levels(3)])?;
//! assert!(dir.path().join("level-1/level-2/level-3").is_dir());
//! dir.release()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod options;
pub mod provision;
pub mod util;
pub mod walk;

pub use config::{DEFAULT_MODE, DEFAULT_PREFIX, ProvisionerConfig};
pub use error::{OptionError, TempDirError};
pub use options::{DirOption, nested_levels_path, with_nested_levels};
pub use provision::{ProvisionedDir, Provisioner, temp_dir, with_temp_dir};
