use std::io;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Failures surfaced by [`Provisioner::create`](crate::Provisioner::create)
/// and [`ProvisionedDir::release`](crate::ProvisionedDir::release).
#[derive(Debug, Error)]
pub enum TempDirError {
    /// The OS could not allocate the base directory.
    #[error("couldn't set up temp dir under {root}")]
    Provision {
        root: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The allocated directory has a path camino cannot represent.
    #[error("couldn't set up temp dir: {} is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    /// The configured name prefix cannot be used as a file name component.
    #[error("invalid temp dir prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// The configured mode has bits outside the Unix permission range.
    #[error("invalid temp dir mode {mode:#o}: bits outside 0o7777")]
    InvalidMode { mode: u32 },

    /// An option rejected its parameters before touching the filesystem.
    #[error("invalid argument to option `{option}`: {message}")]
    InvalidArgument { option: String, message: String },

    /// An option failed while mutating the tree under an existing root.
    #[error("couldn't apply option `{option}` during temp dir creation at {path}")]
    Configuration {
        option: String,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't remove temp dir {path} during cleanup")]
    Release {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TempDirError {
    pub(crate) fn from_option(option: &str, err: OptionError) -> Self {
        match err {
            OptionError::InvalidArgument(message) => TempDirError::InvalidArgument {
                option: option.to_owned(),
                message,
            },
            OptionError::Io { path, source } => TempDirError::Configuration {
                option: option.to_owned(),
                path,
                source,
            },
        }
    }
}

/// What a [`DirOption`](crate::DirOption) reports back to the provisioner.
#[derive(Debug, Error)]
pub enum OptionError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("filesystem error at {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OptionError {
    pub fn io(path: &Utf8Path, source: io::Error) -> Self {
        OptionError::Io {
            path: path.to_owned(),
            source,
        }
    }
}
