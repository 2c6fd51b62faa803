use std::path::Path;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::config::ProvisionerConfig;
use crate::error::TempDirError;
use crate::options::DirOption;
use crate::util;

/// Allocates uniquely named directories and applies [`DirOption`]s to them.
#[derive(Clone, Debug, Default)]
pub struct Provisioner {
    config: ProvisionerConfig,
}

impl Provisioner {
    pub fn new(config: ProvisionerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProvisionerConfig {
        &self.config
    }

    /// Allocate `<root>/<prefix><random>` and apply `options` in order.
    ///
    /// A failing option aborts the call and leaves the root, plus whatever
    /// earlier options created, on disk.
    pub fn create<I>(&self, options: I) -> Result<ProvisionedDir, TempDirError>
    where
        I: IntoIterator<Item = DirOption>,
    {
        self.config.validate()?;
        let root = self.temp_root()?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.config.prefix);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(self.config.mode));
        }

        let handle = builder
            .tempdir_in(&root)
            .map_err(|source| TempDirError::Provision {
                root: root.clone(),
                source,
            })?;
        // Checked before `keep` so a rejected path is still removed on drop.
        if Utf8Path::from_path(handle.path()).is_none() {
            return Err(TempDirError::NonUtf8Path(handle.path().to_owned()));
        }
        let path = Utf8PathBuf::from_path_buf(handle.keep()).map_err(TempDirError::NonUtf8Path)?;
        debug!(path = %path, "allocated temp dir");

        for option in options {
            option
                .apply(&path, self.config.mode)
                .map_err(|err| TempDirError::from_option(option.name(), err))?;
            debug!(path = %path, option = option.name(), "applied temp dir option");
        }

        Ok(ProvisionedDir { path })
    }

    fn temp_root(&self) -> Result<Utf8PathBuf, TempDirError> {
        match &self.config.root {
            Some(configured) => {
                let provision_err = |source: std::io::Error| TempDirError::Provision {
                    root: configured.clone(),
                    source,
                };
                let root = util::fs::absolute(configured).map_err(provision_err)?;
                util::fs::ensure_dir(&root).map_err(provision_err)?;
                Ok(root)
            }
            None => {
                let root = std::env::temp_dir();
                Utf8PathBuf::from_path_buf(root).map_err(TempDirError::NonUtf8Path)
            }
        }
    }
}

/// Allocate a directory with the default [`Provisioner`].
pub fn temp_dir<I>(options: I) -> Result<ProvisionedDir, TempDirError>
where
    I: IntoIterator<Item = DirOption>,
{
    Provisioner::default().create(options)
}

/// A directory owned by the caller until [`release`](Self::release) is called.
///
/// Dropping the handle leaves the directory on disk.
#[derive(Debug)]
#[must_use = "the directory stays on disk until `release` is called"]
pub struct ProvisionedDir {
    path: Utf8PathBuf,
}

impl ProvisionedDir {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn as_std_path(&self) -> &Path {
        self.path.as_std_path()
    }

    /// Remove the directory and everything beneath it.
    pub fn release(self) -> Result<(), TempDirError> {
        std::fs::remove_dir_all(&self.path).map_err(|source| TempDirError::Release {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path, "released temp dir");
        Ok(())
    }
}

impl AsRef<Path> for ProvisionedDir {
    fn as_ref(&self) -> &Path {
        self.as_std_path()
    }
}

impl AsRef<Utf8Path> for ProvisionedDir {
    fn as_ref(&self) -> &Utf8Path {
        &self.path
    }
}

/// Releases on drop; only reached when the scoped closure panics.
struct ReleaseOnUnwind(Option<ProvisionedDir>);

impl Drop for ReleaseOnUnwind {
    fn drop(&mut self) {
        if let Some(dir) = self.0.take() {
            if let Err(err) = dir.release() {
                warn!(error = %err, "failed to release temp dir while unwinding");
            }
        }
    }
}

/// Run `f` against a fresh temp directory and release it afterwards, on
/// success, on error and on panic.
pub fn with_temp_dir<I, F, T>(options: I, f: F) -> Result<T>
where
    I: IntoIterator<Item = DirOption>,
    F: FnOnce(&Utf8Path) -> Result<T>,
{
    let dir = temp_dir(options).context("provisioning temp dir")?;
    let path = dir.path().to_owned();
    let mut guard = ReleaseOnUnwind(Some(dir));

    let outcome = f(&path);

    let released = match guard.0.take() {
        Some(dir) => dir.release(),
        None => Ok(()),
    };
    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(release_err)) => Err(err.context(format!(
            "temp dir release also failed: {:#}",
            anyhow::Error::from(release_err)
        ))),
    }
}
