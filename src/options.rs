use std::fmt;
use std::fs::DirBuilder;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::OptionError;

type ApplyFn = dyn Fn(&Utf8Path, u32) -> Result<(), OptionError> + Send + Sync;

/// A unit of extra setup applied to a freshly allocated root.
///
/// Options run once, in the order they were passed to
/// [`Provisioner::create`](crate::Provisioner::create), and receive the
/// provisioner's configured permission bits alongside the root.
pub struct DirOption {
    name: String,
    apply: Box<ApplyFn>,
}

impl DirOption {
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&Utf8Path) -> Result<(), OptionError> + Send + Sync + 'static,
    {
        Self::with_mode(name, move |root, _mode| apply(root))
    }

    /// Like [`new`](Self::new), for options that create directories and
    /// should honour the configured mode.
    pub fn with_mode<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&Utf8Path, u32) -> Result<(), OptionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, root: &Utf8Path, mode: u32) -> Result<(), OptionError> {
        (self.apply)(root, mode)
    }
}

impl fmt::Debug for DirOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirOption").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Create the chain `root/level-1/.../level-<count>` in one recursive call,
/// each level with the provisioner's mode.
///
/// `count` must be at least 1; anything else fails with
/// [`OptionError::InvalidArgument`] before the filesystem is touched.
pub fn with_nested_levels(count: i64) -> DirOption {
    DirOption::with_mode("nested-levels", move |root, mode| {
        if count < 1 {
            return Err(OptionError::InvalidArgument(format!(
                "expects a positive level count, got {count}"
            )));
        }

        let deepest = nested_levels_path(root, count as u64);
        level_builder(mode)
            .create(&deepest)
            .map_err(|err| OptionError::io(&deepest, err))
    })
}

/// Path of the innermost directory [`with_nested_levels`] creates for `count`.
pub fn nested_levels_path(root: &Utf8Path, count: u64) -> Utf8PathBuf {
    let mut path = root.to_owned();
    for level in 1..=count {
        path.push(format!("level-{level}"));
    }
    path
}

fn level_builder(mode: u32) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODE;
    use std::fs;

    fn scratch_root(tag: &str) -> Utf8PathBuf {
        let dir = tempfile::Builder::new().prefix(tag).tempdir().unwrap().keep();
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn nested_levels_path_builds_linear_chain() {
        let path = nested_levels_path(Utf8Path::new("/tmp/root"), 3);
        assert_eq!(path, "/tmp/root/level-1/level-2/level-3");
        assert_eq!(nested_levels_path(Utf8Path::new("/tmp/root"), 0), "/tmp/root");
    }

    #[test]
    fn non_positive_counts_fail_without_touching_root() {
        let root = scratch_root("tutil-opt-");
        for count in [0, -1, i64::MIN] {
            let err = with_nested_levels(count).apply(&root, DEFAULT_MODE).unwrap_err();
            assert!(matches!(err, OptionError::InvalidArgument(_)), "count {count}");
        }
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn creates_chain_and_tolerates_existing_levels() {
        let root = scratch_root("tutil-opt-");
        fs::create_dir(root.join("level-1")).unwrap();

        with_nested_levels(2).apply(&root, DEFAULT_MODE).unwrap();
        assert!(root.join("level-1").join("level-2").is_dir());

        // applying again over an existing chain succeeds silently
        with_nested_levels(2).apply(&root, DEFAULT_MODE).unwrap();
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn blocked_chain_reports_io_error() {
        let root = scratch_root("tutil-opt-");
        fs::write(root.join("level-1"), b"not a dir").unwrap();

        let err = with_nested_levels(3).apply(&root, DEFAULT_MODE).unwrap_err();
        match err {
            OptionError::Io { path, .. } => assert!(path.ends_with("level-3")),
            other => panic!("unexpected error: {other:?}"),
        }
        fs::remove_dir_all(&root).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn levels_use_the_mode_they_are_given() {
        use std::os::unix::fs::PermissionsExt;

        let root = scratch_root("tutil-opt-");
        with_nested_levels(2).apply(&root, 0o700).unwrap();
        for level in [root.join("level-1"), nested_levels_path(&root, 2)] {
            let mode = fs::metadata(&level).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700, "{level}");
        }
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn custom_options_carry_their_name() {
        let option = DirOption::new("marker", |root| {
            fs::write(root.join("marker"), b"").map_err(|err| OptionError::io(root, err))
        });
        assert_eq!(option.name(), "marker");
        assert!(format!("{option:?}").contains("marker"));
    }
}
