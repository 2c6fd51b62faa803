/// Filesystem helpers shared by the provisioner.
pub mod fs {
    use std::fs;
    use std::io;

    use camino::{Utf8Path, Utf8PathBuf};

    /// Ensure a directory exists, creating it recursively if needed.
    pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
        if !path.is_dir() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Make `path` absolute against the current directory without
    /// resolving symlinks.
    pub fn absolute(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_owned());
        }
        let abs = std::path::absolute(path)?;
        Utf8PathBuf::from_path_buf(abs).map_err(|abs| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8", abs.display()),
            )
        })
    }

}
