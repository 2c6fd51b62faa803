use std::fs;
use std::io;

use camino::Utf8Path;

/// Count every directory strictly below `root`. Symlinks are not followed.
pub fn count_dirs_below(root: &Utf8Path) -> io::Result<usize> {
    let mut count = 0;
    walk_dirs(root.as_std_path(), 0, &mut |_| count += 1)?;
    Ok(count)
}

/// Depth of the deepest directory below `root`; `0` when `root` has no
/// subdirectories.
pub fn max_depth_below(root: &Utf8Path) -> io::Result<usize> {
    let mut deepest = 0;
    walk_dirs(root.as_std_path(), 0, &mut |depth| deepest = deepest.max(depth))?;
    Ok(deepest)
}

fn walk_dirs(
    path: &std::path::Path,
    depth: usize,
    visit: &mut dyn FnMut(usize),
) -> io::Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        // file_type does not traverse symlinks
        if entry.file_type()?.is_dir() {
            visit(depth + 1);
            walk_dirs(&entry.path(), depth + 1, visit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn counts_branches_and_ignores_files() {
        let root = Utf8PathBuf::from_path_buf(tempfile::tempdir().unwrap().keep()).unwrap();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("x")).unwrap();
        fs::write(root.join("a/file.txt"), b"data").unwrap();

        assert_eq!(count_dirs_below(&root).unwrap(), 4);
        assert_eq!(max_depth_below(&root).unwrap(), 3);
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn empty_root_has_nothing_below() {
        let root = Utf8PathBuf::from_path_buf(tempfile::tempdir().unwrap().keep()).unwrap();
        assert_eq!(count_dirs_below(&root).unwrap(), 0);
        assert_eq!(max_depth_below(&root).unwrap(), 0);
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = count_dirs_below(Utf8Path::new("/nonexistent/tutil-walk")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
