use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// SQLite sidecar files that must go together with the main database file
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Delete a database file and its sidecars. Missing files are not an error.
pub fn remove_database_files(db_path: &Path) -> std::io::Result<()> {
    remove_if_exists(db_path)?;
    for suffix in SIDECAR_SUFFIXES {
        remove_if_exists(&sidecar_path(db_path, suffix))?;
    }
    Ok(())
}

/// Create the directory a database file lives in
pub fn ensure_parent_dir(db_path: &Path) -> std::io::Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

pub fn csv_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(file_name)
}

fn sidecar_path(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_database_files() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nfsn.db");
        fs::write(&db, b"x").unwrap();
        fs::write(dir.path().join("nfsn.db-wal"), b"x").unwrap();

        remove_database_files(&db).unwrap();
        assert!(!db.exists());
        assert!(!dir.path().join("nfsn.db-wal").exists());

        // second call is a no-op
        remove_database_files(&db).unwrap();
    }

    #[test]
    fn test_ensure_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("data").join("nfsn.db");
        ensure_parent_dir(&db).unwrap();
        assert!(dir.path().join("nested").join("data").is_dir());

        ensure_parent_dir(Path::new("nfsn.db")).unwrap();
    }

    #[test]
    fn test_csv_path() {
        assert_eq!(
            csv_path(Path::new("contoso"), "customer.csv"),
            PathBuf::from("contoso/customer.csv")
        );
    }
}
