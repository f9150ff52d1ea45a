//! Facilities for discovering input files and loading text corpora.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{Result, SubtokError};

/// Discovers files rooted at the provided input paths according to the ingest
/// configuration.
///
/// Directories are traversed recursively by default; set
/// [`IngestConfig::recursive`] to `false` to limit discovery to the first
/// level. Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`]. The discovered paths are sorted so the
/// corpus loads in a reproducible order.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SubtokError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| SubtokError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            if cfg.recursive {
                let walker = WalkDir::new(path).follow_links(cfg.follow_symlinks);
                for entry in walker {
                    let entry =
                        entry.map_err(|err| SubtokError::io(err.into(), Some(path.to_path_buf())))?;
                    if entry.file_type().is_file() {
                        files.push(entry.path().to_path_buf());
                    }
                }
            } else {
                for entry in fs::read_dir(path)
                    .map_err(|err| SubtokError::io(err, Some(path.to_path_buf())))?
                {
                    let entry =
                        entry.map_err(|err| SubtokError::io(err, Some(path.to_path_buf())))?;
                    let entry_path = entry.path();
                    if entry_path.is_file() {
                        files.push(entry_path);
                    }
                }
            }
        } else if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(SubtokError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    files.sort();
    Ok(files)
}

/// Loads UTF-8 text corpora into a single training string.
///
/// Files are loaded in path order and joined with newlines; files whose
/// contents are empty are skipped. Inputs that are not valid UTF-8 surface as
/// I/O errors carrying the offending path.
pub fn load_text_corpus<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<String> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut parts = Vec::with_capacity(file_paths.len());
    for file_path in file_paths {
        let contents = fs::read_to_string(&file_path)
            .map_err(|err| SubtokError::io(err, Some(file_path.clone())))?;
        if !contents.is_empty() {
            parts.push(contents);
        }
    }
    if parts.is_empty() {
        return Err(SubtokError::InvalidConfig(
            "no text could be loaded from provided inputs".into(),
        ));
    }
    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn collect_paths_discovers_files_recursively() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested directory");
        let file_a = dir.path().join("a.txt");
        let file_b = nested.join("b.txt");
        fs::write(&file_a, "alpha").expect("write a");
        fs::write(&file_b, "beta").expect("write b");

        let cfg = IngestConfig::default();
        let paths = collect_paths(&[dir.path()], &cfg).expect("collect paths");
        assert_eq!(paths, vec![file_a, file_b]);
    }

    #[test]
    fn collect_paths_can_stay_at_the_first_level() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested directory");
        fs::write(dir.path().join("a.txt"), "alpha").expect("write a");
        fs::write(nested.join("b.txt"), "beta").expect("write b");

        let cfg = IngestConfig {
            recursive: false,
            ..IngestConfig::default()
        };
        let paths = collect_paths(&[dir.path()], &cfg).expect("collect paths");
        assert_eq!(paths, vec![dir.path().join("a.txt")]);
    }

    #[test]
    fn missing_inputs_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("absent.txt");
        let result = collect_paths(&[missing], &IngestConfig::default());
        assert!(matches!(result, Err(SubtokError::InvalidConfig(_))));
    }

    #[test]
    fn corpus_files_are_joined_with_newlines() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "alpha beta").expect("write a");
        fs::write(dir.path().join("b.txt"), "gamma").expect("write b");

        let corpus =
            load_text_corpus(&[dir.path()], &IngestConfig::default()).expect("load corpus");
        assert_eq!(corpus, "alpha beta\ngamma");
    }

    #[test]
    fn corpora_with_only_empty_files_are_rejected() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "").expect("write a");

        let result = load_text_corpus(&[dir.path()], &IngestConfig::default());
        assert!(matches!(result, Err(SubtokError::InvalidConfig(_))));
    }
}
