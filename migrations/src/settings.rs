//! Source-control settings read from `sourcecontrol.txt`.

use std::fs;
use std::path::Path;

use sluice_core::{Result, SluiceError};

/// File in the working directory whose first line is the repository base URI.
pub const SETTINGS_FILE: &str = "sourcecontrol.txt";

/// Where in the source-control system script paths are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceControlSettings {
    pub base_uri: String,
}

impl SourceControlSettings {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    /// Reads `sourcecontrol.txt` from `working_dir`.
    ///
    /// A missing file, or one whose first line is blank, means source control
    /// is not configured and yields `Ok(None)`.
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let path = working_dir.join(SETTINGS_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            SluiceError::Resolution(format!("failed to read {}: {e}", path.display()))
        })?;

        Ok(contents
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::new))
    }

    /// Joins the base URI and a normalized relative path with exactly one `/`.
    pub fn remote_uri(&self, remote_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_uri.trim_end_matches('/'),
            remote_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_line_as_base_uri() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "svn://test.com\nignored\n").unwrap();

        let settings = SourceControlSettings::load(dir.path()).unwrap();
        assert_eq!(settings, Some(SourceControlSettings::new("svn://test.com")));
    }

    #[test]
    fn missing_file_means_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SourceControlSettings::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn blank_first_line_means_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "  \n").unwrap();
        assert_eq!(SourceControlSettings::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn remote_uri_never_doubles_the_separator() {
        let plain = SourceControlSettings::new("svn://test.com/repo");
        let trailing = SourceControlSettings::new("svn://test.com/repo/");

        assert_eq!(plain.remote_uri("Foo/test.sql"), "svn://test.com/repo/Foo/test.sql");
        assert_eq!(trailing.remote_uri("Foo/test.sql"), "svn://test.com/repo/Foo/test.sql");
        assert_eq!(trailing.remote_uri("/Foo/test.sql"), "svn://test.com/repo/Foo/test.sql");
    }
}
