//! Source-control clients that fetch one file at one revision.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use sluice_core::{Result, SluiceError};

use crate::revision::Revision;
use crate::settings::SourceControlSettings;

/// Backend-independent access to a source-control system.
pub trait SourceControlClient {
    /// `None` when source control is not configured.
    fn settings(&self) -> Option<&SourceControlSettings>;

    fn set_settings(&mut self, settings: Option<SourceControlSettings>);

    /// Fetches `remote_path` (relative to the base URI, `/`-separated) at
    /// `revision` into `destination`, overwriting whatever is there.
    fn get_file(&self, remote_path: &str, revision: &Revision, destination: &Path) -> Result<()>;
}

/// Subversion client that shells out to `svn export`.
#[derive(Debug, Clone)]
pub struct SvnClient {
    settings: Option<SourceControlSettings>,
    program: OsString,
}

impl SvnClient {
    /// Client with settings read once from `working_dir/sourcecontrol.txt`.
    pub fn from_working_dir(working_dir: &Path) -> Result<Self> {
        Ok(Self::with_settings(SourceControlSettings::load(working_dir)?))
    }

    pub fn with_settings(settings: Option<SourceControlSettings>) -> Self {
        Self {
            settings,
            program: OsString::from("svn"),
        }
    }

    /// Uses a specific `svn` executable instead of the one on `PATH`.
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    fn export_command(&self, url: &str, revision: &Revision, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("export")
            .arg("--force")
            .arg("--quiet")
            .arg("--non-interactive")
            .arg("-r")
            .arg(revision.to_string())
            .arg(url)
            .arg(destination);
        cmd
    }
}

impl SourceControlClient for SvnClient {
    fn settings(&self) -> Option<&SourceControlSettings> {
        self.settings.as_ref()
    }

    fn set_settings(&mut self, settings: Option<SourceControlSettings>) {
        self.settings = settings;
    }

    fn get_file(&self, remote_path: &str, revision: &Revision, destination: &Path) -> Result<()> {
        let settings = self.settings.as_ref().ok_or_else(|| {
            SluiceError::Resolution("source control is not configured".to_string())
        })?;
        let url = settings.remote_uri(remote_path);

        #[cfg(feature = "tracing")]
        tracing::info!(url = %url, revision = %revision, destination = %destination.display(), "svn export");

        let output = self
            .export_command(&url, revision, destination)
            .output()
            .map_err(|e| {
                SluiceError::Resolution(format!(
                    "failed to run {}: {e}",
                    self.program.to_string_lossy()
                ))
            })?;

        if !output.status.success() {
            return Err(SluiceError::Resolution(format!(
                "svn export of {url}@{revision} failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_command_pins_the_revision() {
        let client = SvnClient::with_settings(Some(SourceControlSettings::new("svn://test.com")));
        let cmd = client.export_command(
            "svn://test.com/Foo/test.sql",
            &Revision::from(12u64),
            Path::new("/tmp/Foo/test_12.sql"),
        );

        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "svn");
        assert_eq!(
            args,
            [
                "export",
                "--force",
                "--quiet",
                "--non-interactive",
                "-r",
                "12",
                "svn://test.com/Foo/test.sql",
                "/tmp/Foo/test_12.sql",
            ]
        );
    }

    #[test]
    fn unconfigured_client_refuses_to_fetch() {
        let client = SvnClient::with_settings(None);
        let err = client
            .get_file("Foo/test.sql", &Revision::from(1u64), Path::new("unused.sql"))
            .unwrap_err();
        assert!(matches!(err, SluiceError::Resolution(_)));
    }

    #[test]
    fn missing_executable_is_a_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = SvnClient::with_settings(Some(SourceControlSettings::new("svn://test.com")))
            .program(dir.path().join("no-such-svn"));

        let err = client
            .get_file("Foo/test.sql", &Revision::from(1u64), &dir.path().join("out.sql"))
            .unwrap_err();
        assert!(matches!(err, SluiceError::Resolution(_)));
        assert!(!dir.path().join("out.sql").exists());
    }

    #[test]
    fn settings_are_settable() {
        let mut client = SvnClient::with_settings(None);
        assert!(client.settings().is_none());

        client.set_settings(Some(SourceControlSettings::new("svn://repo")));
        assert_eq!(client.settings().map(|s| s.base_uri.as_str()), Some("svn://repo"));
    }
}
