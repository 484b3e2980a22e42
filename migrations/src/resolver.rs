//! Resolves a script reference to a revision-qualified local file.
//!
//! `scripts\seed.sql` at revision 12 becomes `scripts\seed_12.sql`, placed under
//! the working directory. When source control is configured the file is
//! exported there first; otherwise it is assumed to already exist.
//!
//! Script paths may use either `/` or `\` as separator regardless of platform,
//! so path splitting is done on the string rather than through [`Path`].

use std::fs;
use std::path::{Path, PathBuf};

use sluice_core::{Result, SluiceError};

use crate::client::{SourceControlClient, SvnClient};
use crate::revision::Revision;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Outcome of one resolution. Not retained: hand `resolved_path` (or
/// [`full_path`](Self::full_path)) to the execution path and drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReference {
    pub original_path: String,
    pub revision: Revision,
    /// Revision-qualified path, relative in the same form as `original_path`.
    pub resolved_path: String,
}

impl ScriptReference {
    /// `resolved_path` joined onto `working_dir`.
    pub fn full_path(&self, working_dir: &Path) -> PathBuf {
        join_relative(working_dir, &self.resolved_path)
    }
}

/// Builds `dir/base_<revision>.ext`, keeping the directory part exactly as written.
pub fn revision_script_path(original_path: &str, revision: &Revision) -> String {
    let (directory, file_name) = match original_path.rfind(is_separator) {
        Some(idx) => original_path.split_at(idx + 1),
        None => ("", original_path),
    };
    let (base, extension) = match file_name.rfind('.') {
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    };
    format!("{directory}{base}_{revision}{extension}")
}

/// Strips one leading separator and converts `\` to `/` for the remote request.
pub fn remote_script_path(original_path: &str) -> String {
    let trimmed = original_path
        .strip_prefix(is_separator)
        .unwrap_or(original_path);
    trimmed.replace('\\', "/")
}

/// Joins a `/`- or `\`-separated relative path onto `base`, component by component.
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |path, part| path.join(part))
}

/// Computes revision-qualified script files and fetches them through a
/// [`SourceControlClient`].
#[derive(Debug)]
pub struct ScriptRevisionResolver<C = SvnClient> {
    working_dir: PathBuf,
    client: C,
}

impl ScriptRevisionResolver<SvnClient> {
    /// Resolver using the default Subversion client, configured from
    /// `working_dir/sourcecontrol.txt`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Result<Self> {
        let working_dir = working_dir.into();
        let client = SvnClient::from_working_dir(&working_dir)?;
        Ok(Self::with_client(working_dir, client))
    }
}

impl<C: SourceControlClient> ScriptRevisionResolver<C> {
    pub fn with_client(working_dir: impl Into<PathBuf>, client: C) -> Self {
        Self {
            working_dir: working_dir.into(),
            client,
        }
    }

    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    #[inline]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[inline]
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Resolves `original_path` at `revision`.
    ///
    /// With source control configured, the destination directory is created
    /// and the file is exported into it; a failed export surfaces as
    /// [`SluiceError::Resolution`] and can simply be retried. Without source
    /// control no request is made and the file is expected to be present.
    ///
    /// Paths with a `..` component are rejected so the export cannot land
    /// outside the working directory.
    pub fn resolve(
        &self,
        original_path: &str,
        revision: impl Into<Revision>,
    ) -> Result<ScriptReference> {
        if original_path.split(is_separator).any(|part| part == "..") {
            return Err(SluiceError::Resolution(format!(
                "script path {original_path} escapes the working directory"
            )));
        }

        let revision = revision.into();
        let resolved_path = revision_script_path(original_path, &revision);
        let full_path = join_relative(&self.working_dir, &resolved_path);

        if self.client.settings().is_some() {
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    SluiceError::Resolution(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }

            let remote_path = remote_script_path(original_path);
            #[cfg(feature = "tracing")]
            tracing::debug!(remote = %remote_path, revision = %revision, local = %full_path.display(), "fetching script");
            self.client.get_file(&remote_path, &revision, &full_path)?;
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(local = %full_path.display(), "source control not configured; using local script");
        }

        Ok(ScriptReference {
            original_path: original_path.to_string(),
            revision,
            resolved_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_is_spliced_before_the_extension() {
        let rev = Revision::from(1u64);
        assert_eq!(revision_script_path(r"\Foo\test.sql", &rev), r"\Foo\test_1.sql");
        assert_eq!(revision_script_path(r"Foo\test.sql", &rev), r"Foo\test_1.sql");
        assert_eq!(revision_script_path("Foo/test.sql", &rev), "Foo/test_1.sql");
        assert_eq!(revision_script_path("test.sql", &rev), "test_1.sql");
        assert_eq!(revision_script_path("Makefile", &rev), "Makefile_1");
        assert_eq!(
            revision_script_path("data/seed.tar.gz", &Revision::from("HEAD")),
            "data/seed.tar_HEAD.gz"
        );
    }

    #[test]
    fn remote_path_drops_one_leading_separator() {
        assert_eq!(remote_script_path(r"\Foo\test.sql"), "Foo/test.sql");
        assert_eq!(remote_script_path(r"Foo\test.sql"), "Foo/test.sql");
        assert_eq!(remote_script_path("/Foo/test.sql"), "Foo/test.sql");
        assert_eq!(remote_script_path(r"\\share\test.sql"), "/share/test.sql");
    }

    #[test]
    fn relative_join_normalizes_separators() {
        let base = Path::new("/work");
        assert_eq!(
            join_relative(base, r"\Foo\test_1.sql"),
            Path::new("/work").join("Foo").join("test_1.sql")
        );
        assert_eq!(
            join_relative(base, "Foo/bar\\x.sql"),
            Path::new("/work").join("Foo").join("bar").join("x.sql")
        );
    }
}
