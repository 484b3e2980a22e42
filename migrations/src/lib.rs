//! # sluice-migrations
//!
//! Resolution of version-controlled migration scripts.
//!
//! A migration can reference a script at a specific revision. The
//! [`ScriptRevisionResolver`] derives the revision-qualified local file,
//! exports it from source control when `sourcecontrol.txt` configures a
//! repository, and hands back a [`ScriptReference`] whose path goes through
//! the same execution path as any other script:
//!
//! ```ignore
//! use sluice_migrations::ScriptRevisionResolver;
//!
//! let resolver = ScriptRevisionResolver::new("./migrations")?;
//! let script = resolver.resolve(r"\scripts\seed.sql", 1042u64)?;
//! executor.execute_script(script.full_path(resolver.working_dir()))?;
//! ```

pub mod client;
pub mod resolver;
pub mod revision;
pub mod settings;

pub use client::{SourceControlClient, SvnClient};
pub use resolver::{ScriptReference, ScriptRevisionResolver, remote_script_path, revision_script_path};
pub use revision::Revision;
pub use settings::{SETTINGS_FILE, SourceControlSettings};
