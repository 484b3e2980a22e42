use std::time::Duration;

/// Configuration carried through one run of an executor.
///
/// Handed to [`TransactionalExecutor`](crate::TransactionalExecutor) at
/// construction and read-only from then on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    preview_only: bool,
    command_timeout: Option<Duration>,
}

impl ExecutionContext {
    pub const fn new() -> Self {
        Self {
            preview_only: false,
            command_timeout: None,
        }
    }

    /// A context that reports SQL but never runs it.
    pub const fn preview() -> Self {
        Self {
            preview_only: true,
            command_timeout: None,
        }
    }

    pub const fn with_preview_only(mut self, preview_only: bool) -> Self {
        self.preview_only = preview_only;
        self
    }

    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    #[inline]
    pub const fn preview_only(&self) -> bool {
        self.preview_only
    }

    #[inline]
    pub const fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }
}
