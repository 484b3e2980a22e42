//! Connection and transaction lifecycle.
//!
//! A [`TransactionalExecutor`] exclusively owns one [`Session`] and at most one
//! open transaction on it. Statement execution lives in `runner`, existence
//! checks in `introspect` and reads in `reader`; all of them operate inside
//! the transaction managed here.

use crate::context::ExecutionContext;
use crate::dialect::Capabilities;
use crate::error::Result;
use crate::session::Session;
use crate::sink::{SqlSink, TracingSink};
use crate::{sluice_trace_tx, sluice_trace_warn};

/// Where the executor's transaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    NoTransaction,
    Active,
    Committed,
    RolledBack,
}

/// Owns a session and drives the begin → commit/rollback lifecycle on it.
pub struct TransactionalExecutor<S: Session> {
    pub(crate) session: S,
    pub(crate) context: ExecutionContext,
    pub(crate) sink: Box<dyn SqlSink>,
    state: TransactionState,
    was_committed: bool,
    disposed: bool,
}

impl<S: Session> TransactionalExecutor<S> {
    /// Creates an executor over `session`. The session is opened lazily.
    pub fn new(session: S, context: ExecutionContext) -> Self {
        Self {
            session,
            context,
            sink: Box::new(TracingSink),
            state: TransactionState::NoTransaction,
            was_committed: false,
            disposed: false,
        }
    }

    /// Replaces the audit sink that sees every statement.
    pub fn with_sink(mut self, sink: impl SqlSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Runs `f` with a fresh executor and disposes it on every exit path.
    ///
    /// The closure decides whether to commit or roll back; whatever is still
    /// open when it returns is released by the disposal.
    pub fn scope<R>(
        session: S,
        context: ExecutionContext,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let mut executor = Self::new(session, context);
        let result = f(&mut executor);
        let disposed = executor.dispose();
        let value = result?;
        disposed?;
        Ok(value)
    }

    /// Runs `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if !self.in_transaction() {
            self.begin_transaction()?;
        }
        match f(self) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.rollback_transaction() {
                    sluice_trace_warn!(error = %rollback, "rollback after failed transaction body also failed");
                }
                Err(e)
            }
        }
    }

    #[inline]
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.session.capabilities()
    }

    #[inline]
    pub fn session(&self) -> &S {
        &self.session
    }

    #[inline]
    pub fn is_session_open(&self) -> bool {
        self.session.is_open()
    }

    #[inline]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    #[inline]
    pub fn in_transaction(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Whether the run has concluded through commit or rollback. Set on
    /// rollback too: it means "run concluded", not "data kept".
    #[inline]
    pub fn was_committed(&self) -> bool {
        self.was_committed
    }

    /// Opens the session if needed and starts a new transaction.
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.ensure_open()?;
        sluice_trace_tx!("begin", self.capabilities().dialect);
        self.session.begin()?;
        self.state = TransactionState::Active;
        Ok(())
    }

    /// Commits the active transaction, if any, and closes the session.
    ///
    /// Committing with no transaction is not an error; the run is still
    /// recorded as committed.
    pub fn commit_transaction(&mut self) -> Result<()> {
        sluice_trace_tx!("commit", self.capabilities().dialect);
        if self.in_transaction() {
            self.session.commit()?;
            self.state = TransactionState::Committed;
        }
        self.was_committed = true;
        self.close_session()
    }

    /// Rolls back the active transaction and closes the session.
    ///
    /// With no active transaction this only reports that there was nothing to
    /// roll back and returns.
    pub fn rollback_transaction(&mut self) -> Result<()> {
        if !self.in_transaction() {
            sluice_trace_warn!(
                dialect = %self.capabilities().dialect,
                "no transaction was available to roll back"
            );
            return Ok(());
        }

        sluice_trace_tx!("rollback", self.capabilities().dialect);
        // The transaction is over whether or not the driver reports success.
        self.state = TransactionState::RolledBack;
        let rolled_back = self.session.rollback();
        self.was_committed = true;
        let closed = self.close_session();
        rolled_back?;
        closed
    }

    /// Releases the session. Safe to call any number of times; only the first
    /// call does anything.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        if self.in_transaction() {
            sluice_trace_warn!("disposing executor with an open transaction; rolling back");
            self.state = TransactionState::RolledBack;
            if let Err(e) = self.session.rollback() {
                sluice_trace_warn!(error = %e, "rollback during dispose failed");
            }
        }
        self.close_session()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The single guard every session-touching operation goes through.
    pub(crate) fn ensure_open(&mut self) -> Result<()> {
        if !self.session.is_open() {
            self.session.open()?;
        }
        Ok(())
    }

    /// Opens the session and auto-begins a transaction when none is active.
    pub(crate) fn ensure_transaction(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !self.in_transaction() {
            self.begin_transaction()?;
        }
        Ok(())
    }

    fn close_session(&mut self) -> Result<()> {
        if self.session.is_open() {
            self.session.close()?;
        }
        Ok(())
    }
}

impl<S: Session> Drop for TransactionalExecutor<S> {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if self.session.is_open() {
            sluice_trace_warn!("executor dropped without dispose; releasing session");
        }
        if let Err(e) = self.dispose() {
            sluice_trace_warn!(error = %e, "releasing session on drop failed");
        }
    }
}

impl<S: Session + core::fmt::Debug> core::fmt::Debug for TransactionalExecutor<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransactionalExecutor")
            .field("session", &self.session)
            .field("context", &self.context)
            .field("state", &self.state)
            .field("was_committed", &self.was_committed)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
