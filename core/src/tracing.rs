//! Tracing utilities for statement and transaction observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and the operation that ran it.
///
/// ```ignore
/// sluice_trace_query!(&sql, "exists");
/// ```
#[macro_export]
macro_rules! sluice_trace_query {
    ($sql:expr, $operation:literal) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, operation = $operation, "sluice.query");
    };
}

/// Emit an info-level tracing event for transaction lifecycle (begin, commit, rollback).
///
/// ```ignore
/// sluice_trace_tx!("begin", self.capabilities().dialect);
/// ```
#[macro_export]
macro_rules! sluice_trace_tx {
    ($event:literal, $dialect:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(event = $event, dialect = %$dialect, "sluice.transaction");
    };
}

/// Emit a warn-level event for conditions that are reported rather than raised.
///
/// ```ignore
/// sluice_trace_warn!("nothing to roll back");
/// ```
#[macro_export]
macro_rules! sluice_trace_warn {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)+);
        #[cfg(not(feature = "tracing"))]
        $crate::__sluice_discard!($($arg)+);
    };
}

/// Borrows every field value of a tracing call so that disabling the
/// `tracing` feature leaves no unused bindings behind.
#[doc(hidden)]
#[macro_export]
macro_rules! __sluice_discard {
    () => {};
    ($field:ident = % $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $($crate::__sluice_discard!($($rest)*);)?
    };
    ($field:ident = ? $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $($crate::__sluice_discard!($($rest)*);)?
    };
    ($field:ident = $value:expr $(, $($rest:tt)*)?) => {
        let _ = &$value;
        $($crate::__sluice_discard!($($rest)*);)?
    };
    ($message:literal $(, $arg:expr)* $(,)?) => {
        $(let _ = &$arg;)*
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn warn_consumes_fields_and_message_arguments() {
        let error = "disk full";
        let attempts = 3;
        crate::sluice_trace_warn!(error = %error, attempts = attempts, "gave up after {} tries", attempts);
        crate::sluice_trace_warn!(reason = ?error, "rollback failed");
        crate::sluice_trace_warn!("nothing to roll back");
    }
}
