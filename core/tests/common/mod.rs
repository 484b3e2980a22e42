//! A recording, scriptable `Session` for exercising the executor without a database.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use sluice_core::{Capabilities, ColumnMeta, DataTable, Result, Session, SluiceError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    Close,
    Begin,
    Commit,
    Rollback,
    Execute(String, Option<Duration>),
    Query(String),
    Describe(String),
    HasRows(String),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub open: bool,
    pub calls: Vec<Call>,
    pub fail_open: bool,
    pub fail_rollback: bool,
    pub fail_execute: Option<String>,
    pub rows: HashMap<String, DataTable>,
    pub existing: Vec<String>,
    pub described: HashMap<String, Vec<ColumnMeta>>,
}

#[derive(Debug, Clone)]
pub struct FakeSession {
    caps: Capabilities,
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeSession {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            state: Rc::new(RefCell::new(FakeState::default())),
        }
    }

    pub fn sqlite() -> Self {
        Self::new(Capabilities::sqlite())
    }

    pub fn postgres() -> Self {
        Self::new(Capabilities::postgres())
    }

    /// Makes `sql` yield a row when probed.
    pub fn answer(&self, sql: impl Into<String>) {
        self.state.borrow_mut().existing.push(sql.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Execute(sql, _) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Session for FakeSession {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn open(&mut self) -> Result<()> {
        self.record(Call::Open);
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(SluiceError::Connection("refused".to_string()));
        }
        state.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.record(Call::Close);
        self.state.borrow_mut().open = false;
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.record(Call::Begin);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.record(Call::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.record(Call::Rollback);
        if self.state.borrow().fail_rollback {
            return Err(SluiceError::Transaction("no transaction is active".to_string()));
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str, timeout: Option<Duration>) -> Result<u64> {
        self.record(Call::Execute(sql.to_string(), timeout));
        match &self.state.borrow().fail_execute {
            Some(reason) => Err(SluiceError::Query(reason.clone())),
            None => Ok(1),
        }
    }

    fn query(&mut self, sql: &str) -> Result<DataTable> {
        self.record(Call::Query(sql.to_string()));
        self.state
            .borrow()
            .rows
            .get(sql)
            .cloned()
            .ok_or_else(|| SluiceError::Query(format!("no such table in: {sql}")))
    }

    fn describe(&mut self, sql: &str) -> Result<Vec<ColumnMeta>> {
        self.record(Call::Describe(sql.to_string()));
        self.state
            .borrow()
            .described
            .get(sql)
            .cloned()
            .ok_or_else(|| SluiceError::Query(format!("no such table in: {sql}")))
    }

    fn has_rows(&mut self, sql: &str) -> Result<bool> {
        self.record(Call::HasRows(sql.to_string()));
        Ok(self.state.borrow().existing.iter().any(|s| s == sql))
    }
}

/// A sink that keeps every reported statement.
pub fn recording_sink() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + 'static) {
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let reported = Rc::clone(&reported);
        move |sql: &str| reported.borrow_mut().push(sql.to_string())
    };
    (reported, sink)
}
