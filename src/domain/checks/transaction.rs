use std::fmt::Display;

use super::{Check, CheckInput, SemanticChecks, Verbosity};

/// One evaluated check inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub valid: bool,
    pub field: String,
    pub message: Option<String>,
}

/// Result of validating a batch of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Silent(bool),
    Verbose(Vec<String>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        match self {
            Validation::Silent(flag) => *flag,
            Validation::Verbose(messages) => messages.is_empty(),
        }
    }

    /// Failure messages; always empty for a silent validation.
    pub fn messages(&self) -> &[String] {
        match self {
            Validation::Silent(_) => &[],
            Validation::Verbose(messages) => messages,
        }
    }

    pub fn into_messages(self) -> Vec<String> {
        match self {
            Validation::Silent(_) => Vec::new(),
            Validation::Verbose(messages) => messages,
        }
    }
}

/// Accumulator for a batch of checks.
///
/// Checks never short-circuit: every call is evaluated and recorded, so the caller sees
/// every problem at once.
#[derive(Debug)]
pub struct CheckTransaction<'a> {
    rules: &'a SemanticChecks,
    records: Vec<CheckRecord>,
}

impl<'a> CheckTransaction<'a> {
    pub(crate) fn new(rules: &'a SemanticChecks) -> Self {
        Self { rules, records: Vec::new() }
    }

    /// Record the outcome of an arbitrary check. Returns whether it passed.
    pub fn record(&mut self, field: &str, check: Check) -> bool {
        let valid = check.passed();
        self.records.push(CheckRecord {
            valid,
            field: field.to_string(),
            message: check.into_message(),
        });
        valid
    }

    /// Record a failure computed outside the rule library.
    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.record(field, Check::Fail(message.into()));
    }

    pub fn ipv4(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.ipv4(value, field);
        self.record(field, check)
    }

    pub fn ipv4_in_network_cidr(
        &mut self,
        value: impl CheckInput,
        network: &str,
        field: &str,
    ) -> bool {
        let check = self.rules.ipv4_in_network_cidr(value, network, field);
        self.record(field, check)
    }

    pub fn hostname(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.hostname(value, field);
        self.record(field, check)
    }

    pub fn identifier(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.identifier(value, field);
        self.record(field, check)
    }

    pub fn sap_sid(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.sap_sid(value, field);
        self.record(field, check)
    }

    pub fn sap_instance_number(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.sap_instance_number(value, field);
        self.record(field, check)
    }

    pub fn nonneg_integer(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.nonneg_integer(value, field);
        self.record(field, check)
    }

    pub fn integer_in_range(
        &mut self,
        value: impl CheckInput,
        low: i64,
        high: i64,
        message: Option<&str>,
        field: &str,
    ) -> bool {
        let check = self.rules.integer_in_range(value, low, high, message, field);
        self.record(field, check)
    }

    pub fn port(&mut self, value: impl CheckInput, field: &str) -> bool {
        let check = self.rules.port(value, field);
        self.record(field, check)
    }

    pub fn element_in_set<T>(
        &mut self,
        value: &T,
        set: &[T],
        message: Option<&str>,
        field: &str,
    ) -> bool
    where
        T: PartialEq + Display,
    {
        let check = self.rules.element_in_set(value, set, message, field);
        self.record(field, check)
    }

    pub fn not_equal<T>(&mut self, left: &T, right: &T, message: Option<&str>, field: &str) -> bool
    where
        T: PartialEq + Display,
    {
        let check = self.rules.not_equal(left, right, message, field);
        self.record(field, check)
    }

    pub fn unique<T: Ord>(&mut self, values: &[T], message: Option<&str>, field: &str) -> bool {
        let check = self.rules.unique(values, message, field);
        self.record(field, check)
    }

    pub fn not_unique<T: Ord>(&mut self, values: &[T], message: Option<&str>, field: &str) -> bool {
        let check = self.rules.not_unique(values, message, field);
        self.record(field, check)
    }

    pub fn non_empty<T>(&mut self, values: &[T], message: Option<&str>, field: &str) -> bool {
        let check = self.rules.non_empty(values, message, field);
        self.record(field, check)
    }

    /// Every recorded check, in evaluation order.
    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    /// True iff every recorded check passed (an empty transaction is valid).
    pub fn finish_silent(self) -> bool {
        self.records.iter().all(|r| r.valid)
    }

    /// Failure messages in evaluation order; empty means valid.
    pub fn finish_verbose(self) -> Vec<String> {
        self.records.into_iter().filter(|r| !r.valid).filter_map(|r| r.message).collect()
    }

    pub fn finish(self, verbosity: Verbosity) -> Validation {
        match verbosity {
            Verbosity::Silent => Validation::Silent(self.finish_silent()),
            Verbosity::Verbose => Validation::Verbose(self.finish_verbose()),
        }
    }
}
