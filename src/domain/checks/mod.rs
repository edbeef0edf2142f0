//! Semantic checks for configuration fields.
//!
//! Every check is both a predicate and an explanation: it returns a [`Check`] that can be
//! read as a boolean (`passed`) or as an optional failure message (`message`). Batches of
//! checks are accumulated with a [`CheckTransaction`].

mod input;
mod transaction;

use std::collections::BTreeSet;
use std::fmt::Display;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use regex::Regex;

pub use input::CheckInput;
pub use transaction::{CheckRecord, CheckTransaction, Validation};

/// SAP system identifiers that must not be used for an installation.
pub const RESERVED_SIDS: &[&str] = &[
    "ADD", "ALL", "AMD", "AND", "ANY", "ARE", "ASC", "AUX", "AVG", "BIT", "CDC", "COM", "CON",
    "DBA", "END", "EPS", "FOR", "GET", "GID", "IBM", "INT", "KEY", "LOG", "LPT", "MAP", "MAX",
    "MIN", "MON", "NIX", "NOT", "NUL", "OFF", "OLD", "OMS", "OUT", "PAD", "PRN", "RAW", "REF",
    "ROW", "SAP", "SET", "SGA", "SHG", "SID", "SQL", "SUM", "SYS", "TMP", "TOP", "UID", "USE",
    "USR", "VAR",
];

const HOSTNAME_MAX_LEN: usize = 63;

/// How validation results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only a yes/no answer.
    Silent,
    /// Every failure message, in check order.
    #[default]
    Verbose,
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Check {
    Pass,
    Fail(String),
}

impl Check {
    fn from_flag(flag: bool, message: impl FnOnce() -> String) -> Self {
        if flag { Check::Pass } else { Check::Fail(message()) }
    }

    /// Silent view: did the check pass?
    pub fn passed(&self) -> bool {
        matches!(self, Check::Pass)
    }

    /// Verbose view: the failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Check::Pass => None,
            Check::Fail(message) => Some(message),
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self {
            Check::Pass => None,
            Check::Fail(message) => Some(message),
        }
    }
}

/// Library of semantic checks.
///
/// Constructed once and passed by reference to every section that validates.
#[derive(Debug, Clone)]
pub struct SemanticChecks {
    reserved_sids: BTreeSet<&'static str>,
    hostname: Regex,
    identifier: Regex,
    sap_sid: Regex,
    instance_number: Regex,
}

impl Default for SemanticChecks {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticChecks {
    pub fn new() -> Self {
        Self {
            reserved_sids: RESERVED_SIDS.iter().copied().collect(),
            hostname: compile(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$"),
            identifier: compile(r"^[A-Za-z0-9][A-Za-z0-9_-]*$"),
            sap_sid: compile(r"^[A-Z][A-Z0-9]{2}$"),
            instance_number: compile(r"^[0-9]{2}$"),
        }
    }

    /// Start an accumulating batch of checks.
    pub fn transaction(&self) -> CheckTransaction<'_> {
        CheckTransaction::new(self)
    }

    /// Run a batch of checks and report whether all of them passed.
    pub fn silent_check<F>(&self, checks: F) -> bool
    where
        F: FnOnce(&mut CheckTransaction<'_>),
    {
        let mut tx = self.transaction();
        checks(&mut tx);
        tx.finish_silent()
    }

    /// Run a batch of checks and collect the failure messages.
    pub fn verbose_check<F>(&self, checks: F) -> Vec<String>
    where
        F: FnOnce(&mut CheckTransaction<'_>),
    {
        let mut tx = self.transaction();
        checks(&mut tx);
        tx.finish_verbose()
    }

    /// Run a batch of checks and report according to `verbosity`.
    pub fn check<F>(&self, verbosity: Verbosity, checks: F) -> Validation
    where
        F: FnOnce(&mut CheckTransaction<'_>),
    {
        let mut tx = self.transaction();
        checks(&mut tx);
        tx.finish(verbosity)
    }

    /// Dotted-quad IPv4 address.
    pub fn ipv4(&self, value: impl CheckInput, field: &str) -> Check {
        let text = value.is_text();
        let value = value.as_input();
        let flag = text && value.as_deref().is_some_and(|v| v.parse::<Ipv4Addr>().is_ok());
        Check::from_flag(flag, || error_string(field, "Invalid IPv4 address.", value.as_deref()))
    }

    /// IPv4 address inside the given CIDR block.
    pub fn ipv4_in_network_cidr(&self, value: impl CheckInput, network: &str, field: &str) -> Check {
        let value = value.as_input();
        let Ok(net) = network.parse::<Ipv4Net>() else {
            return Check::Fail(error_string(
                field,
                &format!("'{}' is not a valid network.", network),
                value.as_deref(),
            ));
        };
        let flag = value
            .as_deref()
            .and_then(|v| v.parse::<Ipv4Addr>().ok())
            .is_some_and(|ip| net.trunc().contains(&ip));
        Check::from_flag(flag, || {
            error_string(
                field,
                &format!("IP address has to belong to the network {}.", network),
                value.as_deref(),
            )
        })
    }

    /// Single host name label.
    pub fn hostname(&self, value: impl CheckInput, field: &str) -> Check {
        let text = value.is_text();
        let value = value.as_input();
        let flag = text
            && value
                .as_deref()
                .is_some_and(|v| v.len() <= HOSTNAME_MAX_LEN && self.hostname.is_match(v));
        Check::from_flag(flag, || {
            error_string(
                field,
                "A valid host name consists of letters, digits and hyphens, \
                 must not start or end with a hyphen and must be at most 63 characters long.",
                value.as_deref(),
            )
        })
    }

    /// Alphanumeric identifier that may contain hyphens and underscores after the first
    /// character.
    pub fn identifier(&self, value: impl CheckInput, field: &str) -> Check {
        let text = value.is_text();
        let value = value.as_input();
        let flag = text && value.as_deref().is_some_and(|v| self.identifier.is_match(v));
        Check::from_flag(flag, || {
            error_string(
                field,
                "The value should be a valid identifier: it starts with a letter or a digit \
                 and contains only letters, digits, hyphens and underscores.",
                value.as_deref(),
            )
        })
    }

    /// Three-character SAP system ID that is not reserved.
    pub fn sap_sid(&self, value: impl CheckInput, field: &str) -> Check {
        let value = value.as_input();
        let flag = value
            .as_deref()
            .is_some_and(|v| self.sap_sid.is_match(v) && !self.reserved_sids.contains(v));
        Check::from_flag(flag, || {
            error_string(
                field,
                "A valid SAP System ID consists of three characters, starts with a letter, \
                 and must not collide with one of the reserved IDs.",
                value.as_deref(),
            )
        })
    }

    /// Two-digit SAP instance number.
    pub fn sap_instance_number(&self, value: impl CheckInput, field: &str) -> Check {
        let value = value.as_input();
        let flag = value.as_deref().is_some_and(|v| self.instance_number.is_match(v));
        Check::from_flag(flag, || {
            error_string(field, "A valid instance number is a two-digit number.", value.as_deref())
        })
    }

    /// Integer greater than or equal to zero.
    pub fn nonneg_integer(&self, value: impl CheckInput, field: &str) -> Check {
        let value = value.as_input();
        let flag = value.as_deref().is_some_and(|v| v.trim().parse::<u64>().is_ok());
        Check::from_flag(flag, || {
            error_string(field, "The value should be a non-negative integer.", value.as_deref())
        })
    }

    /// Integer within `low..=high`. `message` replaces the out-of-range explanation.
    pub fn integer_in_range(
        &self,
        value: impl CheckInput,
        low: i64,
        high: i64,
        message: Option<&str>,
        field: &str,
    ) -> Check {
        let value = value.as_input();
        match value.as_deref().and_then(parse_integer) {
            Some(n) if (low..=high).contains(&n) => Check::Pass,
            Some(_) => {
                let default = format!("The value should be between {} and {}.", low, high);
                Check::Fail(error_string(field, message.unwrap_or(&default), value.as_deref()))
            }
            None => Check::Fail(error_string(
                field,
                "The value should be an integer.",
                value.as_deref(),
            )),
        }
    }

    /// TCP/UDP port number.
    pub fn port(&self, value: impl CheckInput, field: &str) -> Check {
        self.integer_in_range(
            value,
            1,
            65535,
            Some("The port number should be between 1 and 65535."),
            field,
        )
    }

    /// `value` is one of `set`.
    pub fn element_in_set<T>(
        &self,
        value: &T,
        set: &[T],
        message: Option<&str>,
        field: &str,
    ) -> Check
    where
        T: PartialEq + Display,
    {
        Check::from_flag(set.contains(value), || {
            let default = format!(
                "The value should be one of the following: {}.",
                set.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            error_string(field, message.unwrap_or(&default), Some(&value.to_string()))
        })
    }

    /// The two values differ.
    pub fn not_equal<T>(&self, left: &T, right: &T, message: Option<&str>, field: &str) -> Check
    where
        T: PartialEq + Display,
    {
        Check::from_flag(left != right, || {
            error_string(
                field,
                message.unwrap_or("The values should differ."),
                Some(&left.to_string()),
            )
        })
    }

    /// All elements are pairwise distinct.
    pub fn unique<T>(&self, values: &[T], message: Option<&str>, field: &str) -> Check
    where
        T: Ord,
    {
        Check::from_flag(all_distinct(values), || {
            error_string(field, message.unwrap_or("The values should be unique."), None)
        })
    }

    /// At least two elements are equal.
    pub fn not_unique<T>(&self, values: &[T], message: Option<&str>, field: &str) -> Check
    where
        T: Ord,
    {
        Check::from_flag(!all_distinct(values), || {
            error_string(field, message.unwrap_or("The values should not be unique."), None)
        })
    }

    /// The list has at least one element.
    pub fn non_empty<T>(&self, values: &[T], message: Option<&str>, field: &str) -> Check {
        Check::from_flag(!values.is_empty(), || {
            error_string(field, message.unwrap_or("At least one value is required."), None)
        })
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

fn all_distinct<T: Ord>(values: &[T]) -> bool {
    let set: BTreeSet<&T> = values.iter().collect();
    set.len() == values.len()
}

/// Format a failure message for a field.
pub fn error_string(field: &str, explanation: &str, value: Option<&str>) -> String {
    if field.is_empty() {
        return explanation.to_string();
    }
    match value {
        Some(value) if !value.is_empty() => {
            format!("Invalid entry for '{}' \"{}\": {}", field, value, explanation)
        }
        _ => format!("Invalid entry for '{}': {}", field, explanation),
    }
}
