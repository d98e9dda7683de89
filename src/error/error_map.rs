//! Accumulator for recoverable per-harvester failures.

use std::collections::BTreeMap;
use std::fmt;

/// Harvester name to the last error recorded for it during a run.
///
/// Created empty by the entry point, lent mutably to each pass, and
/// inspected once at shutdown to choose the exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    errors: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `harvester`, replacing any earlier message.
    pub fn record(&mut self, harvester: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(harvester.into(), message.into());
    }

    pub fn get(&self, harvester: &str) -> Option<&str> {
        self.errors.get(harvester).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (harvester, message)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': '{}'", harvester, message)?;
        }
        write!(f, "}}")
    }
}
