//! Stub registry dumps, used in failure messages and exportable as JSON.

use crate::call::Call;
use crate::result::MockResult;
use crate::stub::Stub;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One registered stub as seen from a particular call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubEntry {
    /// Recorded call
    pub call: String,
    /// Behavior label
    pub behavior: String,
    /// Whether the recorded call equals the call being diagnosed
    pub matches: bool,
}

/// Snapshot of a handler's stub registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryReport {
    /// Handler that owns the registry
    pub handler: String,
    /// Call being diagnosed, if any
    pub call: Option<String>,
    /// Registered stubs in recording order
    pub stubs: Vec<StubEntry>,
}

impl RegistryReport {
    /// Build a report over `stubs`, annotating those that match `call`
    pub fn new<'a, I>(handler: String, call: Option<&Call>, stubs: I) -> Self
    where
        I: IntoIterator<Item = &'a Stub>,
    {
        let stubs = stubs
            .into_iter()
            .map(|stub| StubEntry {
                call: stub.call().to_string(),
                behavior: stub.behavior().to_string(),
                matches: call.is_some_and(|c| stub.matches(c)),
            })
            .collect();
        Self {
            handler,
            call: call.map(ToString::to_string),
            stubs,
        }
    }

    /// Number of entries that match the diagnosed call
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.stubs.iter().filter(|s| s.matches).count()
    }

    /// Multi-line text dump, one stub per line
    #[must_use]
    pub fn render(&self) -> String {
        if self.stubs.is_empty() {
            return "No stubs".to_string();
        }
        let mut out = String::new();
        for stub in &self.stubs {
            if stub.matches {
                out.push_str("MATCHES ");
            }
            let _ = writeln!(out, "{} = {}", stub.call, stub.behavior);
        }
        out
    }

    /// Export as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> MockResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
