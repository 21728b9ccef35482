//! Insecure C library function database
//!
//! Documented entries carry a suggested replacement, a CWE id and a default
//! severity. A second list names functions that are known to be risky but
//! have no curated advice; those are still reported, with generic text.

use lazy_static::lazy_static;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::shared::models::{source_tags, Finding, Severity};

/// Placeholder CWE id for undocumented entries
pub const UNKNOWN_CWE: &str = "N/A";

const GENERIC_SUGGESTION: &str =
    "review this call and prefer a bounded, return-checked alternative";

/// Curated advice for one insecure function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsecureFunctionInfo {
    pub suggestion: &'static str,
    pub cwe_id: &'static str,
    pub severity: Severity,
    /// One-line description of what can go wrong
    pub risk: &'static str,
}

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsecureCall<'a> {
    Documented(&'a InsecureFunctionInfo),
    Undocumented,
}

/// Read-only table of insecure functions.
///
/// Built once (see [`INSECURE_FUNCTIONS`]) and shared by every analysis.
pub struct InsecureFunctionTable {
    documented: FxHashMap<&'static str, InsecureFunctionInfo>,
    undocumented: FxHashSet<&'static str>,
}

impl InsecureFunctionTable {
    pub fn new() -> Self {
        let mut table = Self {
            documented: FxHashMap::default(),
            undocumented: FxHashSet::default(),
        };
        table.load_builtin_entries();
        table
    }

    fn load_builtin_entries(&mut self) {
        // Unbounded copies and reads
        self.add("gets", "use fgets() with an explicit buffer size", "CWE-120", Severity::Critical,
            "reads an unbounded line into a fixed-size buffer");
        self.add("strcpy", "use strncpy() with size limit", "CWE-120", Severity::High,
            "copies without checking the destination size");
        self.add("strcat", "use strncat() with size limit", "CWE-120", Severity::High,
            "appends without checking the destination size");
        self.add("sprintf", "use snprintf()", "CWE-120", Severity::High,
            "formats into a buffer without a length bound");
        self.add("vsprintf", "use vsnprintf()", "CWE-120", Severity::High,
            "formats into a buffer without a length bound");
        self.add("scanf", "specify field width and check the return value", "CWE-120", Severity::Medium,
            "%s conversions without a width overflow the target");

        // Format strings
        self.add("printf", "use a string literal as the format argument", "CWE-134", Severity::Medium,
            "a non-literal format string lets input control the output");

        // Command and code injection
        self.add("system", "avoid executing external commands; validate any input that reaches them", "CWE-78", Severity::High,
            "runs a shell command built from program data");
        self.add("popen", "avoid executing external commands; use safer APIs", "CWE-78", Severity::High,
            "runs a shell command built from program data");
        self.add("eval", "avoid code injection; parse inputs safely", "CWE-94", Severity::High,
            "evaluates data as code");

        // Allocation results
        self.add("malloc", "check the return value for NULL", "CWE-690", Severity::Low,
            "a failed allocation returns NULL");
        self.add("calloc", "check the return value for NULL", "CWE-690", Severity::Low,
            "a failed allocation returns NULL");
        self.add("realloc", "check the return value for NULL and keep the old pointer until it succeeds", "CWE-690", Severity::Low,
            "a failed reallocation returns NULL and leaks the original block");

        for name in [
            "exec", "execl", "execlp", "execle", "execv", "execvp", "tmpnam", "tempnam",
            "mktemp", "getwd", "alloca", "strtok", "wcscpy", "wcscat", "sscanf", "fscanf",
            "vscanf", "realpath", "streadd", "strtrns", "getpass",
        ] {
            self.undocumented.insert(name);
        }
    }

    fn add(
        &mut self,
        name: &'static str,
        suggestion: &'static str,
        cwe_id: &'static str,
        severity: Severity,
        risk: &'static str,
    ) {
        self.documented.insert(
            name,
            InsecureFunctionInfo {
                suggestion,
                cwe_id,
                severity,
                risk,
            },
        );
    }

    /// Documented info for `name`, if curated
    pub fn get(&self, name: &str) -> Option<&InsecureFunctionInfo> {
        self.documented.get(name)
    }

    /// Check if `name` is known to be insecure (documented or not)
    pub fn contains(&self, name: &str) -> bool {
        self.documented.contains_key(name) || self.undocumented.contains(name)
    }

    /// Number of known names across both lists
    pub fn len(&self) -> usize {
        self.documented.len() + self.undocumented.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Classify `name`
    pub fn lookup(&self, name: &str) -> Option<InsecureCall<'_>> {
        if let Some(info) = self.documented.get(name) {
            Some(InsecureCall::Documented(info))
        } else if self.undocumented.contains(name) {
            Some(InsecureCall::Undocumented)
        } else {
            None
        }
    }

    /// Build the parser finding for a call to `name` on `line`, if insecure
    pub fn finding_for(&self, name: &str, line: u32) -> Option<Finding> {
        let title = format!("Unsafe {}() Usage", name);
        let finding = match self.lookup(name)? {
            InsecureCall::Documented(info) => {
                Finding::new(title, line, info.severity, source_tags::PARSER)
                    .with_explanation(format!(
                        "Use of insecure function {}() detected: {} [{}].",
                        name, info.risk, info.cwe_id
                    ))
                    .with_suggestion(info.suggestion)
                    .with_cwe(info.cwe_id)
            }
            InsecureCall::Undocumented => {
                Finding::new(title, line, Severity::Medium, source_tags::PARSER)
                    .with_explanation(format!(
                        "Detected use of '{}' (marked as insecure).",
                        name
                    ))
                    .with_suggestion(GENERIC_SUGGESTION)
                    .with_cwe(UNKNOWN_CWE)
            }
        };
        Some(finding)
    }
}

impl Default for InsecureFunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

// Global instance
lazy_static! {
    /// Process-wide insecure function table
    pub static ref INSECURE_FUNCTIONS: InsecureFunctionTable = InsecureFunctionTable::new();
}
