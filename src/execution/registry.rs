//! Language registry
//!
//! Static mapping from the language names shown to students to the
//! execution service's numeric language ids, plus the service's
//! descriptive status table. Extend only by adding rows.

use serde::{Deserialize, Serialize};

use crate::constants::status_ids;
use crate::error::UnsupportedLanguageError;

/// Languages the execution service can run for us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
    JavaScript,
    TypeScript,
    Ruby,
    Go,
    Rust,
}

impl Language {
    /// Every registered language, in display order
    pub const ALL: [Language; 9] = [
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Ruby,
        Language::Go,
        Language::Rust,
    ];

    /// Numeric id understood by the execution service
    pub fn backend_id(&self) -> i32 {
        match self {
            Language::C => 50,
            Language::Cpp => 54,
            Language::Java => 62,
            Language::Python => 71,
            Language::JavaScript => 63,
            Language::TypeScript => 74,
            Language::Ruby => 72,
            Language::Go => 60,
            Language::Rust => 73,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Ruby => "Ruby",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_language(s)
    }
}

/// Resolve a language name to its registry entry.
///
/// Matching ignores case and surrounding whitespace. Names without an entry
/// fail; there is no fallback language.
pub fn resolve_language(name: &str) -> Result<Language, UnsupportedLanguageError> {
    let wanted = name.trim();
    Language::ALL
        .into_iter()
        .find(|lang| lang.name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnsupportedLanguageError(name.to_string()))
}

/// Registered language names, in display order
pub fn supported_names() -> Vec<&'static str> {
    Language::ALL.iter().map(Language::name).collect()
}

/// Description the execution service attaches to a status id
pub fn status_description(id: i32) -> &'static str {
    match id {
        status_ids::IN_QUEUE => "In Queue",
        status_ids::PROCESSING => "Processing",
        status_ids::ACCEPTED => "Accepted",
        status_ids::WRONG_ANSWER => "Wrong Answer",
        status_ids::TIME_LIMIT_EXCEEDED => "Time Limit Exceeded",
        status_ids::COMPILATION_ERROR => "Compilation Error",
        status_ids::RUNTIME_ERROR_SIGSEGV => "Runtime Error (SIGSEGV)",
        status_ids::RUNTIME_ERROR_SIGXFSZ => "Runtime Error (SIGXFSZ)",
        status_ids::RUNTIME_ERROR_SIGFPE => "Runtime Error (SIGFPE)",
        status_ids::RUNTIME_ERROR_SIGABRT => "Runtime Error (SIGABRT)",
        status_ids::RUNTIME_ERROR_NZEC => "Runtime Error (NZEC)",
        status_ids::RUNTIME_ERROR_OTHER => "Runtime Error (Other)",
        status_ids::INTERNAL_ERROR => "Internal Error",
        status_ids::EXEC_FORMAT_ERROR => "Exec Format Error",
        _ => "Unknown Status",
    }
}
