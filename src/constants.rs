//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// EXECUTION SERVICE DEFAULTS
// =============================================================================

/// Default submissions endpoint of the execution service
pub const DEFAULT_EXECUTION_SERVICE_URL: &str = "http://localhost:2358/submissions";

/// Default timeout for a single HTTP round trip to the execution service
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default number of result queries before giving up on a token
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 10;

/// Default delay between two result queries
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default number of executions in flight against the service at once
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Leading character stripped from submitted source code.
///
/// Older clients prefixed the editor contents with a backtick so the payload
/// survived template-literal escaping; the execution service must never see it.
pub const SOURCE_SENTINEL: char = '`';

// =============================================================================
// EXECUTION SERVICE HEADERS
// =============================================================================

/// Header names understood by the execution service (lowercase, as sent on the wire)
pub mod headers {
    pub const AUTH_TOKEN: &str = "x-auth-token";
    pub const RAPIDAPI_KEY: &str = "x-rapidapi-key";
    pub const RAPIDAPI_HOST: &str = "x-rapidapi-host";
}

// =============================================================================
// BACKEND STATUS IDS
// =============================================================================

/// Fine-grained status ids reported by the execution service
pub mod status_ids {
    pub const IN_QUEUE: i32 = 1;
    pub const PROCESSING: i32 = 2;
    pub const ACCEPTED: i32 = 3;
    pub const WRONG_ANSWER: i32 = 4;
    pub const TIME_LIMIT_EXCEEDED: i32 = 5;
    pub const COMPILATION_ERROR: i32 = 6;
    pub const RUNTIME_ERROR_SIGSEGV: i32 = 7;
    pub const RUNTIME_ERROR_SIGXFSZ: i32 = 8;
    pub const RUNTIME_ERROR_SIGFPE: i32 = 9;
    pub const RUNTIME_ERROR_SIGABRT: i32 = 10;
    pub const RUNTIME_ERROR_NZEC: i32 = 11;
    pub const RUNTIME_ERROR_OTHER: i32 = 12;
    pub const INTERNAL_ERROR: i32 = 13;
    pub const EXEC_FORMAT_ERROR: i32 = 14;

    /// Lowest id that ends polling
    pub const FIRST_TERMINAL: i32 = ACCEPTED;
}

// =============================================================================
// PERSISTENCE STATUSES
// =============================================================================

/// Coarse statuses handed to the persistence collaborator
pub mod coarse_statuses {
    pub const PENDING: &str = "pending";
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "failure";
    pub const ERROR: &str = "error";
}

/// Overall suite statuses handed to the persistence collaborator
pub mod suite_statuses {
    pub const ACCEPTED: &str = "accepted";
    pub const PARTIALLY_FAILED: &str = "partially_failed";
    pub const ERROR: &str = "error";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
