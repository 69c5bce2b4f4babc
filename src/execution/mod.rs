//! Remote code-execution core
//!
//! Untrusted source code is never run here. It is shipped to an external
//! sandboxed execution service and the results are collected back:
//!
//! 1. **Registry** (`registry.rs`): language names to service ids.
//! 2. **Dispatcher** (`dispatcher.rs`): one submission per request, returns a token.
//! 3. **Poller** (`poller.rs`): queries a token until it is terminal or the
//!    budget runs out, decoding base64 output streams.
//! 4. **Evaluator** (`evaluator.rs`): dispatch + poll + classify, never fails
//!    past an unknown language. Caps executions in flight.
//! 5. **Suite evaluator** (`suite.rs`): concurrent fan-out over test
//!    cases with positional fan-in.

pub mod client;
pub mod dispatcher;
pub mod evaluator;
pub mod poller;
pub mod registry;
pub mod status;
pub mod suite;

use std::sync::Arc;

pub use client::{ExecutionBackend, HttpBackend};
pub use dispatcher::Dispatcher;
pub use evaluator::Evaluator;
pub use poller::Poller;
pub use registry::{resolve_language, Language};
pub use status::{map_status, CoarseStatus, ExecutionStatus, Verdict};
pub use suite::SuiteEvaluator;

use crate::config::Config;

/// Wire the evaluators for `backend` from application configuration
pub fn build(backend: Arc<dyn ExecutionBackend>, config: &Config) -> SuiteEvaluator {
    let evaluator = Evaluator::new(
        backend,
        &config.execution_service,
        config.polling,
        config.suite.comparison,
    );
    SuiteEvaluator::new(Arc::new(evaluator), config.suite)
}
