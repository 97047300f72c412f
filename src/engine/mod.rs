//! Script execution, verification and profiling against a remote engine.

pub mod client;
pub mod latency;
pub mod reporter;
pub mod runner;
pub mod sampler;
pub mod verifier;

pub use client::{EngineClient, EngineClientError, ProfiledQuery, ScriptEngine};
pub use latency::LatencySummary;
pub use reporter::{ConsoleReporter, TestReporter};
pub use runner::{CaseError, ExecutionMode, TestCaseRunner, run_setup};
pub use sampler::{PerfConfig, PerfSamples, PerformanceSampler, SamplerError};
pub use verifier::{FLOAT_TOLERANCE, VerificationError, verify};
