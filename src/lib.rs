#![warn(missing_docs)]
//! plsd is a harness for developing Painless scripts against a running
//! search engine: execute them, test them against expected results and
//! profile them.

pub mod cmd;
pub mod config;
pub mod engine;
pub mod http_client;
pub mod models;
pub mod test_helpers;
