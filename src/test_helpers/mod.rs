//! A set of helpers for testing

mod http_client;
mod profile;
mod setup;

pub use http_client::create_test_http_client;
pub use profile::ProfileBodyBuilder;
pub use setup::TestCaseSetupBuilder;
