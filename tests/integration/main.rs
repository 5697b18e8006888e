//! Integration tests against the in-memory entity store.

mod helpers;

mod cli_scenarios;
mod http_api;
mod properties;
