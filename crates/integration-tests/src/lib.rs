//! HTTP integration tests for the Mensa services.
//!
//! The tests live in `tests/` and are `#[ignore]`d by default: they require
//! the admin and viewer services running against a migrated database.
//!
//! ```bash
//! cargo run -p mensa-cli -- migrate
//! cargo run -p mensa-admin &
//! cargo run -p mensa-viewer &
//! cargo test -p mensa-integration-tests -- --ignored
//! ```
