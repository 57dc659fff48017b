//! Shared database test infrastructure
//!
//! Tests run the same logic against both SQLite and PostgreSQL:
//!
//! - **Unit tests (SQLite)**: Fast, in-memory tests that run with every `cargo test`
//! - **Integration tests (PostgreSQL)**: Slower tests using testcontainers, run with `cargo test -- --ignored`
//!
//! Each test module contains shared test functions that take a
//! `&dyn VersionRepo`, plus backend-specific setup that seeds the fixture
//! schema first (the PostgreSQL variants are marked `#[ignore]`).
//!
//! # Running tests
//!
//! ```bash
//! cargo test                       # Run fast SQLite tests only
//! cargo test -- --ignored          # Run PostgreSQL integration tests (requires Docker)
//! cargo test -- --include-ignored  # Run all tests
//! ```
