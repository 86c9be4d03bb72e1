// ABOUTME: Shared helpers for integration tests
// ABOUTME: Provides the axum oneshot request harness

pub mod axum_test;
