//! Inbound object contract tests
//!
//! Golden engine output and the typed objects it must decode into.

// ===== Contract Tests =====
