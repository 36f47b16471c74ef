//! Request contract tests
//!
//! Golden wire forms of every function the client sends.

// ===== Contract Tests =====
