//! Layer 3: Engine
//!
//! This layer provides the CPU execution engine, input and configuration
//! validation, and the backend selection policy shared with accelerated
//! extension crates.

// Size-adaptive CPU sort
pub mod executor;

// Backend selection
pub mod dispatch;

// Configuration and input checks
pub mod validator;
