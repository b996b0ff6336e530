//! Layer 5: Engine
//!
//! This layer provides the accelerated execution engine. It owns the compute
//! devices, runs the radix pipeline on them, splits work across several
//! devices, and executes backend decisions with CPU fallback.

// Device abstraction and the host software device
pub mod device;

// GPU radix device using wgpu
#[cfg(feature = "gpu")]
pub mod gpu;

// Four-pass radix pipeline, generic over devices
pub mod pipeline;

// Device discovery and lifecycle
pub mod pool;

// Multi-device partitioning and k-way merge
pub mod orchestrator;

// Fixed-batch external accelerator gateway
pub mod external;

// Decision execution and CPU fallback
pub mod dispatch;
