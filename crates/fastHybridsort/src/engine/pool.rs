//! Accelerator discovery and lifecycle.
//!
//! ## Purpose
//!
//! This module owns the set of compute devices the radix path may use. A pool
//! is built once (by discovery or from explicit handles), is immutable
//! afterwards, and is shared behind an `Arc`.
//!
//! ## Design notes
//!
//! * **Explicit lifecycle**: Callers either pass an owned pool to the sorter
//!   builder or use the process-wide pool, which is discovered on first use and
//!   released by [`shutdown_global`].
//! * **Empty is valid**: Discovering zero devices yields an empty pool; the
//!   error surfaces only when a GPU-path operation runs against it.
//! * **Closed set**: [`AcceleratorHandle`] is an enum over the supported
//!   device kinds, so the pipeline is monomorphized per kind.
//!
//! ## Key concepts
//!
//! * **Handle**: One opened device with its compiled kernels.
//! * **Discovery options**: Backend mask and software-adapter policy.
//!
//! ## Invariants
//!
//! * A pool never contains the same physical adapter twice.
//! * Handles are never mutated after the pool is built.

// Feature-gated imports
#[cfg(feature = "gpu")]
use crate::engine::gpu::{WgpuAccelerator, open_adapters};
#[cfg(feature = "gpu")]
use wgpu::Backends;

// External dependencies
use std::sync::{Arc, PoisonError, RwLock};

// Export dependencies from hybridsort crate
use hybridsort::internals::primitives::errors::SortError;

// Internal dependencies
use crate::engine::device::{HostAccelerator, RadixDevice};
use crate::engine::pipeline::radix_sort_on;

// ============================================================================
// Handle
// ============================================================================

/// One opened compute device.
#[derive(Debug)]
pub enum AcceleratorHandle {
    /// Software device on a private thread pool.
    Host(HostAccelerator),

    /// Physical GPU adapter.
    #[cfg(feature = "gpu")]
    Wgpu(WgpuAccelerator),
}

impl AcceleratorHandle {
    /// Device label.
    pub fn label(&self) -> &str {
        match self {
            Self::Host(device) => device.label(),
            #[cfg(feature = "gpu")]
            Self::Wgpu(device) => device.label(),
        }
    }

    /// The host device, if this handle wraps one.
    pub fn as_host(&self) -> Option<&HostAccelerator> {
        match self {
            Self::Host(device) => Some(device),
            #[cfg(feature = "gpu")]
            Self::Wgpu(_) => None,
        }
    }

    /// Radix-sort `keys` on this device.
    pub fn sort_keys(&self, keys: &mut [u32]) -> Result<(), SortError> {
        match self {
            Self::Host(device) => radix_sort_on(device, keys),
            #[cfg(feature = "gpu")]
            Self::Wgpu(device) => radix_sort_on(device, keys),
        }
    }

    /// One-line description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Host(device) => format!(
                "{} (host, {} threads, memory limit {:?})",
                device.label(),
                device.threads(),
                device.memory_limit()
            ),
            #[cfg(feature = "gpu")]
            Self::Wgpu(device) => {
                let info = device.info();
                format!(
                    "{} ({:?}, {:?}, driver '{}')",
                    device.label(),
                    info.backend,
                    info.device_type,
                    info.driver
                )
            }
        }
    }
}

impl From<HostAccelerator> for AcceleratorHandle {
    fn from(device: HostAccelerator) -> Self {
        Self::Host(device)
    }
}

#[cfg(feature = "gpu")]
impl From<WgpuAccelerator> for AcceleratorHandle {
    fn from(device: WgpuAccelerator) -> Self {
        Self::Wgpu(device)
    }
}

// ============================================================================
// Discovery Options
// ============================================================================

/// Controls which adapters discovery opens.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Graphics backends to enumerate.
    #[cfg(feature = "gpu")]
    pub backends: Backends,

    /// Accept software rasterizers (for example llvmpipe) as devices.
    pub allow_software: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            #[cfg(feature = "gpu")]
            backends: Backends::all(),
            allow_software: false,
        }
    }
}

// ============================================================================
// Pool
// ============================================================================

/// Immutable set of opened devices.
#[derive(Debug, Default)]
pub struct AcceleratorPool {
    handles: Vec<AcceleratorHandle>,
}

impl AcceleratorPool {
    /// Pool with no devices.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pool over explicitly constructed devices.
    pub fn from_handles<I, H>(handles: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<AcceleratorHandle>,
    {
        Self {
            handles: handles.into_iter().map(Into::into).collect(),
        }
    }

    /// Enumerate and open the system's GPU adapters.
    pub fn discover(options: &DiscoveryOptions) -> Self {
        #[cfg(feature = "gpu")]
        let handles: Vec<AcceleratorHandle> =
            open_adapters(options.backends, options.allow_software)
                .into_iter()
                .map(AcceleratorHandle::Wgpu)
                .collect();

        #[cfg(not(feature = "gpu"))]
        let handles: Vec<AcceleratorHandle> = {
            let _ = options;
            Vec::new()
        };

        if handles.is_empty() {
            log::info!("accelerator discovery found no devices");
        } else {
            for handle in &handles {
                log::info!("accelerator: {}", handle.describe());
            }
        }

        Self { handles }
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no device is available.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Devices in discovery order.
    pub fn handles(&self) -> &[AcceleratorHandle] {
        &self.handles
    }

    /// Description of every device.
    pub fn describe(&self) -> Vec<String> {
        self.handles.iter().map(AcceleratorHandle::describe).collect()
    }
}

// ============================================================================
// Process-Wide Pool
// ============================================================================

static GLOBAL_POOL: RwLock<Option<Arc<AcceleratorPool>>> = RwLock::new(None);

/// Process-wide pool, discovered with default options on first use.
pub fn global() -> Arc<AcceleratorPool> {
    if let Some(pool) = GLOBAL_POOL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Arc::clone(pool);
    }

    let mut slot = GLOBAL_POOL.write().unwrap_or_else(PoisonError::into_inner);
    let pool = slot.get_or_insert_with(|| {
        Arc::new(AcceleratorPool::discover(&DiscoveryOptions::default()))
    });
    Arc::clone(pool)
}

/// Replace the process-wide pool; returns the previous one.
pub fn install_global(pool: AcceleratorPool) -> Option<Arc<AcceleratorPool>> {
    GLOBAL_POOL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(Arc::new(pool))
}

/// Release the process-wide pool.
///
/// Device contexts are dropped once the last in-flight user of the pool
/// finishes. The next call to [`global`] discovers again. Returns whether a
/// pool was installed.
pub fn shutdown_global() -> bool {
    let previous = GLOBAL_POOL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();

    match previous {
        Some(pool) => {
            log::info!("releasing accelerator pool ({} devices)", pool.len());
            true
        }
        None => false,
    }
}
