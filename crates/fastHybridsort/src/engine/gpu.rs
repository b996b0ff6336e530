//! GPU radix device built on `wgpu`.
//!
//! ## Purpose
//!
//! This module implements [`RadixDevice`] for a physical GPU. It compiles the
//! four radix kernels (tile histogram, exclusive scan, tile offsets, scatter)
//! once per device and runs each pipeline stage as one blocking submission.
//!
//! ## Design notes
//!
//! * **One context per adapter**: Each discovered adapter gets its own
//!   device, queue and pipelines; nothing is shared between adapters.
//! * **Error scopes**: Every device call runs inside validation, internal and
//!   out-of-memory error scopes. Errors that escape a scope reach a logging
//!   handler and are reported by the next checked call. Either way they become
//!   `AcceleratorOperationFailed`, never a panic.
//! * **Scoped buffers**: [`GpuBuffer`] calls `Buffer::destroy` on drop.
//! * **Tiles**: The histogram and scatter kernels give each invocation one
//!   tile of `TILE_KEYS` keys and loop grid-stride over tiles, so the
//!   workgroup count stays within the per-dimension dispatch limit.
//!
//! ## Invariants
//!
//! * Buffers larger than the device's storage binding limit are never created.
//! * Every submission is waited on before the method returns.
//!
//! ## Non-goals
//!
//! * This module does not sequence passes (handled by `pipeline`).
//! * This module does not choose between adapters (handled by `pool`).

// External dependencies
use bytemuck::{Pod, Zeroable};
use pollster::block_on;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, PoisonError};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    Adapter, AdapterInfo, Backends, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType,
    BufferDescriptor, BufferUsages, CommandEncoderDescriptor, ComputePassDescriptor,
    ComputePipeline, ComputePipelineDescriptor, Device, DeviceDescriptor, DeviceType, Error,
    ErrorFilter, Instance, InstanceDescriptor, MapMode, PipelineLayoutDescriptor, PollType, Queue,
    ShaderModuleDescriptor, ShaderSource, ShaderStages, SubmissionIndex,
};

// Export dependencies from hybridsort crate
use hybridsort::internals::algorithms::radix::{RADIX_BUCKETS, tile_count};
use hybridsort::internals::primitives::errors::SortError;

// Internal dependencies
use crate::engine::device::RadixDevice;

/// Invocations per workgroup of the tile kernels; one tile per invocation.
const TILE_WORKGROUP_SIZE: u32 = 64;

/// Largest workgroup count dispatched along one dimension.
const MAX_WORKGROUPS: u32 = 65_535;

// -----------------------------------------------------------------------------
// Shader Source (WGSL)
// -----------------------------------------------------------------------------
const SHADER_SOURCE: &str = r#"
// Same value as `radix::TILE_KEYS` on the host.
const TILE_KEYS: u32 = 1024u;

struct Params {
    len: u32,
    shift: u32,
    tiles: u32,
    _pad: u32,
}

@group(0) @binding(0) var<uniform> params: Params;
@group(0) @binding(1) var<storage, read> src: array<u32>;
@group(0) @binding(2) var<storage, read_write> dst: array<u32>;
@group(0) @binding(3) var<storage, read_write> histogram: array<atomic<u32>, 256>;
@group(0) @binding(4) var<storage, read_write> prefix: array<u32, 256>;
@group(0) @binding(5) var<storage, read_write> tile_table: array<u32>;

// -----------------------------------------------------------------------------
// Kernel 1: Per-tile digit counts (grid-stride over tiles)
// -----------------------------------------------------------------------------
@compute @workgroup_size(64)
fn histogram_pass(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>
) {
    let stride = groups.x * 64u;
    for (var tile = global_id.x; tile < params.tiles; tile += stride) {
        var counts = array<u32, 256>();
        let start = tile * TILE_KEYS;
        let end = min(start + TILE_KEYS, params.len);
        for (var i = start; i < end; i++) {
            let bucket = (src[i] >> params.shift) & 0xFFu;
            counts[bucket] += 1u;
        }
        for (var b = 0u; b < 256u; b++) {
            let count = counts[b];
            tile_table[tile * 256u + b] = count;
            if (count > 0u) {
                atomicAdd(&histogram[b], count);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Kernel 2: Exclusive scan (single worker)
// -----------------------------------------------------------------------------
@compute @workgroup_size(1)
fn exclusive_scan() {
    var running = 0u;
    for (var b = 0u; b < 256u; b++) {
        let count = atomicLoad(&histogram[b]);
        prefix[b] = running;
        running += count;
    }
}

// -----------------------------------------------------------------------------
// Kernel 3: Tile offsets (one worker per bucket, tiles in order)
// -----------------------------------------------------------------------------
@compute @workgroup_size(256)
fn tile_offsets_pass(@builtin(local_invocation_id) local_id: vec3<u32>) {
    let bucket = local_id.x;
    var running = prefix[bucket];
    for (var tile = 0u; tile < params.tiles; tile++) {
        let index = tile * 256u + bucket;
        let count = tile_table[index];
        tile_table[index] = running;
        running += count;
    }
}

// -----------------------------------------------------------------------------
// Kernel 4: Scatter (one tile per invocation, keys in order)
// -----------------------------------------------------------------------------
@compute @workgroup_size(64)
fn scatter_pass(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>
) {
    let stride = groups.x * 64u;
    for (var tile = global_id.x; tile < params.tiles; tile += stride) {
        var next = array<u32, 256>();
        for (var b = 0u; b < 256u; b++) {
            next[b] = tile_table[tile * 256u + b];
        }
        let start = tile * TILE_KEYS;
        let end = min(start + TILE_KEYS, params.len);
        for (var i = start; i < end; i++) {
            let key = src[i];
            let bucket = (key >> params.shift) & 0xFFu;
            dst[next[bucket]] = key;
            next[bucket] += 1u;
        }
    }
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct PassParams {
    len: u32,
    shift: u32,
    tiles: u32,
    padding: u32,
}

// ============================================================================
// Scoped Buffer
// ============================================================================

/// Device buffer destroyed when dropped.
pub struct GpuBuffer {
    buffer: Buffer,
    words: usize,
}

impl GpuBuffer {
    /// Number of `u32` words the buffer holds.
    pub fn words(&self) -> usize {
        self.words
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

// ============================================================================
// Uncaptured Errors
// ============================================================================

/// Device errors that escaped every error scope, held until a call reports them.
#[derive(Debug, Clone, Default)]
pub struct UncapturedErrors(Arc<Mutex<Option<String>>>);

impl UncapturedErrors {
    /// Remember `reason`; it replaces an error nobody has reported yet.
    pub fn record(&self, reason: String) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason);
    }

    /// Fail with the recorded error, if any, and clear it.
    pub fn take(&self, device: &str, stage: &'static str) -> Result<(), SortError> {
        match self.0.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(reason) => Err(SortError::device_failure(device, stage, reason)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Kernels
// ============================================================================

struct Kernel {
    layout: BindGroupLayout,
    pipeline: ComputePipeline,
}

fn layout_entry(binding: u32, ty: BufferBindingType) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage(binding: u32, read_only: bool) -> BindGroupLayoutEntry {
    layout_entry(binding, BufferBindingType::Storage { read_only })
}

fn uniform(binding: u32) -> BindGroupLayoutEntry {
    layout_entry(binding, BufferBindingType::Uniform)
}

// ============================================================================
// Accelerator
// ============================================================================

/// One GPU adapter opened for radix sorting.
pub struct WgpuAccelerator {
    label: String,
    info: AdapterInfo,
    device: Device,
    queue: Queue,
    histogram_kernel: Kernel,
    scan_kernel: Kernel,
    offsets_kernel: Kernel,
    scatter_kernel: Kernel,
    max_binding_bytes: u64,
    uncaptured: UncapturedErrors,
}

impl WgpuAccelerator {
    /// Open `adapter` and compile the radix kernels on it.
    pub fn from_adapter(adapter: &Adapter, index: usize) -> Result<Self, SortError> {
        let info = adapter.get_info();
        let label = format!("gpu{index}:{}", info.name);

        let (device, queue): (Device, Queue) = block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("hybridsort radix"),
            required_limits: adapter.limits(),
            ..Default::default()
        }))
        .map_err(|e| SortError::device_failure(label.as_str(), "init", e.to_string()))?;

        // Errors outside every scope are logged and held for the next checked call.
        let uncaptured = UncapturedErrors::default();
        let sink = uncaptured.clone();
        let handler_label = label.clone();
        device.on_uncaptured_error(Arc::new(move |err: Error| {
            log::error!("uncaptured error on {handler_label}: {err}");
            sink.record(err.to_string());
        }));

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Radix Shader"),
            source: ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let create_kernel = |entry: &str, entries: &[BindGroupLayoutEntry]| {
            let layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some(entry),
                entries,
            });
            let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(entry),
                bind_group_layouts: &[&layout],
                ..Default::default()
            });
            let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
                label: Some(entry),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(entry),
                compilation_options: Default::default(),
                cache: None,
            });
            Kernel { layout, pipeline }
        };

        device.push_error_scope(ErrorFilter::Internal);
        device.push_error_scope(ErrorFilter::Validation);
        let histogram_kernel = create_kernel(
            "histogram_pass",
            &[uniform(0), storage(1, true), storage(3, false), storage(5, false)],
        );
        let scan_kernel = create_kernel("exclusive_scan", &[storage(3, false), storage(4, false)]);
        let offsets_kernel = create_kernel(
            "tile_offsets_pass",
            &[uniform(0), storage(4, false), storage(5, false)],
        );
        let scatter_kernel = create_kernel(
            "scatter_pass",
            &[uniform(0), storage(1, true), storage(2, false), storage(5, false)],
        );
        let validation = block_on(device.pop_error_scope());
        let internal = block_on(device.pop_error_scope());
        if let Some(err) = validation.or(internal) {
            return Err(SortError::device_failure(label, "init", err.to_string()));
        }

        let max_binding_bytes = u64::from(device.limits().max_storage_buffer_binding_size);

        log::info!(
            "opened {label} ({:?}, {:?}), max storage binding {max_binding_bytes} bytes",
            info.backend,
            info.device_type
        );

        Ok(Self {
            label,
            info,
            device,
            queue,
            histogram_kernel,
            scan_kernel,
            offsets_kernel,
            scatter_kernel,
            max_binding_bytes,
            uncaptured,
        })
    }

    /// Adapter description reported by the driver.
    pub fn info(&self) -> &AdapterInfo {
        &self.info
    }

    /// Largest buffer, in bytes, a kernel can bind.
    pub fn max_binding_bytes(&self) -> u64 {
        self.max_binding_bytes
    }

    fn fail(&self, stage: &'static str, reason: impl Into<String>) -> SortError {
        SortError::device_failure(self.label.as_str(), stage, reason)
    }

    /// Run `f` inside validation, internal and out-of-memory error scopes.
    ///
    /// An error the uncaptured handler recorded since the last call fails this one.
    fn checked<R>(&self, stage: &'static str, f: impl FnOnce() -> R) -> Result<R, SortError> {
        self.device.push_error_scope(ErrorFilter::OutOfMemory);
        self.device.push_error_scope(ErrorFilter::Internal);
        self.device.push_error_scope(ErrorFilter::Validation);
        let out = f();
        let validation = block_on(self.device.pop_error_scope());
        let internal = block_on(self.device.pop_error_scope());
        let memory = block_on(self.device.pop_error_scope());

        if let Some(err) = validation.or(internal).or(memory) {
            return Err(self.fail(stage, err.to_string()));
        }
        self.uncaptured.take(&self.label, stage)?;
        Ok(out)
    }

    fn wait(&self, stage: &'static str, index: Option<SubmissionIndex>) -> Result<(), SortError> {
        self.device
            .poll(PollType::Wait {
                submission_index: index,
                timeout: None,
            })
            .map_err(|e| self.fail(stage, e.to_string()))?;
        self.uncaptured.take(&self.label, stage)
    }

    fn params(&self, len: usize, shift: u32) -> Result<GpuBuffer, SortError> {
        let too_many = || self.fail("alloc", "key count exceeds u32");
        let params = PassParams {
            len: u32::try_from(len).map_err(|_| too_many())?,
            shift,
            tiles: u32::try_from(tile_count(len)).map_err(|_| too_many())?,
            padding: 0,
        };
        let buffer = self.checked("alloc", || {
            self.device.create_buffer_init(&BufferInitDescriptor {
                label: Some("pass_params"),
                contents: bytemuck::bytes_of(&params),
                usage: BufferUsages::UNIFORM,
            })
        })?;
        Ok(GpuBuffer { buffer, words: 4 })
    }

    /// Workgroups for a tile kernel over `len` keys.
    fn tile_workgroups(len: usize) -> u32 {
        let groups = (tile_count(len) as u64).div_ceil(u64::from(TILE_WORKGROUP_SIZE));
        groups.clamp(1, u64::from(MAX_WORKGROUPS)) as u32
    }

    fn run_kernel(
        &self,
        stage: &'static str,
        kernel: &Kernel,
        entries: &[BindGroupEntry<'_>],
        workgroups: u32,
    ) -> Result<(), SortError> {
        let index = self.checked(stage, || {
            let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
                label: Some(stage),
                layout: &kernel.layout,
                entries,
            });
            let mut encoder = self
                .device
                .create_command_encoder(&CommandEncoderDescriptor { label: Some(stage) });
            {
                let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor::default());
                pass.set_pipeline(&kernel.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(workgroups, 1, 1);
            }
            self.queue.submit(Some(encoder.finish()))
        })?;
        self.wait(stage, Some(index))
    }

    fn ensure_words(
        &self,
        stage: &'static str,
        buffer: &GpuBuffer,
        words: usize,
    ) -> Result<(), SortError> {
        if words > buffer.words {
            return Err(self.fail(
                stage,
                format!("{words} words requested from a {}-word buffer", buffer.words),
            ));
        }
        Ok(())
    }
}

impl Debug for WgpuAccelerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WgpuAccelerator")
            .field("label", &self.label)
            .field("backend", &self.info.backend)
            .field("device_type", &self.info.device_type)
            .field("max_binding_bytes", &self.max_binding_bytes)
            .finish()
    }
}

impl RadixDevice for WgpuAccelerator {
    type Buffer = GpuBuffer;

    fn label(&self) -> &str {
        &self.label
    }

    fn alloc(&self, label: &'static str, words: usize) -> Result<GpuBuffer, SortError> {
        let bytes = (words as u64).saturating_mul(size_of::<u32>() as u64);
        if bytes > self.max_binding_bytes {
            return Err(self.fail(
                "alloc",
                format!(
                    "{label}: {bytes} bytes exceeds the storage binding limit of {}",
                    self.max_binding_bytes
                ),
            ));
        }

        let buffer = self.checked("alloc", || {
            self.device.create_buffer(&BufferDescriptor {
                label: Some(label),
                size: bytes,
                usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        })?;
        Ok(GpuBuffer { buffer, words })
    }

    fn upload(&self, buffer: &GpuBuffer, data: &[u32]) -> Result<(), SortError> {
        self.ensure_words("upload", buffer, data.len())?;
        self.checked("upload", || {
            self.queue
                .write_buffer(&buffer.buffer, 0, bytemuck::cast_slice(data))
        })
    }

    fn zero(&self, buffer: &GpuBuffer) -> Result<(), SortError> {
        let index = self.checked("zero", || {
            let mut encoder = self
                .device
                .create_command_encoder(&CommandEncoderDescriptor { label: Some("zero") });
            encoder.clear_buffer(&buffer.buffer, 0, None);
            self.queue.submit(Some(encoder.finish()))
        })?;
        self.wait("zero", Some(index))
    }

    fn histogram(
        &self,
        keys: &GpuBuffer,
        len: usize,
        shift: u32,
        tiles: &GpuBuffer,
        histogram: &GpuBuffer,
    ) -> Result<(), SortError> {
        self.ensure_words("histogram", keys, len)?;
        self.ensure_words("histogram", tiles, tile_count(len) * RADIX_BUCKETS)?;
        self.ensure_words("histogram", histogram, RADIX_BUCKETS)?;

        let params = self.params(len, shift)?;
        self.run_kernel(
            "histogram",
            &self.histogram_kernel,
            &[
                BindGroupEntry {
                    binding: 0,
                    resource: params.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: keys.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 3,
                    resource: histogram.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 5,
                    resource: tiles.buffer.as_entire_binding(),
                },
            ],
            Self::tile_workgroups(len),
        )
    }

    fn exclusive_scan(&self, histogram: &GpuBuffer, prefix: &GpuBuffer) -> Result<(), SortError> {
        self.ensure_words("scan", histogram, RADIX_BUCKETS)?;
        self.ensure_words("scan", prefix, RADIX_BUCKETS)?;

        self.run_kernel(
            "scan",
            &self.scan_kernel,
            &[
                BindGroupEntry {
                    binding: 3,
                    resource: histogram.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 4,
                    resource: prefix.buffer.as_entire_binding(),
                },
            ],
            1,
        )
    }

    fn tile_offsets(
        &self,
        prefix: &GpuBuffer,
        tiles: &GpuBuffer,
        len: usize,
    ) -> Result<(), SortError> {
        self.ensure_words("offsets", prefix, RADIX_BUCKETS)?;
        self.ensure_words("offsets", tiles, tile_count(len) * RADIX_BUCKETS)?;

        let params = self.params(len, 0)?;

        // A single workgroup: invocation `b` owns bucket `b`.
        self.run_kernel(
            "offsets",
            &self.offsets_kernel,
            &[
                BindGroupEntry {
                    binding: 0,
                    resource: params.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 4,
                    resource: prefix.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 5,
                    resource: tiles.buffer.as_entire_binding(),
                },
            ],
            1,
        )
    }

    fn scatter(
        &self,
        src: &GpuBuffer,
        dst: &GpuBuffer,
        len: usize,
        shift: u32,
        tiles: &GpuBuffer,
    ) -> Result<(), SortError> {
        self.ensure_words("scatter", src, len)?;
        self.ensure_words("scatter", dst, len)?;
        self.ensure_words("scatter", tiles, tile_count(len) * RADIX_BUCKETS)?;

        let params = self.params(len, shift)?;
        self.run_kernel(
            "scatter",
            &self.scatter_kernel,
            &[
                BindGroupEntry {
                    binding: 0,
                    resource: params.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: src.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: dst.buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 5,
                    resource: tiles.buffer.as_entire_binding(),
                },
            ],
            Self::tile_workgroups(len),
        )
    }

    fn download(&self, buffer: &GpuBuffer, out: &mut [u32]) -> Result<(), SortError> {
        self.ensure_words("download", buffer, out.len())?;
        if out.is_empty() {
            return Ok(());
        }

        let bytes = (out.len() * size_of::<u32>()) as u64;
        let staging = self.checked("download", || {
            self.device.create_buffer(&BufferDescriptor {
                label: Some("staging"),
                size: bytes,
                usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })?;
        let staging = GpuBuffer {
            buffer: staging,
            words: out.len(),
        };

        let index = self.checked("download", || {
            let mut encoder = self
                .device
                .create_command_encoder(&CommandEncoderDescriptor {
                    label: Some("download"),
                });
            encoder.copy_buffer_to_buffer(&buffer.buffer, 0, &staging.buffer, 0, bytes);
            self.queue.submit(Some(encoder.finish()))
        })?;
        self.wait("download", Some(index))?;

        let slice = staging.buffer.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.wait("download", None)?;

        match block_on(rx.receive()) {
            Some(Ok(())) => {}
            Some(Err(e)) => return Err(self.fail("download", e.to_string())),
            None => return Err(self.fail("download", "map callback was dropped")),
        }

        {
            let data = slice.get_mapped_range();
            let words: &[u32] = bytemuck::try_cast_slice(&data)
                .map_err(|e| self.fail("download", format!("{e:?}")))?;
            out.copy_from_slice(&words[..out.len()]);
        }
        staging.buffer.unmap();
        Ok(())
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Open every distinct adapter on `backends`.
///
/// The same physical device exposed through several backends is opened once.
/// Software rasterizers are skipped unless `allow_software` is set. Adapters
/// that fail to open are logged and skipped.
pub fn open_adapters(backends: Backends, allow_software: bool) -> Vec<WgpuAccelerator> {
    let instance = Instance::new(&InstanceDescriptor {
        backends,
        ..Default::default()
    });

    let mut seen: Vec<(u32, u32, String)> = Vec::new();
    let mut opened = Vec::new();

    for adapter in instance.enumerate_adapters(backends) {
        let info = adapter.get_info();

        if info.device_type == DeviceType::Cpu && !allow_software {
            log::debug!("skipping software adapter '{}' ({:?})", info.name, info.backend);
            continue;
        }

        let key = (info.vendor, info.device, info.name.clone());
        if seen.contains(&key) {
            log::debug!("skipping duplicate adapter '{}' ({:?})", info.name, info.backend);
            continue;
        }
        seen.push(key);

        match WgpuAccelerator::from_adapter(&adapter, opened.len()) {
            Ok(accelerator) => opened.push(accelerator),
            Err(e) => log::warn!("could not open adapter '{}': {e}", info.name),
        }
    }

    opened
}
