//! GPU (CUDA) demosaicer — contract only.
//!
//! The CUDA variant of AHD is explicitly out of scope for this crate: it
//! shares the same `debayer(raw, output_layout) -> raw'` contract as the
//! CPU kernels, but its device-memory wrappers, kernel launch parameters
//! and reference-counted device buffers are an implementation variant
//! that lives elsewhere. This type exists so callers can depend on the
//! contract (and so the `cuda` feature wires up the same dependency the
//! source's Jetson build does) without this crate owning a CUDA kernel.

use tracing::warn;

use cudarc::driver::CudaContext;

use crate::pipeline::raw::{Layout, RawImage};

use super::types::Demosaicer;

/// Holds the CUDA context/stream a real kernel launch would use. No
/// kernel is loaded: `debayer` always reports the unimplemented contract
/// via the empty-result convention, same as any other contract
/// violation in this crate.
pub struct CudaDemosaicer {
    _context: std::sync::Arc<CudaContext>,
}

impl CudaDemosaicer {
    /// Initializes device 0's CUDA context. Fails the same way the
    /// source's `CudaDebayer::new` does if no CUDA device is available.
    pub fn new() -> anyhow::Result<Self> {
        let context = CudaContext::new(0)?;
        Ok(Self { _context: context })
    }
}

impl Demosaicer for CudaDemosaicer {
    fn debayer(&self, _raw: &RawImage, _output_layout: Layout) -> RawImage {
        warn!("cuda: kernel not implemented in this build, returning empty result");
        RawImage::default()
    }
}
