//! Demosaicing kernels module
//!
//! This module provides the two CPU demosaicing kernels (AHD and
//! bilinear) and the small shared types (`Sample`, `BayerPos`,
//! `Demosaicer`) they're built on. An optional `cuda` feature adds a
//! contract-only GPU variant stub — see [`gpu`].

pub mod ahd;
pub mod bilinear;
pub mod config;
pub mod types;

#[cfg(feature = "cuda")]
pub mod gpu;

pub use ahd::AhdDemosaicer;
pub use bilinear::BilinearDemosaicer;
pub use config::{DemosaicConfig, DemosaicConfigBuilder};
pub use types::{bayer_position, BayerPos, Demosaicer, Sample};

#[cfg(feature = "cuda")]
pub use gpu::CudaDemosaicer;

use tracing::warn;

use crate::pipeline::raw::RawImage;

/// Picks the demosaicer `config.gpu` asks for: the CUDA contract stub when
/// the `cuda` feature is built and a device initializes, the CPU AHD
/// kernel otherwise. Mirrors `ConversionConfig::debayer` gating the
/// teacher's own CPU/GPU debayer split at the same kind of call site.
pub fn select_demosaicer(config: &DemosaicConfig) -> Box<dyn Demosaicer> {
    if config.gpu {
        #[cfg(feature = "cuda")]
        {
            match gpu::CudaDemosaicer::new() {
                Ok(cuda) => return Box::new(cuda),
                Err(err) => {
                    warn!(%err, "failed to initialize cuda demosaicer, falling back to cpu");
                }
            }
        }
        #[cfg(not(feature = "cuda"))]
        {
            warn!("gpu demosaicing requested but the `cuda` feature is not enabled, falling back to cpu");
        }
    }
    Box::new(AhdDemosaicer::new())
}

#[cfg(test)]
mod select_demosaicer_tests {
    use super::*;

    #[test]
    fn cpu_is_selected_when_gpu_is_off() {
        let config = DemosaicConfig::default();
        let demosaicer = select_demosaicer(&config);
        let raw = RawImage::default();
        assert!(demosaicer.debayer(&raw, crate::pipeline::raw::Layout::Bgra).is_empty());
    }

    #[test]
    fn cpu_is_selected_when_gpu_is_requested_without_the_cuda_feature() {
        let config = DemosaicConfig::builder().gpu(true).build();
        let _demosaicer = select_demosaicer(&config);
    }
}
