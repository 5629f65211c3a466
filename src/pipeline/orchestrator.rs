//! Batch dispatch: runs the demosaicer over a batch of raw images and
//! hands the results to a downstream consumer.

use tracing::{info, instrument, warn};

use crate::pipeline::demosaic::{BilinearDemosaicer, DemosaicConfig, Demosaicer};
use crate::pipeline::raw::{Layout, RawImage};

/// A downstream collaborator that accepts a batch of demosaiced images.
/// The fan-out that routes a `Consumer`'s output to further pipeline
/// stages lives outside this crate — this trait is only the contract at
/// that boundary.
pub trait Consumer {
    fn consume(&mut self, batch: Vec<RawImage>);
}

/// Dispatches a batch: every Bayer image in it is run through `D`'s
/// demosaicer with `config.output_layout`; every other image passes
/// through unchanged. Each input image becomes its own single-image
/// output batch, published as soon as it's ready.
///
/// If `D` refuses an image (contract violation, or an unsupported element
/// size for a CUDA-only `D`), the orchestrator retries it once through
/// [`BilinearDemosaicer`] after normalizing the image to
/// `config.bilinear_fallback_depth` — the one path that accepts either 8-
/// or 16-bit element widths unconditionally.
pub struct Orchestrator<D: Demosaicer> {
    demosaicer: D,
    config: DemosaicConfig,
}

impl<D: Demosaicer> Orchestrator<D> {
    pub fn new(demosaicer: D) -> Self {
        Self::with_config(demosaicer, DemosaicConfig::default())
    }

    pub fn with_output_layout(demosaicer: D, output_layout: Layout) -> Self {
        Self::with_config(demosaicer, DemosaicConfig::builder().output_layout(output_layout).build())
    }

    pub fn with_config(demosaicer: D, config: DemosaicConfig) -> Self {
        Self { demosaicer, config }
    }

    #[instrument(skip(self, batch, consumer), fields(batch_len = batch.len()))]
    pub fn run(&self, batch: Vec<RawImage>, consumer: &mut dyn Consumer) {
        for image in batch {
            if image.layout() == Layout::Bayer {
                let mut result = self.demosaicer.debayer(&image, self.config.output_layout);
                if result.is_empty() && !image.is_empty() {
                    warn!("primary demosaicer refused input, retrying via bilinear fallback");
                    let normalized = if image.depth() == self.config.bilinear_fallback_depth {
                        image.clone()
                    } else {
                        image.clone_with_depth(self.config.bilinear_fallback_depth)
                    };
                    result = BilinearDemosaicer::new().debayer(&normalized, self.config.output_layout);
                }
                info!(width = result.width(), height = result.height(), "debayered image");
                consumer.consume(vec![result]);
            } else {
                consumer.consume(vec![image]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::demosaic::AhdDemosaicer;

    #[derive(Default)]
    struct CollectingConsumer {
        batches: Vec<Vec<RawImage>>,
    }

    impl Consumer for CollectingConsumer {
        fn consume(&mut self, batch: Vec<RawImage>) {
            self.batches.push(batch);
        }
    }

    #[test]
    fn bayer_image_is_demosaiced() {
        let bayer = RawImage::new(4, 4, 16, Layout::Bayer);
        let orchestrator = Orchestrator::new(AhdDemosaicer::new());
        let mut consumer = CollectingConsumer::default();

        orchestrator.run(vec![bayer], &mut consumer);

        assert_eq!(consumer.batches.len(), 1);
        assert_eq!(consumer.batches[0][0].layout(), Layout::Bgra);
    }

    // S6 / invariant 6: non-Bayer images pass through byte-for-byte.
    #[test]
    fn non_bayer_image_passes_through_unchanged() {
        let bytes: Vec<u8> = (0..(4 * 4 * 4)).map(|i| i as u8).collect();
        let rgba = RawImage::from_bytes(&bytes, 4, 4, 8, Layout::Rgba);
        let orchestrator = Orchestrator::new(AhdDemosaicer::new());
        let mut consumer = CollectingConsumer::default();

        orchestrator.run(vec![rgba.clone()], &mut consumer);

        assert_eq!(consumer.batches.len(), 1);
        assert_eq!(consumer.batches[0][0].bytes(), rgba.bytes());
        assert_eq!(consumer.batches[0][0].layout(), Layout::Rgba);
    }

    #[test]
    fn default_output_layout_is_bgra() {
        let bayer = RawImage::new(2, 2, 16, Layout::Bayer);
        let orchestrator = Orchestrator::new(AhdDemosaicer::new());
        let mut consumer = CollectingConsumer::default();
        orchestrator.run(vec![bayer], &mut consumer);
        assert_eq!(consumer.batches[0][0].layout(), Layout::Bgra);
    }

    #[test]
    fn mixed_batch_produces_one_output_batch_per_input() {
        let bayer = RawImage::new(2, 2, 16, Layout::Bayer);
        let rgba = RawImage::new(2, 2, 16, Layout::Rgba);
        let orchestrator = Orchestrator::new(AhdDemosaicer::new());
        let mut consumer = CollectingConsumer::default();

        orchestrator.run(vec![bayer, rgba], &mut consumer);

        assert_eq!(consumer.batches.len(), 2);
    }

    struct AlwaysRefusingDemosaicer;

    impl Demosaicer for AlwaysRefusingDemosaicer {
        fn debayer(&self, _raw: &RawImage, _output_layout: Layout) -> RawImage {
            RawImage::default()
        }
    }

    #[test]
    fn refused_bayer_image_falls_back_to_bilinear() {
        let bayer = RawImage::new(4, 4, 16, Layout::Bayer);
        let orchestrator = Orchestrator::new(AlwaysRefusingDemosaicer);
        let mut consumer = CollectingConsumer::default();

        orchestrator.run(vec![bayer], &mut consumer);

        assert_eq!(consumer.batches.len(), 1);
        let result = &consumer.batches[0][0];
        assert!(!result.is_empty());
        assert_eq!(result.layout(), Layout::Bgra);
    }

    #[test]
    fn with_config_honors_bilinear_fallback_depth_and_output_layout() {
        let bayer = RawImage::new(4, 4, 8, Layout::Bayer);
        let config = DemosaicConfig::builder()
            .bilinear_fallback_depth(16)
            .output_layout(Layout::Rgba)
            .build();
        let orchestrator = Orchestrator::with_config(AlwaysRefusingDemosaicer, config);
        let mut consumer = CollectingConsumer::default();

        orchestrator.run(vec![bayer], &mut consumer);

        let result = &consumer.batches[0][0];
        assert!(!result.is_empty());
        assert_eq!(result.layout(), Layout::Rgba);
    }
}
