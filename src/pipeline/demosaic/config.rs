//! Demosaicing configuration.

use crate::pipeline::raw::Layout;

/// Knobs the orchestrator and the bilinear fallback path read at run time,
/// in place of the hard-coded constants a one-shot conversion would use.
#[derive(Debug, Clone, Copy)]
pub struct DemosaicConfig {
    /// Element depth (8 or 16) the bilinear fallback path runs at. An
    /// input at a different depth is widened/narrowed via
    /// [`crate::pipeline::raw::RawImage::clone_with_depth`] before the
    /// fallback kernel sees it.
    pub bilinear_fallback_depth: u32,
    /// Output layout the orchestrator hands to the demosaicer for every
    /// Bayer image in a batch.
    pub output_layout: Layout,
    /// When set, the orchestrator reaches for the CUDA contract stub
    /// instead of the CPU kernel — mirrors `ConversionConfig::debayer`'s
    /// role of gating the teacher's own CPU/GPU debayer split.
    pub gpu: bool,
}

impl Default for DemosaicConfig {
    fn default() -> Self {
        Self {
            bilinear_fallback_depth: 16,
            output_layout: Layout::Bgra,
            gpu: false,
        }
    }
}

impl DemosaicConfig {
    pub fn builder() -> DemosaicConfigBuilder {
        DemosaicConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct DemosaicConfigBuilder {
    bilinear_fallback_depth: Option<u32>,
    output_layout: Option<Layout>,
    gpu: Option<bool>,
}

impl DemosaicConfigBuilder {
    pub fn bilinear_fallback_depth(mut self, depth: u32) -> Self {
        self.bilinear_fallback_depth = Some(depth);
        self
    }

    pub fn output_layout(mut self, layout: Layout) -> Self {
        self.output_layout = Some(layout);
        self
    }

    pub fn gpu(mut self, enable: bool) -> Self {
        self.gpu = Some(enable);
        self
    }

    pub fn build(self) -> DemosaicConfig {
        let default = DemosaicConfig::default();
        DemosaicConfig {
            bilinear_fallback_depth: self.bilinear_fallback_depth.unwrap_or(default.bilinear_fallback_depth),
            output_layout: self.output_layout.unwrap_or(default.output_layout),
            gpu: self.gpu.unwrap_or(default.gpu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let config = DemosaicConfig::default();
        assert_eq!(config.bilinear_fallback_depth, 16);
        assert_eq!(config.output_layout, Layout::Bgra);
        assert!(!config.gpu);
    }

    #[test]
    fn builder_overrides_only_set_fields() {
        let config = DemosaicConfig::builder().gpu(true).build();
        assert_eq!(config.bilinear_fallback_depth, 16);
        assert_eq!(config.output_layout, Layout::Bgra);
        assert!(config.gpu);
    }

    #[test]
    fn builder_overrides_every_field() {
        let config = DemosaicConfig::builder()
            .bilinear_fallback_depth(8)
            .output_layout(Layout::Rgba)
            .gpu(true)
            .build();
        assert_eq!(config.bilinear_fallback_depth, 8);
        assert_eq!(config.output_layout, Layout::Rgba);
        assert!(config.gpu);
    }
}
