//! AHD demosaicing pipeline
//!
//! Converts raw single-channel Bayer sensor data into four-channel color
//! images using the Adaptive Homogeneity-Directed (AHD) algorithm, with a
//! bilinear path for simpler/reference use. Windowing, file-format loading,
//! and the producer/consumer fan-out that ships images between pipeline
//! stages live outside this crate; the [`pipeline::orchestrator::Consumer`]
//! trait documents that boundary.

pub mod logger;
pub mod pipeline;

pub use pipeline::color::Lab;
pub use pipeline::common::{DemosaicError, Result};
pub use pipeline::demosaic::{
    select_demosaicer, AhdDemosaicer, BilinearDemosaicer, Demosaicer, DemosaicConfig, DemosaicConfigBuilder,
};
pub use pipeline::orchestrator::{Consumer, Orchestrator};
pub use pipeline::raw::{Channel, Histogram, Layout, Point, RawImage};
