//! Demosaicing pipeline module
//!
//! This module provides the AHD demosaicing core: a raw Bayer image buffer,
//! the pixel-addressing abstraction used to read/write it, a CIE L*a*b*
//! conversion used as the perceptual homogeneity metric, the AHD and
//! bilinear demosaicers themselves, and a thin orchestrator that dispatches
//! a batch of images to whichever of the two applies.

pub mod color;
pub mod common;
pub mod demosaic;
pub mod orchestrator;
pub mod raw;

pub use common::{DemosaicError, Result};

pub use raw::{Channel, Histogram, Layout, Point, RawImage};

pub use color::Lab;

pub use demosaic::{select_demosaicer, AhdDemosaicer, BilinearDemosaicer, Demosaicer, DemosaicConfig, DemosaicConfigBuilder};

pub use orchestrator::{Consumer, Orchestrator};
