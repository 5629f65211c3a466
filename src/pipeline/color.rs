//! CIE L*a*b* color module
//!
//! This module converts an RGB sample triple to the CIE L*a*b* color space
//! (D65 illuminant), used by the AHD demosaicer as a perceptual distance
//! metric for its homogeneity vote.

pub mod lab;

pub use lab::Lab;
