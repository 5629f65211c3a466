use thiserror::Error;

/// Reasons a demosaicing call can refuse to produce an image.
///
/// None of these are surfaced to callers as a `Result` — per the
/// demosaicer contract, every failure is reported by returning an empty
/// [`crate::RawImage`] (`RawImage::empty()`). The enum exists so the
/// reason can be logged at the point of failure before it is discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemosaicError {
    #[error("input image is empty or has zero dimensions")]
    EmptyInput,

    #[error("expected layout {expected:?}, found {found:?}")]
    WrongLayout { expected: String, found: String },

    #[error("element size mismatch: kernel specialized for {expected} bytes/channel, image has {found}")]
    ElementSizeMismatch { expected: usize, found: usize },

    #[error("allocation failure: {0}")]
    AllocationFailure(String),
}

pub type Result<T> = std::result::Result<T, DemosaicError>;
