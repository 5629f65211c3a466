//! Raw pixel buffer module
//!
//! This module provides the raw Bayer/RGB buffer type (`RawImage`), the
//! pixel layout/channel map that addresses it, and the cursor types used
//! to read and write individual channels by position.

pub mod channel_map;
pub mod cursor;
pub mod types;

pub use channel_map::{channel_offset, Channel, Layout};
pub use cursor::{PixelCursor, PixelCursorMut};
pub use types::{Histogram, Point, RawImage};
