//! The raw pixel buffer and its small value types.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::channel_map::Layout;

/// A 2D integer displacement used by [`super::cursor::PixelCursor`] arithmetic.
///
/// Carried over from the original `Point` helper that paired with the
/// pixel cursor to express "one row down", "one column left", and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Per-intensity pixel counts, attached to a [`RawImage`] as an optional,
/// opaque output. Only the GPU variant of this pipeline populates one; the
/// CPU demosaicers never do, and callers must tolerate its absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    /// One bucket per representable intensity.
    pub full: Vec<u32>,
    /// A handful of coarse buckets (9 in the source GPU pipeline).
    pub coarse: Vec<u32>,
    pub max_count: u32,
}

fn bytes_per_channel_for(depth: u32) -> usize {
    depth.div_ceil(8) as usize
}

fn stride_for(width: usize, depth: u32, layout: Layout) -> usize {
    width * layout.channels_per_pixel() * bytes_per_channel_for(depth)
}

fn total_size_for(width: usize, height: usize, depth: u32, layout: Layout) -> usize {
    stride_for(width, depth, layout) * height
}

/// A single contiguous pixel buffer: width, height, bit depth, pixel
/// layout, and the bytes themselves.
///
/// Shared by reference (`Arc<[u8]>`, the longest-holder-owns-it
/// replacement for the source's manual reference counting). Immutable
/// after construction; the only way to get a differently-shaped buffer is
/// to build a new one, e.g. via [`RawImage::clone_with_depth`] or one of
/// the demosaicers.
#[derive(Clone)]
pub struct RawImage {
    width: usize,
    height: usize,
    depth: u32,
    layout: Layout,
    bytes: Arc<[u8]>,
    histogram: Option<Arc<Histogram>>,
}

impl RawImage {
    /// Allocates a zeroed buffer of exactly `stride * height` bytes.
    pub fn new(width: usize, height: usize, depth: u32, layout: Layout) -> Self {
        let size = total_size_for(width, height, depth, layout);
        Self {
            width,
            height,
            depth,
            layout,
            bytes: Arc::from(vec![0u8; size].into_boxed_slice()),
            histogram: None,
        }
    }

    /// Copies `data` into a freshly-allocated buffer sized for
    /// `(width, height, depth, layout)`. Shorter input is zero-padded;
    /// longer input is truncated — the invariant that `bytes().len()`
    /// equals the computed total size always holds.
    pub fn from_bytes(data: &[u8], width: usize, height: usize, depth: u32, layout: Layout) -> Self {
        let size = total_size_for(width, height, depth, layout);
        let mut buf = vec![0u8; size];
        let copy_len = data.len().min(size);
        buf[..copy_len].copy_from_slice(&data[..copy_len]);
        Self {
            width,
            height,
            depth,
            layout,
            bytes: Arc::from(buf.into_boxed_slice()),
            histogram: None,
        }
    }

    /// Loads the simple raw format read at the pipeline boundary: a
    /// 12-byte little-endian header (`width: u32, height: u32,
    /// bytes_per_pixel: u32`) followed by raw samples. If the body is at
    /// least `width * height * bytes_per_pixel * 4` bytes the layout is
    /// taken to be RGBA; otherwise it is Bayer with one sample byte width
    /// per pixel. Any I/O or short-read failure produces an empty buffer.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_from_path(path.as_ref()) {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), error = %err, "failed to load raw image");
                Self::default()
            }
        }
    }

    fn try_from_path(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 12];
        file.read_exact(&mut header)?;

        let width = u32::from_le_bytes(header[0..4].try_into().unwrap()) as usize;
        let height = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;
        let bytes_per_pixel = u32::from_le_bytes(header[8..12].try_into().unwrap()) as usize;

        let mut body = Vec::new();
        file.read_to_end(&mut body)?;

        debug!(width, height, bytes_per_pixel, body_len = body.len(), "decoded raw header");

        let depth = (bytes_per_pixel * 8) as u32;
        let layout = if body.len() >= width * height * bytes_per_pixel * 4 {
            Layout::Rgba
        } else {
            Layout::Bayer
        };

        Ok(Self::from_bytes(&body, width, height, depth, layout))
    }

    /// Copies into a new buffer at `new_depth`, shifting sample magnitude
    /// left or right to preserve the represented range (8 -> 16 bit
    /// widens by shifting left 8, 16 -> 8 narrows by shifting right 8).
    /// Only 8 and 16 bit depths are supported, matching the demosaicer's
    /// own element-size contract.
    pub fn clone_with_depth(&self, new_depth: u32) -> Self {
        if self.is_empty() {
            return Self::default();
        }

        let old_bpc = self.bytes_per_channel();
        let new_bpc = bytes_per_channel_for(new_depth);
        if old_bpc != 1 && old_bpc != 2 {
            return Self::default();
        }
        if new_bpc != 1 && new_bpc != 2 {
            return Self::default();
        }

        let channels = self.channels_per_pixel();
        let mut out = vec![0u8; total_size_for(self.width, self.height, new_depth, self.layout)];

        let read_sample = |bytes: &[u8], i: usize| -> u32 {
            let off = i * old_bpc;
            match old_bpc {
                1 => bytes[off] as u32,
                _ => u16::from_le_bytes([bytes[off], bytes[off + 1]]) as u32,
            }
        };
        let write_sample = |bytes: &mut [u8], i: usize, value: u32| {
            let off = i * new_bpc;
            match new_bpc {
                1 => bytes[off] = value as u8,
                _ => bytes[off..off + 2].copy_from_slice(&(value as u16).to_le_bytes()),
            }
        };

        let shift = new_depth as i32 - self.depth as i32;
        let total_samples = self.width * self.height * channels;
        for i in 0..total_samples {
            let v = read_sample(&self.bytes, i) as i64;
            let shifted = if shift >= 0 { v << shift } else { v >> (-shift) };
            write_sample(&mut out, i, shifted as u32);
        }

        Self {
            width: self.width,
            height: self.height,
            depth: new_depth,
            layout: self.layout,
            bytes: Arc::from(out.into_boxed_slice()),
            histogram: None,
        }
    }

    /// Attaches a histogram, returning an updated `RawImage`. The pixel
    /// bytes are still shared via `Arc`; only this value's histogram
    /// field changes.
    pub fn with_histogram(mut self, histogram: Histogram) -> Self {
        self.histogram = Some(Arc::new(histogram));
        self
    }

    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn bytes_per_channel(&self) -> usize {
        bytes_per_channel_for(self.depth)
    }

    pub fn channels_per_pixel(&self) -> usize {
        self.layout.channels_per_pixel()
    }

    pub fn stride(&self) -> usize {
        stride_for(self.width, self.depth, self.layout)
    }

    /// `true` if this is a zero-dimension buffer — the sentinel every
    /// fallible core operation returns in place of an error code.
    pub fn empty(&self) -> bool {
        self.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() || self.width == 0 || self.height == 0
    }
}

impl Default for RawImage {
    /// The empty, zero-dimension sentinel buffer.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            depth: 0,
            layout: Layout::Bayer,
            bytes: Arc::from(Vec::new().into_boxed_slice()),
            histogram: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocates_exactly_total_size() {
        let image = RawImage::new(4, 4, 16, Layout::Bayer);
        assert_eq!(image.bytes().len(), 4 * 4 * 2);
        assert!(!image.empty());
    }

    #[test]
    fn empty_reports_empty() {
        assert!(RawImage::default().empty());
    }

    #[test]
    fn from_bytes_zero_pads_short_input() {
        let image = RawImage::from_bytes(&[1, 2, 3], 4, 4, 16, Layout::Bayer);
        assert_eq!(image.bytes().len(), 32);
        assert_eq!(&image.bytes()[0..3], &[1, 2, 3]);
        assert_eq!(image.bytes()[3], 0);
    }

    #[test]
    fn clone_with_depth_widens_8_to_16_bit() {
        let image = RawImage::from_bytes(&[0xFF, 0x00, 0x80], 3, 1, 8, Layout::Bayer);
        let widened = image.clone_with_depth(16);
        assert_eq!(widened.depth(), 16);
        let samples: Vec<u16> = widened
            .bytes()
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(samples, vec![0xFF00, 0x0000, 0x8000]);
    }

    #[test]
    fn clone_with_depth_narrows_16_to_8_bit() {
        let image = RawImage::from_bytes(&0xFF00u16.to_le_bytes(), 1, 1, 16, Layout::Bayer);
        let narrowed = image.clone_with_depth(8);
        assert_eq!(narrowed.depth(), 8);
        assert_eq!(narrowed.bytes(), &[0xFF]);
    }

    #[test]
    fn from_path_missing_file_is_empty() {
        let image = RawImage::from_path("/nonexistent/path/to/raw.bin");
        assert!(image.empty());
    }

    #[test]
    fn from_path_round_trips_bayer_body() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.raw");
        let mut file = File::create(&path).unwrap();
        file.write_all(&4u32.to_le_bytes()).unwrap();
        file.write_all(&2u32.to_le_bytes()).unwrap();
        file.write_all(&1u32.to_le_bytes()).unwrap();
        file.write_all(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        drop(file);

        let image = RawImage::from_path(&path);
        assert!(!image.empty());
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.layout(), Layout::Bayer);
        assert_eq!(image.bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
