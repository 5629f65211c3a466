//! Pixel addressing: a cursor over a raw buffer that turns `(x, y,
//! channel)` into a byte offset via the [`super::channel_map`] table.
//!
//! The cursor is advisory. It never panics and never reads/writes out of
//! bounds: a `get` whose computed offset falls outside the buffer returns
//! `0`, and a `set` whose offset falls outside the buffer is silently
//! dropped. Callers that need stricter guarantees (the AHD kernel) do
//! their own bounds checks and index the underlying slice directly
//! instead of going through a cursor.

use super::channel_map::{channel_offset, Channel, Layout};
use super::types::{Point, RawImage};

fn read_channel(bytes: &[u8], offset: i64, bytes_per_channel: usize) -> u32 {
    if offset < 0 {
        return 0;
    }
    let start = offset as usize;
    let end = start + bytes_per_channel;
    if end > bytes.len() {
        return 0;
    }
    let mut value = 0u32;
    for (i, b) in bytes[start..end].iter().enumerate() {
        value |= (*b as u32) << (8 * i);
    }
    value
}

fn write_channel(bytes: &mut [u8], offset: i64, bytes_per_channel: usize, value: u32) {
    if offset < 0 {
        return;
    }
    let start = offset as usize;
    let end = start + bytes_per_channel;
    if end > bytes.len() {
        return;
    }
    for (i, b) in bytes[start..end].iter_mut().enumerate() {
        *b = ((value >> (8 * i)) & 0xFF) as u8;
    }
}

/// A read-only cursor over a [`RawImage`]'s bytes.
#[derive(Debug, Clone, Copy)]
pub struct PixelCursor<'a> {
    bytes: &'a [u8],
    offset: i64,
    width: usize,
    layout: Layout,
    bytes_per_channel: usize,
    channels_per_pixel: usize,
}

impl<'a> PixelCursor<'a> {
    pub fn new(image: &'a RawImage) -> Self {
        Self {
            bytes: image.bytes(),
            offset: 0,
            width: image.width(),
            layout: image.layout(),
            bytes_per_channel: image.bytes_per_channel(),
            channels_per_pixel: image.channels_per_pixel(),
        }
    }

    fn pixel_stride(&self) -> i64 {
        (self.channels_per_pixel * self.bytes_per_channel) as i64
    }

    /// A new cursor positioned at `(x, y)`, absolute from the image origin.
    pub fn at(&self, x: i64, y: i64) -> Self {
        let offset = (x + self.width as i64 * y) * self.pixel_stride();
        Self { offset, ..*self }
    }

    pub fn get(&self, channel: Channel) -> u32 {
        let offset = self.offset + (channel_offset(self.layout, channel) * self.bytes_per_channel) as i64;
        read_channel(self.bytes, offset, self.bytes_per_channel)
    }
}

impl std::ops::Add<Point> for PixelCursor<'_> {
    type Output = Self;
    fn add(self, pt: Point) -> Self {
        let delta = (pt.x + self.width as i64 * pt.y) * self.pixel_stride();
        Self { offset: self.offset + delta, ..self }
    }
}

impl std::ops::Sub<Point> for PixelCursor<'_> {
    type Output = Self;
    fn sub(self, pt: Point) -> Self {
        let delta = (pt.x + self.width as i64 * pt.y) * self.pixel_stride();
        Self { offset: self.offset - delta, ..self }
    }
}

impl std::ops::AddAssign<Point> for PixelCursor<'_> {
    fn add_assign(&mut self, pt: Point) {
        *self = *self + pt;
    }
}

impl std::ops::SubAssign<Point> for PixelCursor<'_> {
    fn sub_assign(&mut self, pt: Point) {
        *self = *self - pt;
    }
}

/// A writable cursor over a freshly-allocated pixel buffer, used while a
/// demosaicer is constructing its output. Follows the same addressing and
/// out-of-bounds policy as [`PixelCursor`].
pub struct PixelCursorMut<'a> {
    bytes: &'a mut [u8],
    offset: i64,
    width: usize,
    layout: Layout,
    bytes_per_channel: usize,
    channels_per_pixel: usize,
}

impl<'a> PixelCursorMut<'a> {
    pub fn new(bytes: &'a mut [u8], width: usize, layout: Layout, bytes_per_channel: usize) -> Self {
        let channels_per_pixel = layout.channels_per_pixel();
        Self { bytes, offset: 0, width, layout, bytes_per_channel, channels_per_pixel }
    }

    fn pixel_stride(&self) -> i64 {
        (self.channels_per_pixel * self.bytes_per_channel) as i64
    }

    pub fn at(self, x: i64, y: i64) -> Self {
        let offset = (x + self.width as i64 * y) * self.pixel_stride();
        Self { offset, ..self }
    }

    pub fn get(&self, channel: Channel) -> u32 {
        let offset = self.offset + (channel_offset(self.layout, channel) * self.bytes_per_channel) as i64;
        read_channel(self.bytes, offset, self.bytes_per_channel)
    }

    pub fn set(&mut self, channel: Channel, value: u32) {
        let offset = self.offset + (channel_offset(self.layout, channel) * self.bytes_per_channel) as i64;
        write_channel(self.bytes, offset, self.bytes_per_channel, value);
    }
}
