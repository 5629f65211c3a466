//! The pixel layout enum and its channel map.
//!
//! `channel_offset` is the single source of truth for where a logical
//! color channel lives inside one pixel of a given layout. Every other
//! piece of pixel addressing (`PixelCursor`, the AHD kernel's raw slice
//! indexing) goes through it rather than hard-coding offsets.

/// How the bytes of one pixel are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Single-channel Bayer mosaic: one sample per pixel.
    Bayer,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl Layout {
    /// Channels stored per pixel: 1 for Bayer, 3 for RGB/BGR, 4 for RGBA/BGRA.
    pub fn channels_per_pixel(self) -> usize {
        match self {
            Layout::Bayer => 1,
            Layout::Rgb | Layout::Bgr => 3,
            Layout::Rgba | Layout::Bgra => 4,
        }
    }

    /// True for the two layouts the demosaicers may produce as output.
    pub fn is_four_channel(self) -> bool {
        matches!(self, Layout::Rgba | Layout::Bgra)
    }

    pub fn has_alpha(self) -> bool {
        self.is_four_channel()
    }
}

/// A logical color channel, independent of any particular layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

/// Byte offset of `channel` within one pixel of `layout`.
///
/// Bayer pixels carry a single sample regardless of which channel is
/// asked for — there is nothing else to address. RGB/BGR have no alpha
/// lane; querying `Alpha` there returns offset 0, matching the source's
/// all-zero row for those types (the value is never read because those
/// layouts never appear as `Alpha`-bearing outputs).
pub const fn channel_offset(layout: Layout, channel: Channel) -> usize {
    match (layout, channel) {
        (Layout::Bayer, _) => 0,

        (Layout::Rgb, Channel::Blue) => 0,
        (Layout::Rgb, Channel::Green) => 1,
        (Layout::Rgb, Channel::Red) => 2,
        (Layout::Rgb, Channel::Alpha) => 0,

        (Layout::Bgr, Channel::Red) => 0,
        (Layout::Bgr, Channel::Green) => 1,
        (Layout::Bgr, Channel::Blue) => 2,
        (Layout::Bgr, Channel::Alpha) => 0,

        (Layout::Rgba, Channel::Blue) => 0,
        (Layout::Rgba, Channel::Green) => 1,
        (Layout::Rgba, Channel::Red) => 2,
        (Layout::Rgba, Channel::Alpha) => 3,

        (Layout::Bgra, Channel::Red) => 0,
        (Layout::Bgra, Channel::Green) => 1,
        (Layout::Bgra, Channel::Blue) => 2,
        (Layout::Bgra, Channel::Alpha) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_and_bgra_swap_red_and_blue_only() {
        assert_eq!(channel_offset(Layout::Rgba, Channel::Red), 2);
        assert_eq!(channel_offset(Layout::Rgba, Channel::Blue), 0);
        assert_eq!(channel_offset(Layout::Bgra, Channel::Red), 0);
        assert_eq!(channel_offset(Layout::Bgra, Channel::Blue), 2);

        // Green and Alpha are identical across the two layouts.
        assert_eq!(
            channel_offset(Layout::Rgba, Channel::Green),
            channel_offset(Layout::Bgra, Channel::Green)
        );
        assert_eq!(
            channel_offset(Layout::Rgba, Channel::Alpha),
            channel_offset(Layout::Bgra, Channel::Alpha)
        );
    }

    #[test]
    fn bayer_ignores_the_requested_channel() {
        for channel in [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha] {
            assert_eq!(channel_offset(Layout::Bayer, channel), 0);
        }
    }
}
