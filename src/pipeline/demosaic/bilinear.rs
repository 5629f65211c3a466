//! Bilinear demosaicing: a simpler reference path with the same
//! input/output contract as [`super::ahd::AhdDemosaicer`].
//!
//! Unlike the AHD kernel, this one is built on [`PixelCursor`] — matching
//! the source's own split, where `biliner_interpolation` addresses pixels
//! through the generic `Pixel` cursor class while `ahd_rgba` indexes raw
//! pointers directly for speed.

use tracing::warn;

use crate::pipeline::common::DemosaicError;
use crate::pipeline::raw::{Channel, Layout, PixelCursor, PixelCursorMut, RawImage};

use super::types::{bayer_position, BayerPos, Demosaicer, Sample};

#[derive(Debug, Default, Clone, Copy)]
pub struct BilinearDemosaicer;

impl BilinearDemosaicer {
    pub fn new() -> Self {
        Self
    }
}

impl Demosaicer for BilinearDemosaicer {
    fn debayer(&self, raw: &RawImage, output_layout: Layout) -> RawImage {
        let result = if raw.is_empty() {
            Err(DemosaicError::EmptyInput)
        } else if raw.layout() != Layout::Bayer {
            Err(DemosaicError::WrongLayout {
                expected: format!("{:?}", Layout::Bayer),
                found: format!("{:?}", raw.layout()),
            })
        } else if !output_layout.is_four_channel() {
            Err(DemosaicError::WrongLayout {
                expected: "a four-channel layout".to_string(),
                found: format!("{:?}", output_layout),
            })
        } else {
            match raw.bytes_per_channel() {
                1 => Ok(run::<u8>(raw, output_layout)),
                2 => Ok(run::<u16>(raw, output_layout)),
                found => Err(DemosaicError::ElementSizeMismatch { expected: 2, found }),
            }
        };

        match result {
            Ok(image) => image,
            Err(err) => {
                warn!(%err, "debayer preconditions failed");
                RawImage::default()
            }
        }
    }
}

/// Averages the in-range taps of `neighbors`, each an `Option<u32>` that is
/// `None` when that neighbor falls outside the image. Matches the
/// source's "average only over neighbors that fall inside the image"
/// edge policy: the denominator is the count of present taps, not a fixed
/// 2 or 4.
fn average(neighbors: &[Option<u32>]) -> u32 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for n in neighbors.iter().flatten() {
        sum += *n as u64;
        count += 1;
    }
    if count == 0 {
        0
    } else {
        (sum / count) as u32
    }
}

fn run<T: Sample>(raw: &RawImage, output_layout: Layout) -> RawImage {
    let width = raw.width();
    let height = raw.height();
    let bpc = raw.bytes_per_channel();
    let mut out_buf = vec![0u8; width * height * 4 * bpc];
    {
        let input = PixelCursor::new(raw);
        let mut output = PixelCursorMut::new(&mut out_buf, width, output_layout, bpc);

        for y in 0..height {
            for x in 0..width {
                let at = |dx: i64, dy: i64| -> Option<u32> {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        None
                    } else {
                        Some(input.at(nx, ny).get(Channel::Red))
                    }
                };

                let pos = bayer_position(x, y);
                let (r, g, b) = match pos {
                    BayerPos::ClearRed | BayerPos::ClearBlue => {
                        let green = at(0, 0).unwrap_or(0);
                        let vertical = average(&[at(0, -1), at(0, 1)]);
                        let horizontal = average(&[at(-1, 0), at(1, 0)]);
                        if pos == BayerPos::ClearRed {
                            (horizontal, green, vertical)
                        } else {
                            (vertical, green, horizontal)
                        }
                    }
                    BayerPos::Red => {
                        let red = at(0, 0).unwrap_or(0);
                        let green = average(&[at(0, -1), at(0, 1), at(-1, 0), at(1, 0)]);
                        let blue = average(&[at(-1, -1), at(-1, 1), at(1, -1), at(1, 1)]);
                        (red, green, blue)
                    }
                    BayerPos::Blue => {
                        let blue = at(0, 0).unwrap_or(0);
                        let green = average(&[at(0, -1), at(0, 1), at(-1, 0), at(1, 0)]);
                        let red = average(&[at(-1, -1), at(-1, 1), at(1, -1), at(1, 1)]);
                        (red, green, blue)
                    }
                };

                output = output.at(x as i64, y as i64);
                output.set(Channel::Red, r);
                output.set(Channel::Green, g);
                output.set(Channel::Blue, b);
                output.set(Channel::Alpha, T::MAX);
            }
        }
    }

    RawImage::from_bytes(&out_buf, width, height, raw.depth(), output_layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_bayer(width: usize, height: usize) -> RawImage {
        let mut samples = vec![0u16; width * height];
        for y in 0..height {
            for x in 0..width {
                samples[y * width + x] = match bayer_position(x, y) {
                    BayerPos::ClearRed | BayerPos::ClearBlue => 1000,
                    BayerPos::Red => 60000,
                    BayerPos::Blue => 500,
                };
            }
        }
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        RawImage::from_bytes(&bytes, width, height, 16, Layout::Bayer)
    }

    // Invariant 7: at an interior site the known channel is passed through untouched.
    #[test]
    fn interior_sites_preserve_their_own_channel() {
        let raw = checkerboard_bayer(6, 6);
        let out = BilinearDemosaicer::new().debayer(&raw, Layout::Rgba);

        for y in 1..5 {
            for x in 1..5 {
                let cursor = PixelCursor::new(&out).at(x as i64, y as i64);
                match bayer_position(x, y) {
                    BayerPos::ClearRed | BayerPos::ClearBlue => {
                        assert_eq!(cursor.get(Channel::Green), 1000);
                    }
                    BayerPos::Red => assert_eq!(cursor.get(Channel::Red), 60000),
                    BayerPos::Blue => assert_eq!(cursor.get(Channel::Blue), 500),
                }
            }
        }
    }

    #[test]
    fn alpha_is_saturated() {
        let raw = checkerboard_bayer(4, 4);
        let out = BilinearDemosaicer::new().debayer(&raw, Layout::Rgba);
        for y in 0..4 {
            for x in 0..4 {
                let cursor = PixelCursor::new(&out).at(x as i64, y as i64);
                assert_eq!(cursor.get(Channel::Alpha), 65535);
            }
        }
    }

    #[test]
    fn rejects_non_bayer_input() {
        let raw = RawImage::new(4, 4, 16, Layout::Rgba);
        let out = BilinearDemosaicer::new().debayer(&raw, Layout::Rgba);
        assert!(out.is_empty());
    }

    #[test]
    fn dimensions_are_preserved() {
        let raw = checkerboard_bayer(8, 6);
        let out = BilinearDemosaicer::new().debayer(&raw, Layout::Bgra);
        assert_eq!(out.width(), 8);
        assert_eq!(out.height(), 6);
        assert_eq!(out.layout(), Layout::Bgra);
    }
}
