//! Adaptive Homogeneity-Directed demosaicing.
//!
//! Produces two directionally-interpolated candidates (horizontal,
//! vertical), scores each pixel's neighborhood homogeneity in CIE L*a*b*,
//! and emits the winner — or a per-channel average on a tie. This is the
//! hard core of the pipeline; everything else exists to feed or consume
//! it.
//!
//! The hot loops index the raw byte slices directly via small sample
//! helpers rather than going through [`crate::pipeline::raw::PixelCursor`]
//! — the same split the source makes between its generic `Pixel` cursor
//! (used by the bilinear path) and `ahd_rgba<T>`'s raw pointer arithmetic
//! (used here).

use tracing::warn;

use crate::pipeline::color::Lab;
use crate::pipeline::common::DemosaicError;
use crate::pipeline::raw::{channel_offset, Channel, Layout, RawImage};

use super::types::{bayer_position, BayerPos, Demosaicer, Sample};

fn read_sample(bytes: &[u8], sample_index: usize, bytes_per_channel: usize) -> u32 {
    let off = sample_index * bytes_per_channel;
    match bytes_per_channel {
        1 => bytes[off] as u32,
        _ => u16::from_le_bytes([bytes[off], bytes[off + 1]]) as u32,
    }
}

fn write_sample(bytes: &mut [u8], sample_index: usize, bytes_per_channel: usize, value: u32) {
    let off = sample_index * bytes_per_channel;
    match bytes_per_channel {
        1 => bytes[off] = value as u8,
        _ => bytes[off..off + 2].copy_from_slice(&(value as u16).to_le_bytes()),
    }
}

/// `(x, y)` translated to a flat Bayer sample index, or `None` if either
/// coordinate falls outside `[0, width) x [0, height)`. Centralizes the
/// edge policy shared by every neighbor read in this module: an
/// out-of-range neighbor contributes 0.
fn bayer_index(x: i64, y: i64, width: usize, height: usize) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        None
    } else {
        Some(y as usize * width + x as usize)
    }
}

fn sample_or_zero(bytes: &[u8], bytes_per_channel: usize, index: Option<usize>) -> i64 {
    match index {
        Some(i) => read_sample(bytes, i, bytes_per_channel) as i64,
        None => 0,
    }
}

fn lab_or_zero(lab: &[Lab], index: Option<usize>) -> Lab {
    match index {
        Some(i) => lab[i],
        None => Lab::default(),
    }
}

fn limit(x: i64, a: i64, b: i64) -> i64 {
    if a > b {
        b.max(x.min(a))
    } else {
        a.max(x.min(b))
    }
}

/// Adaptive Homogeneity-Directed demosaicer.
///
/// Holds no state between calls: every invocation allocates its own
/// horizontal/vertical candidate scratch and L*a*b* arrays and releases
/// them when it returns, per the "fresh scratch per call" concurrency
/// option — safe to share one instance across threads as long as no two
/// calls run concurrently on it (the trait takes `&self`, not `&mut
/// self`, precisely because there is no shared mutable scratch to guard).
#[derive(Debug, Default, Clone, Copy)]
pub struct AhdDemosaicer;

impl AhdDemosaicer {
    pub fn new() -> Self {
        Self
    }
}

impl Demosaicer for AhdDemosaicer {
    fn debayer(&self, raw: &RawImage, output_layout: Layout) -> RawImage {
        let result = if raw.is_empty() {
            Err(DemosaicError::EmptyInput)
        } else {
            match raw.bytes_per_channel() {
                1 => try_debayer::<u8>(raw, output_layout),
                2 => try_debayer::<u16>(raw, output_layout),
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

fn try_debayer<T: Sample>(raw: &RawImage, output_layout: Layout) -> Result<RawImage, DemosaicError> {
    if raw.layout() != Layout::Bayer {
        return Err(DemosaicError::WrongLayout {
            expected: format!("{:?}", Layout::Bayer),
            found: format!("{:?}", raw.layout()),
        });
    }
    if !output_layout.is_four_channel() {
        return Err(DemosaicError::WrongLayout {
            expected: "a four-channel layout".to_string(),
            found: format!("{:?}", output_layout),
        });
    }

    run::<T>(raw, output_layout)
}

fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>, DemosaicError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|err| DemosaicError::AllocationFailure(err.to_string()))?;
    buf.resize(len, 0);
    Ok(buf)
}

fn run<T: Sample>(raw: &RawImage, output_layout: Layout) -> Result<RawImage, DemosaicError> {
    let width = raw.width();
    let height = raw.height();
    let depth = raw.depth();
    let bpc = raw.bytes_per_channel();
    let raw_bytes = raw.bytes();

    let go = channel_offset(output_layout, Channel::Green);
    let ro = channel_offset(output_layout, Channel::Red);
    let bo = channel_offset(output_layout, Channel::Blue);
    let ao = channel_offset(output_layout, Channel::Alpha);

    let plane_samples = width * height * 4;
    let mut h_bytes = try_alloc_zeroed(plane_samples * bpc)?;
    let mut v_bytes = try_alloc_zeroed(plane_samples * bpc)?;

    green_plane::<T>(raw_bytes, &mut h_bytes, &mut v_bytes, width, height, bpc, go, ao);
    red_blue_plane::<T>(raw_bytes, &mut h_bytes, width, height, bpc, go, ro, bo);
    red_blue_plane::<T>(raw_bytes, &mut v_bytes, width, height, bpc, go, ro, bo);

    let hlab = lab_plane(&h_bytes, width, height, bpc, ro, go, bo);
    let vlab = lab_plane(&v_bytes, width, height, bpc, ro, go, bo);

    let mut out_bytes = try_alloc_zeroed(plane_samples * bpc)?;
    vote(
        &h_bytes, &v_bytes, &hlab, &vlab, &mut out_bytes, width, height, bpc, ro, go, bo, ao,
    );

    Ok(RawImage::from_bytes(&out_bytes, width, height, depth, output_layout))
}

/// Pass 1: fills the green channel of both candidates. At Red/Blue sites
/// green is missing and is estimated directionally; at ClearRed/ClearBlue
/// sites it is already known and is simply copied. Alpha is saturated to
/// `T::MAX` for both candidates here, once, since neither pass 2 nor the
/// vote ever revisits it.
#[allow(clippy::too_many_arguments)]
fn green_plane<T: Sample>(
    raw_bytes: &[u8],
    h_bytes: &mut [u8],
    v_bytes: &mut [u8],
    width: usize,
    height: usize,
    bpc: usize,
    go: usize,
    ao: usize,
) {
    for y in 0..height {
        for x in 0..width {
            let io = y * width + x;
            let oo = io * 4;
            let pos = bayer_position(x, y);

            let (gh, gv) = if matches!(pos, BayerPos::Red | BayerPos::Blue) {
                let center = read_sample(raw_bytes, io, bpc) as i64;
                let (xi, yi) = (x as i64, y as i64);

                let left = sample_or_zero(raw_bytes, bpc, bayer_index(xi - 1, yi, width, height));
                let right = sample_or_zero(raw_bytes, bpc, bayer_index(xi + 1, yi, width, height));
                let left2 = sample_or_zero(raw_bytes, bpc, bayer_index(xi - 2, yi, width, height));
                let right2 = sample_or_zero(raw_bytes, bpc, bayer_index(xi + 2, yi, width, height));
                let gh = (((left + center + right) * 2) - left2 - right2) >> 2;
                let gh = limit(gh, left, right);

                let up = sample_or_zero(raw_bytes, bpc, bayer_index(xi, yi - 1, width, height));
                let down = sample_or_zero(raw_bytes, bpc, bayer_index(xi, yi + 1, width, height));
                let up2 = sample_or_zero(raw_bytes, bpc, bayer_index(xi, yi - 2, width, height));
                let down2 = sample_or_zero(raw_bytes, bpc, bayer_index(xi, yi + 2, width, height));
                let gv = (((up + center + down) * 2) - up2 - down2) >> 2;
                let gv = limit(gv, up, down);

                (gh, gv)
            } else {
                let v = read_sample(raw_bytes, io, bpc) as i64;
                (v, v)
            };

            write_sample(h_bytes, oo + go, bpc, gh as u32);
            write_sample(v_bytes, oo + go, bpc, gv as u32);
            write_sample(h_bytes, oo + ao, bpc, T::MAX);
            write_sample(v_bytes, oo + ao, bpc, T::MAX);
        }
    }
}

/// Pass 2: fills the red and blue channels of one candidate plane (called
/// once per plane, with that plane's own green values as the reference —
/// the horizontal candidate never looks at the vertical candidate's green
/// and vice versa).
#[allow(clippy::too_many_arguments)]
fn red_blue_plane<T: Sample>(
    raw_bytes: &[u8],
    plane: &mut [u8],
    width: usize,
    height: usize,
    bpc: usize,
    go: usize,
    ro: usize,
    bo: usize,
) {
    for y in 0..height {
        for x in 0..width {
            let io = y * width + x;
            let oo = io * 4;
            let pos = bayer_position(x, y);
            let (xi, yi) = (x as i64, y as i64);

            match pos {
                BayerPos::Red | BayerPos::Blue => {
                    let known_off = if pos == BayerPos::Red { ro } else { bo };
                    let other_off = if pos == BayerPos::Red { bo } else { ro };

                    let center = read_sample(raw_bytes, io, bpc) as i64;
                    write_sample(plane, oo + known_off, bpc, center as u32);

                    let diag = |dx: i64, dy: i64| -> i64 {
                        match bayer_index(xi + dx, yi + dy, width, height) {
                            Some(ni) => {
                                read_sample(raw_bytes, ni, bpc) as i64
                                    - read_sample(plane, ni * 4 + go, bpc) as i64
                            }
                            None => 0,
                        }
                    };
                    let delta = (diag(-1, -1) + diag(-1, 1) + diag(1, -1) + diag(1, 1)) >> 2;
                    let green_center = read_sample(plane, oo + go, bpc) as i64;
                    let value = limit(green_center + delta, 0, 65535);
                    write_sample(plane, oo + other_off, bpc, T::from_u32(value as u32).to_u32());
                }
                BayerPos::ClearRed | BayerPos::ClearBlue => {
                    let green_center = read_sample(plane, oo + go, bpc) as i64;

                    let diff = |dx: i64, dy: i64| -> i64 {
                        match bayer_index(xi + dx, yi + dy, width, height) {
                            Some(ni) => {
                                read_sample(raw_bytes, ni, bpc) as i64
                                    - read_sample(plane, ni * 4 + go, bpc) as i64
                            }
                            None => 0,
                        }
                    };

                    let red_like = green_center + ((diff(-1, 0) + diff(1, 0)) >> 1);
                    let blue_like = green_center + ((diff(0, -1) + diff(0, 1)) >> 1);

                    let red_value = T::from_u32(limit(red_like, 0, 65535) as u32).to_u32();
                    let blue_value = T::from_u32(limit(blue_like, 0, 65535) as u32).to_u32();
                    if pos == BayerPos::ClearRed {
                        write_sample(plane, oo + ro, bpc, red_value);
                        write_sample(plane, oo + bo, bpc, blue_value);
                    } else {
                        write_sample(plane, oo + bo, bpc, red_value);
                        write_sample(plane, oo + ro, bpc, blue_value);
                    }
                }
            }
        }
    }
}

fn lab_plane(plane: &[u8], width: usize, height: usize, bpc: usize, ro: usize, go: usize, bo: usize) -> Vec<Lab> {
    let mut lab = Vec::with_capacity(width * height);
    for i in 0..width * height {
        let oo = i * 4;
        let r = read_sample(plane, oo + ro, bpc);
        let g = read_sample(plane, oo + go, bpc);
        let b = read_sample(plane, oo + bo, bpc);
        lab.push(Lab::from_rgb(r, g, b));
    }
    lab
}

/// Pass 4: per-pixel homogeneity vote between the two candidates.
#[allow(clippy::too_many_arguments)]
fn vote(
    h_bytes: &[u8],
    v_bytes: &[u8],
    hlab: &[Lab],
    vlab: &[Lab],
    out_bytes: &mut [u8],
    width: usize,
    height: usize,
    bpc: usize,
    ro: usize,
    go: usize,
    bo: usize,
    ao: usize,
) {
    for y in 0..height {
        for x in 0..width {
            let io = y * width + x;
            let oo = io * 4;

            let left = if x > 0 { Some(io - 1) } else { None };
            let right = if x < width - 1 { Some(io + 1) } else { None };
            let up = if y > 0 { Some(io - width) } else { None };
            let down = if y < height - 1 { Some(io + width) } else { None };

            let h_center = hlab[io];
            let v_center = vlab[io];
            let h_left = lab_or_zero(hlab, left);
            let h_right = lab_or_zero(hlab, right);
            let v_up = lab_or_zero(vlab, up);
            let v_down = lab_or_zero(vlab, down);

            let lh0 = Lab::lightness_distance(h_center, h_left);
            let lh1 = Lab::lightness_distance(h_center, h_right);
            let lv0 = Lab::lightness_distance(v_center, v_up);
            let lv1 = Lab::lightness_distance(v_center, v_down);

            let ch0 = Lab::chroma_distance_sq(h_center, h_left);
            let ch1 = Lab::chroma_distance_sq(h_center, h_right);
            let cv0 = Lab::chroma_distance_sq(v_center, v_up);
            let cv1 = Lab::chroma_distance_sq(v_center, v_down);

            let eps_l = f64::min(lh0.max(lh1), lv0.max(lv1));
            let eps_c = f64::min(ch0.max(ch1), cv0.max(cv1));

            let mut hh = 0u8;
            let mut hv = 0u8;
            if lh0 <= eps_l && ch0 <= eps_c {
                hh += 1;
            }
            if lh1 <= eps_l && ch1 <= eps_c {
                hh += 1;
            }
            if lv0 <= eps_l && cv0 <= eps_c {
                hv += 1;
            }
            if lv1 <= eps_l && cv1 <= eps_c {
                hv += 1;
            }

            match hh.cmp(&hv) {
                std::cmp::Ordering::Greater => {
                    out_bytes[oo * bpc..(oo + 4) * bpc].copy_from_slice(&h_bytes[oo * bpc..(oo + 4) * bpc]);
                }
                std::cmp::Ordering::Less => {
                    out_bytes[oo * bpc..(oo + 4) * bpc].copy_from_slice(&v_bytes[oo * bpc..(oo + 4) * bpc]);
                }
                std::cmp::Ordering::Equal => {
                    let avg = |off: usize| -> u32 {
                        ((read_sample(h_bytes, oo + off, bpc) + read_sample(v_bytes, oo + off, bpc)) >> 1) as u32
                    };
                    write_sample(out_bytes, oo + ro, bpc, avg(ro));
                    write_sample(out_bytes, oo + go, bpc, avg(go));
                    write_sample(out_bytes, oo + bo, bpc, avg(bo));
                    let alpha = read_sample(h_bytes, oo + ao, bpc).max(read_sample(v_bytes, oo + ao, bpc));
                    write_sample(out_bytes, oo + ao, bpc, alpha);
                }
            }
        }
    }
}
