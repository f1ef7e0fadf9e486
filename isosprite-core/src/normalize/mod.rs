//! Alpha-driven sprite normalization.
//!
//! The visible content of a rendered sprite is located through its alpha
//! channel, padded, cropped, scaled to fit a square canvas without changing
//! its aspect ratio, and pasted centered on a transparent canvas. A fully
//! transparent image is left alone.

pub mod bbox;

pub use bbox::{alpha_bbox, PixelRect};

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, Rgba32FImage, RgbaImage};

use crate::config::NormalizeConfig;
use crate::error::{Error, Result};

/// Layout of one normalization, decided before any pixel is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizePlan {
    /// Alpha bounding box of the source.
    pub content: PixelRect,
    /// `content` after padding and clamping to the source.
    pub crop: PixelRect,
    /// Dimensions the crop is resampled to.
    pub resized: (u32, u32),
    /// Top-left of the resized crop on the canvas.
    pub offset: (u32, u32),
    pub out_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    Normalized(NormalizePlan),
    /// No visible content; the file was not rewritten.
    Untouched,
}

/// Padding for one axis of content `extent` pixels long.
pub fn padding(extent: u32, cfg: &NormalizeConfig) -> u32 {
    ((extent as f64 * cfg.pad_ratio as f64).round() as u32).max(cfg.min_pad)
}

/// Pads `content` on each side and clamps it to a `width` x `height` source.
pub fn pad_rect(content: PixelRect, width: u32, height: u32, cfg: &NormalizeConfig) -> PixelRect {
    let (pad_x, pad_y) = (padding(content.width(), cfg), padding(content.height(), cfg));
    content.expand_clamped(pad_x, pad_y, width, height)
}

/// Largest size that fits a `width` x `height` region into an `out_size`
/// square with uniform scaling. Each side is at least 1.
pub fn fit_dimensions(width: u32, height: u32, out_size: u32) -> (u32, u32) {
    let scale = (out_size as f64 / width as f64).min(out_size as f64 / height as f64);
    let side = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, out_size.max(1));
    (side(width), side(height))
}

pub fn plan(image: &RgbaImage, cfg: &NormalizeConfig) -> Option<NormalizePlan> {
    let content = alpha_bbox(image)?;
    let crop = pad_rect(content, image.width(), image.height(), cfg);
    let resized = fit_dimensions(crop.width(), crop.height(), cfg.out_size);
    let offset = ((cfg.out_size - resized.0) / 2, (cfg.out_size - resized.1) / 2);
    Some(NormalizePlan { content, crop, resized, offset, out_size: cfg.out_size })
}

/// Executes a plan: crop, Lanczos3 resample, composite onto a transparent canvas.
pub fn apply(image: &RgbaImage, plan: &NormalizePlan) -> RgbaImage {
    let crop = plan.crop;
    let cropped =
        imageops::crop_imm(image, crop.left, crop.top, crop.width(), crop.height()).to_image();
    let (w, h) = plan.resized;
    let resized = if cropped.dimensions() == (w, h) {
        cropped
    } else {
        resample_premultiplied(&cropped, w, h)
    };
    let mut canvas = RgbaImage::new(plan.out_size, plan.out_size);
    composite_over(&mut canvas, &resized, plan.offset);
    canvas
}

/// Lanczos3 resample in premultiplied float space, so transparent pixels
/// carry no color into partially covered edges.
pub fn resample_premultiplied(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0.map(|c| c as f32 / 255.0);
        Rgba([r * a, g * a, b * a, a])
    });
    let resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        let alpha = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let straight = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([straight(r), straight(g), straight(b), alpha])
    })
}

/// Source-over compositing of `top` at `offset`. Pixels landing on a fully
/// transparent destination are copied exactly.
pub fn composite_over(canvas: &mut RgbaImage, top: &RgbaImage, offset: (u32, u32)) {
    let (cw, ch) = canvas.dimensions();
    for (x, y, src) in top.enumerate_pixels() {
        let (dx, dy) = (x + offset.0, y + offset.1);
        if dx >= cw || dy >= ch {
            continue;
        }
        let dst = canvas.get_pixel_mut(dx, dy);
        if dst[3] == 0 {
            *dst = *src;
        } else {
            dst.blend(src);
        }
    }
}

/// Normalizes an in-memory sprite. `None` when it has no visible content.
pub fn normalize_image(image: &RgbaImage, cfg: &NormalizeConfig) -> Option<RgbaImage> {
    let plan = plan(image, cfg)?;
    Some(apply(image, &plan))
}

/// Normalizes the sprite at `path` in place, saving it as PNG.
pub fn normalize_file(path: &Path, cfg: &NormalizeConfig) -> Result<NormalizeOutcome> {
    let image = image::io::Reader::open(path)
        .map_err(Error::io(path))?
        .with_guessed_format()
        .map_err(Error::io(path))?
        .decode()
        .map_err(Error::image(path))?
        .to_rgba8();
    let Some(plan) = plan(&image, cfg) else {
        log::info!("{}: no visible content, left unchanged", path.display());
        return Ok(NormalizeOutcome::Untouched);
    };
    log::debug!("{}: {:?}", path.display(), plan);
    let out = apply(&image, &plan);
    crate::export::write_png(&out, path)?;
    Ok(NormalizeOutcome::Normalized(plan))
}

/// Per-file results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, Result<NormalizeOutcome>)>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.results.iter().filter_map(|(p, r)| r.as_ref().err().map(|e| (p.as_path(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Normalizes each file independently. A failing file is recorded and the
/// batch carries on with the next one.
pub fn normalize_batch<I, P>(paths: I, cfg: &NormalizeConfig) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        let result = normalize_file(path, cfg);
        if let Err(e) = &result {
            log::error!("{}: {}", path.display(), e);
        }
        report.results.push((path.to_path_buf(), result));
    }
    report
}
