use image::RgbaImage;

/// Pixel rectangle; `left`/`top` inclusive, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[cfg(test)]
    pub(crate) fn center(&self) -> (f32, f32) {
        ((self.left + self.right) as f32 * 0.5, (self.top + self.bottom) as f32 * 0.5)
    }

    /// Grows each side by the given amounts, clamped to a `width` x `height` raster.
    pub fn expand_clamped(&self, pad_x: u32, pad_y: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(pad_x),
            top: self.top.saturating_sub(pad_y),
            right: self.right.saturating_add(pad_x).min(width),
            bottom: self.bottom.saturating_add(pad_y).min(height),
        }
    }
}

/// Tightest rectangle around every pixel with non-zero alpha.
/// `None` when the image is fully transparent.
pub fn alpha_bbox(image: &RgbaImage) -> Option<PixelRect> {
    let mut rect: Option<PixelRect> = None;
    for (y, row) in image.enumerate_rows() {
        let mut xs = row.filter(|(_, _, p)| p[3] != 0).map(|(x, _, _)| x);
        let Some(first) = xs.next() else {
            continue;
        };
        let last = xs.last().unwrap_or(first);
        rect = Some(match rect {
            None => PixelRect::new(first, y, last + 1, y + 1),
            Some(r) => PixelRect::new(r.left.min(first), r.top, r.right.max(last + 1), y + 1),
        });
    }
    rect
}
