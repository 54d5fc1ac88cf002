//! Rectangular pixel grid backing every [`crate::image::Image`].
//!
//! Row count is the canonical height; per-row length is NOT structurally
//! enforced (spec §3) — callers that need the width invariant re-established
//! (encoders, in particular) pad short rows with a default cell.

use crate::pixel::Pixel;

/// A grid of rows. Rows may have ragged lengths; `width()`/`height()` report
/// the declared extent, not a recomputed minimum/maximum over rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Array2D<T> {
    rows: Vec<Vec<T>>,
}

impl<T: Clone> Array2D<T> {
    pub fn new(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }

    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            rows: vec![vec![value; width]; height],
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of row 0, or 0 for an empty grid. Rows beyond the first may
    /// differ in length; this reports the nominal width only.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<T>] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.rows
    }

    pub fn get(&self, y: usize, x: usize) -> Option<&T> {
        self.rows.get(y)?.get(x)
    }

    pub fn set(&mut self, y: usize, x: usize, value: T) {
        if let Some(row) = self.rows.get_mut(y) {
            if let Some(cell) = row.get_mut(x) {
                *cell = value;
            }
        }
    }

    /// Pad every row to at least `width` cells using `default`, and ensure
    /// there are at least `height` rows (new rows filled with `default`).
    pub fn pad_to(&mut self, height: usize, width: usize, default: T) {
        while self.rows.len() < height {
            self.rows.push(Vec::new());
        }
        for row in self.rows.iter_mut() {
            while row.len() < width {
                row.push(default.clone());
            }
        }
    }

    pub fn map<U: Clone>(&self, mut f: impl FnMut(&T) -> U) -> Array2D<U> {
        Array2D {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }
}

impl Array2D<Pixel> {
    /// Reverse row order (vertical mirror) and/or cell order within each row
    /// (horizontal mirror).
    pub fn mirrored(&self, horiz: bool, vert: bool) -> Self {
        let mut rows = self.rows.clone();
        if vert {
            rows.reverse();
        }
        if horiz {
            for row in rows.iter_mut() {
                row.reverse();
            }
        }
        Self { rows }
    }

    /// Crop to `[sx, sx+sw) x [sy, sy+sh)`, clamped to the grid's extent.
    /// Returns `None` if `sx`/`sy` are already past the extent.
    pub fn cropped(&self, sx: usize, sy: usize, sw: usize, sh: usize) -> Option<Self> {
        let w = self.width();
        let h = self.height();
        if sx > w || sy > h {
            return None;
        }
        let ex = w.min(sx + sw);
        let ey = h.min(sy + sh);
        let mut rows = Vec::with_capacity(ey.saturating_sub(sy));
        for y in sy..ey {
            let row = &self.rows[y];
            let end = ex.min(row.len());
            let slice = if sx < end { &row[sx..end] } else { &[] };
            rows.push(slice.to_vec());
        }
        Some(Self { rows })
    }

    /// Paste `from` into `self` at `(dx, dy)`. Rows of `from` that land
    /// outside `self`'s row range are silently skipped.
    pub fn pasted(&self, dx: usize, dy: usize, from: &Self) -> Self {
        let mut rows = self.rows.clone();
        for (i, src_row) in from.rows.iter().enumerate() {
            let y = dy + i;
            let Some(row) = rows.get_mut(y) else {
                continue;
            };
            for (j, &px) in src_row.iter().enumerate() {
                let x = dx + j;
                if let Some(cell) = row.get_mut(x) {
                    *cell = px;
                }
            }
        }
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u32]]) -> Array2D<u32> {
        Array2D::new(rows.iter().map(|r| r.to_vec()).collect())
    }

    #[test]
    fn mirror_both_axes_reverses_rows_and_cells() {
        let g = grid(&[&[1, 2, 3], &[4, 5, 6]]);
        let m = g.mirrored(true, true);
        assert_eq!(m.into_rows(), vec![vec![6, 5, 4], vec![3, 2, 1]]);
    }

    #[test]
    fn crop_clamps_to_remaining_extent() {
        let g = grid(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        let c = g.cropped(1, 1, 10, 10).unwrap();
        assert_eq!(c.into_rows(), vec![vec![5, 6], vec![8, 9]]);
    }

    #[test]
    fn crop_past_extent_returns_none() {
        let g = grid(&[&[1, 2], &[3, 4]]);
        assert!(g.cropped(5, 0, 1, 1).is_none());
        assert!(g.cropped(0, 5, 1, 1).is_none());
    }

    #[test]
    fn paste_skips_out_of_bounds_rows() {
        let base = grid(&[&[0, 0], &[0, 0]]);
        let patch = grid(&[&[9], &[9], &[9]]);
        let out = base.pasted(1, 0, &patch);
        assert_eq!(out.into_rows(), vec![vec![0, 9], vec![0, 9]]);
    }
}
