//! The shared in-memory image: either materialized pixels, or a deferred
//! producer that computes them when forced.

use std::rc::Rc;

use crate::array2d::Array2D;
use crate::meta::Meta;
use crate::pixel::Pixel;

/// A closure that reconstructs pixel data from whatever it captured
/// (typically the original byte buffer). Returning `None` signals a failure
/// in the pixel pass; `eval` turns that into an empty `Raw` Image rather
/// than propagating an error (spec: header metadata survives pixel failure).
pub type Producer = Rc<dyn Fn() -> Option<Array2D<Pixel>>>;

/// Either a materialized pixel grid, or a not-yet-forced producer plus the
/// Meta that was parsed before deferring. Forcing is idempotent in result
/// but not memoized: calling `eval` twice runs the producer twice.
#[derive(Clone)]
pub enum Image {
    Raw(Meta, Array2D<Pixel>),
    Lazy(Meta, Producer),
}

impl Image {
    pub fn lazy(meta: Meta, producer: Producer) -> Self {
        Image::Lazy(meta, producer)
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Image::Raw(meta, _) => meta,
            Image::Lazy(meta, _) => meta,
        }
    }

    pub fn width(&self) -> u32 {
        self.meta().width()
    }

    pub fn height(&self) -> u32 {
        self.meta().height()
    }

    /// Force the image to `Raw`, running the producer exactly once if this
    /// was `Lazy`. A failing producer yields an empty `Raw` Image that keeps
    /// the original Meta (spec §4.7).
    pub fn eval(self) -> Image {
        match self {
            Image::Raw(meta, pixels) => Image::Raw(meta, pixels),
            Image::Lazy(meta, producer) => match producer() {
                Some(pixels) => Image::Raw(meta, pixels),
                None => Image::Raw(meta, Array2D::new(Vec::new())),
            },
        }
    }

    /// Force (if needed) and return the materialized pixel grid and Meta.
    pub fn into_raw(self) -> (Meta, Array2D<Pixel>) {
        match self.eval() {
            Image::Raw(meta, pixels) => (meta, pixels),
            Image::Lazy(..) => unreachable!("eval() always returns Raw"),
        }
    }

    pub fn map(self, mut f: impl FnMut(Pixel) -> Pixel) -> Image {
        let (meta, pixels) = self.into_raw();
        Image::Raw(meta, pixels.map(|&p| f(p)))
    }

    pub fn mirror(self, horiz: bool, vert: bool) -> Image {
        let (meta, pixels) = self.into_raw();
        Image::Raw(meta, pixels.mirrored(horiz, vert))
    }

    /// Crop. Returns the input unchanged (per spec, not an `Option`) when
    /// `sx`/`sy` are already past the image's extent.
    pub fn get(self, sx: u32, sy: u32, sw: u32, sh: u32) -> Image {
        let (meta, pixels) = self.into_raw();
        match pixels.cropped(sx as usize, sy as usize, sw as usize, sh as usize) {
            Some(cropped) => {
                let new_meta = Meta::from_data(cropped.width() as u32, cropped.height() as u32);
                Image::Raw(new_meta, cropped)
            }
            None => Image::Raw(meta, pixels),
        }
    }

    pub fn put(self, dx: u32, dy: u32, from: Image) -> Image {
        let (to_meta, to_pixels) = self.into_raw();
        let (_, from_pixels) = from.into_raw();
        let pasted = to_pixels.pasted(dx as usize, dy as usize, &from_pixels);
        let new_meta = Meta::from_data(to_meta.width(), to_meta.height());
        Image::Raw(new_meta, pasted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::pack32;

    fn raw(rows: Vec<Vec<Pixel>>) -> Image {
        let h = rows.len() as u32;
        let w = rows.first().map_or(0, Vec::len) as u32;
        Image::Raw(Meta::from_data(w, h), Array2D::new(rows))
    }

    #[test]
    fn eval_on_raw_is_identity() {
        let img = raw(vec![vec![1, 2], vec![3, 4]]);
        let (_, pixels) = img.eval().into_raw();
        assert_eq!(pixels.into_rows(), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn lazy_producer_runs_once_per_eval_call() {
        use std::cell::Cell;
        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        let producer: Producer = Rc::new(move || {
            calls2.set(calls2.get() + 1);
            Some(Array2D::new(vec![vec![pack32(1, 2, 3, 4)]]))
        });
        let img = Image::lazy(Meta::from_data(1, 1), producer);
        let forced = img.eval();
        assert_eq!(calls.get(), 1);
        let _ = forced.eval();
    }

    #[test]
    fn failing_producer_keeps_meta_but_drops_pixels() {
        let meta = Meta::from_data(5, 5);
        let producer: Producer = Rc::new(|| None);
        let img = Image::lazy(meta.clone(), producer);
        let (out_meta, pixels) = img.into_raw();
        assert_eq!(out_meta, meta);
        assert_eq!(pixels.height(), 0);
    }

    #[test]
    fn map_identity_is_a_no_op() {
        let img = raw(vec![vec![7, 8]]);
        let (_, pixels) = img.map(|p| p).into_raw();
        assert_eq!(pixels.into_rows(), vec![vec![7, 8]]);
    }

    #[test]
    fn get_past_extent_returns_image_unchanged() {
        let img = raw(vec![vec![1, 2], vec![3, 4]]);
        let (_, pixels) = img.get(9, 9, 1, 1).into_raw();
        assert_eq!(pixels.into_rows(), vec![vec![1, 2], vec![3, 4]]);
    }
}
