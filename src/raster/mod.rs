//! Raster surfaces: the clipping [`Canvas`] layers paint on, and tile blitting.

mod canvas;

pub use canvas::Canvas;

use glam::IVec2;
use image::RgbaImage;

/// Copies `src` into `dst` with its top-left pixel at `offset`, clipping to `dst`.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, offset: IVec2) {
    let x0 = offset.x.max(0);
    let y0 = offset.y.max(0);
    let x1 = (offset.x + src.width() as i32).min(dst.width() as i32);
    let y1 = (offset.y + src.height() as i32).min(dst.height() as i32);

    for y in y0..y1 {
        for x in x0..x1 {
            let px = *src.get_pixel((x - offset.x) as u32, (y - offset.y) as u32);
            dst.put_pixel(x as u32, y as u32, px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_blit_clips_negative_offset() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
        blit(&mut dst, &src, IVec2::new(-1, 2));

        let red = dst.pixels().filter(|p| p.0[0] == 255).count();
        assert_eq!(red, 2 * 2);
        assert_eq!(dst.get_pixel(0, 2).0[0], 255);
        assert_eq!(dst.get_pixel(2, 2).0[0], 0);
    }

    #[test]
    fn test_blit_fully_outside_is_noop() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        blit(&mut dst, &src, IVec2::new(10, 10));
        assert!(dst.pixels().all(|p| p.0[0] == 0));
    }
}
