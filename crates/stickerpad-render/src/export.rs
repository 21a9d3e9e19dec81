//! PNG export of committed content.

use crate::renderer::{RenderContext, RenderResult, RendererError};
use crate::skia_impl::SkiaRenderer;
use stickerpad_core::{DisplayList, Frame};

/// Whether committed content reaches past the right or bottom edge of a
/// `size`x`size` export at `scale`.
pub fn exceeds_export_area(display_list: &DisplayList, scale: f64, size: u32) -> bool {
    let limit = size as f64 / scale;
    display_list
        .bounds()
        .is_some_and(|bounds| bounds.x1 > limit || bounds.y1 > limit)
}

/// Rasterize `display_list` at `scale` into a `size`x`size` PNG.
///
/// Only committed drawables are drawn; the content is scaled from the
/// surface origin and anything beyond `size` is cropped.
pub fn export_png(
    renderer: &mut SkiaRenderer,
    display_list: &DisplayList,
    scale: f64,
    size: u32,
) -> RenderResult<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RendererError::InvalidScale(scale));
    }
    if exceeds_export_area(display_list, scale, size) {
        log::warn!("content extends past the {size}x{size} export area and will be cropped");
    }

    let ctx = RenderContext::new(Frame::committed(display_list))
        .with_scale_factor(scale)
        .with_background(renderer.config().background);
    let pixmap = renderer.render_offscreen(&ctx, size, size)?;

    let rgba = unpremultiply_alpha(pixmap.data());
    let png = encode_png(&rgba, size, size)?;
    log::info!(
        "exported {} drawables at {scale}x into {size}x{size} PNG ({} bytes)",
        display_list.len(),
        png.len()
    );
    Ok(png)
}

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}

/// Convert premultiplied alpha to straight alpha.
pub(crate) fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = ((chunk[0] as f32 / a).min(255.0)) as u8;
            let g = ((chunk[1] as f32 / a).min(255.0)) as u8;
            let b = ((chunk[2] as f32 / a).min(255.0)) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderConfig;
    use kurbo::Point;
    use stickerpad_core::{Drawable, Rgba, RotationSource, Session, StickerPlacement, Stroke};

    fn renderer() -> SkiaRenderer {
        SkiaRenderer::new(RenderConfig::isolated(), 16, 16).unwrap()
    }

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    fn scenario_session() -> Session {
        let mut session = Session::with_rotation_source(RotationSource::seeded(3));
        session.commit(Drawable::from(
            Stroke::from_points(
                vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
                2.0,
                Rgba::black(),
            )
            .unwrap(),
        ));
        session.undo().unwrap();
        session.redo().unwrap();
        session.commit(StickerPlacement::new(Point::new(5.0, 5.0), "⭐", 90).into());
        session
    }

    #[test]
    fn test_export_scenario() {
        let mut session = scenario_session();
        // Hover a sticker ghost away from the content; it must not be exported.
        session.select_sticker("⭐");
        session.pointer_move(Point::new(150.0, 150.0));
        assert!(session.preview().is_some());

        let mut renderer = renderer();
        let bytes = export_png(&mut renderer, &session.export_snapshot(), 4.0, 800).unwrap();
        let (info, buf) = decode(&bytes);

        assert_eq!((info.width, info.height), (800, 800));
        assert_eq!(info.color_type, png::ColorType::Rgba);

        // Stroke runs from (0,0) to (40,40) in export pixels.
        assert_eq!(pixel(&buf, 800, 30, 30)[..3], [0, 0, 0]);
        // Sticker at (20,20) with size 128: ring placeholder, radius ~51.
        let ring = pixel(&buf, 800, 20 + 51, 20);
        assert!(ring[0] < 128, "sticker ring missing: {ring:?}");
        // Preview position (600,600) stays background.
        assert_eq!(pixel(&buf, 800, 600, 600), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 800, 600 + 51, 600), [255, 255, 255, 255]);
    }

    #[test]
    fn test_export_is_byte_identical() {
        let session = scenario_session();
        let mut renderer = renderer();
        let first = export_png(&mut renderer, session.display_list(), 4.0, 200).unwrap();
        let second = export_png(&mut renderer, session.display_list(), 4.0, 200).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_does_not_touch_renderer_pixmap() {
        let session = scenario_session();
        let mut renderer = renderer();
        let before = renderer.data().to_vec();
        export_png(&mut renderer, session.display_list(), 2.0, 64).unwrap();
        assert_eq!(renderer.data(), &before[..]);
    }

    #[test]
    fn test_export_empty_is_white() {
        let mut renderer = renderer();
        let bytes = export_png(&mut renderer, &DisplayList::new(), 1.0, 4).unwrap();
        let (_, buf) = decode(&bytes);
        assert!(buf.iter().all(|b| *b == 255));
    }

    #[test]
    fn test_export_rejects_bad_input() {
        let mut renderer = renderer();
        let list = DisplayList::new();
        assert!(matches!(
            export_png(&mut renderer, &list, 0.0, 100),
            Err(RendererError::InvalidScale(_))
        ));
        assert!(matches!(
            export_png(&mut renderer, &list, 1.0, 0),
            Err(RendererError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_exceeds_export_area() {
        let session = scenario_session();
        let list = session.display_list();
        // Sticker at (5,5) reaches x = 5 + 32/sqrt(2).
        assert!(!exceeds_export_area(list, 4.0, 800));
        assert!(!exceeds_export_area(list, 2.0, 64));
        assert!(exceeds_export_area(list, 2.0, 40));
        assert!(!exceeds_export_area(&DisplayList::new(), 1.0, 1));
    }

    #[test]
    fn test_export_draws_rotated_glyph() {
        let mut list = DisplayList::new();
        list.push(StickerPlacement::with_size(Point::new(25.0, 25.0), "T", 90, 30.0).into());
        let config = RenderConfig {
            bundled_fonts: true,
            ..RenderConfig::isolated()
        };
        let mut renderer = SkiaRenderer::new(config, 16, 16).unwrap();
        let bytes = export_png(&mut renderer, &list, 2.0, 100).unwrap();
        let (_, buf) = decode(&bytes);

        let ink = |x: u32, y: u32| pixel(&buf, 100, x, y)[0] < 128;
        let columns: Vec<usize> = (0..100)
            .map(|x| (0..100).filter(|y| ink(x, *y)).count())
            .collect();
        let first = columns.iter().position(|n| *n > 0).unwrap();
        let last = columns.iter().rposition(|n| *n > 0).unwrap();

        // Rotated a quarter turn clockwise: the bar of the T is on the right.
        assert!(columns[last - 1] > 3 * columns[first + 1], "{columns:?}");
        assert!((first + last).abs_diff(100) <= 6, "spans {first}..={last}");
    }

    #[test]
    fn test_unpremultiply() {
        let data = [64, 0, 0, 128, 0, 0, 0, 0];
        let out = unpremultiply_alpha(&data);
        assert_eq!(out[3], 128);
        assert!(out[0] >= 127);
        assert_eq!(&out[4..], &[0, 0, 0, 0]);
    }
}
