use super::*;
use crate::{
    foundation::core::Vec2,
    render::surface::{Shadow, StrokeStyle},
};

fn with_sans(width: u32, height: u32) -> CpuSurface {
    let mut s = CpuSurface::new(width, height).unwrap();
    let bytes = std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap();
    s.register_font(Language::En, bytes).unwrap();
    s
}

/// Largest alpha inside `[x0, x1) x [y0, y1)`.
fn max_alpha(surface: &CpuSurface, x0: u32, y0: u32, x1: u32, y1: u32) -> u8 {
    let frame = surface.snapshot().unwrap();
    let mut max = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            max = max.max(frame.data[((y * frame.width + x) * 4 + 3) as usize]);
        }
    }
    max
}

fn px(surface: &CpuSurface, x: u32, y: u32) -> [u8; 4] {
    let frame = surface.snapshot().unwrap();
    let i = ((y * frame.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    let data = rgba.repeat((w * h) as usize);
    PreparedImage::from_premul(w, h, data, "solid").unwrap()
}

#[test]
fn rejects_degenerate_sizes() {
    assert!(CpuSurface::new(0, 10).is_err());
    assert!(CpuSurface::new(70_000, 10).is_err());
}

#[test]
fn fill_rect_covers_only_its_area() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.set_fill(Rgba8::rgb(255, 0, 0));
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0)).unwrap();
    assert_eq!(px(&s, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&s, 6, 1), [0, 0, 0, 0]);
}

#[test]
fn global_alpha_scales_coverage() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_fill(Rgba8::WHITE);
    s.set_global_alpha(0.5);
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    let a = px(&s, 2, 2)[3];
    assert!((126..=130).contains(&a), "alpha {a}");
}

#[test]
fn zero_alpha_draws_nothing() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_global_alpha(0.0);
    s.draw_image(&solid(2, 2, [0, 255, 0, 255]), Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();
    assert_eq!(px(&s, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn draw_image_stretches_into_dest() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.draw_image(&solid(2, 2, [0, 0, 255, 255]), Rect::new(2.0, 2.0, 6.0, 6.0))
        .unwrap();
    assert_eq!(px(&s, 4, 4), [0, 0, 255, 255]);
    assert_eq!(px(&s, 0, 0), [0, 0, 0, 0]);
    assert_eq!(px(&s, 7, 7), [0, 0, 0, 0]);
}

#[test]
fn translate_moves_draws() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.set_fill(Rgba8::WHITE);
    s.save();
    s.translate(4.0, 4.0);
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    s.restore();
    assert_eq!(px(&s, 1, 1)[3], 0);
    assert_eq!(px(&s, 6, 6), [255, 255, 255, 255]);
    assert_eq!(s.state().transform, Affine::IDENTITY);
}

#[test]
fn shadow_is_offset_in_device_space() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.set_fill(Rgba8::WHITE);
    s.set_shadow(Some(Shadow {
        color: Rgba8::BLACK,
        offset: Vec2::new(4.0, 4.0),
    }));
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    assert_eq!(px(&s, 1, 1), [255, 255, 255, 255]);
    assert_eq!(px(&s, 5, 5), [0, 0, 0, 255]);
    assert_eq!(px(&s, 3, 3), [0, 0, 0, 0]);
}

#[test]
fn filter_applies_to_one_draw() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_fill(Rgba8::rgb(255, 0, 0));
    s.save();
    s.set_filter(Some("invert(1)".parse().unwrap()));
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 4.0)).unwrap();
    s.restore();
    s.fill_rect(Rect::new(2.0, 0.0, 4.0, 4.0)).unwrap();
    assert_eq!(px(&s, 0, 1), [0, 255, 255, 255]);
    assert_eq!(px(&s, 3, 1), [255, 0, 0, 255]);
}

#[test]
fn clear_resets_pixels_and_state() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_fill(Rgba8::WHITE);
    s.save();
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    s.clear();
    assert_eq!(s.states().depth(), 0);
    assert!(s.snapshot().unwrap().data.iter().all(|&b| b == 0));
}

#[test]
fn text_without_a_face_is_a_font_error() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    let font = FontSpec::new(Language::Ja, 20.0);
    assert!(matches!(
        s.measure_text("abc", &font),
        Err(ScreenError::Font(_))
    ));
    assert!(matches!(s.ensure_font(Language::En), Err(ScreenError::Font(_))));
    assert_eq!(s.measure_text("", &font).unwrap(), 0.0);
}

#[test]
fn missing_font_dir_entry_is_reported() {
    let dir = std::env::temp_dir().join("dialogue_screen_no_fonts");
    std::fs::create_dir_all(&dir).unwrap();
    let mut s = CpuSurface::new(4, 4).unwrap().with_font_dir(&dir);
    let err = s.ensure_font(Language::ZhTw).unwrap_err();
    assert!(err.to_string().contains("dragalialost_zh_tw"));
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    assert!(s.register_font(Language::En, vec![1, 2, 3, 4]).is_err());
}

#[test]
fn trailing_whitespace_counts_toward_width() {
    let mut s = with_sans(4, 4);
    let font = FontSpec::new(Language::En, 30.0);
    let word = s.measure_text("Hello", &font).unwrap();
    let padded = s.measure_text("Hello ", &font).unwrap();
    let space = s.measure_text(" ", &font).unwrap();
    assert!(space > 0.0);
    assert!((padded - word - space).abs() < 0.01, "{padded} vs {word} + {space}");

    let split = s.measure_text("a ", &font).unwrap() + s.measure_text("b", &font).unwrap();
    let joined = s.measure_text("a b", &font).unwrap();
    assert!((split - joined).abs() < 0.5, "{split} vs {joined}");
}

#[test]
fn fill_text_sits_on_the_baseline() {
    let mut s = with_sans(64, 48);
    s.set_fill(Rgba8::WHITE);
    s.fill_text("H", &FontSpec::new(Language::En, 24.0), 8.0, 32.0)
        .unwrap();

    assert!(max_alpha(&s, 8, 14, 28, 32) > 200);
    assert_eq!(max_alpha(&s, 0, 34, 64, 48), 0);
    assert_eq!(max_alpha(&s, 0, 0, 64, 10), 0);
    assert_eq!(max_alpha(&s, 0, 0, 6, 48), 0);
}

#[test]
fn stroke_text_rasterizes_the_outline() {
    let mut s = with_sans(64, 48);
    s.set_stroke(StrokeStyle {
        color: Rgba8::rgb(255, 0, 0),
        width: 2.0,
        miter_limit: 2.0,
    });
    s.stroke_text("H", &FontSpec::new(Language::En, 24.0), 8.0, 32.0)
        .unwrap();

    assert!(max_alpha(&s, 6, 12, 30, 34) > 200);
    assert_eq!(max_alpha(&s, 0, 36, 64, 48), 0);
    let frame = s.snapshot().unwrap();
    assert!(frame.data.chunks_exact(4).all(|p| p[1] == 0 && p[2] == 0));
}
