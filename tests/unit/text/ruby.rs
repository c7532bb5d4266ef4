use super::*;
use crate::{
    foundation::core::Rgba8,
    render::recording::{DrawCall, RecordingSurface},
    scene::settings::Language,
};

fn texts(s: &RecordingSurface) -> Vec<(String, f32, f64, f64)> {
    s.calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::FillText {
                text, size, x, y, ..
            } => Some((text.clone(), *size, *x, *y)),
            _ => None,
        })
        .collect()
}

#[test]
fn plain_line_is_one_draw() {
    let mut s = RecordingSurface::new(750, 1334);
    let font = FontSpec::new(Language::En, 30.0);
    draw_ruby_line(&mut s, "hello", &font, 80.0, 1170.0).unwrap();
    assert_eq!(texts(&s), vec![("hello".to_string(), 30.0, 80.0, 1170.0)]);
}

#[test]
fn furigana_is_centered_over_its_base() {
    let mut s = RecordingSurface::new(750, 1334);
    let font = FontSpec::new(Language::Ja, 30.0).with_weight(Some(700));
    draw_ruby_line(&mut s, "今日は(日本語){にほんご}です", &font, 100.0, 1000.0).unwrap();
    let drawn = texts(&s);
    assert_eq!(drawn.len(), 2);

    // prefix 3 chars = 30px, base 3 chars = 30px wide -> center at 100 + 30 + 15
    let (furi, size, fx, fy) = &drawn[0];
    assert_eq!(furi, "にほんご");
    assert_eq!(*size, FURIGANA_SIZE);
    assert_eq!(*fx, 145.0 - 20.0);
    assert_eq!(*fy, 1000.0 - 30.0 + 2.0);

    assert_eq!(drawn[1], ("今日は日本語です".to_string(), 30.0, 100.0, 1000.0));
}

#[test]
fn furigana_drops_the_body_weight() {
    let mut s = RecordingSurface::new(750, 1334);
    let font = FontSpec::new(Language::ZhTw, 28.0).with_weight(Some(700));
    draw_ruby_line(&mut s, "(漢){hàn}", &font, 0.0, 100.0).unwrap();
    let weights: Vec<_> = s
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::FillText { weight, .. } => Some(*weight),
            _ => None,
        })
        .collect();
    assert_eq!(weights, vec![None, Some(700)]);
}

#[test]
fn second_annotation_is_measured_after_first_base() {
    let mut s = RecordingSurface::new(750, 1334);
    let font = FontSpec::new(Language::Ja, 30.0);
    draw_ruby_line(&mut s, "(ab){x}(cd){y}", &font, 0.0, 50.0).unwrap();
    let drawn = texts(&s);
    // "x" over "ab": center 10; "y" over "cd": center 20 + 10
    assert_eq!(drawn[0].2, 5.0);
    assert_eq!(drawn[1].2, 25.0);
    assert_eq!(drawn[2].0, "abcd");
}

#[test]
fn malformed_markup_is_drawn_literally() {
    let mut s = RecordingSurface::new(750, 1334);
    let font = FontSpec::new(Language::En, 30.0);
    draw_ruby_line(&mut s, "(open{close}", &font, 0.0, 50.0).unwrap();
    assert_eq!(texts(&s), vec![("(open{close}".to_string(), 30.0, 0.0, 50.0)]);
}

#[test]
fn slanted_text_rotates_about_right_edge_and_restores() {
    let mut s = RecordingSurface::new(750, 1334);
    s.set_fill(Rgba8::WHITE);
    let font = FontSpec::new(Language::En, 80.0);
    let outline = StrokeStyle {
        color: Rgba8::rgb(0x33, 0x33, 0x33),
        width: 8.0,
        miter_limit: 2.0,
    };
    draw_slanted_text(&mut s, "Elisanne", &font, 1060.0, 60.0, Some(outline)).unwrap();

    let calls = s.calls();
    assert_eq!(calls.len(), 2);
    let DrawCall::StrokeText { x, y, width, style, .. } = &calls[0] else {
        panic!("expected stroke first, got {calls:?}");
    };
    assert_eq!((*x, *y, *width), (750.0 - 80.0 - 60.0, 1060.0, 8.0));
    // pivot (750, 1060) is a fixed point of the slant
    let t = crate::foundation::core::Affine::new(style.transform);
    let p = t * crate::foundation::core::Point::new(750.0, 1060.0);
    assert!((p.x - 750.0).abs() < 1e-9 && (p.y - 1060.0).abs() < 1e-9);
    assert!(matches!(calls[1], DrawCall::FillText { .. }));

    assert_eq!(s.states().depth(), 0);
    assert_eq!(s.state().transform, crate::foundation::core::Affine::IDENTITY);
}

#[test]
fn slanted_text_restores_state_on_error() {
    let mut s = RecordingSurface::new(750, 1334).without_font(Language::Ja);
    let font = FontSpec::new(Language::Ja, 30.0);
    assert!(draw_slanted_text(&mut s, "x", &font, 10.0, 0.0, None).is_err());
    assert_eq!(s.states().depth(), 0);
}
