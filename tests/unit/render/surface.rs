use super::*;

#[test]
fn restore_without_save_is_ignored() {
    let mut stack = StateStack::default();
    stack.current_mut().global_alpha = 0.5;
    stack.restore();
    assert_eq!(stack.current().global_alpha, 0.5);
    assert_eq!(stack.depth(), 0);
}

#[test]
fn save_restore_round_trips_state() {
    let mut stack = StateStack::default();
    stack.save();
    stack.current_mut().transform = Affine::translate((3.0, 4.0));
    stack.current_mut().fill = Rgba8::WHITE;
    assert_eq!(stack.depth(), 1);
    stack.restore();
    assert_eq!(stack.current(), &DrawState::default());
}

#[test]
fn reset_drops_saved_states() {
    let mut stack = StateStack::default();
    stack.save();
    stack.save();
    stack.current_mut().global_alpha = 0.1;
    stack.reset();
    assert_eq!(stack.depth(), 0);
    assert_eq!(stack.current().global_alpha, 1.0);
}

#[test]
fn font_spec_weight_builder() {
    let f = FontSpec::new(Language::Ja, 30.0).with_weight(Some(700));
    assert_eq!(f.weight, Some(700));
    assert_eq!(f.size_px, 30.0);
}
