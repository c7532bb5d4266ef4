use super::*;

#[test]
fn english_dialogue_is_just_the_bar() {
    let plan = chrome_plan(DialogueType::Dialogue, Language::En);
    assert!(plan.under.is_empty());
    assert_eq!(plan.over, vec![TextureKey::Bar]);
}

#[test]
fn localized_skip_button_sits_on_top_of_the_bar() {
    let plan = chrome_plan(DialogueType::Full, Language::Ja);
    assert_eq!(
        plan.over,
        vec![TextureKey::Fullscreen, TextureKey::Skip(Language::Ja)]
    );
}

#[test]
fn book_uses_skip_as_bar_without_duplicate() {
    for lang in Language::ALL {
        let plan = chrome_plan(DialogueType::Book, lang);
        assert_eq!(plan.under, vec![TextureKey::Book]);
        assert_eq!(plan.over, vec![TextureKey::Skip(lang)]);
    }
}

#[test]
fn intro_has_backdrop_and_intro_bar() {
    let plan = chrome_plan(DialogueType::Intro, Language::ZhCn);
    assert_eq!(plan.under, vec![TextureKey::IntroBack]);
    assert_eq!(
        plan.over,
        vec![TextureKey::IntroBar, TextureKey::Skip(Language::ZhCn)]
    );
}

#[test]
fn caption_and_narration_share_the_caption_band() {
    assert_eq!(
        chrome_for(DialogueType::Caption),
        chrome_for(DialogueType::Narration)
    );
    assert_eq!(chrome_for(DialogueType::Caption).bar, Some(TextureKey::Caption));
}
