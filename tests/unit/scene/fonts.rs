use super::*;

#[test]
fn presets_map_to_export_stacks() {
    assert_eq!(export_font_family("Roboto"), "Roboto, Arial, sans-serif");
    assert_eq!(
        export_font_family("Comic Neue"),
        "Comic Neue, Comic Sans MS, cursive"
    );
    assert_eq!(export_font_family("Unlisted Sans"), "Unlisted Sans");
    assert_eq!(
        font_preset(DEFAULT_FONT_PRESET).unwrap().display_family,
        "Roboto"
    );
    assert!(font_preset("papyrus").is_none());
}

#[test]
fn font_stack_trims_and_unquotes() {
    let names: Vec<&str> = font_stack(" 'Playfair Display' , Georgia,,serif ").collect();
    assert_eq!(names, vec!["Playfair Display", "Georgia", "serif"]);
}
