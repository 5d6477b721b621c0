use super::*;

fn mono(text: &str, _font: &FontSpec) -> f64 {
    text.chars().count() as f64 * 10.0
}

fn lines_of(block: &TextBlock) -> Vec<&str> {
    block.lines.iter().map(|l| l.text.as_str()).collect()
}

fn font() -> FontSpec {
    FontSpec::new("Roboto", 20.0)
}

#[test]
fn blank_lines_are_preserved() {
    let mut m = mono;
    let block = layout_text("a\n\nb", &font(), 1000.0, &mut m).unwrap();
    assert_eq!(lines_of(&block), vec!["a", "", "b"]);
    assert_eq!(block.height, 3.0 * 20.0 * 1.2);
}

#[test]
fn empty_message_is_one_blank_line() {
    let mut m = mono;
    let block = layout_text("", &font(), 100.0, &mut m).unwrap();
    assert_eq!(lines_of(&block), vec![""]);
    assert_eq!(block.max_width, 0.0);
}

#[test]
fn greedy_wrap_uses_strict_limit() {
    let mut m = mono;
    // "aaa bbb" measures 70: at a limit of 70 it must wrap, at 71 it fits.
    let wrapped = layout_text("aaa bbb ccc", &font(), 70.0, &mut m).unwrap();
    assert_eq!(lines_of(&wrapped), vec!["aaa", "bbb", "ccc"]);

    let fitted = layout_text("aaa bbb ccc", &font(), 71.0, &mut m).unwrap();
    assert_eq!(lines_of(&fitted), vec!["aaa bbb", "ccc"]);
    assert_eq!(fitted.max_width, 70.0);
}

#[test]
fn wrapped_lines_never_exceed_limit_except_lone_long_words() {
    let mut m = mono;
    let limit = 95.0;
    let msg = "the quick brown fox jumps over supercalifragilistic dogs\nand  cats";
    let block = layout_text(msg, &font(), limit, &mut m).unwrap();
    for line in &block.lines {
        if line.width > limit {
            assert!(!line.text.contains(' '), "multi-word line too wide: {line:?}");
        }
        assert_eq!(line.width, mono(&line.text, &font()));
    }
    assert!(block.lines.iter().any(|l| l.text == "supercalifragilistic"));
    assert_eq!(block.lines.last().unwrap().text, "and cats");
}

#[test]
fn crlf_paragraphs_are_trimmed() {
    let mut m = mono;
    let block = layout_text("ab\r\ncd", &font(), 1000.0, &mut m).unwrap();
    assert_eq!(lines_of(&block), vec!["ab", "cd"]);
}

#[test]
fn chip_and_line_geometry_are_centered() {
    let mut m = mono;
    let block = layout_text("abcd\nab", &font(), 1000.0, &mut m).unwrap();
    let chip = block.chip_rect(16.0);
    assert_eq!(chip.width(), 40.0 + 32.0);
    assert_eq!(chip.height(), block.height + 32.0);
    assert_eq!(chip.center(), crate::Point::ZERO);

    assert!((block.line_center_y(0) + 12.0).abs() < 1e-9);
    assert!((block.line_center_y(1) - 12.0).abs() < 1e-9);
}

#[test]
fn invalid_font_size_is_rejected() {
    let mut m = mono;
    assert!(layout_text("x", &FontSpec::new("f", 0.0), 10.0, &mut m).is_err());
    assert!(layout_text("x", &FontSpec::new("f", f64::NAN), 10.0, &mut m).is_err());
}

#[test]
fn approx_measure_and_extent_agree() {
    let mut m = ApproxMeasure::default();
    let w = m.measure("hello", &FontSpec::new("f", 20.0)).unwrap();
    assert!((w - 60.0).abs() < 1e-9);

    let (ew, eh) = approx_text_extent("hello\nhi", 20.0, 2.0);
    assert!((ew - 120.0).abs() < 1e-9);
    assert!((eh - 2.0 * 40.0 * 1.2).abs() < 1e-9);
}
