/*!
 * Tests for theme application and restyling
 */

use std::collections::HashMap;

use subforge::errors::{ErrorKind, SubtitleError};
use subforge::formats::SubtitleFormat;
use subforge::formats::ass::{self, STYLE_FORMAT_LINE};
use subforge::style_engine::{StyleOptions, apply_theme, restyle, style_from_plain};
use subforge::theme::{Theme, ThemeRegistry, VerticalPosition};

use crate::common;

fn option_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_style_from_plain_withSingleLine_shouldWriteOneDialogueAndOneStyle() {
    let output = style_from_plain("Hi", SubtitleFormat::PlainText, &Theme::default()).unwrap();

    let dialogues: Vec<&str> = output.lines().filter(|l| l.starts_with("Dialogue:")).collect();
    assert_eq!(dialogues, vec!["Dialogue: 0,0:00:00.00,0:00:03.00,Default,,0,0,0,,Hi"]);

    let styles: Vec<&str> = output.lines().filter(|l| l.starts_with("Style:")).collect();
    assert_eq!(
        styles,
        vec!["Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1"]
    );
}

#[test]
fn test_style_from_plain_withSrt_shouldBindEveryEntryToThemeRow() {
    let theme = ThemeRegistry::with_builtins().get("cinema").unwrap().clone();
    let output = style_from_plain(common::SAMPLE_SRT, SubtitleFormat::Srt, &theme).unwrap();

    let entries = ass::parse(&output).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.style_ref.as_deref() == Some("Default")));

    let styles = ass::parse_styles(&output);
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].font_name, "Georgia");
    assert!(styles[0].italic);
}

#[test]
fn test_style_from_plain_withBrokenInput_shouldPropagateParseError() {
    let err = style_from_plain("no header", SubtitleFormat::WebVtt, &Theme::default()).unwrap_err();
    assert!(matches!(err, SubtitleError::MissingSignature { .. }));
}

#[test]
fn test_restyle_withExistingStyles_shouldLeaveEventsUntouched() {
    let theme = Theme::default().with_font_size(32);
    let output = restyle(common::SAMPLE_ASS, &theme).unwrap();

    assert_eq!(common::events_section(&output), common::events_section(common::SAMPLE_ASS));
    assert!(!output.contains("Style: Fancy"));
    assert_eq!(output.matches(STYLE_FORMAT_LINE).count(), 1);

    let styles = ass::parse_styles(&output);
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].name, "Default");
    assert_eq!(styles[0].font_size, 32);
}

#[test]
fn test_restyle_withScriptInfo_shouldKeepHeaderLines() {
    let output = restyle(common::SAMPLE_ASS, &Theme::default()).unwrap();
    assert!(output.starts_with("[Script Info]\nTitle: Sample\nScriptType: v4.00+\n\n[V4+ Styles]\n"));
}

#[test]
fn test_restyle_withCrlf_shouldKeepLineEndings() {
    let content = common::SAMPLE_ASS.replace('\n', "\r\n");
    let output = restyle(&content, &Theme::default()).unwrap();

    assert!(!output.replace("\r\n", "").contains('\n'));
    assert!(output.contains("\r\nStyle: Default,Arial,20,"));
}

#[test]
fn test_restyle_withoutBlankLineBeforeEvents_shouldStopAtHeader() {
    let content = "[V4+ Styles]\nStyle: Old,Arial,20\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:00.00,0:00:01.00,Old,,0,0,0,,Keep\n";
    let output = restyle(content, &Theme::default()).unwrap();

    assert!(output.contains("[Events]\n"));
    assert!(output.ends_with("Dialogue: 0,0:00:00.00,0:00:01.00,Old,,0,0,0,,Keep\n"));
    assert!(!output.contains("Style: Old"));
}

#[test]
fn test_restyle_withoutStyleSection_shouldInsertBeforeEvents() {
    let content = "[Script Info]\nTitle: Bare\n\n[Events]\nDialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,Hi\n";
    let output = restyle(content, &Theme::default()).unwrap();

    let styles_at = output.find("[V4+ Styles]").unwrap();
    let events_at = output.find("[Events]").unwrap();
    assert!(styles_at < events_at);
    assert_eq!(ass::parse_styles(&output).len(), 1);
}

#[test]
fn test_restyle_withNoSections_shouldReportMissingSignature() {
    let err = restyle("Just some text\n", &Theme::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_apply_theme_withAss_shouldRestyleInsteadOfRewriting() {
    let output = apply_theme(common::SAMPLE_ASS, SubtitleFormat::Ass, &Theme::default()).unwrap();
    // The original event rows survive with their override tags
    assert!(output.contains("{\\b1}Hello{\\b0}\\Nthere"));
}

#[test]
fn test_style_options_from_option_map_withAllKeys_shouldParse() {
    let options = StyleOptions::from_option_map(&option_map(&[
        ("theme", "cinema"),
        ("font_size", "28"),
        ("position", "top"),
        ("add_background", "true"),
        ("unknown", "ignored"),
    ]))
    .unwrap();

    assert_eq!(options.theme.as_deref(), Some("cinema"));
    assert_eq!(options.font_size, Some(28));
    assert_eq!(options.position, Some(VerticalPosition::Top));
    assert_eq!(options.add_background, Some(true));
}

#[test]
fn test_style_options_from_option_map_withBadValues_shouldBeInvalidInput() {
    for pairs in [
        [("font_size", "big")],
        [("position", "left")],
        [("add_background", "maybe")],
        [("theme", "")],
    ] {
        let err = StyleOptions::from_option_map(&option_map(&pairs)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "for {:?}", pairs);
    }
}

#[test]
fn test_style_options_resolve_theme_withOverrides_shouldApplyAll() {
    let registry = ThemeRegistry::with_builtins();
    let options = StyleOptions {
        theme: Some("classic".to_string()),
        font_size: Some(30),
        position: Some(VerticalPosition::Center),
        add_background: Some(true),
    };

    let theme = options.resolve_theme(&registry).unwrap();
    assert_eq!(theme.font_name, "Trebuchet MS");
    assert_eq!(theme.font_size, 30);
    assert_eq!(theme.alignment, 5);
    assert_eq!(theme.border_style, 3);
}

#[test]
fn test_style_options_resolve_theme_withBackgroundOff_shouldKeepThemeBorder() {
    let options = StyleOptions {
        theme: Some("news".to_string()),
        add_background: Some(false),
        ..StyleOptions::default()
    };

    // "news" carries its own box; switching the override off does not strip it
    let theme = options.resolve_theme(&ThemeRegistry::with_builtins()).unwrap();
    assert_eq!(theme.border_style, 3);

    let plain = StyleOptions {
        add_background: Some(false),
        ..StyleOptions::default()
    };
    assert_eq!(plain.resolve_theme(&ThemeRegistry::with_builtins()).unwrap().border_style, 1);
}

#[test]
fn test_style_from_plain_withCommaInFontName_shouldRejectTheme() {
    let theme = Theme {
        font_name: "Foo, Bar".to_string(),
        ..Theme::default()
    };

    let err = style_from_plain(common::SAMPLE_SRT, SubtitleFormat::Srt, &theme).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(restyle(common::SAMPLE_ASS, &theme).is_err());
}

#[test]
fn test_style_options_resolve_theme_withDefaults_shouldReturnDefaultTheme() {
    let theme = StyleOptions::default()
        .resolve_theme(&ThemeRegistry::with_builtins())
        .unwrap();
    assert_eq!(theme, Theme::default());
}

#[test]
fn test_style_options_resolve_theme_withZeroFontSize_shouldFail() {
    let options = StyleOptions {
        font_size: Some(0),
        ..StyleOptions::default()
    };
    let err = options.resolve_theme(&ThemeRegistry::with_builtins()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_style_options_resolve_theme_withUnknownTheme_shouldFail() {
    let options = StyleOptions {
        theme: Some("neon".to_string()),
        ..StyleOptions::default()
    };
    let err = options.resolve_theme(&ThemeRegistry::with_builtins()).unwrap_err();
    assert!(matches!(err, SubtitleError::ThemeNotFound(_)));
}
