/*!
 * Tests for themes and the theme registry
 */

use subforge::errors::{ErrorKind, SubtitleError};
use subforge::theme::{
    Color, DEFAULT_THEME_NAME, Theme, ThemeRegistry, VerticalPosition, builtin_themes,
};

#[test]
fn test_builtin_themes_shouldStartWithDefault() {
    let themes = builtin_themes();
    assert!(themes.len() >= 5);
    assert_eq!(themes[0].name, DEFAULT_THEME_NAME);
    assert_eq!(themes[0], Theme::default());
}

#[test]
fn test_builtin_themes_shouldHaveUniqueLowercaseNames() {
    let mut names: Vec<&str> = builtin_themes().iter().map(|t| t.name.as_str()).collect();
    assert!(names.iter().all(|name| *name == name.to_lowercase()));
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), builtin_themes().len());
}

#[test]
fn test_registry_get_withMixedCase_shouldResolve() {
    let registry = ThemeRegistry::with_builtins();
    assert_eq!(registry.get("CINEMA").unwrap().name, "cinema");
    assert!(registry.contains("news"));
}

#[test]
fn test_registry_get_withUnknownName_shouldReturnThemeNotFound() {
    let registry = ThemeRegistry::with_builtins();
    let err = registry.get("neon").unwrap_err();
    assert!(matches!(err, SubtitleError::ThemeNotFound(ref name) if name == "neon"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_registry_get_withEmptyName_shouldBeInvalidInput() {
    let registry = ThemeRegistry::with_builtins();
    assert_eq!(registry.get("  ").unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_registry_with_themes_shouldListCustomThemesAfterBuiltins() {
    let custom = vec![
        Theme {
            name: "zebra".to_string(),
            ..Theme::default()
        },
        Theme {
            name: "karaoke".to_string(),
            font_size: 36,
            ..Theme::default()
        },
    ];
    let registry = ThemeRegistry::with_themes(&custom).unwrap();

    let names: Vec<&str> = registry.themes().iter().map(|t| t.name.as_str()).collect();
    let builtin_count = builtin_themes().len();
    assert_eq!(names.len(), builtin_count + 2);
    assert_eq!(&names[builtin_count..], &["karaoke", "zebra"]);
    assert_eq!(registry.get("karaoke").unwrap().font_size, 36);
}

#[test]
fn test_vertical_position_parse_shouldAcceptAliases() {
    assert_eq!("Top".parse::<VerticalPosition>().unwrap(), VerticalPosition::Top);
    assert_eq!("middle".parse::<VerticalPosition>().unwrap(), VerticalPosition::Center);
    assert_eq!("bottom".parse::<VerticalPosition>().unwrap().alignment_code(), 2);
    assert!("left".parse::<VerticalPosition>().is_err());
}

#[test]
fn test_theme_with_background_shouldUseOpaqueBoxAndTranslucentBack() {
    let theme = Theme::default().with_background();
    assert_eq!(theme.border_style, 3);
    assert_eq!(theme.back_colour, Color::TRANSLUCENT_BLACK);
    assert_eq!(theme.back_colour.to_string(), "&H80000000");
}

#[test]
fn test_theme_deserialize_withPartialJson_shouldFillDefaults() {
    let theme: Theme =
        serde_json::from_str(r#"{"name": "karaoke", "font_size": 36, "primary_colour": "&H0000FFFF"}"#)
            .unwrap();
    assert_eq!(theme.name, "karaoke");
    assert_eq!(theme.font_size, 36);
    assert_eq!(theme.primary_colour, Color::YELLOW);
    assert_eq!(theme.font_name, "Arial");
}

#[test]
fn test_theme_deserialize_withBadColour_shouldFail() {
    let result: Result<Theme, _> = serde_json::from_str(r#"{"primary_colour": "yellow"}"#);
    assert!(result.is_err());
}

#[test]
fn test_theme_deserialize_withoutName_shouldNotShadowDefault() {
    let theme: Theme = serde_json::from_str(r#"{"font_size": 99}"#).unwrap();
    assert!(theme.name.is_empty());

    let mut registry = ThemeRegistry::with_builtins();
    let err = registry.register(theme).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(registry.get(DEFAULT_THEME_NAME).unwrap().font_size, 20);
}

#[test]
fn test_register_withCommaInNameOrFont_shouldBeInvalidInput() {
    let mut registry = ThemeRegistry::with_builtins();
    for theme in [
        Theme {
            name: "a,b".to_string(),
            ..Theme::default()
        },
        Theme {
            name: "split".to_string(),
            font_name: "Foo, Bar".to_string(),
            ..Theme::default()
        },
    ] {
        let err = registry.register(theme).unwrap_err();
        assert!(matches!(err, SubtitleError::InvalidArgument(_)));
    }
    assert_eq!(registry.themes().len(), builtin_themes().len());
}
