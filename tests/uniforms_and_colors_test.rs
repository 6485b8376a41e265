use common::test_utils::assert_close;
use portal_scene::{
    config::{Palette, SceneConfig},
    data_structures::{
        color::Color,
        uniforms::{ColorUniformRaw, FireflyUniforms, OverlayUniforms, PortalUniforms, UniformSet, UniformValue},
    },
    debug_panel::{ColorKey, DebugPanel, Tweak},
    scene::SceneState,
};

mod common;

fn assert_color_close(actual: Color, expected: Color) {
    assert_close(actual.r, expected.r, 1e-5);
    assert_close(actual.g, expected.g, 1e-5);
    assert_close(actual.b, expected.b, 1e-5);
}

#[test]
fn should_parse_hex_colours_into_linear_space() {
    assert_color_close(Color::from_hex("#ffffff").unwrap(), Color::WHITE);
    assert_eq!(Color::from_hex("000000").unwrap(), Color::new(0.0, 0.0, 0.0));

    // sRGB mid grey is darker in linear space
    let grey = Color::from_hex("#808080").unwrap();
    assert_close(grey.r, 0.2158, 1e-3);
    assert_eq!(grey.to_hex(), "#808080");
}

#[test]
fn should_reject_malformed_hex_colours() {
    for input in ["", "#fff", "#12345", "#1234567", "#gg0000", "not a colour"] {
        assert!(Color::from_hex(input).is_err(), "{:?} was accepted", input);
    }
}

#[test]
fn should_read_back_written_uniforms() {
    let start = Color::from_hex("#383838").unwrap();
    let end = Color::from_hex("#b4b4fe").unwrap();
    let mut portal = PortalUniforms::new(start, end);

    portal.set("uTime", UniformValue::Float(2.5)).unwrap();
    portal.set("uColorEnd", UniformValue::Color(Color::WHITE)).unwrap();
    assert_eq!(portal.get("uTime"), Some(UniformValue::Float(2.5)));
    assert_eq!(portal.get("uColorStart"), Some(UniformValue::Color(start)));
    assert_eq!(portal.get("uColorEnd"), Some(UniformValue::Color(Color::WHITE)));
    assert!(portal.has("uColorStart"));
    assert!(!portal.has("uAlpha"));
}

#[test]
fn should_refuse_unknown_names_and_wrong_types() {
    let mut portal = PortalUniforms::new(Color::WHITE, Color::WHITE);
    let before = portal.clone();
    assert!(portal.set("uColour", UniformValue::Float(1.0)).is_err());
    assert!(portal.set("uColorStart", UniformValue::Float(1.0)).is_err());
    assert!(portal.set("uTime", UniformValue::Color(Color::WHITE)).is_err());
    assert_eq!(portal, before);
    assert_eq!(portal.get("uColour"), None);

    let mut fireflies = FireflyUniforms::new(0.1, Color::WHITE);
    assert!(fireflies.set("uAlpha", UniformValue::Float(0.0)).is_err());
    fireflies.set("uSize", UniformValue::Float(0.2)).unwrap();
    assert_eq!(fireflies.size, 0.2);

    let mut overlay = OverlayUniforms::opaque();
    overlay.set("uAlpha", UniformValue::Float(0.25)).unwrap();
    assert_eq!(overlay.alpha, 0.25);
    assert!(overlay.set("uTime", UniformValue::Float(0.0)).is_err());
}

#[test]
fn should_show_the_palette_in_the_debug_panel() {
    let panel = DebugPanel::new(&Palette::default());
    let entries: Vec<(ColorKey, &str)> = panel.entries().collect();
    assert_eq!(
        entries,
        vec![
            (ColorKey::ClearColor, "#191b1f"),
            (ColorKey::PortalColorStart, "#383838"),
            (ColorKey::PortalColorEnd, "#b4b4fe"),
        ]
    );
    for key in ColorKey::ALL {
        assert_eq!(ColorKey::from_label(key.label()), Some(key));
    }
    assert_eq!(ColorKey::from_label("portalColorStart"), Some(ColorKey::PortalColorStart));
}

#[test]
fn should_keep_the_old_value_on_invalid_input() {
    let mut panel = DebugPanel::new(&Palette::default());
    assert_eq!(panel.update(ColorKey::ClearColor, "#zzzzzz"), None);
    assert_eq!(panel.value(ColorKey::ClearColor), Some("#191b1f"));

    let tweak = panel.update(ColorKey::ClearColor, "#ff0000").unwrap();
    assert_color_close(tweak.color, Color::new(1.0, 0.0, 0.0));
    assert_eq!(panel.value(ColorKey::ClearColor), Some("#ff0000"));
}

#[test]
fn should_tint_clear_colour_and_test_box_together() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    assert_eq!(state.clear_color, state.box_tint);

    let red = Tweak::parse(ColorKey::ClearColor, "#ff0000").unwrap();
    state.apply_tweak(red);
    assert_eq!(state.clear_color, red.color);
    assert_eq!(state.box_tint, red.color);
}

#[test]
fn should_route_portal_tweaks_to_portal_uniforms() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    let clear_before = state.clear_color;

    let start = Tweak::parse(ColorKey::PortalColorStart, "#00ff00").unwrap();
    let end = Tweak::parse(ColorKey::PortalColorEnd, "#0000ff").unwrap();
    state.apply_tweak(start);
    state.apply_tweak(end);

    let portal = &state.materials.portal.uniforms;
    assert_eq!(portal.color_start, start.color);
    assert_eq!(portal.color_end, end.color);
    assert_eq!(state.clear_color, clear_before);
}

#[test]
fn should_drive_time_uniforms_from_the_clock() {
    let mut state = SceneState::new(&SceneConfig::default()).unwrap();
    state.set_elapsed(instant::Duration::from_millis(1500));
    assert_eq!(state.materials.portal.uniforms.time, 1.5);
    assert_eq!(state.fireflies.time, 1.5);
}

#[test]
fn should_tone_map_flat_colours_with_the_neutral_curve() {
    // shadows lose a small offset
    let dark = Color::new(0.02, 0.02, 0.02).neutral_tone_mapped();
    assert_color_close(dark, Color::new(0.0025, 0.0025, 0.0025));

    // mid tones only shift by the fixed offset
    let mid = Color::new(0.5, 0.3, 0.2).neutral_tone_mapped();
    assert_color_close(mid, Color::new(0.46, 0.26, 0.16));

    // highlights are compressed below one
    let white = Color::WHITE.neutral_tone_mapped();
    assert_close(white.r, 1.0 - 0.24 * 0.24 / 0.44, 1e-5);
    let hot = Color::new(10.0, 10.0, 10.0).neutral_tone_mapped();
    assert!(hot.r < 1.0 && hot.r > white.r);

    let uploaded = ColorUniformRaw::from(Color::new(0.5, 0.3, 0.2)).color();
    assert_close(uploaded[0], 0.46, 1e-5);
    assert_close(uploaded[2], 0.16, 1e-5);
    assert_eq!(uploaded[3], 1.0);

    let base = ColorUniformRaw::from([0.5, 0.3, 0.2, 0.5]).color();
    assert_close(base[1], 0.26, 1e-5);
    assert_eq!(base[3], 0.5);
}
