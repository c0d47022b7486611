//! Integration tests: build a project → save → load → compare.
//!
//! Exercises the `lvd-core` persistence path end to end, including the
//! tagged widget payloads, events and presets.

use lvd_core::id::{GroupId, ScreenId, WidgetId};
use lvd_core::model::*;
use lvd_core::{load_project, project_from_json, project_to_json, save_project};
use pretty_assertions::assert_eq;

fn sample_project() -> Project {
    let mut project = Project::new();
    project.settings.device = "esp32-s3-box".into();
    project.settings.rotation = Rotation::Deg90;
    project.settings.theme = Theme::builtin("dark").unwrap();

    let settings = Screen::new("Settings");
    let settings_id = settings.id;
    project.screens.push(settings);

    let home = &mut project.screens[0];
    let overlay = Layer::new("Overlay");
    let overlay_id = overlay.id;
    home.add_layer(overlay);
    home.set_layer_locked(overlay_id, true);
    let base = home.layers[0].id;

    let mut ok = Widget::new(WidgetId::intern("rt_ok"), base, WidgetType::Button, 20, 40);
    ok.events.push(WidgetEvent::new(
        EventTrigger::Clicked,
        EventAction::Navigate {
            target: settings_id,
        },
    ));
    ok.events.push(WidgetEvent::new(
        EventTrigger::Released,
        EventAction::CustomCode {
            code: "lv_obj_add_flag(obj, LV_OBJ_FLAG_HIDDEN);".into(),
        },
    ));
    let mut caption = Widget::new(WidgetId::intern("rt_caption"), base, WidgetType::Label, 20, 100);
    caption.kind.set_text("Brightness");
    let mut chart = Widget::new(
        WidgetId::intern("rt_chart"),
        overlay_id,
        WidgetType::Chart,
        200,
        20,
    );
    chart.kind = WidgetKind::Chart {
        chart_type: ChartType::Bar,
        points: vec![1, 2, 3],
    };
    let mut image = Widget::new(WidgetId::intern("rt_img"), overlay_id, WidgetType::Image, -30, 0);
    image.kind = WidgetKind::Image {
        source: Some(ImageSource::Asset {
            path: "assets/logo.png".into(),
        }),
    };
    home.widgets.extend([ok, caption, chart, image]);
    home.group(
        &[WidgetId::intern("rt_ok"), WidgetId::intern("rt_caption")],
        GroupId::intern("rt_group"),
    );

    project.style_presets.push(StylePreset::new(
        "Primary",
        Style {
            bg_color: Some(Color::rgb(0x00, 0x66, 0xCC)),
            radius: Some(10),
            ..Style::default()
        },
    ));
    project
}

#[test]
fn json_roundtrip_reproduces_project() {
    let project = sample_project();
    let json = project_to_json(&project).unwrap();
    let back = project_from_json(&json).unwrap();
    assert_eq!(back, project);
}

#[test]
fn file_roundtrip_reproduces_project() {
    let project = sample_project();
    let path = std::env::temp_dir().join(format!("lvd-roundtrip-{}.json", std::process::id()));
    save_project(&project, &path).unwrap();
    let back = load_project(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(back, project);
}

#[test]
fn file_carries_version_and_timestamp() {
    let json = project_to_json(&Project::new()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], lvd_core::file_io::FORMAT_VERSION);
    assert!(value["saved_at"].is_string());
    assert!(value.get("selection").is_none());
}

#[test]
fn dangling_navigation_survives_roundtrip() {
    let mut project = sample_project();
    let settings_id = project.screens[1].id;
    project.screens.retain(|s| s.id != settings_id);

    let back = project_from_json(&project_to_json(&project).unwrap()).unwrap();
    let ok = back.find_widget(WidgetId::intern("rt_ok")).unwrap().1;
    assert!(matches!(
        ok.events[0].action,
        EventAction::Navigate { target } if target == settings_id
    ));
    assert!(back.screen(ScreenId::intern(settings_id.as_str())).is_none());
}
