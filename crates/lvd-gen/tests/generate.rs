//! End-to-end generation against a recording backend: project in, prompt
//! out, reply back as code.

use lvd_core::id::WidgetId;
use lvd_core::model::*;
use lvd_gen::{Backend, CodeGenerator, TargetLanguage};
use pretty_assertions::assert_eq;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    prompts: Mutex<Vec<(String, String)>>,
}

impl Backend for Recorder {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        Ok("```python\nimport lvgl as lv\nscr = lv.obj()\n```".into())
    }
}

fn project() -> Project {
    let mut project = Project::new();
    project.settings.device = "m5-core2".into();
    let screen = &mut project.screens[0];
    let base = screen.layers[0].id;
    let hidden = Layer::new("Drafts");
    let hidden_id = hidden.id;
    screen.add_layer(hidden);
    screen.set_layer_visible(hidden_id, false);
    screen.widgets.push(Widget::new(
        WidgetId::intern("gen_ok"),
        base,
        WidgetType::Button,
        10,
        10,
    ));
    screen.widgets.push(Widget::new(
        WidgetId::intern("gen_draft"),
        hidden_id,
        WidgetType::Label,
        50,
        50,
    ));
    project
}

#[tokio::test]
async fn prompt_carries_visible_widgets_only() {
    let generator = CodeGenerator::new(Recorder::default());
    let code = generator
        .generate(&project(), TargetLanguage::MicroPython)
        .await;
    assert_eq!(code, "import lvgl as lv\nscr = lv.obj()\n");

    let prompts = generator.backend().prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let (system, prompt) = &prompts[0];
    assert!(system.contains("MicroPython"));
    assert!(prompt.starts_with("Device: m5-core2"));
    assert!(prompt.contains("1 widget(s)"));
    assert!(prompt.contains("gen_ok"));
    assert!(!prompt.contains("gen_draft"));
    assert!(prompt.contains("\"target_language\": \"micropython\""));
}
