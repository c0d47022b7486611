use crate::target::TargetLanguage;
use lvd_core::export::ExportDocument;

/// Instructions sent alongside every export.
pub fn system_prompt(lang: TargetLanguage) -> String {
    let mut prompt = format!(
        "You are an embedded GUI engineer. Translate the JSON screen description into \
         complete {} code using LVGL v9.\n",
        lang.display_name()
    );
    prompt.push_str(
        "Create one function per screen, place widgets at the given absolute positions \
         and sizes in the listed order, apply every style field that is present, and \
         wire NAVIGATE events to load the target screen. Skip events whose \
         target_exists is false. Insert CUSTOM_CODE actions verbatim in the event \
         handler. Reply with source code only.\n",
    );
    if lang == TargetLanguage::MicroPython {
        prompt.push_str("Use the `lvgl` module as `lv` and avoid CPython-only imports.\n");
    }
    prompt
}

/// User message: the export document plus a short header.
pub fn user_prompt(doc: &ExportDocument, export_json: &str) -> String {
    format!(
        "Device: {} ({}x{}, rotated {}°). {} screen(s), {} widget(s).\n\n{export_json}",
        doc.device.device,
        doc.device.width,
        doc.device.height,
        doc.device.rotation.degrees(),
        doc.screens.len(),
        doc.widget_count(),
    )
}
