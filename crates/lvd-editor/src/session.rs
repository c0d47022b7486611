//! Editing-session files.
//!
//! A session is the project plus its undo/redo history, stored as
//! MessagePack so a reopened editor can still undo. Selection and drag
//! state are never stored.

use crate::editor::Editor;
use crate::history::{History, HistoryItem};
use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use lvd_core::id::ScreenId;
use lvd_core::model::Project;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionEntry {
    label: String,
    timestamp: DateTime<Utc>,
    project: Project,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    current_screen: ScreenId,
    past: Vec<SessionEntry>,
    present: Project,
    /// Soonest redo first.
    future: Vec<SessionEntry>,
}

fn entry(item: &HistoryItem<Project>) -> SessionEntry {
    SessionEntry {
        label: item.label.clone(),
        timestamp: item.timestamp,
        project: (*item.state).clone(),
    }
}

fn item(entry: SessionEntry) -> HistoryItem<Project> {
    HistoryItem {
        label: entry.label,
        timestamp: entry.timestamp,
        state: Arc::new(entry.project),
    }
}

/// Encode the session. Map-style (named) encoding is required for the
/// tagged widget payloads.
pub fn encode_session(editor: &Editor) -> anyhow::Result<Vec<u8>> {
    let history = editor.history();
    let file = SessionFile {
        version: SESSION_VERSION,
        current_screen: editor.current_screen_id(),
        past: history.past().iter().map(entry).collect(),
        present: (**history.present()).clone(),
        future: history.future().map(entry).collect(),
    };
    rmp_serde::to_vec_named(&file).context("encoding session")
}

pub fn decode_session(bytes: &[u8]) -> anyhow::Result<Editor> {
    let file: SessionFile = rmp_serde::from_slice(bytes).context("decoding session")?;
    if file.version != SESSION_VERSION {
        bail!("unsupported session version {}", file.version);
    }
    if file.present.screens.is_empty() {
        bail!("session project has no screens");
    }
    let history = History::from_parts(
        file.past.into_iter().map(item).collect(),
        Arc::new(file.present),
        file.future.into_iter().map(item).collect(),
    );
    let mut editor = Editor::from_history(history);
    editor.switch_screen(file.current_screen);
    Ok(editor)
}

pub fn save_session(editor: &Editor, path: &Path) -> anyhow::Result<()> {
    let bytes = encode_session(editor)?;
    std::fs::write(path, bytes).with_context(|| format!("writing session {}", path.display()))?;
    log::info!("saved session to {}", path.display());
    Ok(())
}

pub fn load_session(path: &Path) -> anyhow::Result<Editor> {
    let bytes = std::fs::read(path).with_context(|| format!("reading session {}", path.display()))?;
    let editor = decode_session(&bytes).with_context(|| format!("loading session {}", path.display()))?;
    log::info!("loaded session from {}", path.display());
    Ok(editor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvd_core::model::WidgetType;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_keeps_undo_and_redo() {
        let mut ed = Editor::new(Project::new());
        ed.add_widget(WidgetType::Button, None);
        ed.add_widget(WidgetType::Slider, None);
        ed.undo();

        let restored = decode_session(&encode_session(&ed).unwrap()).unwrap();
        assert_eq!(restored.project(), ed.project());
        assert_eq!(restored.current_screen_id(), ed.current_screen_id());
        assert_eq!(restored.history_menu().undo.len(), 1);
        assert_eq!(restored.history_menu().redo[0].label, "Add Slider");

        let mut restored = restored;
        assert!(restored.redo());
        assert_eq!(restored.current_screen().unwrap().widgets.len(), 2);
        assert!(restored.selection().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_session(b"not a session").is_err());
    }
}
