//! Canvas key bindings.
//!
//! Hosts pass the raw key name (`"z"`, `"ArrowLeft"`, `"Delete"`) and the
//! held modifiers; `ShortcutMap::resolve` answers with the editor action.

use crate::drag::GRID_SIZE;
use crate::input::Modifiers;
use lvd_core::layers::ZOrder;

/// Editor command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Document ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    Group,
    Ungroup,

    // ── Selection ──
    SelectAll,
    Deselect,

    // ── Stacking ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── Nudge (one grid step) ──
    NudgeLeft,
    NudgeRight,
    NudgeUp,
    NudgeDown,
}

impl ShortcutAction {
    pub fn zorder(self) -> Option<ZOrder> {
        match self {
            ShortcutAction::SendBackward => Some(ZOrder::SendBackward),
            ShortcutAction::BringForward => Some(ZOrder::BringForward),
            ShortcutAction::SendToBack => Some(ZOrder::SendToBack),
            ShortcutAction::BringToFront => Some(ZOrder::BringToFront),
            _ => None,
        }
    }

    /// Canvas offset for the nudge actions.
    pub fn nudge_delta(self) -> Option<(i32, i32)> {
        match self {
            ShortcutAction::NudgeLeft => Some((-GRID_SIZE, 0)),
            ShortcutAction::NudgeRight => Some((GRID_SIZE, 0)),
            ShortcutAction::NudgeUp => Some((0, -GRID_SIZE)),
            ShortcutAction::NudgeDown => Some((0, GRID_SIZE)),
            _ => None,
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `key` is the `KeyboardEvent.key`
    /// value. Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.cmd();

        // Cmd+Shift, then Cmd, then bare keys.
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "g" | "G" => Some(ShortcutAction::Ungroup),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "g" | "G" => Some(ShortcutAction::Group),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        // ── Single keys ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "ArrowLeft" => Some(ShortcutAction::NudgeLeft),
            "ArrowRight" => Some(ShortcutAction::NudgeRight),
            "ArrowUp" => Some(ShortcutAction::NudgeUp),
            "ArrowDown" => Some(ShortcutAction::NudgeDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn cmd_z_undoes_and_shift_or_y_redoes() {
        assert_eq!(
            ShortcutMap::resolve("z", Modifiers::CTRL),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(ShortcutMap::resolve("z", META), Some(ShortcutAction::Undo));
        assert_eq!(
            ShortcutMap::resolve("Z", CTRL_SHIFT),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve("y", Modifiers::CTRL),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_grouping() {
        assert_eq!(
            ShortcutMap::resolve("g", Modifiers::CTRL),
            Some(ShortcutAction::Group)
        );
        assert_eq!(
            ShortcutMap::resolve("G", CTRL_SHIFT),
            Some(ShortcutAction::Ungroup)
        );
    }

    #[test]
    fn resolve_zorder_brackets() {
        assert_eq!(
            ShortcutMap::resolve("]", Modifiers::CTRL),
            Some(ShortcutAction::BringForward)
        );
        assert_eq!(
            ShortcutMap::resolve("[", Modifiers::CTRL),
            Some(ShortcutAction::SendBackward)
        );
        assert_eq!(
            ShortcutMap::resolve("}", CTRL_SHIFT),
            Some(ShortcutAction::BringToFront)
        );
        assert_eq!(
            ShortcutMap::resolve("[", CTRL_SHIFT).and_then(ShortcutAction::zorder),
            Some(ZOrder::SendToBack)
        );
        assert_eq!(ShortcutMap::resolve("[", Modifiers::NONE), None);
    }

    #[test]
    fn resolve_plain_keys() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Deselect)
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowUp", Modifiers::NONE).and_then(ShortcutAction::nudge_delta),
            Some((0, -GRID_SIZE))
        );
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
    }
}
