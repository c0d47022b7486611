pub mod draft;
pub mod export;
pub mod file_io;
pub mod groups;
pub mod id;
pub mod layers;
pub mod lint;
pub mod model;

pub use draft::{WidgetDraft, parse_widget_drafts, strip_code_fence};
pub use export::ExportDocument;
pub use file_io::{load_project, project_from_json, project_to_json, save_project};
pub use id::{EventId, GroupId, LayerId, PresetId, ScreenId, WidgetId};
pub use layers::{Placement, ZOrder};
pub use lint::{LintDiagnostic, LintSeverity, LintSubject, lint_project};
pub use model::*;
