//! Project files.
//!
//! A project file is a JSON object carrying a format version, the save
//! timestamp, canvas settings, every screen and the style presets. Editor
//! state (selection, drag, current screen) is never written.

use crate::model::{CanvasSettings, Project, Screen, StylePreset};
use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Current file format version.
pub const FORMAT_VERSION: &str = "1.0";

/// On-disk layout of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub settings: CanvasSettings,
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub style_presets: Vec<StylePreset>,
}

impl ProjectFile {
    pub fn from_project(project: &Project) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            saved_at: Utc::now(),
            settings: project.settings.clone(),
            screens: project.screens.clone(),
            style_presets: project.style_presets.clone(),
        }
    }

    /// Validate the version and rebuild the project.
    pub fn into_project(self) -> anyhow::Result<Project> {
        let major = self.version.split('.').next().unwrap_or_default();
        let supported = FORMAT_VERSION.split('.').next().unwrap_or_default();
        if major != supported {
            bail!(
                "unsupported project format version {} (expected {FORMAT_VERSION})",
                self.version
            );
        }
        if self.screens.is_empty() {
            bail!("project file has no screens");
        }
        if let Some(screen) = self.screens.iter().find(|s| s.layers.is_empty()) {
            bail!("screen `{}` has no layers", screen.name);
        }
        for screen in &self.screens {
            let mut seen = HashSet::new();
            if let Some(dup) = screen.layers.iter().find(|l| !seen.insert(l.id)) {
                bail!("screen `{}` has duplicate layer id `{}`", screen.name, dup.id);
            }
        }
        Ok(Project {
            settings: self.settings,
            screens: self.screens,
            style_presets: self.style_presets,
        })
    }
}

pub fn project_to_json(project: &Project) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&ProjectFile::from_project(project))
        .context("serializing project")
}

pub fn project_from_json(json: &str) -> anyhow::Result<Project> {
    let file: ProjectFile = serde_json::from_str(json).context("parsing project file")?;
    file.into_project()
}

pub fn save_project(project: &Project, path: &Path) -> anyhow::Result<()> {
    let json = project_to_json(project)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved project to {}", path.display());
    Ok(())
}

pub fn load_project(path: &Path) -> anyhow::Result<Project> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let project = project_from_json(&json).with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "loaded project from {} ({} screens)",
        path.display(),
        project.screens.len()
    );
    Ok(project)
}
