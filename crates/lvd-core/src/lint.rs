//! Lint diagnostics for projects.
//!
//! Reports dangling references and structural oddities without modifying
//! the document. Everything reported here is tolerated by the rest of the
//! system; lint only makes it visible.

use crate::id::{ScreenId, WidgetId};
use crate::model::{EventAction, MAX_LAYERS, Project};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// What a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSubject {
    Screen(ScreenId),
    Widget(WidgetId),
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub subject: LintSubject,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-navigate").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the project and return diagnostics.
#[must_use]
pub fn lint_project(project: &Project) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_dangling_navigate(project, &mut diags);
    lint_dangling_layer(project, &mut diags);
    lint_singleton_groups(project, &mut diags);
    lint_off_canvas(project, &mut diags);
    lint_layer_limit(project, &mut diags);
    lint_unreachable_screens(project, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_dangling_navigate(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for w in project.screens.iter().flat_map(|s| &s.widgets) {
        for ev in &w.events {
            if let EventAction::Navigate { target } = &ev.action
                && project.screen(*target).is_none()
            {
                diags.push(LintDiagnostic {
                    subject: LintSubject::Widget(w.id),
                    message: format!(
                        "`{}` navigates to screen `{target}`, which no longer exists.",
                        w.id
                    ),
                    severity: LintSeverity::Warning,
                    rule: "dangling-navigate",
                });
            }
        }
    }
}

fn lint_dangling_layer(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for screen in &project.screens {
        for w in &screen.widgets {
            if screen.layer(w.layer_id).is_none() {
                diags.push(LintDiagnostic {
                    subject: LintSubject::Widget(w.id),
                    message: format!(
                        "`{}` is on layer `{}`, which is missing from screen `{}`; it will not be drawn.",
                        w.id, w.layer_id, screen.name
                    ),
                    severity: LintSeverity::Warning,
                    rule: "dangling-layer",
                });
            }
        }
    }
}

fn lint_singleton_groups(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for screen in &project.screens {
        let mut counts = HashMap::new();
        for g in screen.widgets.iter().filter_map(|w| w.group_id) {
            *counts.entry(g).or_insert(0usize) += 1;
        }
        for w in &screen.widgets {
            if let Some(g) = w.group_id
                && counts[&g] < 2
            {
                diags.push(LintDiagnostic {
                    subject: LintSubject::Widget(w.id),
                    message: format!("`{}` is the only member of group `{g}`.", w.id),
                    severity: LintSeverity::Info,
                    rule: "singleton-group",
                });
            }
        }
    }
}

fn lint_off_canvas(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    let (cw, ch) = (
        project.settings.width as i64,
        project.settings.height as i64,
    );
    for w in project.screens.iter().flat_map(|s| &s.widgets) {
        let (x, y) = (w.x as i64, w.y as i64);
        let outside = x >= cw || y >= ch || x + w.width as i64 <= 0 || y + w.height as i64 <= 0;
        if outside {
            diags.push(LintDiagnostic {
                subject: LintSubject::Widget(w.id),
                message: format!("`{}` at ({}, {}) is entirely off-canvas.", w.id, w.x, w.y),
                severity: LintSeverity::Info,
                rule: "off-canvas",
            });
        }
    }
}

fn lint_layer_limit(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for screen in &project.screens {
        if screen.layers.len() > MAX_LAYERS {
            diags.push(LintDiagnostic {
                subject: LintSubject::Screen(screen.id),
                message: format!(
                    "Screen `{}` has {} layers (limit {MAX_LAYERS}).",
                    screen.name,
                    screen.layers.len()
                ),
                severity: LintSeverity::Warning,
                rule: "layer-limit",
            });
        }
    }
}

/// Screens the user can never reach from the first (start) screen.
fn lint_unreachable_screens(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    let nav = navigation_graph(project);
    let Some(start) = project.screens.first().and_then(|s| nav.index.get(&s.id)) else {
        return;
    };
    let mut reached = vec![false; nav.graph.node_count()];
    let mut dfs = Dfs::new(&nav.graph, *start);
    while let Some(idx) = dfs.next(&nav.graph) {
        reached[idx.index()] = true;
    }
    for screen in &project.screens {
        if let Some(idx) = nav.index.get(&screen.id)
            && !reached[idx.index()]
        {
            diags.push(LintDiagnostic {
                subject: LintSubject::Screen(screen.id),
                message: format!(
                    "Screen `{}` is not reachable from `{}` through any NAVIGATE event.",
                    screen.name, project.screens[0].name
                ),
                severity: LintSeverity::Info,
                rule: "unreachable-screen",
            });
        }
    }
}

// ─── Navigation graph ────────────────────────────────────────────────────

/// Screens as nodes, one edge per NAVIGATE event whose target exists.
pub struct NavigationGraph {
    pub graph: DiGraph<ScreenId, WidgetId>,
    pub index: HashMap<ScreenId, NodeIndex>,
}

#[must_use]
pub fn navigation_graph(project: &Project) -> NavigationGraph {
    let mut graph = DiGraph::new();
    let mut index = HashMap::new();
    for screen in &project.screens {
        index.insert(screen.id, graph.add_node(screen.id));
    }
    for screen in &project.screens {
        let from = index[&screen.id];
        for w in &screen.widgets {
            for ev in &w.events {
                if let EventAction::Navigate { target } = &ev.action
                    && let Some(&to) = index.get(target)
                {
                    graph.add_edge(from, to, w.id);
                }
            }
        }
    }
    NavigationGraph { graph, index }
}

// ─── Tests ────────────────────────────────────────────────────────────────
