//! Widget drafts produced by an AI layout assistant.
//!
//! The assistant answers with a JSON array of loose widget descriptions,
//! often wrapped in a markdown code fence. Parsing is strict about shape:
//! anything that doesn't describe a known widget type is an error for the
//! caller to report, and nothing touches the document until parsing
//! succeeds.

use crate::id::{LayerId, WidgetId};
use crate::model::{Style, Widget, WidgetKind, WidgetType, merge_style};
use anyhow::{Context, bail};
use serde::Deserialize;
use winnow::combinator::{opt, preceded, terminated};
use winnow::prelude::*;
use winnow::token::{take_till, take_until};

/// One parsed widget description, not yet placed in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDraft {
    pub widget_type: WidgetType,
    pub x: i32,
    pub y: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub text: Option<String>,
    pub value: Option<i32>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub checked: Option<bool>,
    pub options: Option<Vec<String>>,
    pub style: Option<Style>,
}

#[derive(Deserialize)]
struct RawDraft {
    #[serde(rename = "type")]
    widget_type: String,
    x: i32,
    y: i32,
    width: Option<u32>,
    height: Option<u32>,
    text: Option<String>,
    value: Option<i32>,
    min: Option<i32>,
    max: Option<i32>,
    checked: Option<bool>,
    options: Option<Vec<String>>,
    style: Option<Style>,
}

/// The assistant may answer with a bare array or `{ "widgets": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DraftPayload {
    List(Vec<RawDraft>),
    Wrapped { widgets: Vec<RawDraft> },
}

/// Parse an assistant reply into widget drafts.
pub fn parse_widget_drafts(reply: &str) -> anyhow::Result<Vec<WidgetDraft>> {
    let json = strip_code_fence(reply);
    let payload: DraftPayload =
        serde_json::from_str(json).context("widget description is not a JSON widget list")?;
    let raw = match payload {
        DraftPayload::List(list) | DraftPayload::Wrapped { widgets: list } => list,
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            let Some(widget_type) = WidgetType::from_name(&r.widget_type) else {
                bail!("widget #{i}: unknown widget type `{}`", r.widget_type);
            };
            if let (Some(min), Some(max)) = (r.min, r.max)
                && min > max
            {
                bail!("widget #{i}: min {min} is greater than max {max}");
            }
            Ok(WidgetDraft {
                widget_type,
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                text: r.text,
                value: r.value,
                min: r.min,
                max: r.max,
                checked: r.checked,
                options: r.options,
                style: r.style,
            })
        })
        .collect()
}

impl WidgetDraft {
    /// Materialize the draft as a widget: type defaults first, then every
    /// field the draft sets.
    pub fn into_widget(self, id: WidgetId, layer_id: LayerId) -> Widget {
        let mut w = Widget::new(id, layer_id, self.widget_type, self.x, self.y);
        if let Some(width) = self.width {
            w.width = width;
        }
        if let Some(height) = self.height {
            w.height = height;
        }
        if let Some(style) = &self.style {
            merge_style(&mut w.style, style);
        }
        if let Some(text) = &self.text {
            w.kind.set_text(text);
        }
        match &mut w.kind {
            WidgetKind::Slider { value, min, max }
            | WidgetKind::Arc { value, min, max }
            | WidgetKind::Bar { value, min, max } => {
                *min = self.min.unwrap_or(*min);
                *max = self.max.unwrap_or(*max);
                *value = self.value.unwrap_or(*value).clamp(*min, (*max).max(*min));
            }
            WidgetKind::Switch { checked } | WidgetKind::Checkbox { checked, .. } => {
                *checked = self.checked.unwrap_or(*checked);
            }
            WidgetKind::Roller { options, selected } | WidgetKind::Dropdown { options, selected } => {
                if let Some(opts) = self.options {
                    *options = opts;
                    *selected = 0;
                }
            }
            _ => {}
        }
        w
    }
}

/// Body of the first markdown code fence in `text`, or the trimmed text when
/// there is none.
pub fn strip_code_fence(text: &str) -> &str {
    let mut input = text;
    match fenced_block.parse_next(&mut input) {
        Ok(body) => body.trim(),
        Err(_) => {
            let trimmed = text.trim();
            // Unterminated fence (truncated reply): drop the opening line.
            match trimmed.strip_prefix("```") {
                Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body).trim(),
                None => trimmed,
            }
        }
    }
}

fn fenced_block<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(
        (
            take_until(0.., "```"),
            "```",
            take_till(0.., '\n'),
            opt('\n'),
        ),
        terminated(take_until(0.., "```"), "```"),
    )
    .parse_next(input)
}
