use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source language the generator is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// LVGL C API.
    #[default]
    C,
    /// LVGL MicroPython bindings.
    MicroPython,
}

impl TargetLanguage {
    /// Tag carried in the exported document.
    pub fn tag(self) -> &'static str {
        match self {
            TargetLanguage::C => "c",
            TargetLanguage::MicroPython => "micropython",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TargetLanguage::C => "C (LVGL)",
            TargetLanguage::MicroPython => "MicroPython (LVGL)",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            TargetLanguage::C => "c",
            TargetLanguage::MicroPython => "py",
        }
    }

    /// `text` as a comment block in this language.
    pub fn comment(self, text: &str) -> String {
        match self {
            TargetLanguage::C => {
                let mut out = String::from("/*\n");
                for line in text.lines() {
                    // `*/` inside the text would end the block early.
                    let line = line.replace("*/", "* /");
                    out.push_str(" * ");
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
                out.push_str(" */\n");
                out
            }
            TargetLanguage::MicroPython => text
                .lines()
                .map(|line| format!("# {}\n", line.trim_end()))
                .collect(),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TargetLanguage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "lvgl" => Ok(TargetLanguage::C),
            "micropython" | "mpy" | "python" => Ok(TargetLanguage::MicroPython),
            other => bail!("unknown target language `{other}` (expected c or micropython)"),
        }
    }
}
