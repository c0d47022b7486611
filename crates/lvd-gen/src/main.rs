//! `lvd-gen`: generate LVGL source for a saved project.
//!
//! ```text
//! lvd-gen <project.json> [--lang c|micropython] [--config file] [--export-only]
//! ```
//!
//! Generated code goes to stdout; lint findings and errors go to stderr.

use anyhow::{Context, bail};
use lvd_core::{ExportDocument, LintSeverity, LintSubject, lint_project, load_project};
use lvd_gen::{CodeGenerator, GeneratorConfig, TargetLanguage};
use std::path::PathBuf;

const USAGE: &str =
    "usage: lvd-gen <project.json> [--lang c|micropython] [--config file] [--export-only]";

#[derive(Debug, Default)]
struct Args {
    project: PathBuf,
    lang: TargetLanguage,
    config: Option<PathBuf>,
    export_only: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut project = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => {
                let value = args.next().context("--lang needs a value")?;
                parsed.lang = value.parse()?;
            }
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--export-only" => parsed.export_only = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option `{flag}`\n{USAGE}"),
            path => {
                if project.replace(PathBuf::from(path)).is_some() {
                    bail!("only one project file may be given\n{USAGE}");
                }
            }
        }
    }
    parsed.project = project.with_context(|| USAGE.to_string())?;
    Ok(parsed)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let project = load_project(&args.project)?;

    for diag in lint_project(&project) {
        let subject = match diag.subject {
            LintSubject::Screen(id) => format!("screen {id}"),
            LintSubject::Widget(id) => format!("widget {id}"),
        };
        match diag.severity {
            LintSeverity::Warning => log::warn!("[{}] {subject}: {}", diag.rule, diag.message),
            LintSeverity::Info => log::info!("[{}] {subject}: {}", diag.rule, diag.message),
        }
    }

    if args.export_only {
        let doc = ExportDocument::build(&project, args.lang.tag());
        println!("{}", doc.to_json()?);
        return Ok(());
    }

    let config = GeneratorConfig::load(args.config.as_deref())?;
    let generator = CodeGenerator::from_config(config)?;
    let code = generator.try_generate(&project, args.lang).await?;
    print!("{code}");
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let result = match parse_args(std::env::args().skip(1)) {
        Ok(args) => run(args).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        eprintln!("lvd-gen: {e:#}");
        std::process::exit(1);
    }
}
