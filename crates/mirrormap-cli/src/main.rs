use mirrormap::render::{HeadlessError, MindMapConfig, layout_mindmap, parse_tree, render_svg};
use mirrormap::{ImportError, JsonConfig, TreeModel};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

const LOG_ENV: &str = "MIRRORMAP_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Import(ImportError),
    Model(mirrormap::Error),
    Render(mirrormap_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Import(err) => write!(f, "{err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for CliError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<mirrormap::Error> for CliError {
    fn from(value: mirrormap::Error) -> Self {
        Self::Model(value)
    }
}

impl From<mirrormap_render::Error> for CliError {
    fn from(value: mirrormap_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Core(err) => Self::Model(err),
            HeadlessError::Import(err) => Self::Import(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Import,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbosity: u8,
    config: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "mirrormap-cli\n\
\n\
USAGE:\n\
  mirrormap-cli [import] [--pretty] [-v] [<path>|-]\n\
  mirrormap-cli layout [--pretty] [--config <json>] [--width <px>] [--height <px>] [-v] [<path>|-]\n\
  mirrormap-cli render [--config <json>] [--width <px>] [--height <px>] [--out <path>] [-v] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is FreeMind XML for '.mm' files or text starting with '<', otherwise a JSON tree\n\
    literal: {\"name\": ..., \"url\"?: ..., \"children\"?: [...]}.\n\
  - import prints the tree literal JSON.\n\
  - layout prints node coordinates (x vertical, y signed horizontal distance from the root).\n\
  - render prints the settled SVG frame to stdout by default; use --out to write a file.\n\
  - --config reads width/height/duration/margin from a JSON file; --width/--height win.\n\
  - -v enables debug logs, -vv trace logs; MIRRORMAP_LOG overrides both.\n\
"
}

fn next_number(it: &mut impl Iterator<Item = String>) -> Result<f64, CliError> {
    let Some(raw) = it.next() else {
        return Err(CliError::Usage(usage()));
    };
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).cloned();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "import" => args.command = Command::Import,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "-v" => args.verbosity = args.verbosity.saturating_add(1),
            "-vv" => args.verbosity = args.verbosity.saturating_add(2),
            "--width" => args.width = Some(next_number(&mut it)?),
            "--height" => args.height = Some(next_number(&mut it)?),
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest);
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);
    // Ignore a second init (e.g. under a test harness that already installed one).
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_tree(input: Option<&str>, text: &str) -> Result<TreeModel, CliError> {
    let is_freemind = input
        .map(Path::new)
        .and_then(Path::extension)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mm"));
    if is_freemind {
        return Ok(mirrormap::import_freemind_str(text)?);
    }
    Ok(parse_tree(text)?)
}

fn build_config(args: &Args) -> Result<MindMapConfig, CliError> {
    let mut layered = JsonConfig::empty_object();
    if let Some(path) = args.config.as_deref() {
        let raw = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;
        layered.deep_merge(&value);
    }
    if let Some(width) = args.width {
        layered.set_value("width", Value::from(width));
    }
    if let Some(height) = args.height {
        layered.set_value("height", Value::from(height));
    }
    Ok(MindMapConfig::from_json(layered.as_value())?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut tree = load_tree(args.input.as_deref(), &text)?;
    tracing::debug!(command = ?args.command, nodes = tree.len(), "loaded tree");

    match args.command {
        Command::Import => write_json(&tree.to_literal(), args.pretty),
        Command::Layout => {
            let config = build_config(&args)?;
            let layout = layout_mindmap(&tree, &config)?;
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let config = build_config(&args)?;
            let svg = render_svg(&mut tree, &config)?;
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    setup_logging(args.verbosity);

    if let Err(err) = run(args) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(raw: &[&str]) -> Vec<String> {
        std::iter::once("mirrormap-cli")
            .chain(raw.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_import_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.command, Command::Import);
        assert_eq!(args.input, None);
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn parses_layout_options() {
        let args = parse_args(&argv(&["layout", "--pretty", "--width", "640", "-v", "map.mm"])).unwrap();
        assert_eq!(args.command, Command::Layout);
        assert!(args.pretty);
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.verbosity, 1);
        assert_eq!(args.input.as_deref(), Some("map.mm"));
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(matches!(parse_args(&argv(&["--width"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["--width", "-3"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["a.mm", "b.mm"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["--frobnicate"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn flags_override_config_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("render.json");
        std::fs::write(&path, r#"{"width": 640, "height": 400, "margin": {"left": 10}}"#).unwrap();

        let args = Args {
            config: Some(path.to_string_lossy().into_owned()),
            height: Some(300.0),
            ..Default::default()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.width(), 640.0);
        assert_eq!(config.height(), 300.0);
        assert_eq!(config.margin().left, 10.0);
        assert_eq!(config.margin().right, 120.0);
    }
}
