use chronolane::render::{TimelineError, TimelineRenderer};
use chronolane::views::{
    DigestDay, EMPTY_STATE_TEXT, SectionEntry, highlights_digest, section_list,
};
use chronolane::{
    DateRange, Event, Section, SourceError, StaticSource, TimelineConfig, filter_to_range,
    load_events, source_from_location,
};
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(chronolane::Error),
    Timeline(TimelineError),
    Source(SourceError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Timeline(err) => write!(f, "{err}"),
            CliError::Source(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chronolane::Error> for CliError {
    fn from(value: chronolane::Error) -> Self {
        Self::Core(value)
    }
}

impl From<TimelineError> for CliError {
    fn from(value: TimelineError) -> Self {
        Self::Timeline(value)
    }
}

impl From<SourceError> for CliError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Plan,
    Render,
    Section,
    Digest,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    start: Option<String>,
    end: Option<String>,
    configs: Vec<String>,
    overrides: Vec<String>,
    section: Option<String>,
    mount_id: Option<String>,
    out: Option<String>,
    pretty: bool,
}

#[derive(Serialize)]
struct SectionOut<'a> {
    section: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<&'static str>,
    entries: Vec<SectionEntry>,
}

#[derive(Serialize)]
struct DigestOut<'a> {
    section: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<&'static str>,
    days: Vec<DigestDay>,
}

fn usage() -> &'static str {
    "chronolane-cli\n\
\n\
USAGE:\n\
  chronolane-cli [plan] --start <YYYY-MM-DD> --end <YYYY-MM-DD> [--config <path>]... [--set <key>=<value>]... [--pretty] [<path>|-]\n\
  chronolane-cli render --start <YYYY-MM-DD> --end <YYYY-MM-DD> [--config <path>]... [--set <key>=<value>]... [--id <mount-id>] [--out <path>] [<path>|-]\n\
  chronolane-cli section [--section <name>] [--start <YYYY-MM-DD> --end <YYYY-MM-DD>] [--pretty] [<path>|-]\n\
  chronolane-cli digest [--section <name>] [--start <YYYY-MM-DD> --end <YYYY-MM-DD>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - <path> may be a file path or a file:// URL; if omitted or '-', events are read from stdin.\n\
  - Unreadable or malformed event data renders as an empty timeline.\n\
  - plan prints the placement plan as JSON; render prints SVG unless --out is given.\n\
  - --config may repeat; later files are merged over earlier ones, then --set values apply.\n\
  - --set values are parsed as JSON when possible (--set cardWidth=180), else taken as strings.\n\
  - --section defaults to 'highlights'.\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "plan" => args.command = Command::Plan,
            "render" => args.command = Command::Render,
            "section" => args.command = Command::Section,
            "digest" => args.command = Command::Digest,
            "--pretty" => args.pretty = true,
            "--config" | "--set" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if a == "--config" {
                    args.configs.push(value.clone());
                } else {
                    args.overrides.push(value.clone());
                }
            }
            "--start" | "--end" | "--section" | "--id" | "--out" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let slot = match a.as_str() {
                    "--start" => &mut args.start,
                    "--end" => &mut args.end,
                    "--section" => &mut args.section,
                    "--id" => &mut args.mount_id,
                    _ => &mut args.out,
                };
                *slot = Some(value.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_events(input: Option<&str>) -> Result<Vec<Event>, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(block_on(load_events(&StaticSource::new(buf))))
        }
        Some(location) => {
            let source = source_from_location(location)?;
            Ok(block_on(load_events(source.as_ref())))
        }
    }
}

/// Layers config files in order, then applies `key=value` overrides on top.
fn read_config(paths: &[String], overrides: &[String]) -> Result<TimelineConfig, CliError> {
    let mut config = TimelineConfig::empty_object();
    for path in paths {
        let layer = TimelineConfig::from_json_str(&std::fs::read_to_string(path)?)?;
        config.deep_merge(layer.as_value());
    }
    for item in overrides {
        let Some((key, raw)) = item.split_once('=') else {
            return Err(CliError::Usage(usage()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::Usage(usage()));
        }
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        config.set_value(key, value);
    }
    tracing::debug!(config = %config.as_value(), "resolved config");
    Ok(config)
}

fn range_arg(args: &Args) -> Result<Option<DateRange>, CliError> {
    match (args.start.as_deref(), args.end.as_deref()) {
        (Some(start), Some(end)) => Ok(Some(DateRange::parse(start, end)?)),
        (None, None) => Ok(None),
        _ => Err(CliError::Usage(usage())),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
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
    let range = range_arg(&args)?;
    let section = Section::from_raw(args.section.as_deref());
    tracing::debug!(command = ?args.command, input = ?args.input, "running");

    match args.command {
        Command::Plan | Command::Render => {
            let Some(range) = range else {
                return Err(CliError::Usage(usage()));
            };
            let config = read_config(&args.configs, &args.overrides)?;
            let renderer = TimelineRenderer::new().with_config(&config)?;
            let events = read_events(args.input.as_deref())?;
            let plan = renderer.plan_sync(&events, range)?;

            if args.command == Command::Plan {
                return write_json(&plan, args.pretty);
            }
            let mount_id = args.mount_id.as_deref().unwrap_or("timeline");
            let svg = renderer.render_plan_svg(&plan, mount_id)?;
            write_text(&svg, args.out.as_deref())
        }
        Command::Section => {
            let events = scoped_events(read_events(args.input.as_deref())?, range);
            let entries = section_list(&events, &section);
            let out = SectionOut {
                section: section.as_str(),
                empty_state: entries.is_empty().then_some(EMPTY_STATE_TEXT),
                entries,
            };
            write_json(&out, args.pretty)
        }
        Command::Digest => {
            let events = scoped_events(read_events(args.input.as_deref())?, range);
            let days = highlights_digest(&events, &section);
            let out = DigestOut {
                section: section.as_str(),
                empty_state: days.is_empty().then_some(EMPTY_STATE_TEXT),
                days,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn scoped_events(events: Vec<Event>, range: Option<DateRange>) -> Vec<Event> {
    match range {
        Some(range) => filter_to_range(&events, &range),
        None => events,
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

    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
