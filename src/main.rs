mod debug_report;

use chrono::NaiveDateTime;
use labelcheck::{CompiledQuestions, Context, LabelFacts, LoadError, Options, RawQuestion, api, evaluate_label};
use std::io::{self, IsTerminal, Read};

const LOG_ENV: &str = "LABELCHECK_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let (facts, raw_questions, opts) = match load_inputs(&config) {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let ctx = match config.evaluated_at {
        Some(evaluated_at) => Context { evaluated_at },
        None => Context::default(),
    };
    let questions = CompiledQuestions::new(&raw_questions, opts.strict_logic);
    let report = evaluate_label(&facts, &questions, &ctx, &opts);

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to serialize report: {err}");
                std::process::exit(1);
            }
        }
    } else {
        debug_report::print_report(&report, &questions, config.color);
    }
}

struct CliConfig {
    facts: Option<String>,
    questions: Option<String>,
    options: Option<String>,
    evaluated_at: Option<NaiveDateTime>,
    json: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = CliConfig {
        facts: None,
        questions: None,
        options: None,
        evaluated_at: None,
        json: false,
        color: io::stdout().is_terminal(),
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("labelcheck {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "--json" => config.json = true,
            "--facts" | "-f" => set_once(&mut config.facts, value("--facts")?, "--facts")?,
            "--questions" | "-q" => set_once(&mut config.questions, value("--questions")?, "--questions")?,
            "--options" | "-o" => set_once(&mut config.options, value("--options")?, "--options")?,
            "--evaluated-at" => config.evaluated_at = Some(parse_timestamp(&value("--evaluated-at")?)?),
            _ if arg.starts_with('-') => return Err(format!("error: unknown option '{arg}'")),
            _ => set_once(&mut config.facts, arg, "--facts")?,
        }
    }

    Ok(config)
}

fn set_once(slot: &mut Option<String>, value: String, name: &str) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("error: {name} provided multiple times"));
    }
    *slot = Some(value);
    Ok(())
}

fn load_inputs(config: &CliConfig) -> Result<(LabelFacts, Vec<RawQuestion>, Options), LoadError> {
    let facts = match &config.facts {
        Some(path) if path != "-" => api::load_facts(path)?,
        _ => api::parse_facts(&read_stdin()?)?,
    };
    let questions = match &config.questions {
        Some(path) => api::load_questions(path)?,
        None => Vec::new(),
    };
    let options = match &config.options {
        Some(path) => api::load_options(path)?,
        None => Options::default(),
    };
    Ok((facts, questions, options))
}

fn read_stdin() -> Result<String, LoadError> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|source| LoadError::Io { path: "<stdin>".to_string(), source })?;
    Ok(buffer)
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("error: invalid --evaluated-at '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "labelcheck {version}

Deterministic food label compliance checks.

Usage:
  labelcheck [OPTIONS] [--facts] <facts.json>
  labelcheck [OPTIONS] < facts.json

Options:
  -f, --facts <file>           Extracted label facts (JSON). Reads stdin when
                               omitted or '-'.
  -q, --questions <file>       Checklist questions (JSON array, or an object
                               with a \"questions\" array).
  -o, --options <file>         Evaluation options (JSON).
  --evaluated-at <timestamp>   Report timestamp in YYYY-MM-DDTHH:MM:SS.
                               Default: current local time.
  --json                       Print the report as JSON.
  --color                      Force ANSI color output.
  --no-color                   Disable ANSI color output.
  -h, --help                   Show this help message.
  -V, --version                Print version information.

Environment:
  {log_env}                Log filter (e.g. labelcheck=debug). Default: warn.

Exit codes:
  0  Success.
  1  Input could not be read or parsed.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
