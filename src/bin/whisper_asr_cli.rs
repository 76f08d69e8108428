//! whisper-asr-cli — send audio files to a Whisper ASR backend and print the raw result
//!
//! Usage:
//!   whisper-asr-cli transcribe <file>... [OPTIONS]   Transcribe one or more files
//!   whisper-asr-cli languages                        List supported language codes
//!   whisper-asr-cli version                          Show version information

use anyhow::{bail, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use whisper_asr_client::{
    AsrClient, AsrConfig, AudioPayload, BackendResponse, Language, OutputFormat, Task,
    TranscriptionOptions,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "transcribe" => cmd_transcribe(&args[2..]).await,
        "languages" => {
            cmd_languages();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"whisper-asr-cli — Whisper ASR backend client

USAGE:
    whisper-asr-cli <COMMAND> [OPTIONS]

COMMANDS:
    transcribe <file>...        Send each file to <base-url><base-path>/asr
    languages                   List supported language codes
    version                     Show version information
    help                        Show this help message

TRANSCRIBE OPTIONS:
    --task <transcribe|translate>       Default: transcribe
    --output <txt|vtt|srt|tsv|json>     Default: txt
    --language <code>                   Omit to let the backend detect it
    --initial-prompt <text>
    --word-timestamps <true|false>
    --vad-filter                        Send vad_filter=true
    --encode                            Send encode=true
    --no-encode                         Send encode=false
                                        (unset flags are left to the backend)
    --out-dir <dir>                     Write <file-stem>.<output> instead of printing
                                        the raw response bytes
    --config <file.yaml>                Load backend configuration from YAML
    --base-url <url>                    Override the backend origin
    --base-path <prefix>                Override the path prefix before /asr

ENVIRONMENT:
    WHISPER_ASR_BASE_URL        Backend origin (default http://127.0.0.1:9000)
    WHISPER_ASR_BASE_PATH       Path prefix before /asr
    WHISPER_ASR_TIMEOUT_SECS    Request timeout in seconds
    WHISPER_ASR_PROXY_URL       Outbound HTTP proxy
    RUST_LOG                    Log filter (default warn)"#
    );
}

fn cmd_version() {
    println!("whisper-asr-cli {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_languages() {
    println!("{:<6} {}", "Code", "Language");
    println!("{}", "-".repeat(30));
    for lang in Language::ALL {
        println!("{:<6} {}", lang.as_str(), lang.name());
    }
    println!("\nTotal: {} language(s)", Language::ALL.len());
}

/// Parsed `transcribe` arguments.
#[derive(Debug, PartialEq)]
struct TranscribeArgs {
    files: Vec<PathBuf>,
    options: TranscriptionOptions,
    out_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    base_url: Option<String>,
    base_path: Option<String>,
}

fn parse_transcribe_args(args: &[String]) -> anyhow::Result<TranscribeArgs> {
    let mut parsed = TranscribeArgs {
        files: Vec::new(),
        options: TranscriptionOptions::default(),
        out_dir: None,
        config_file: None,
        base_url: None,
        base_path: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--task" => parsed.options.task = value("--task")?.parse::<Task>()?,
            "--output" => parsed.options.output = value("--output")?.parse::<OutputFormat>()?,
            "--language" => {
                parsed.options.language = Some(value("--language")?.parse::<Language>()?)
            }
            "--initial-prompt" => parsed.options.initial_prompt = Some(value("--initial-prompt")?),
            "--word-timestamps" => {
                let raw = value("--word-timestamps")?;
                let enabled = raw
                    .parse::<bool>()
                    .with_context(|| format!("--word-timestamps expects true or false, got '{raw}'"))?;
                parsed.options.word_timestamps = Some(enabled);
            }
            "--vad-filter" => parsed.options.vad_filter = Some(true),
            "--encode" => parsed.options.encode = Some(true),
            "--no-encode" => parsed.options.encode = Some(false),
            "--out-dir" => parsed.out_dir = Some(PathBuf::from(value("--out-dir")?)),
            "--config" => parsed.config_file = Some(PathBuf::from(value("--config")?)),
            "--base-url" => parsed.base_url = Some(value("--base-url")?),
            "--base-path" => parsed.base_path = Some(value("--base-path")?),
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }

    if parsed.files.is_empty() {
        bail!("transcribe needs at least one audio file");
    }
    Ok(parsed)
}

/// File or env configuration with command-line overrides applied on top.
/// Validation is left to [`AsrClient::from_config`], after the overrides.
fn resolve_config(args: &TranscribeArgs) -> anyhow::Result<AsrConfig> {
    let mut config = match &args.config_file {
        Some(path) => AsrConfig::from_yaml_file(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => AsrConfig::from_env()?,
    };
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &args.base_path {
        config.base_path = path.clone();
    }
    Ok(config)
}

fn output_path(out_dir: &Path, input: &Path, output: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());
    out_dir.join(format!("{stem}.{}", output.extension()))
}

/// Write each transcript to `out_dir`, or its raw bytes to `out`.
///
/// Failed transcriptions and failed writes are reported on stderr and counted;
/// the remaining files are still emitted.
async fn emit_results<W: Write>(
    results: Vec<anyhow::Result<(&Path, BackendResponse)>>,
    out_dir: Option<&Path>,
    output: OutputFormat,
    out: &mut W,
) -> usize {
    let with_headers = results.len() > 1;
    let mut failures = 0usize;
    let mut printed = false;

    for result in results {
        let (path, response) = match result {
            Ok(done) => done,
            Err(e) => {
                failures += 1;
                eprintln!("Error: {e:#}");
                continue;
            }
        };

        let written = match out_dir {
            Some(dir) => {
                let target = output_path(dir, path, output);
                match tokio::fs::write(&target, response.bytes()).await {
                    Ok(()) => writeln!(out, "{} -> {}", path.display(), target.display())
                        .context("cannot write to stdout"),
                    Err(e) => Err(anyhow::Error::new(e)
                        .context(format!("cannot write {}", target.display()))),
                }
            }
            None => {
                let header = if with_headers {
                    let gap = if printed { "\n" } else { "" };
                    format!("{gap}==> {} <==\n", path.display())
                } else {
                    String::new()
                };
                printed = true;
                out.write_all(header.as_bytes())
                    .and_then(|()| out.write_all(response.bytes()))
                    .with_context(|| format!("cannot print transcript of {}", path.display()))
            }
        };

        if let Err(e) = written {
            failures += 1;
            eprintln!("Error: {e:#}");
        }
    }

    if let Err(e) = out.flush() {
        failures += 1;
        eprintln!("Error: cannot flush output: {e}");
    }
    failures
}

async fn cmd_transcribe(args: &[String]) -> anyhow::Result<()> {
    let args = parse_transcribe_args(args)?;
    let client = AsrClient::from_config(resolve_config(&args)?)?;
    tracing::info!(endpoint = client.endpoint(), files = args.files.len(), "starting");

    // Each file is an independent request; they run concurrently.
    let jobs = args.files.iter().map(|path| {
        let client = &client;
        let options = &args.options;
        async move {
            let audio = AudioPayload::from_file(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let response = client
                .transcribe(options, &audio)
                .await
                .with_context(|| format!("transcription of {} failed", path.display()))?;
            anyhow::Ok((path.as_path(), response))
        }
    });
    let results = futures::future::join_all(jobs).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let failures = emit_results(results, args.out_dir.as_deref(), args.options.output, &mut out).await;

    if failures > 0 {
        bail!("{failures} of {} file(s) failed", args.files.len());
    }
    Ok(())
}
