//! CLI binary for gotenberg-client.
//!
//! A thin shim over the library crate: flags map to the typed option structs,
//! the converted bytes go to `-o <file>` or stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gotenberg_client::forms::chromium;
use gotenberg_client::{
    output, ClientConfig, FilePart, FormValue, GotenbergClient, OfficeOptions, PageOptions,
    PdfAFormat, PdfEngineOptions, ScreenshotFormat, ScreenshotOptions, SplitMode,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const DEFAULT_MARKDOWN_TEMPLATE: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>Document</title></head>
  <body>{{ toHTML "content.md" }}</body>
</html>
"#;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Web page to PDF
  gotenberg url https://example.com -o example.pdf

  # A4 landscape with backgrounds
  gotenberg url https://example.com --paper a4 --landscape --print-background -o wide.pdf

  # HTML from stdin, with a stylesheet
  cat page.html | gotenberg html - --asset style.css -o page.pdf

  # Markdown through the default template
  gotenberg markdown README.md -o readme.pdf

  # Screenshot
  gotenberg screenshot https://github.com --width 1280 --height 800 --format jpeg -o shot.jpg

  # Office documents, merged into one PDF
  gotenberg office report.docx budget.xlsx --merge -o bundle.pdf

  # PDF engines
  gotenberg merge a.pdf b.pdf -o merged.pdf
  gotenberg split big.pdf --mode pages --span 1-3 --unify -o first-three.pdf
  gotenberg metadata read a.pdf
  gotenberg metadata write a.pdf --meta Author="Jane Doe" --meta Title=Q3 -o a-tagged.pdf
  gotenberg pdfa a.pdf --format PDF/A-2b -o archival.pdf

  # Pass any Gotenberg form field through
  gotenberg url https://example.com --set waitDelay=2s --set emulatedMediaType=screen

  # Service health and version
  gotenberg health
  gotenberg version

ENVIRONMENT VARIABLES:
  GOTENBERG_URL              Base URL of the Gotenberg service (default http://localhost:3000)
  GOTENBERG_TIMEOUT          Total request timeout in seconds (default 30)
  GOTENBERG_CONNECT_TIMEOUT  Connect timeout in seconds (default 10)
  GOTENBERG_TRACE            Value for the Gotenberg-Trace header
  RUST_LOG                   Overrides the log filter
"#;

/// Convert documents to PDF with a Gotenberg service.
#[derive(Parser, Debug)]
#[command(
    name = "gotenberg",
    version,
    about = "Convert URLs, HTML, Markdown and office documents to PDF with Gotenberg",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the Gotenberg service.
    #[arg(long, global = true, env = "GOTENBERG_URL", default_value = gotenberg_client::config::DEFAULT_BASE_URL)]
    url: String,

    /// Total request timeout in seconds.
    #[arg(long, global = true, env = "GOTENBERG_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Connect timeout in seconds.
    #[arg(long, global = true, env = "GOTENBERG_CONNECT_TIMEOUT", default_value_t = 10)]
    connect_timeout: u64,

    /// Gotenberg-Trace header value, echoed in Gotenberg's logs.
    #[arg(long, global = true, env = "GOTENBERG_TRACE")]
    trace: Option<String>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a web page to PDF.
    Url {
        target: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Render HTML (file or `-` for stdin) to PDF; the page is sent as index.html.
    Html {
        input: String,
        /// Extra files referenced by the page (CSS, images, fonts).
        #[arg(long = "asset")]
        assets: Vec<PathBuf>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Render an HTML file from disk to PDF, uploaded under its own name.
    HtmlFile {
        file: PathBuf,
        #[arg(long = "asset")]
        assets: Vec<PathBuf>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Render Markdown (file or `-` for stdin) through an HTML template.
    Markdown {
        input: String,
        /// HTML template containing {{ toHTML "content.md" }}.
        #[arg(long)]
        template: Option<PathBuf>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Capture a web page as an image.
    Screenshot {
        target: String,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
        #[arg(long, value_enum, default_value = "png")]
        format: ImageFormatArg,
        /// JPEG quality, 0–100.
        #[arg(long)]
        quality: Option<u8>,
        /// Clip to the viewport.
        #[arg(long)]
        clip: bool,
        /// Extra form field, KEY=VALUE. Repeatable.
        #[arg(long = "set", value_parser = parse_set)]
        set: Vec<(String, FormValue)>,
    },
    /// Convert office documents to PDF with LibreOffice.
    Office {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, value_enum)]
        preset: Option<OfficePresetArg>,
        /// Merge all documents into one PDF.
        #[arg(long)]
        merge: bool,
        #[arg(long)]
        landscape: bool,
        /// PDF/A target, e.g. PDF/A-2b.
        #[arg(long)]
        pdfa: Option<PdfAFormat>,
        #[arg(long)]
        pdfua: bool,
        #[arg(long = "set", value_parser = parse_set)]
        set: Vec<(String, FormValue)>,
    },
    /// Merge PDFs in the given order.
    Merge {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Split a PDF by intervals or page ranges.
    Split {
        file: PathBuf,
        /// intervals | pages
        #[arg(long)]
        mode: SplitMode,
        /// Page count (intervals) or range expression (pages).
        #[arg(long)]
        span: String,
        /// Put all extracted pages into one PDF.
        #[arg(long)]
        unify: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Flatten form fields and annotations.
    Flatten { file: PathBuf },
    /// Read or write PDF metadata.
    Metadata {
        #[command(subcommand)]
        action: MetadataCommand,
    },
    /// Convert PDFs to PDF/A.
    Pdfa {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// PDF/A-1b | PDF/A-2b | PDF/A-3b
        #[arg(long)]
        format: PdfAFormat,
        #[arg(long)]
        pdfua: bool,
    },
    /// Check that every Gotenberg module is up.
    Health,
    /// Print the Gotenberg version.
    Version,
}

#[derive(Subcommand, Debug)]
enum MetadataCommand {
    /// Print metadata as JSON, keyed by filename.
    Read {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write metadata entries into the given PDFs.
    Write {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// KEY=VALUE; VALUE may be JSON. Repeatable.
        #[arg(long = "meta", value_parser = parse_set)]
        entries: Vec<(String, FormValue)>,
        /// Full metadata object as a JSON string.
        #[arg(long)]
        json: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct PageArgs {
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,
    #[arg(long)]
    landscape: bool,
    #[arg(long)]
    print_background: bool,
    /// Margin in inches, all four sides.
    #[arg(long)]
    margin: Option<f64>,
    /// 0.1–2.0
    #[arg(long)]
    scale: Option<f64>,
    /// e.g. 1-5, 8
    #[arg(long)]
    pages: Option<String>,
    /// Wait before printing, e.g. 2s.
    #[arg(long)]
    wait_delay: Option<String>,
    /// Extra form field, KEY=VALUE. Repeatable.
    #[arg(long = "set", value_parser = parse_set)]
    set: Vec<(String, FormValue)>,
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    #[arg(long)]
    pdfa: Option<PdfAFormat>,
    #[arg(long)]
    pdfua: bool,
    #[arg(long)]
    flatten: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaperArg {
    A4,
    Letter,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImageFormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<ImageFormatArg> for ScreenshotFormat {
    fn from(v: ImageFormatArg) -> Self {
        match v {
            ImageFormatArg::Png => ScreenshotFormat::Png,
            ImageFormatArg::Jpeg => ScreenshotFormat::Jpeg,
            ImageFormatArg::Webp => ScreenshotFormat::Webp,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OfficePresetArg {
    HighQuality,
    Compressed,
}

/// `KEY=VALUE` with a loosely typed value.
fn parse_set(s: &str) -> Result<(String, FormValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), FormValue::parse_loose(value)))
}

impl PageArgs {
    fn to_options(&self) -> PageOptions {
        let mut opts = match self.paper {
            Some(PaperArg::A4) => PageOptions::a4(self.landscape),
            Some(PaperArg::Letter) => PageOptions::letter(self.landscape),
            None => PageOptions::default().landscape(self.landscape),
        }
        .print_background(self.print_background);
        if let Some(m) = self.margin {
            opts = opts.margins(m);
        }
        if let Some(s) = self.scale {
            opts = opts.scale(s);
        }
        if let Some(ref p) = self.pages {
            opts = opts.native_page_ranges(p);
        }
        if let Some(ref d) = self.wait_delay {
            opts = opts.wait_delay(d);
        }
        self.set
            .iter()
            .fold(opts, |o, (k, v)| o.set(k.clone(), v.clone()))
    }
}

impl EngineArgs {
    fn to_options(&self) -> PdfEngineOptions {
        let opts = PdfEngineOptions::default()
            .pdfua(self.pdfua)
            .flatten(self.flatten);
        match self.pdfa {
            Some(f) => opts.pdfa(f),
            None => opts,
        }
    }
}

fn paths_to_parts(paths: &[PathBuf]) -> Vec<FilePart> {
    paths.iter().map(FilePart::path).collect()
}

/// Read a file, or stdin when `input` is `-`.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

fn metadata_map(
    entries: &[(String, FormValue)],
    json: Option<&str>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let mut map = match json {
        Some(raw) => match serde_json::from_str(raw).context("--json is not valid JSON")? {
            serde_json::Value::Object(m) => m,
            _ => bail!("--json must be a JSON object"),
        },
        None => serde_json::Map::new(),
    };
    for (key, value) in entries {
        let v = match value {
            FormValue::Bool(b) => serde_json::Value::Bool(*b),
            FormValue::Int(i) => serde_json::Value::from(*i),
            FormValue::Float(f) => serde_json::Value::from(*f),
            FormValue::Text(s) => serde_json::Value::String(s.clone()),
            FormValue::Json(j) => j.clone(),
        };
        map.insert(key.clone(), v);
    }
    Ok(map)
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Gotenberg");
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn describe(command: &Command) -> String {
    match command {
        Command::Url { target, .. } => format!("Rendering {target}…"),
        Command::Html { .. } | Command::HtmlFile { .. } => "Rendering HTML…".into(),
        Command::Markdown { .. } => "Rendering Markdown…".into(),
        Command::Screenshot { target, .. } => format!("Capturing {target}…"),
        Command::Office { files, .. } => format!("Converting {} document(s)…", files.len()),
        Command::Merge { files, .. } => format!("Merging {} PDFs…", files.len()),
        Command::Split { .. } => "Splitting…".into(),
        Command::Flatten { .. } => "Flattening…".into(),
        Command::Metadata { .. } => "Processing metadata…".into(),
        Command::Pdfa { format, .. } => format!("Converting to {format}…"),
        Command::Health | Command::Version => "Contacting service…".into(),
    }
}

/// What a subcommand produced.
enum Outcome {
    Bytes(Vec<u8>),
    Text(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && cli.output.is_some();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder()
        .base_url(cli.url.clone())
        .timeout_secs(cli.timeout)
        .connect_timeout_secs(cli.connect_timeout);
    if let Some(ref trace) = cli.trace {
        builder = builder.trace_header(trace.clone());
    }
    let config = builder.build().context("Invalid client configuration")?;
    let client = GotenbergClient::new(config).context("Failed to create client")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let bar = show_progress.then(|| spinner(describe(&cli.command)));
    let start = Instant::now();
    let result = run(&client, &cli.command).await;
    if let Some(ref bar) = bar {
        bar.finish_and_clear();
    }

    let outcome = match result {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{} {}", red("✘"), bold(&format!("{e:#}")));
            std::process::exit(1);
        }
    };

    // ── Emit ─────────────────────────────────────────────────────────────
    match (outcome, cli.output.as_deref()) {
        (Outcome::Bytes(bytes), Some(path)) => {
            output::save(&bytes, path)
                .await
                .context("Failed to write output")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} bytes  {}ms  →  {}",
                    green("✔"),
                    bytes.len(),
                    start.elapsed().as_millis(),
                    bold(&path.display().to_string()),
                );
            }
        }
        (Outcome::Bytes(bytes), None) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write to stdout")?;
            handle.flush().context("Failed to write to stdout")?;
        }
        (Outcome::Text(text), Some(path)) => {
            output::save(text.as_bytes(), path)
                .await
                .context("Failed to write output")?;
        }
        (Outcome::Text(text), None) => println!("{text}"),
    }

    Ok(())
}

async fn run(client: &GotenbergClient, command: &Command) -> Result<Outcome> {
    let bytes = match command {
        Command::Url { target, page } => {
            client
                .chromium()
                .convert_url(target, &page.to_options())
                .await?
        }
        Command::Html {
            input,
            assets,
            page,
        } => {
            let html = read_input(input)?;
            client
                .chromium()
                .convert_html(&html, paths_to_parts(assets), &page.to_options())
                .await?
        }
        Command::HtmlFile { file, assets, page } => {
            if file.file_name().and_then(|n| n.to_str()) != Some(chromium::INDEX_HTML) {
                tracing::warn!(
                    "{} is not named {}; Gotenberg only renders index.html",
                    file.display(),
                    chromium::INDEX_HTML
                );
            }
            client
                .chromium()
                .convert_html_file(file, assets, &page.to_options())
                .await?
        }
        Command::Markdown {
            input,
            template,
            page,
        } => {
            let markdown = read_input(input)?;
            let template = match template {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template {}", path.display()))?,
                None => DEFAULT_MARKDOWN_TEMPLATE.to_string(),
            };
            client
                .chromium()
                .convert_markdown(&markdown, &template, &page.to_options())
                .await?
        }
        Command::Screenshot {
            target,
            width,
            height,
            format,
            quality,
            clip,
            set,
        } => {
            let mut opts = ScreenshotOptions::default()
                .width(*width)
                .height(*height)
                .format((*format).into())
                .clip(*clip);
            if let Some(q) = quality {
                opts = opts.quality(*q);
            }
            let opts = set.iter().fold(opts, |o, (k, v)| o.set(k.clone(), v.clone()));
            client.chromium().screenshot_url(target, &opts).await?
        }
        Command::Office {
            files,
            preset,
            merge,
            landscape,
            pdfa,
            pdfua,
            set,
        } => {
            let mut opts = match preset {
                Some(OfficePresetArg::HighQuality) => OfficeOptions::high_quality(),
                Some(OfficePresetArg::Compressed) => OfficeOptions::compressed(),
                None => OfficeOptions::default(),
            }
            .merge(*merge)
            .landscape(*landscape)
            .pdfua(*pdfua);
            if let Some(f) = pdfa {
                opts = opts.pdfa(*f);
            }
            let opts = set.iter().fold(opts, |o, (k, v)| o.set(k.clone(), v.clone()));
            client.libreoffice().convert_paths(files, &opts).await?
        }
        Command::Merge { files, engine } => {
            client
                .pdf_engines()
                .merge(paths_to_parts(files), &engine.to_options())
                .await?
        }
        Command::Split {
            file,
            mode,
            span,
            unify,
            engine,
        } => {
            let opts = engine.to_options().split_unify(*unify);
            client
                .pdf_engines()
                .split(file.as_path(), *mode, span, &opts)
                .await?
        }
        Command::Flatten { file } => client.pdf_engines().flatten(file.as_path()).await?,
        Command::Metadata { action } => match action {
            MetadataCommand::Read { files } => {
                let meta = client
                    .pdf_engines()
                    .read_metadata(paths_to_parts(files))
                    .await?;
                let json =
                    serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?;
                return Ok(Outcome::Text(json));
            }
            MetadataCommand::Write {
                files,
                entries,
                json,
            } => {
                let meta = metadata_map(entries, json.as_deref())?;
                client
                    .pdf_engines()
                    .write_metadata(paths_to_parts(files), &meta)
                    .await?
            }
        },
        Command::Pdfa {
            files,
            format,
            pdfua,
        } => {
            client
                .pdf_engines()
                .convert_to_pdfa(paths_to_parts(files), *format, *pdfua)
                .await?
        }
        Command::Health => {
            let health = client.health().await?;
            if !health.is_up() {
                bail!("Gotenberg is {}", health.status);
            }
            if health.details.is_null() {
                return Ok(Outcome::Text(format!("{} up", green("✔"))));
            }
            let details = serde_json::to_string_pretty(&health.details)
                .context("Failed to serialise health details")?;
            return Ok(Outcome::Text(format!("{} up\n{}", green("✔"), details)));
        }
        Command::Version => return Ok(Outcome::Text(client.version().await?)),
    };
    Ok(Outcome::Bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_typed_values() {
        assert_eq!(
            parse_set("landscape=true").unwrap(),
            ("landscape".to_string(), FormValue::Bool(true))
        );
        assert_eq!(
            parse_set("quality=80").unwrap(),
            ("quality".to_string(), FormValue::Int(80))
        );
        assert_eq!(
            parse_set("waitDelay=2s").unwrap(),
            ("waitDelay".to_string(), FormValue::Text("2s".into()))
        );
        assert!(parse_set("novalue").is_err());
        assert!(parse_set("=x").is_err());
    }

    #[test]
    fn page_args_apply_preset_then_overrides() {
        let cli = Cli::parse_from([
            "gotenberg",
            "url",
            "https://example.com",
            "--paper",
            "a4",
            "--landscape",
            "--set",
            "paperWidth=20",
        ]);
        let Command::Url { page, .. } = cli.command else {
            panic!("expected url subcommand");
        };
        let opts = page.to_options();
        assert!(opts.landscape);
        assert_eq!(opts.paper_height, 8.27);
        assert_eq!(opts.extra.get("paperWidth"), Some(&FormValue::Int(20)));
    }

    #[test]
    fn split_mode_is_validated_by_clap() {
        let err = Cli::try_parse_from([
            "gotenberg", "split", "a.pdf", "--mode", "chapters", "--span", "1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("chapters"));
    }

    #[test]
    fn merge_needs_two_files_at_parse_time() {
        assert!(Cli::try_parse_from(["gotenberg", "merge", "a.pdf"]).is_err());
        assert!(Cli::try_parse_from(["gotenberg", "merge", "a.pdf", "b.pdf"]).is_ok());
    }

    #[test]
    fn metadata_map_merges_json_and_entries() {
        let entries = vec![
            ("Author".to_string(), FormValue::Text("Jane".into())),
            (
                "Keywords".to_string(),
                FormValue::parse_loose(r#"["a","b"]"#),
            ),
        ];
        let map = metadata_map(&entries, Some(r#"{"Title":"Q3"}"#)).unwrap();
        assert_eq!(map["Title"], "Q3");
        assert_eq!(map["Author"], "Jane");
        assert_eq!(map["Keywords"], serde_json::json!(["a", "b"]));
        assert!(metadata_map(&[], Some("[1]")).is_err());
    }
}
