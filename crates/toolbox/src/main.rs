//! toolbox: command line front end for the tool catalog.
//!
//! Lists the registered tools, runs any file tool on a local file,
//! evaluates the age calculator, and generates the build-time sitemap
//! and route manifest.
//!
//! # Usage
//!
//! ```text
//! toolbox list [--category video] [--json]
//! toolbox convert png-to-webp photo.png [-o out.webp] [--quality 0.8]
//! toolbox age 2000-02-29 [--today 2024-03-01]
//! toolbox sitemap --base-url https://tools.example [-o dist/sitemap.xml]
//! toolbox manifest [-o dist/routes.json]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use toolbox::{AppConfig, Converter, ToolSession, default_output_path};
use toolbox_core::age::{calculate_age, days_until_next_birthday, parse_date};
use toolbox_core::registry::{self, Category};
use toolbox_core::{ConvertOptions, FileMeta, ToolError};
use toolbox_engine::{FfmpegLoader, ProgressFn};
use toolbox_export::{entries_from_registry, to_route_manifest, to_sitemap};
use tracing_subscriber::EnvFilter;

/// A catalog of single-purpose file converters, calculators and text
/// tools.
#[derive(Parser)]
#[command(name = "toolbox", version)]
struct Cli {
    /// JSON config file (limits, defaults, ffmpeg location).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List tools.
    List {
        /// Only tools of this category.
        #[arg(long)]
        category: Option<Category>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Run a tool on a file.
    Convert {
        /// Tool id, e.g. `png-to-jpg` or `video-to-mp3`.
        tool: String,

        /// Input file.
        input: PathBuf,

        /// Output path. Defaults to the tool's file name next to the input,
        /// suffixed with the tool id when that name is the input's own.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoder quality (0.0-1.0).
        #[arg(long)]
        quality: Option<f32>,

        /// Enhancement strength.
        #[arg(long)]
        amount: Option<f32>,

        /// Media start offset in seconds.
        #[arg(long)]
        start: Option<f64>,

        /// Media duration in seconds.
        #[arg(long)]
        duration: Option<f64>,

        /// GIF frame rate.
        #[arg(long)]
        fps: Option<u32>,

        /// GIF width in pixels.
        #[arg(long)]
        width: Option<u32>,
    },

    /// Exact age between two dates.
    Age {
        /// Birth date, YYYY-MM-DD.
        birth: String,

        /// Reference date, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        today: Option<String>,

        /// Print JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate sitemap.xml from the registry.
    Sitemap {
        /// Site origin, e.g. `https://tools.example`.
        #[arg(long)]
        base_url: String,

        /// `<lastmod>` date for every entry.
        #[arg(long)]
        lastmod: Option<String>,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the JSON route manifest.
    Manifest {
        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let outcome = match cli.command {
        Command::List { category, json } => list(category, json),
        Command::Convert {
            tool,
            input,
            output,
            quality,
            amount,
            start,
            duration,
            fps,
            width,
        } => {
            let options = ConvertOptions {
                quality,
                amount,
                start,
                duration,
                fps,
                width,
            };
            convert(config, &tool, &input, output.as_deref(), &options).await
        }
        Command::Age { birth, today, json } => age(&birth, today.as_deref(), json),
        Command::Sitemap {
            base_url,
            lastmod,
            output,
        } => {
            let entries = entries_from_registry(lastmod.as_deref());
            match to_sitemap(&base_url, &entries) {
                Ok(xml) => emit(&xml, output.as_deref()),
                Err(e) => Err(e.to_string()),
            }
        }
        Command::Manifest { output } => match to_route_manifest(registry::tools()).to_json() {
            Ok(json) => emit(&json, output.as_deref()),
            Err(e) => Err(format!("Error serializing manifest: {e}")),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn list(category: Option<Category>, json: bool) -> Result<(), String> {
    let tools: Vec<_> = registry::tools()
        .iter()
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();

    if json {
        let json = serde_json::to_string_pretty(&tools)
            .map_err(|e| format!("Error serializing tools: {e}"))?;
        println!("{json}");
        return Ok(());
    }
    for tool in tools {
        println!("{:<36} {}", tool.path, tool.name);
    }
    Ok(())
}

async fn convert(
    config: AppConfig,
    tool_id: &str,
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<(), String> {
    let converter = Arc::new(Converter::new(config.toolbox, FfmpegLoader::new(config.engine)));
    let mut session = ToolSession::new(converter, tool_id).map_err(|e| failure(&e))?;

    let metadata = tokio::fs::metadata(input)
        .await
        .map_err(|e| format!("Error reading {}: {e}", input.display()))?;
    let meta = FileMeta {
        name: input
            .file_name()
            .map_or_else(|| "input".to_owned(), |n| n.to_string_lossy().into_owned()),
        size: metadata.len(),
        mime_type: String::new(),
    };
    session
        .select_file(meta, || async {
            tokio::fs::read(input)
                .await
                .map_err(|e| ToolError::Read(format!("{}: {e}", input.display())))
        })
        .await
        .map_err(|e| failure(&e))?;

    let on_progress: ProgressFn = Arc::new(|ratio| {
        tracing::info!(progress = ratio, "loading video engine");
    });
    if let Err(notification) = session.submit(options, Some(on_progress)).await {
        return Err(format!("{}: {}", notification.title, notification.message));
    }

    let Some(result) = session.take_result() else {
        return Err("conversion produced no result".to_owned());
    };
    let path = output.map_or_else(
        || default_output_path(input, &result.name, tool_id),
        Path::to_path_buf,
    );
    tokio::fs::write(&path, &result.bytes)
        .await
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    eprintln!("{} written ({} bytes)", path.display(), result.bytes.len());
    println!("{}", path.display());
    Ok(())
}

fn age(birth: &str, today: Option<&str>, json: bool) -> Result<(), String> {
    let birth = parse_date(birth).map_err(|e| failure(&e))?;
    let today = match today {
        Some(s) => parse_date(s).map_err(|e| failure(&e))?,
        None => chrono::Local::now().date_naive(),
    };
    let age = calculate_age(birth, today).map_err(|e| failure(&e))?;
    let next = days_until_next_birthday(birth, today).map_err(|e| failure(&e))?;

    if json {
        let value = serde_json::json!({
            "years": age.years,
            "months": age.months,
            "days": age.days,
            "total_days": age.total_days,
            "days_until_birthday": next,
        });
        println!("{value:#}");
        return Ok(());
    }
    println!(
        "{} {}, {} {}, {} {}",
        age.years,
        plural(age.years, "year"),
        age.months,
        plural(age.months, "month"),
        age.days,
        plural(age.days, "day"),
    );
    println!("{} days in total", age.total_days);
    if next == 0 {
        println!("Happy birthday!");
    } else {
        println!("Next birthday in {next} days");
    }
    Ok(())
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        unit.to_owned()
    } else {
        format!("{unit}s")
    }
}

fn failure(err: &ToolError) -> String {
    let notification = err.notification();
    format!("{}: {}", notification.title, notification.message)
}

fn emit(text: &str, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => std::fs::write(path, text)
            .map_err(|e| format!("Error writing {}: {e}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
