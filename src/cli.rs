//! Command-line interface implementation

use clap::{Parser, Subcommand};
use image::RgbaImage;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::catalog::Catalog;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, TeamcardConfig};
use crate::font::Typeface;
use crate::models::{Build, Instruction};
use crate::output::{generate_output_path, save_png, scale_image};
use crate::parser::{parse_named, DEFAULT_BUILD_NAME};
use crate::registry::AssetDir;
use crate::renderer::BuildRenderer;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

const SYNTAX_POINTER: &str = "See `teamcard syntax` for the shorthand format";
const NOTHING_TO_RENDER: &str = "Nothing to render: the build has no cards";

/// Shorthand reference printed by `teamcard syntax`.
pub const SYNTAX_HELP: &str = r#"Format:
    card name(assist)[latent,latent]*repeat|stats
    The card name must come first, everything else may appear in any order
    Separate cards with /
    Separate teams with ; or a new line (at most 3 teams)
    To use / in a card name, quote the whole slot: "g/l medjed(g/x zela)"/...
    sdr is a placeholder name for delay-buffer assists

Latents:
    Separate latents with , (at most 6)
    Killers: bak (balanced), phk (physical), hek (healer), drk (dragon),
             gok (god), aak (attacker), dek (devil), mak (machine),
             evk (evo), rek (redeemable), awk (awoken), enk (enhance)
    Stats (+ for two slots): hp, atk, rcv, all, hp+, atk+, rcv+
    Resists (+ for two slots): rres, bres, gres, lres, dres,
             rres+, bres+, gres+, lres+, dres+
    Others: sdr, ah (auto-heal)
    Killers the card's types cannot use are dropped

Repeat:
    *N repeats the card and its assist N times (1 to 6)
    Latents repeat too: whaledor[sdr*5]

Stats:
    | LV### SLV## AW# SA# +H## +A## +R## +(0 or 297)
    | ends the card name and starts the stats
    LV   level, 1 to 110
    SLV  skill level, 1 to 99 or MAX
    AW   awakenings, 0 to 9
    SA   super awakening, 0 to 9
    +H   HP plus, 0 to 99
    +A   ATK plus, 0 to 99
    +R   RCV plus, 0 to 99
    +    total plus (+0 or +297 only)
    Case insensitive, order does not matter

Examples:
    bj(weld)lv110/baldin[gok *3](gilgamesh)/mel(chocolate)/isis(koenma)
    amen/dios(sdr) * 3/whaledor; mnoah(jack frost) *3/tengu
    zela(amen) *3/base raizer * 2/zela; zela(amen) *4/zela; zela * 6
    eir[drk,drk,sdr]/eir[sdr *4, dek]
    dmeta(uruka|lv110+297slvmax)|+h33+a66+r99lv110slv15
"#;

/// Teamcard - render team shorthand into team card images
#[derive(Parser)]
#[command(name = "teamcard")]
#[command(about = "Render team shorthand into team card images")]
#[command(version)]
pub struct Cli {
    /// Log lookups, clamps and layout decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to teamcard.toml (default: discovered from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Entity catalog JSON file (overrides the config)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a build shorthand to PNG
    Render {
        /// Build shorthand, e.g. "bj(weld)lv110/eir[sdr]"
        shorthand: String,

        /// Output file or directory (default: {output_dir}/{name}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build name, used for the default file name
        #[arg(long, default_value = DEFAULT_BUILD_NAME)]
        name: String,

        /// JSON5 file with instruction steps to draw under the teams
        #[arg(long)]
        instructions: Option<PathBuf>,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,

        /// Asset directory (overrides the config)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Portrait directory (overrides the config)
        #[arg(long)]
        portraits: Option<PathBuf>,
    },

    /// Parse a build shorthand and print it as JSON
    Parse {
        /// Build shorthand
        shorthand: String,

        /// Build name
        #[arg(long, default_value = DEFAULT_BUILD_NAME)]
        name: String,

        /// JSON5 file with instruction steps to attach
        #[arg(long)]
        instructions: Option<PathBuf>,
    },

    /// Render every job of a JSON5 job file in parallel
    Batch {
        /// JSON5 array of jobs: { name, build, instructions?, output? }
        jobs_file: PathBuf,

        /// Output directory (default: the configured output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads (default: one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Print the shorthand reference
    Syntax,
}

/// One entry of a batch job file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    #[serde(default)]
    pub name: Option<String>,
    pub build: String,
    #[serde(default)]
    pub instructions: Option<Vec<Instruction>>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Syntax => {
            print!("{}", SYNTAX_HELP);
            ExitCode::from(EXIT_SUCCESS)
        }
        Commands::Render {
            shorthand,
            output,
            name,
            instructions,
            scale,
            assets,
            portraits,
        } => {
            let overrides = CliOverrides {
                assets_dir: assets,
                portrait_dir: portraits,
                catalog: cli.catalog,
                ..Default::default()
            };
            let args = RenderArgs {
                shorthand: &shorthand,
                name: &name,
                output: output.as_deref(),
                instructions: instructions.as_deref(),
                scale,
            };
            match load_context(cli.config.as_deref(), &overrides) {
                Ok(context) => run_render(&context, &args),
                Err(code) => code,
            }
        }
        Commands::Parse {
            shorthand,
            name,
            instructions,
        } => {
            let overrides = CliOverrides {
                catalog: cli.catalog,
                ..Default::default()
            };
            match load_context(cli.config.as_deref(), &overrides) {
                Ok(context) => run_parse(&context, &shorthand, &name, instructions.as_deref()),
                Err(code) => code,
            }
        }
        Commands::Batch {
            jobs_file,
            output,
            jobs,
            scale,
        } => {
            let overrides = CliOverrides {
                catalog: cli.catalog,
                output_dir: output,
                ..Default::default()
            };
            match load_context(cli.config.as_deref(), &overrides) {
                Ok(context) => run_batch(&context, &jobs_file, jobs, scale),
                Err(code) => code,
            }
        }
    }
}

/// Configuration plus the catalog and font it points at.
struct Context {
    config: TeamcardConfig,
    catalog: Catalog,
    typeface: Typeface,
}

impl Context {
    fn assets(&self) -> AssetDir {
        AssetDir::new(
            &self.config.assets.assets_dir,
            &self.config.assets.portrait_dir,
        )
    }

    /// Render with the configured layout and font.
    fn render(&self, build: &Build) -> Result<RgbaImage, String> {
        let assets = self.assets();
        let renderer = BuildRenderer::new(self.config.render_params(), &assets)
            .with_typeface(self.typeface.clone());
        renderer
            .render(build, build.instructions.is_some())
            .map_err(|e| e.to_string())?
            .ok_or_else(|| NOTHING_TO_RENDER.to_string())
    }
}

fn load_context(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<Context, ExitCode> {
    let mut config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    merge_cli_overrides(&mut config, overrides);

    let typeface = config.typeface().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;

    let catalog = Catalog::load(&config.catalog.path).map_err(|e| {
        eprintln!(
            "Error: Cannot load catalog '{}': {}",
            config.catalog.path.display(),
            e
        );
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    debug!(
        entities = catalog.len(),
        path = %config.catalog.path.display(),
        "catalog loaded"
    );

    Ok(Context {
        config,
        catalog,
        typeface,
    })
}

fn load_instructions(path: &Path) -> Result<Vec<Instruction>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        format!(
            "Cannot open instructions file '{}': {}",
            path.display(),
            e
        )
    })?;
    json5::from_str(&text).map_err(|e| {
        format!("Invalid instructions file '{}': {}", path.display(), e)
    })
}

struct RenderArgs<'a> {
    shorthand: &'a str,
    name: &'a str,
    output: Option<&'a Path>,
    instructions: Option<&'a Path>,
    scale: u8,
}

/// Parse a build, attaching instructions when a file is given.
fn parse_build(
    context: &Context,
    shorthand: &str,
    name: &str,
    instructions: Option<&Path>,
) -> Result<Build, ExitCode> {
    let mut build = parse_named(shorthand, name, &context.catalog).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!("{}", SYNTAX_POINTER);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;

    if let Some(path) = instructions {
        build.instructions = Some(load_instructions(path).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        })?);
    }
    Ok(build)
}

/// Execute the render command
fn run_render(context: &Context, args: &RenderArgs<'_>) -> ExitCode {
    let build = match parse_build(context, args.shorthand, args.name, args.instructions) {
        Ok(build) => build,
        Err(code) => return code,
    };

    if build.is_empty() {
        eprintln!("Error: {}", NOTHING_TO_RENDER);
        eprintln!("{}", SYNTAX_POINTER);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let image = match context.render(&build) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let image = scale_image(image, args.scale);
    let output_dir = &context.config.assets.output_dir;
    let output_path = generate_output_path(&build.name, args.output, output_dir);

    if let Err(e) = save_png(&image, &output_path) {
        eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", output_path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the parse command
fn run_parse(
    context: &Context,
    shorthand: &str,
    name: &str,
    instructions: Option<&Path>,
) -> ExitCode {
    let build = match parse_build(context, shorthand, name, instructions) {
        Ok(build) => build,
        Err(code) => return code,
    };

    match serde_json::to_string_pretty(&build) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Parse, render and save one batch job.
fn render_job(context: &Context, job: &BatchJob, scale: u8) -> Result<PathBuf, String> {
    let name = job.name.as_deref().unwrap_or(DEFAULT_BUILD_NAME);
    let mut build = parse_named(&job.build, name, &context.catalog).map_err(|e| e.to_string())?;
    if build.is_empty() {
        return Err(NOTHING_TO_RENDER.to_string());
    }
    build.instructions = job.instructions.clone();
    let image = context.render(&build)?;

    let output_dir = &context.config.assets.output_dir;
    let path = generate_output_path(name, job.output.as_deref(), output_dir);
    save_png(&scale_image(image, scale), &path)
        .map_err(|e| format!("Failed to save '{}': {}", path.display(), e))?;
    Ok(path)
}

/// Execute the batch command
fn run_batch(context: &Context, jobs_file: &Path, threads: Option<usize>, scale: u8) -> ExitCode {
    let jobs: Vec<BatchJob> = match std::fs::read_to_string(jobs_file)
        .map_err(|e| e.to_string())
        .and_then(|text| json5::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!(
                "Error: Cannot read job file '{}': {}",
                jobs_file.display(),
                e
            );
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        pool = pool.num_threads(n);
    }
    let pool = match pool.build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: Cannot start worker threads: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    info!(jobs = jobs.len(), "rendering batch");
    let results: Vec<Result<PathBuf, String>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| render_job(context, job, scale))
            .collect()
    });

    let mut failures = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(path) => println!("Saved: {}", path.display()),
            Err(e) => {
                failures += 1;
                let name = job.name.as_deref().unwrap_or(DEFAULT_BUILD_NAME);
                eprintln!("Error: job '{}': {}", name, e);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} jobs failed", failures, jobs.len());
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
