use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stitch_chart::ColorMapping;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use xstitch::api;
use xstitch::error::PipelineError;
use xstitch::models::{parse_mapping, AtlasOrder, ChartConfig, ChartSummary, SummaryMeta};
use xstitch::server;
use xstitch::services::ChartPipeline;

/// Exit status for a palette that needs more symbols than the sheet has.
const EXIT_CAPACITY: u8 = 2;

#[derive(Parser)]
#[command(name = "xstitch")]
#[command(about = "Cross-stitch chart generator")]
struct Cli {
    /// Configuration file (YAML). Falls back to $CONFIG_FILE
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the reference image, pattern and color reference
    Render {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output directory (default: config `output_dir`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a single pattern_bundle.zip instead of three PNG files
        #[arg(long)]
        bundle: bool,
    },
    /// Print the palette and stitch counts as JSON
    Quantize {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Start the HTTP server
    Serve,
}

#[derive(Args)]
struct ChartArgs {
    /// Source image (PNG, JPEG, GIF, BMP or WebP)
    image: PathBuf,

    /// Sprite sheet of square stitch symbols
    symbols: PathBuf,

    /// Number of colors to reduce the image to
    #[arg(short = 'k', long = "colors")]
    total_colors: Option<usize>,

    /// Symbol tile size in pixels
    #[arg(short = 'd', long)]
    symbols_dimension: Option<usize>,

    /// Label font size in pixels
    #[arg(long)]
    font_size: Option<usize>,

    /// Font file for labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for cluster initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Clustering iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Pattern margin in pixels
    #[arg(long)]
    margin: Option<usize>,

    /// Tile order of the sprite sheet
    #[arg(long, value_enum)]
    atlas_order: Option<AtlasOrder>,

    /// Color merges as a JSON object, or @FILE to read one
    #[arg(long, value_name = "JSON|@FILE")]
    merge: Option<String>,
}

impl ChartArgs {
    /// `base` with the options given on the command line.
    fn apply_to(&self, base: &ChartConfig) -> ChartConfig {
        let mut config = base.clone();
        if let Some(k) = self.total_colors {
            config.total_colors = k;
        }
        if let Some(d) = self.symbols_dimension {
            config.symbols_dimension = d;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n) = self.max_iterations {
            config.max_iterations = n;
        }
        if let Some(margin) = self.margin {
            config.margin = Some(margin);
        }
        if let Some(order) = self.atlas_order {
            config.atlas_order = order;
        }
        config
    }

    fn mapping(&self) -> anyhow::Result<ColorMapping> {
        let Some(arg) = self.merge.as_deref() else {
            return Ok(ColorMapping::new());
        };
        match arg.strip_prefix('@') {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read merge file {path}"))?;
                Ok(parse_mapping(&text))
            }
            None => Ok(parse_mapping(arg)),
        }
    }

    /// Read the image and sprite sheet bytes.
    fn read_inputs(&self) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
        let image = std::fs::read(&self.image)
            .with_context(|| format!("Failed to read image {}", self.image.display()))?;
        let symbols = std::fs::read(&self.symbols)
            .with_context(|| format!("Failed to read symbol sheet {}", self.symbols.display()))?;
        Ok((image, symbols))
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "xstitch API",
        description = "Cross-stitch chart generator",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_quantize, api::handle_render),
    components(schemas(ChartSummary, SummaryMeta, api::ChartUpload)),
    tags(
        (name = "Chart", description = "Palette reduction and chart rendering")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    let result = match cli.command {
        Some(Commands::Render {
            chart,
            output,
            bundle,
        }) => run_render_command(config_path.as_deref(), &chart, output, bundle),
        Some(Commands::Quantize { chart }) => run_quantize_command(config_path.as_deref(), &chart),
        Some(Commands::Serve) => run_server(config_path.as_deref()).await,
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Print `error` and map it to an exit status.
fn report_error(error: &anyhow::Error) -> ExitCode {
    if let Some(pipeline_error) = error
        .downcast_ref::<PipelineError>()
        .filter(|e| e.capacity().is_some())
    {
        eprintln!("{pipeline_error}");
        eprintln!("Reduce the number of colors (-k) or use a larger symbol sheet.");
        return ExitCode::from(EXIT_CAPACITY);
    }
    eprintln!("Error: {error:#}");
    ExitCode::FAILURE
}

/// Minimal logging for CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xstitch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

/// Render a chart to files (no server needed)
fn run_render_command(
    config_path: Option<&Path>,
    chart: &ChartArgs,
    output: Option<PathBuf>,
    bundle: bool,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let mut config = chart.apply_to(&ChartConfig::load(config_path));
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    config.bundle |= bundle;

    let (image, symbols) = chart.read_inputs()?;
    let mapping = chart.mapping()?;

    let pipeline = ChartPipeline::from_config(&config);
    let prepared = pipeline.prepare(&image, &symbols, &config, &mapping)?;
    let images = pipeline.render(&prepared)?;

    if config.bundle {
        let path = images.write_bundle_to(&config.output_dir)?;
        println!("Wrote {}", path.display());
    } else {
        for path in images.write_to(&config.output_dir)? {
            println!("Wrote {}", path.display());
        }
    }
    println!(
        "{} colors, {} stitches",
        prepared.palette.len(),
        prepared.frequencies.total()
    );

    Ok(())
}

/// Print the palette summary as JSON
fn run_quantize_command(config_path: Option<&Path>, chart: &ChartArgs) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = chart.apply_to(&ChartConfig::load(config_path));
    let (image, symbols) = chart.read_inputs()?;
    let mapping = chart.mapping()?;

    let pipeline = ChartPipeline::from_config(&config);
    let prepared = pipeline.prepare(&image, &symbols, &config, &mapping)?;
    let summary = pipeline.summarize(&prepared);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Display version and configuration information
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();

    println!("xstitch v{VERSION}");
    println!("Cross-stitch chart generator\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        std::env::var("CONFIG_FILE").as_deref().unwrap_or("(not set)")
    );

    let source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("defaults ({} not found)", path.display()),
        None => "defaults".to_string(),
    };
    let config = ChartConfig::load(config_path);

    println!("\nConfiguration: {source}");
    println!("  symbols_dimension = {}", config.symbols_dimension);
    println!("  total_colors      = {}", config.total_colors);
    println!("  font_size         = {}", config.font_size);
    println!(
        "  font_path         = {}",
        config
            .font_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(system sans-serif)".to_string())
    );
    println!(
        "  fonts_dir         = {}",
        config
            .fonts_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(request fonts disabled)".to_string())
    );
    println!("  cors_origins      = {}", config.cors_origins.join(", "));
    println!("  output_dir        = {}", config.output_dir.display());
    println!("  seed              = {}", config.seed);

    println!("\nCommands:");
    println!("  xstitch render <IMAGE> <SYMBOLS>     Render pattern, legend and reference");
    println!("  xstitch quantize <IMAGE> <SYMBOLS>   Print palette and counts as JSON");
    println!("  xstitch serve                        Start the HTTP server");
    println!("\nRun 'xstitch --help' for more details.");
}

/// Run the HTTP server
async fn run_server(config_path: Option<&Path>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xstitch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = ChartConfig::load(config_path);
    let state = server::create_app_state(config).context("Invalid configuration")?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "xstitch server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
