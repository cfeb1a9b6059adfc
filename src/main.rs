use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thumbwright::imaging::{ResizeOptions, RustBackend};
use thumbwright::{Renderer, config, output};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("THUMBWRIGHT_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("THUMBWRIGHT_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "thumbwright")]
#[command(about = "Render and cache image thumbnails")]
#[command(long_about = "\
Render and cache image thumbnails

Each thumbnail is written to a thumbs/ folder next to its source, named after
the crop origin and target size. Asking for the same variant again returns
the stored file without decoding anything.

  photos/
  ├── beach.jpg
  └── thumbs/
      ├── beach-0x0px-200x150size.jpg     # --prowidth 200
      └── beach-40x0px-120x120size.jpg    # --x 40 --rewidth 120 --reheight 120

Sizing options (later rules win):
  --width/--height        crop region size (defaults to the source size)
  --rewidth/--reheight    exact target size, no aspect ratio kept
  --prowidth/--proheight  target size on one axis, other axis derived;
                          ignored unless smaller than the source

Set RUST_LOG=debug to see plan resolution and cache hits.
Run 'thumbwright gen-config' to generate a documented thumbwright.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing thumbwright.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Resize and crop options shared by every file of a `thumb` request.
#[derive(clap::Args, Clone)]
struct ResizeArgs {
    /// Left edge of the crop region
    #[arg(long, default_value_t = 0)]
    x: u32,
    /// Top edge of the crop region
    #[arg(long, default_value_t = 0)]
    y: u32,
    /// Encoder quality 0-100 (0 = configured default)
    #[arg(long, default_value_t = 0)]
    quality: u32,
    /// Exact target width
    #[arg(long)]
    rewidth: Option<u32>,
    /// Exact target height
    #[arg(long)]
    reheight: Option<u32>,
    /// Proportional target width
    #[arg(long)]
    prowidth: Option<u32>,
    /// Proportional target height
    #[arg(long)]
    proheight: Option<u32>,
    /// Crop region width
    #[arg(long)]
    width: Option<u32>,
    /// Crop region height
    #[arg(long)]
    height: Option<u32>,
}

impl From<&ResizeArgs> for ResizeOptions {
    fn from(args: &ResizeArgs) -> Self {
        ResizeOptions {
            crop_x: args.x,
            crop_y: args.y,
            quality: args.quality,
            crop_width: args.width,
            crop_height: args.height,
            explicit_width: args.rewidth,
            explicit_height: args.reheight,
            proportional_width: args.prowidth,
            proportional_height: args.proheight,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render (or fetch from cache) thumbnails of one or more images
    Thumb {
        /// Source image paths or public URLs
        #[arg(required = true)]
        files: Vec<String>,
        #[command(flatten)]
        resize: ResizeArgs,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the size an image scales to, without rendering anything
    Prosize {
        /// Source image path or public URL
        file: String,
        /// Anchor width (0 = keep)
        #[arg(long, default_value_t = 0)]
        width: u32,
        /// Anchor height (0 = keep)
        #[arg(long, default_value_t = 0)]
        height: u32,
        /// Print result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock thumbwright.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Thumb {
            files,
            resize,
            json,
        } => {
            let config = config::load_config(&cli.root)?;
            init_thread_pool(&config.processing);
            let renderer = Renderer::from_config(RustBackend::new(), &config);

            let outcome = renderer.render_batch(&files, &ResizeOptions::from(&resize));
            if json {
                println!("{}", output::format_batch_json(&outcome)?);
            } else {
                output::print_batch_output(&outcome);
            }

            let failures = outcome.failures();
            if failures > 0 {
                return Err(format!("{failures} of {} requests failed", files.len()).into());
            }
        }
        Command::Prosize {
            file,
            width,
            height,
            json,
        } => {
            let config = config::load_config(&cli.root)?;
            let renderer = Renderer::from_config(RustBackend::new(), &config);
            let dims = renderer.prosize(&file, width, height)?;
            if json {
                println!("{}", output::format_prosize_json(&dims)?);
            } else {
                output::print_prosize(&file, &dims);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only results. `RUST_LOG` overrides the
/// default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
