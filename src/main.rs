use clap::{Parser, Subcommand};
use room_gallery::loader::Loader;
use room_gallery::reveal::Viewport;
use room_gallery::site::SiteDir;
use room_gallery::{category, config, manifest, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "room-gallery")]
#[command(about = "Manifest builder and masonry gallery preview for room catalogs")]
#[command(long_about = "\
Manifest builder and masonry gallery preview for room catalogs

Every folder under projects/ is a category. `build` writes one JSON array
of image filenames per category into data/, which the gallery pages fetch.

Site structure:

  site/
  ├── gallery.toml                 # Optional config (see gen-config)
  ├── projects/
  │   ├── kitchen/                 # → data/kitchen.json
  │   │   ├── island.jpg
  │   │   └── pantry.webp
  │   └── premium-living/          # → data/premium-living.json
  │       └── lounge.png
  └── data/                        # Generated

Pages load the category named by their path: /kitchen.html shows kitchen,
/premium.html shows all six premium categories.")]
#[command(version)]
struct Cli {
    /// Site root containing projects/, data/ and gallery.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate data/{category}.json from the projects directory
    Build,
    /// Show which categories a page path loads
    Resolve {
        /// Page path, e.g. /premium.html
        path: String,
    },
    /// Load a page's galleries from disk and print the masonry layout
    Preview {
        /// Page path, e.g. /kitchen.html
        path: String,
        /// Value of the --columns property (defaults to layout.default_columns)
        #[arg(long)]
        columns: Option<String>,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 900.0)]
        viewport: f64,
        /// Scroll offset in pixels
        #[arg(long, default_value_t = 0.0)]
        scroll: f64,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            init_thread_pool(&site_config.processing);
            let projects_dir = cli.root.join(&site_config.paths.projects);
            let data_dir = cli.root.join(&site_config.paths.data);
            let report = manifest::build_manifests(&projects_dir, &data_dir)?;
            output::print_build_output(&report, &projects_dir);
        }
        Command::Resolve { path } => {
            output::print_resolve_output(&path, category::resolve(&path));
        }
        Command::Preview {
            path,
            columns,
            viewport,
            scroll,
        } => {
            let site_config = config::load_config(&cli.root)?;
            let site = SiteDir::new(&cli.root, &site_config).with_columns(columns);
            let viewport = Viewport {
                top: scroll,
                height: viewport,
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let page = runtime.block_on(async {
                let loader = Loader::new(&site, &site, &site, &site_config);
                let mut page = loader.load_page(&path).await;
                for load in &mut page.loads {
                    if let Ok(loaded) = &mut load.result {
                        loaded.gallery.reveal(viewport, &site).await;
                    }
                }
                page
            });
            output::print_preview_output(&path, &page);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
