//! Worldviewer CLI - renders facet layers of a generated world to PNG.

use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use worldviewer::config::{parse_facets, LayerConfig, ViewerConfig};
use worldviewer::export::{encode_png, PngOptions};
use worldviewer::facets::FacetType;
use worldviewer::generator::{GeneratorOptions, NoiseWorldGenerator, WorldGenerator};
use worldviewer::geometry::Rect2i;
use worldviewer::layers::{ControlValue, LayerRegistry};
use worldviewer::viewer::Compositor;

/// Facet-layer world viewer.
#[derive(Parser)]
#[command(name = "worldviewer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
struct WorldArgs {
    /// World seed; decimal numbers are used as-is, other strings are hashed.
    #[arg(short, long, default_value = "42")]
    seed: String,

    /// Viewer configuration file (JSON). Missing or invalid files fall back
    /// to defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World units per field sample.
    #[arg(long, default_value = "4")]
    cell_size: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a viewport to a PNG file.
    Render {
        #[command(flatten)]
        world: WorldArgs,

        /// Viewport left edge (world units).
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: i32,

        /// Viewport top edge (world units).
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: i32,

        /// Viewport width in pixels.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Viewport height in pixels.
        #[arg(long, default_value = "512")]
        height: u32,

        /// Hide layers (facet names, e.g. `elevation`).
        #[arg(long, value_delimiter = ',')]
        hide: Vec<String>,

        /// Show layers (facet names).
        #[arg(long, value_delimiter = ',')]
        show: Vec<String>,

        /// Fill graph triangles.
        #[arg(long)]
        show_tris: bool,

        /// Wash graph bounds.
        #[arg(long)]
        fill_bounds: bool,

        /// Do not draw graph edges.
        #[arg(long)]
        no_edges: bool,

        /// Do not draw graph corners.
        #[arg(long)]
        no_corners: bool,

        /// Do not draw cell sites.
        #[arg(long)]
        no_sites: bool,

        /// Do not outline graph bounds.
        #[arg(long)]
        no_bounds: bool,

        /// Render tiles on a single thread.
        #[arg(long)]
        serial: bool,

        /// Write the resulting layer state back to the configuration file.
        #[arg(long)]
        save_config: bool,

        /// Output PNG path.
        #[arg(short, long, default_value = "./view.png")]
        output: PathBuf,
    },

    /// Print what every visible layer reports at a world coordinate.
    Describe {
        #[command(flatten)]
        world: WorldArgs,

        #[arg(long, allow_hyphen_values = true)]
        x: i32,

        #[arg(long, allow_hyphen_values = true)]
        y: i32,
    },

    /// List layers in draw order with their controls and legends.
    Layers {
        #[command(flatten)]
        world: WorldArgs,
    },
}

/// Graph layer toggles requested on the command line.
struct GraphToggles {
    show_tris: bool,
    fill_bounds: bool,
    no_edges: bool,
    no_corners: bool,
    no_sites: bool,
    no_bounds: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            world,
            x,
            y,
            width,
            height,
            hide,
            show,
            show_tris,
            fill_bounds,
            no_edges,
            no_corners,
            no_sites,
            no_bounds,
            serial,
            save_config,
            output,
        } => run_render(
            &world,
            Rect2i::new(x, y, width, height),
            &hide,
            &show,
            &GraphToggles {
                show_tris,
                fill_bounds,
                no_edges,
                no_corners,
                no_sites,
                no_bounds,
            },
            serial,
            save_config,
            &output,
        ),
        Commands::Describe { world, x, y } => run_describe(&world, x, y),
        Commands::Layers { world } => run_layers(&world),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> ViewerConfig {
    match path {
        Some(path) if path.exists() => match fs::read_to_string(path) {
            Ok(json) => ViewerConfig::from_json_or_default(&json),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read configuration, using defaults");
                ViewerConfig::default()
            }
        },
        _ => ViewerConfig::default(),
    }
}

/// Builds the generator and the registry-default layers, then applies any
/// saved layer state.
fn build_world(world: &WorldArgs, config: &ViewerConfig) -> (NoiseWorldGenerator, LayerConfig) {
    let options = GeneratorOptions {
        cell_size: world.cell_size.max(1),
        ..Default::default()
    };
    let generator = NoiseWorldGenerator::with_options(&world.seed, options);
    let mut layers = LayerRegistry::with_defaults().build(&generator.all_facets());
    if let Some(state) = &config.layers {
        layers.apply_state(state);
    }
    (generator, layers)
}

#[allow(clippy::too_many_arguments)]
fn run_render(
    world: &WorldArgs,
    viewport: Rect2i,
    hide: &[String],
    show: &[String],
    toggles: &GraphToggles,
    serial: bool,
    save_config: bool,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    if viewport.is_empty() || viewport.width > 16384 || viewport.height > 16384 {
        return Err("Viewport size must be between 1 and 16384 pixels".into());
    }

    let mut config = load_config(world.config.as_deref());
    if serial {
        config.view.parallel = false;
    }
    let (generator, layers) = build_world(world, &config);
    let mut compositor = Compositor::new(generator, layers, config.view.clone())?;

    for facet in parse_facets(hide)? {
        compositor.set_layer_visible(facet, false)?;
    }
    for facet in parse_facets(show)? {
        compositor.set_layer_visible(facet, true)?;
    }
    if compositor.layers().contains(FacetType::Graph) {
        // Flags only ever override the saved state in the direction they name.
        let graph_controls = [
            ("show_tris", toggles.show_tris, true),
            ("fill_bounds", toggles.fill_bounds, true),
            ("show_edges", toggles.no_edges, false),
            ("show_corners", toggles.no_corners, false),
            ("show_sites", toggles.no_sites, false),
            ("show_bounds", toggles.no_bounds, false),
        ];
        for (name, requested, value) in graph_controls {
            if requested {
                compositor.set_layer_control(FacetType::Graph, name, ControlValue::Bool(value))?;
            }
        }
    }

    println!("Worldviewer - seed '{}'", world.seed);
    println!(
        "Viewport: {}x{} at ({}, {}), tile size {}",
        viewport.width, viewport.height, viewport.min_x, viewport.min_y, compositor.view().tile_size
    );
    let visible: Vec<&str> = compositor.layers().visible().map(|l| l.name()).collect();
    println!("Visible layers: {}", visible.join(", "));

    let start = Instant::now();
    let image = compositor.render(viewport)?;
    let stats = compositor.last_stats();
    println!(
        "Rendered {} tiles ({} reused) in {:.2?}",
        stats.tiles_rendered,
        stats.tiles_reused,
        start.elapsed()
    );
    if stats.tiles_failed > 0 {
        println!("  {} tiles failed and were left as background", stats.tiles_failed);
    }

    let bytes = encode_png(&image, &PngOptions::default())?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, &bytes)?;
    println!("Wrote {} ({} bytes)", output.display(), bytes.len());

    if save_config {
        match world.config.as_deref() {
            Some(path) => {
                config.layers = Some(compositor.layers().state());
                fs::write(path, config.to_json()?)?;
                println!("Saved configuration to {}", path.display());
            }
            None => eprintln!("Warning: --save-config needs --config <path>; nothing saved"),
        }
    }

    compositor.dispose()?;
    Ok(())
}

fn run_describe(world: &WorldArgs, x: i32, y: i32) -> Result<(), Box<dyn Error>> {
    let config = load_config(world.config.as_deref());
    let (generator, layers) = build_world(world, &config);
    let compositor = Compositor::new(generator, layers, config.view)?;

    let text = compositor.describe(x, y)?;
    println!("({}, {}):", x, y);
    if text.is_empty() {
        println!("  nothing to report");
    }
    for line in text.lines() {
        println!("  {}", line);
    }
    Ok(())
}

fn run_layers(world: &WorldArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(world.config.as_deref());
    let (_, layers) = build_world(world, &config);

    println!("Layers (draw order)");
    println!("===================");
    for (i, layer) in layers.iter().enumerate() {
        println!();
        println!("{}. {} [{}]", i + 1, layer.name(), layer.facet_type());
        for control in layer.controls() {
            println!("  {:<14} {:>8}  {}", control.name, control.value.to_string(), control.label);
        }
        let legend = layer.legend();
        if !legend.is_empty() {
            println!("  Legend:");
            for entry in legend {
                let c = entry.color;
                println!("    #{:02x}{:02x}{:02x}  {}", c.r, c.g, c.b, entry.key);
            }
        }
    }
    Ok(())
}
