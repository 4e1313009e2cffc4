//! Slicer CLI - Command-line interface for the slicer library
//!
//! Usage:
//!   slicer-cli slice <input.stl> -o <output.gcode> [options]
//!   slicer-cli slice <input.stl> --format svg --per-layer -o layers/
//!   slicer-cli slice <input.stl> --config my_config.json
//!   slicer-cli info <input.stl>

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use slicer::config::PrintConfig;
use slicer::export::SvgWriter;
use slicer::geometry::Point3;
use slicer::infill::InfillPattern;
use slicer::mesh::{load_stl, Axis, Model};
use slicer::pipeline::{PipelineConfig, PrintPipeline};
use std::path::PathBuf;

/// Slices triangle meshes into layer contours, infill and G-code
#[derive(Parser, Debug)]
#[command(name = "slicer-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Marlin-flavoured G-code
    Gcode,
    /// SVG drawing of contours and infill
    Svg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PatternArg {
    /// X sweep then Y sweep on every layer
    CrossHatch,
    /// One sweep per layer, alternating direction
    Rectilinear,
}

impl From<PatternArg> for InfillPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::CrossHatch => InfillPattern::CrossHatch,
            PatternArg::Rectilinear => InfillPattern::Rectilinear,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Slice an STL file and write G-code or SVG
    Slice {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (a directory with --per-layer)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "gcode")]
        format: OutputFormat,

        /// Write one SVG file per layer
        #[arg(long)]
        per_layer: bool,

        /// Print configuration file (JSON format); flags below override it
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Layer height in mm
        #[arg(long)]
        layer_height: Option<f64>,

        /// First layer height in mm
        #[arg(long)]
        first_layer_height: Option<f64>,

        /// Infill density (0-100)
        #[arg(long)]
        infill_density: Option<u32>,

        /// Infill pattern
        #[arg(long, value_enum)]
        infill_pattern: Option<PatternArg>,

        /// Nozzle diameter in mm
        #[arg(long)]
        nozzle: Option<f64>,

        /// Filament diameter in mm
        #[arg(long)]
        filament_diameter: Option<f64>,

        /// Translate the model by X,Y,Z mm (implies --keep-position)
        #[arg(long, value_name = "X,Y,Z", value_parser = parse_vector, allow_hyphen_values = true)]
        translate: Option<Point3>,

        /// Rotate the model about X (degrees)
        #[arg(long, allow_hyphen_values = true)]
        rotate_x: Option<f64>,

        /// Rotate the model about Y (degrees)
        #[arg(long, allow_hyphen_values = true)]
        rotate_y: Option<f64>,

        /// Rotate the model about Z (degrees)
        #[arg(long, allow_hyphen_values = true)]
        rotate_z: Option<f64>,

        /// Do not center the model on the bed
        #[arg(long)]
        keep_position: bool,

        /// Number of threads to use (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,
    },

    /// Show information about an STL file
    Info {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

/// Options of the `slice` command.
#[derive(Debug)]
struct SliceArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    per_layer: bool,
    config: Option<PathBuf>,
    layer_height: Option<f64>,
    first_layer_height: Option<f64>,
    infill_density: Option<u32>,
    infill_pattern: Option<PatternArg>,
    nozzle: Option<f64>,
    filament_diameter: Option<f64>,
    translate: Option<Point3>,
    rotate: [Option<f64>; 3],
    keep_position: bool,
    threads: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Slice {
            input,
            output,
            format,
            per_layer,
            config,
            layer_height,
            first_layer_height,
            infill_density,
            infill_pattern,
            nozzle,
            filament_diameter,
            translate,
            rotate_x,
            rotate_y,
            rotate_z,
            keep_position,
            threads,
        } => cmd_slice(SliceArgs {
            input,
            output,
            format,
            per_layer,
            config,
            layer_height,
            first_layer_height,
            infill_density,
            infill_pattern,
            nozzle,
            filament_diameter,
            translate,
            rotate: [rotate_x, rotate_y, rotate_z],
            keep_position,
            threads,
        }),
        Commands::Info { input } => cmd_info(input),
    }
}

/// Parse `X,Y,Z` into a vector.
fn parse_vector(s: &str) -> std::result::Result<Point3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected X,Y,Z, got '{}'", s));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", part, e))?;
    }
    Ok(Point3::new(values[0], values[1], values[2]))
}

/// Assemble the print configuration: file first, then command-line overrides.
fn build_print_config(args: &SliceArgs) -> Result<PrintConfig> {
    let mut print = match &args.config {
        Some(path) => {
            info!("Loading print config from: {}", path.display());
            PrintConfig::from_json_file(path).context("Failed to load print config file")?
        }
        None => PrintConfig::default(),
    };

    if let Some(h) = args.layer_height {
        print = print.layer_height(h);
        if args.first_layer_height.is_none() && args.config.is_none() {
            print = print.first_layer_height(h);
        }
    }
    if let Some(h) = args.first_layer_height {
        print = print.first_layer_height(h);
    }
    if let Some(density) = args.infill_density {
        if density > 100 {
            bail!("Infill density must be within 0-100, got {}", density);
        }
        print = print.infill_density(f64::from(density) / 100.0);
    }
    if let Some(pattern) = args.infill_pattern {
        print = print.infill_pattern(pattern.into());
    }
    if let Some(d) = args.nozzle {
        print = print.nozzle_diameter(d);
    }
    if let Some(d) = args.filament_diameter {
        print = print.filament_diameter(d);
    }
    if args.keep_position || args.translate.is_some() {
        print = print.keep_position();
    }

    print.validate().context("Invalid print configuration")?;
    Ok(print)
}

/// Apply the requested rotations (X, then Y, then Z) and translation.
fn transform_model(model: &mut Model, args: &SliceArgs) {
    for (axis, angle) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(args.rotate) {
        if let Some(degrees) = angle {
            info!("Rotating {:?} by {:.1}°", axis, degrees);
            model.rotate(axis, degrees);
        }
    }
    if let Some(offset) = args.translate {
        info!("Translating by {}", offset);
        model.translate(offset);
    }
}

fn cmd_slice(args: SliceArgs) -> Result<()> {
    info!("Loading STL file: {}", args.input.display());

    // Set thread count if specified
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    // Create progress bar
    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    progress.set_message("Loading mesh...");
    progress.set_position(5);

    let mut model = load_stl(&args.input).context("Failed to load STL file")?;
    info!("Mesh loaded:");
    info!("  Facets: {}", model.facet_count());
    transform_model(&mut model, &args);
    let bb = model.bounding_box();
    info!(
        "  Bounding box: ({:.2}, {:.2}, {:.2}) - ({:.2}, {:.2}, {:.2})",
        bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z
    );

    progress.set_message("Configuring pipeline...");
    progress.set_position(10);

    let print = build_print_config(&args)?;
    info!("  Layer height: {} mm", print.layer_height);
    info!("  Infill: {} at {:.0}%", print.infill_pattern, print.infill_density * 100.0);
    let pipeline = PrintPipeline::new(PipelineConfig::from_print_config(print));

    let processed = pipeline
        .process_with_callback(&model, |stage, stage_progress| {
            let (base, range, message) = match stage {
                "preparing" => (10, 5, "Preparing model..."),
                "slicing" => (15, 50, "Slicing layers..."),
                "toolpaths" => (65, 25, "Generating toolpaths..."),
                _ => (10, 10, "Processing..."),
            };
            progress.set_position(base + (stage_progress * f64::from(range)) as u64);
            progress.set_message(message);
        })
        .context("Slicing failed")?;

    progress.set_message("Writing output...");
    progress.set_position(90);

    let output_path = match args.format {
        OutputFormat::Gcode => {
            let path = args
                .output
                .unwrap_or_else(|| args.input.with_extension("gcode"));
            let gcode = processed.to_gcode();
            gcode
                .write_to_file(&path)
                .context("Failed to write G-code file")?;
            info!("  G-code lines: {}", gcode.line_count());
            path
        }
        OutputFormat::Svg if args.per_layer => {
            let dir = args
                .output
                .unwrap_or_else(|| args.input.with_extension(""));
            let stem = args
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("layer");
            let files = SvgWriter::new()
                .write_layer_files(&processed.layers, &dir, stem)
                .context("Failed to write SVG files")?;
            info!("  SVG files: {}", files.len());
            dir
        }
        OutputFormat::Svg => {
            let path = args.output.unwrap_or_else(|| args.input.with_extension("svg"));
            SvgWriter::new()
                .write_to_file(&processed.layers, &path)
                .context("Failed to write SVG file")?;
            path
        }
    };

    progress.set_position(100);
    progress.finish_with_message("Done!");

    let stats = &processed.stats;
    println!();
    println!("Slicing complete!");
    println!("  Output: {}", output_path.display());
    println!("  Layers: {}", processed.layer_count());
    println!("  Contours: {}", processed.contour_count());
    if stats.degenerate_contours > 0 || stats.stitch.ambiguous_stitches > 0 {
        println!(
            "  Warnings: {} degenerate contours, {} ambiguous stitches",
            stats.degenerate_contours, stats.stitch.ambiguous_stitches
        );
    }
    println!(
        "  Filament used: {:.2} m ({:.2} g)",
        processed.filament.filament_length_m(),
        processed.filament.filament_weight_g
    );

    Ok(())
}

fn cmd_info(input: PathBuf) -> Result<()> {
    info!("Loading STL file: {}", input.display());

    let model = load_stl(&input).context("Failed to load STL file")?;

    let bb = model.bounding_box();
    let size = bb.size();

    println!("Mesh Information:");
    println!("  File: {}", input.display());
    println!("  Name: {}", model.name());
    println!("  Facets: {}", model.facet_count());
    if bb.is_empty() {
        println!("  Bounding box: empty");
        return Ok(());
    }
    println!("  Bounding box:");
    println!(
        "    Min: ({:.3}, {:.3}, {:.3}) mm",
        bb.min.x, bb.min.y, bb.min.z
    );
    println!(
        "    Max: ({:.3}, {:.3}, {:.3}) mm",
        bb.max.x, bb.max.y, bb.max.z
    );
    println!("    Size: {:.3} x {:.3} x {:.3} mm", size.x, size.y, size.z);

    // Estimate layer count at common layer heights
    println!("  Estimated layers:");
    for lh in [0.1, 0.2, 0.3] {
        let layers = (size.z / lh).ceil() as u32;
        println!("    At {:.1}mm layer height: {} layers", lh, layers);
    }

    Ok(())
}
