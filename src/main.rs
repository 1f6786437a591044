use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tablemerge::document::{load_result, save_result, TableDocument};
use tablemerge::utils::image_utils::{
    load_image, render_visualization, save_image, VisualizationStyle,
};
use tablemerge::{server, AppConfig, ConfidenceSummary};

#[derive(Parser, Debug)]
#[command(name = "tablemerge")]
#[command(about = "Reconciles table-cell detections with OCR text into per-cell table text")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge a cell-detection file with an OCR file
    Merge {
        #[arg(long)]
        cells: PathBuf,

        #[arg(long)]
        ocr: PathBuf,

        /// Output path; the result is printed to stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Source image for the visualization
        #[arg(long, requires = "visualization")]
        image: Option<PathBuf>,

        /// Where to write the visualization
        #[arg(long, requires = "image")]
        visualization: Option<PathBuf>,

        /// Font for visualization labels; a system font is tried when omitted
        #[arg(long, requires = "visualization")]
        font: Option<PathBuf>,
    },
    /// Print confidence statistics for a saved result
    Summary { result: PathBuf },
    /// Run the HTTP server
    Serve {
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablemerge=info,tower_http=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Merge {
            cells,
            ocr,
            output,
            config,
            image,
            visualization,
            font,
        } => {
            let config = load_config(config.as_deref())?;
            run_merge(
                &cells,
                &ocr,
                output.as_deref(),
                &config,
                image.as_deref().zip(visualization.as_deref()),
                font.as_deref(),
            )?;
        }
        Command::Summary { result } => run_summary(&result)?,
        Command::Serve { config } => {
            let config = load_config(config.as_deref())?;
            run_server(config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load_default()?,
    };
    Ok(config)
}

fn run_merge(
    cells: &Path,
    ocr: &Path,
    output: Option<&Path>,
    config: &AppConfig,
    visualization: Option<(&Path, &Path)>,
    font: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = TableDocument::from_files(cells, ocr)?;
    let result = document.merge(&config.merge);

    match output {
        Some(path) => {
            save_result(&result, path)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if let Some((image_path, visualization_path)) = visualization {
        let style = match font {
            Some(path) => VisualizationStyle::with_font_path(path)?,
            None => VisualizationStyle::with_system_font(),
        };
        let image = load_image(image_path)?;
        let canvas = render_visualization(&image, &result, &style);
        save_image(&canvas, visualization_path)?;
        tracing::info!("Visualization written to {}", visualization_path.display());
    }

    let metadata = &result.metadata;
    tracing::info!(
        "Cells: {} total, {} with text, {} empty",
        metadata.total_cells,
        metadata.cells_with_text,
        metadata.empty_cells
    );
    tracing::info!(
        "Text items: {} total, {} assigned, {} unassigned, {} spanning",
        metadata.total_text_items,
        metadata.assigned_text_items,
        metadata.unassigned_text,
        metadata.spanning_text_items
    );

    Ok(())
}

fn run_summary(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = load_result(path)?;
    let summary = ConfidenceSummary::from_result(&result);

    match summary.mean_text_confidence {
        Some(mean) => println!(
            "Average text confidence: {:.4} ({} texts)",
            mean, summary.text_count
        ),
        None => println!("Average text confidence: n/a (no texts)"),
    }
    match summary.mean_cell_score {
        Some(mean) => println!(
            "Average cell score: {:.4} ({} cells)",
            mean, summary.cell_count
        ),
        None => println!("Average cell score: n/a (no cells)"),
    }

    Ok(())
}

async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::var("TABLEMERGE_ADDR").unwrap_or_else(|_| config.host_url.to_string());

    let socket_addr: std::net::SocketAddr = addr.parse()?;

    server::start_server(socket_addr, config).await?;

    Ok(())
}
