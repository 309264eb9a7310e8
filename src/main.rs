use clap::Parser;
use prepify::{EngineConfig, EngineError, PaginationDirector, PaperBundle, RecordedDocument};
use prepify_render_core::DrawCommand;
use std::fs;
use std::path::PathBuf;

/// Render an exam paper bundle (paper, questions, settings) to PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with `paper`, `questions` and `settings`
    bundle: PathBuf,

    /// Output file; defaults to the paper's slug in --out-dir
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for the generated file
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Engine configuration JSON (page size, margins, fonts, colours, watermark)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the laid-out pages instead of writing a PDF
    #[arg(long, default_value_t = false)]
    record: bool,
}

fn print_summary(document: &RecordedDocument) {
    for (index, commands) in document.pages.iter().enumerate() {
        println!("--- page {} ({} commands) ---", index + 1, commands.len());
        for command in commands {
            match command {
                DrawCommand::Text { lines, x, y, .. } => {
                    println!("  text  @({:>6.1}, {:>6.1}) {}", x, y, lines.join(" / "))
                }
                DrawCommand::Rect { rect, .. } => println!(
                    "  rect  @({:>6.1}, {:>6.1}) {:.1} x {:.1}",
                    rect.x, rect.y, rect.width, rect.height
                ),
                DrawCommand::Line { from, to, .. } => println!(
                    "  line  ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                    from.x, from.y, to.x, to.y
                ),
            }
        }
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("prepify=info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let bundle: PaperBundle = serde_json::from_str(&fs::read_to_string(&args.bundle)?)?;
    log::info!(
        "Loaded '{}' with {} question(s) from {}",
        bundle.paper.title,
        bundle.questions.len(),
        args.bundle.display()
    );

    let director = PaginationDirector::new(config)?;

    if args.record {
        let rendered = director.record(&bundle)?;
        print_summary(&rendered.document);
        return Ok(());
    }

    let rendered = director.render_pdf(&bundle)?;
    let path = args
        .output
        .unwrap_or_else(|| args.out_dir.join(&rendered.file_name));
    fs::write(&path, &rendered.document)?;
    log::info!("Wrote {} ({} bytes)", path.display(), rendered.document.len());
    Ok(())
}
