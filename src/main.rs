use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use pdfsign::{
    init_logging, init_logging_json, Config, FileSink, LopdfMutator, LopdfRenderer, OutputSink,
    SessionOptions, ShareOutcome, SignatureAsset, SigningSession, StrokeScript, BUILD_DATE,
    VERSION,
};
use pdfsign_document::PDF_MEDIA_TYPE;
use tracing::{info, warn};

/// Place a signature on a PDF page and write a signed copy.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source PDF
    input: PathBuf,

    /// Signature image (PNG/JPEG) or stroke script (.json)
    signature: PathBuf,

    /// Page to sign, 1-based
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Left edge of the signature in PDF points
    #[arg(long, requires = "y")]
    x: Option<f64>,

    /// Bottom edge of the signature in PDF points
    #[arg(long, requires = "x")]
    y: Option<f64>,

    /// Signature width in PDF points
    #[arg(short, long)]
    width: Option<f64>,

    /// Output path (default: signed_<input name> next to the input)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Config file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replace the output file if it exists
    #[arg(long)]
    force: bool,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("reading config {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Ok(Config::load_or_default(&path)?),
            Err(e) => {
                warn!("{}; using default settings", e);
                Ok(Config::default())
            }
        },
    }
}

async fn load_signature(path: &Path, config: &Config) -> anyhow::Result<SignatureAsset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading signature {}", path.display()))?;

    let is_script = path.extension().is_some_and(|ext| ext == "json");
    let asset = if is_script {
        let text = String::from_utf8(bytes).context("stroke script is not UTF-8")?;
        StrokeScript::from_json(&text)?.to_asset(&config.capture)?
    } else {
        SignatureAsset::from_image_bytes(&bytes)?
    };
    Ok(asset)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.json_logs {
        init_logging_json()?;
    } else {
        init_logging()?;
    }
    info!("pdfsign {} ({})", VERSION, BUILD_DATE);

    let config = load_config(args.config.as_deref())?;
    let source = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("reading {}", args.input.display()))?;
    let name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let media_type = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        .then_some(PDF_MEDIA_TYPE);

    let mut session = SigningSession::new(
        LopdfRenderer::new(),
        LopdfMutator::new(),
        SessionOptions::from_config(&config),
    );
    session.load_document(source, &name, media_type).await?;

    let page_count = session.navigator().map_or(0, |n| n.page_count());
    if args.page < 1 || args.page > page_count {
        bail!("page {} out of range (document has {} pages)", args.page, page_count);
    }
    session.go_to_page(args.page).await?;

    let asset = load_signature(&args.signature, &config).await?;
    session.set_signature(asset)?;

    if args.x.is_some() || args.width.is_some() {
        let current = session.document_rect()?;
        let x = args.x.unwrap_or(current.x);
        let y = args.y.unwrap_or(current.y);
        let width = args.width.unwrap_or(current.width);
        if !session.place_in_document_space(x, y, width)? {
            bail!(
                "signature at ({}, {}) with width {} does not fit on page {}",
                x,
                y,
                width,
                args.page
            );
        }
    }

    let committed = session.finish().await?;
    info!("Signature placed at {}", committed.rect());

    let target = match args.out {
        Some(path) => path,
        None => args.input.with_file_name(committed.filename()),
    };
    match FileSink::new(target).overwrite(args.force).deliver(&committed)? {
        ShareOutcome::Delivered { location } => println!("{}", location),
        ShareOutcome::Cancelled => {
            eprintln!("Output exists; pass --force to replace it");
        }
    }
    Ok(())
}
