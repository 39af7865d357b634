//! Render a permit certificate from a JSON record
//!
//! Usage:
//!   cargo run --example render_certificate -p certificate -- record.json \
//!       [--config engine.json] [--overlay template.pdf|template.png] [--out dir]
//!
//! Set `RUST_LOG=debug` to follow composition and asset loading.

use anyhow::{bail, Context, Result};
use certificate::{CertificateEngine, EngineConfig, PermitRecord, TemplateBackground};
use std::path::{Path, PathBuf};

struct Args {
    record: PathBuf,
    config: Option<PathBuf>,
    overlay: Option<PathBuf>,
    out: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut record = None;
    let mut config = None;
    let mut overlay = None;
    let mut out = PathBuf::from("output");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context("--config needs a path")?.into()),
            "--overlay" => overlay = Some(args.next().context("--overlay needs a path")?.into()),
            "--out" => out = args.next().context("--out needs a directory")?.into(),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => record = Some(PathBuf::from(path)),
        }
    }

    Ok(Args {
        record: record.context("usage: render_certificate <record.json> [--config ..] [--overlay ..]")?,
        config,
        overlay,
        out,
    })
}

fn background(path: &Path) -> Result<TemplateBackground> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    Ok(if is_pdf {
        TemplateBackground::Pdf(data)
    } else {
        TemplateBackground::Image(data)
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = CertificateEngine::new(config);

    let json = std::fs::read_to_string(&args.record)
        .with_context(|| format!("reading {}", args.record.display()))?;
    let record = PermitRecord::from_json(&json)?;

    let certificate = match &args.overlay {
        Some(path) => engine.generate_overlay(&record, &background(path)?)?,
        None => engine.generate(&record)?,
    };

    std::fs::create_dir_all(&args.out)?;
    let path = args.out.join(&certificate.filename);
    std::fs::write(&path, &certificate.pdf)?;

    println!(
        "Wrote {} certificate to {} ({} bytes)",
        certificate.category,
        path.display(),
        certificate.pdf.len()
    );
    Ok(())
}
