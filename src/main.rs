use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use webp_squeeze::cli::{Args, Commands};
use webp_squeeze::report::{print_batch_summary, print_retrieval_summary, print_scan};
use webp_squeeze::selection::{accept_candidates, gather_candidates, IdAllocator};
use webp_squeeze::{
    logger, retrieve_all, status, ConsoleProgressReporter, ConversionOptions, DirectorySink,
    RasterCodec, RetrievalOptions, Session, TargetFormat,
};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Convert {
            inputs,
            output,
            quality,
            format,
            recursive,
            delay_ms,
        } => {
            let options = ConversionOptions::new(quality, format.as_deref())?;
            convert(&inputs, output, options, recursive, delay_ms)?;
        }
        Commands::Scan {
            inputs,
            format,
            recursive,
        } => {
            let format = match format {
                Some(name) => TargetFormat::from_str(&name)?,
                None => TargetFormat::default(),
            };
            let candidates = gather_candidates(&inputs, recursive)?;
            let selection = accept_candidates(candidates, format, &mut IdAllocator::new());
            print_scan(&selection, format);
        }
    }

    Ok(())
}

fn convert(
    inputs: &[String],
    output: PathBuf,
    options: ConversionOptions,
    recursive: bool,
    delay_ms: u64,
) -> Result<()> {
    status!("🚀 Starting batch conversion...");
    status!("📁 Output: {:?}", output);
    status!("⚙️  {} at quality {}", options.format, options.quality);

    let start_time = Instant::now();

    let candidates = gather_candidates(inputs, recursive)?;
    let mut session = Session::new(RasterCodec::new(), options);
    let selection = session.add_files(candidates);

    if session.items().is_empty() {
        status!(
            "⚠️  No convertible images found ({} file(s) skipped)",
            selection.rejected.len()
        );
        return Ok(());
    }

    status!(
        "📊 Found {} image(s) to convert, {} skipped",
        session.items().len(),
        selection.rejected.len()
    );

    let sink = DirectorySink::new(&output)
        .with_context(|| format!("cannot use output directory {:?}", output))?;

    // Ctrl-C stops the batch before the next file; finished files are still saved
    let cancel = session.cancel_token();
    ctrlc::set_handler(move || cancel.cancel()).context("failed to install Ctrl-C handler")?;

    let reporter = if logger::is_quiet() {
        ConsoleProgressReporter::hidden()
    } else {
        ConsoleProgressReporter::new()
    };

    match session.run(&reporter).cloned() {
        Some(stats) => print_batch_summary(&stats, session.failures(), start_time.elapsed()),
        None => {
            let progress = session.progress();
            status!(
                "⚠️  Cancelled after {}/{} file(s), {} converted",
                progress.processed,
                progress.total,
                session.results().len()
            );
        }
    }

    let report = retrieve_all(
        &sink,
        session.results(),
        &RetrievalOptions::with_delay_ms(delay_ms),
    );
    print_retrieval_summary(&report, sink.dir());

    Ok(())
}
