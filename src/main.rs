use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use mbox_archive::{BodyPreference, LoadOptions, RenderConfig, generate_archive};

/// Exit status when some pages could not be written.
const EXIT_PARTIAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "mbox-archive",
    version,
    about = "Generate a threaded static HTML archive from an mbox file"
)]
struct Args {
    /// Input mbox file.
    archive: PathBuf,

    /// Output directory for the HTML files (created when missing).
    outdir: PathBuf,

    /// Only archive messages whose To, Cc or Reply-To contains this address.
    #[arg(short, long)]
    list: Option<String>,

    /// Preferred body representation when a message offers alternatives.
    #[arg(long, value_name = "html|plain")]
    prefer: Option<BodyPreference>,

    /// Archive title shown on every page (overrides ARCHIVE_TITLE).
    #[arg(long)]
    title: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = RenderConfig::from_env();
    if let Some(prefer) = args.prefer {
        config.prefer = prefer;
    }
    if let Some(title) = args.title {
        config.title = title;
    }
    let options = LoadOptions {
        list_filter: args.list.filter(|needle| !needle.is_empty()),
    };

    log::info!(
        "archiving {} into {} (prefer {})",
        args.archive.display(),
        args.outdir.display(),
        config.prefer
    );

    let summary = match generate_archive(&args.archive, &args.outdir, &options, &config) {
        Ok(summary) => summary,
        // Covers a missing or non-regular archive path
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if !summary.render.is_complete() {
        eprintln!(
            "{} of {} messages failed to render:",
            summary.render.failures.len(),
            summary.render.failures.len() + summary.render.pages + summary.render.placeholders
        );
        for failure in &summary.render.failures {
            eprintln!("  {}: {}", failure.message_id, failure.error);
        }
        return ExitCode::from(EXIT_PARTIAL);
    }

    ExitCode::SUCCESS
}
