use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mbox_archive::redact::redact_dir;

#[derive(Parser, Debug)]
#[command(
    name = "redact",
    about = "Hide phone area codes and e-mail domains in a generated archive"
)]
struct Args {
    /// Archive output directory to rewrite in place.
    #[arg(default_value = "out")]
    outdir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    match redact_dir(&args.outdir) {
        Ok(stats) => {
            log::info!("done: {} pages, {} vCards", stats.pages, stats.vcards);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
