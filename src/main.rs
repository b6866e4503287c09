mod cli;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use skelgen_lib::{ProgressCallback, SkelError, SkeletonPipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    let file = match settings::load_file_config(args.config.as_deref()) {
        Ok(file) => file,
        Err(err) => return render_error(err),
    };
    let config = settings::build_config(&args, &raw_args, &file);

    if args.verbose {
        settings::log_effective_config(&config, args.config.as_deref());
    }

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => return render_error(SkelError::Io(err)),
    };

    let pipeline = match SkeletonPipeline::new(config, &base_dir) {
        Ok(pipeline) => pipeline,
        Err(err) => return render_error(err),
    };

    let progress: ProgressCallback = Arc::new(|message: &str| eprintln!("{message}"));
    let summary = match pipeline.with_progress(progress).start().await {
        Ok(summary) => summary,
        Err(err) => return render_error(err),
    };

    if let Some(session) = summary.session {
        eprintln!("browser left open for inspection; close it to finish");
        if let Err(err) = session.wait().await {
            return render_error(err);
        }
    }

    ExitCode::SUCCESS
}

fn render_error(err: SkelError) -> ExitCode {
    let payload = err.to_payload();
    eprintln!("error: {}", payload.message);
    if let Some(hint) = payload.remediation {
        eprintln!("hint: {hint}");
    }
    if err.is_validation() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}
