use clap::Parser;
use formwidgets::cli::commands::Cli;
use formwidgets::cli::handlers;

fn setup_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("FW_LOG").unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("formwidgets=warn"),
        1 => EnvFilter::new("formwidgets=debug,info"),
        _ => EnvFilter::new("formwidgets=trace,debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
