use clap::Parser;
use remortgage::api::{ApiResult, Cli, Command, run_compare_command, run_http_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> ApiResult<()> {
    match command {
        Command::Serve { host, port } => run_http_server(&host, port).await,
        Command::Compare { input, format } => {
            let output = run_compare_command(input.as_deref(), format)?;
            println!("{output}");
            Ok(())
        }
    }
}
