use clap::Parser;
use tracing::Level;
use twin_parser::{check, handle_query_command, Cli, Commands, Query};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let level = if cli.command.verbose() { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Spread(args) => handle_query_command(Query::Spread, args).await?,
        Commands::Hover(args) => handle_query_command(Query::Hover(args.position), args.query).await?,
        Commands::Suggest(args) => {
            handle_query_command(Query::Suggest(args.position), args.query).await?
        }
        Commands::Check(args) => match check(&args) {
            Ok(report) => {
                if args.output.is_none() {
                    println!("{}", report.to_pretty_json()?);
                }
                eprintln!(
                    "Checked {} files: {} findings",
                    report.metadata.files_checked, report.metadata.findings
                );
                if report.has_findings() {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
    }

    Ok(())
}
