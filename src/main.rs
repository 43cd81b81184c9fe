use anyhow::Result;
use clap::Parser;
use polyglot_mbr::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_mbr=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
