use clap::Parser as _;
use modbus_fixture_tools::commands;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(clap::Parser)]
#[clap(version, about, author)]
enum Commands {
    Generate(commands::generate::Args),
    DataTypes(commands::data_types::Args),
}

fn end<E: std::error::Error>(r: Result<(), E>) {
    std::process::exit(match r {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            let mut cause = e.source();
            while let Some(e) = cause {
                eprintln!("  because: {e}");
                cause = e.source();
            }
            1
        }
    });
}

fn main() {
    let filter = match std::env::var("MODBUS_FIXTURE_TOOLS_LOG") {
        Ok(spec) => spec
            .parse::<tracing_subscriber::filter::targets::Targets>()
            .expect("could not parse MODBUS_FIXTURE_TOOLS_LOG as a tracing filter"),
        Err(_) => tracing_subscriber::filter::targets::Targets::new(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    match Commands::parse() {
        Commands::Generate(args) => end(commands::generate::run(args)),
        Commands::DataTypes(args) => end(commands::data_types::run(args)),
    }
}
