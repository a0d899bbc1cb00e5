use clap::Parser;
use sagavault::cli::{commands, output, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so stdout stays clean for `export`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::List => commands::list::execute(&cli),
        Commands::Show { index, reveal } => commands::show::execute(&cli, index, reveal),
        Commands::Add {
            ref fields,
            ref secrets,
        } => commands::add::execute(&cli, fields, secrets),
        Commands::Remove { index, force } => commands::remove::execute(&cli, index, force),
        Commands::Export { ref output } => commands::export::execute(&cli, output.as_deref()),
        Commands::Import { ref file } => commands::import_cmd::execute(&cli, file),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
