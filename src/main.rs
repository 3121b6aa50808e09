use clap::Parser;
use ezpass::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => ezpass::cli::commands::init::execute(&cli),
        Commands::Generate {
            ref service,
            ref username,
            ref policy,
            copy,
            show,
        } => ezpass::cli::commands::generate::execute(&cli, service, username, policy, copy, show),
        Commands::Add {
            ref service,
            ref username,
            ref notes,
            ref secret,
        } => ezpass::cli::commands::add::execute(
            &cli,
            service,
            username,
            notes.as_deref(),
            secret.as_deref(),
        ),
        Commands::Get {
            ref service,
            ref username,
            show,
        } => ezpass::cli::commands::get::execute(&cli, service, username, show),
        Commands::List => ezpass::cli::commands::list::execute(&cli),
        Commands::Update {
            ref service,
            ref username,
            ref secret,
        } => ezpass::cli::commands::update::execute(&cli, service, username, secret.as_deref()),
        Commands::Delete {
            ref service,
            ref username,
            force,
        } => ezpass::cli::commands::delete::execute(&cli, service, username, force),
        Commands::Pwgen { ref policy } => ezpass::cli::commands::pwgen::execute(policy),
        Commands::Completions { ref shell } => ezpass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        ezpass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
