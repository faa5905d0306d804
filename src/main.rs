use clap::Parser;
use homeshelf::cli::{
    handle_completions, handle_config_init, ping, serve, services, Cli, Commands,
    ConfigCommands, ServicesCommands,
};
use homeshelf::reachability::ReachabilityChecker;

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve(args) => serve::run_serve(args).await,
        Commands::Services(cmd) => {
            let output = match cmd {
                ServicesCommands::List(args) => {
                    let shelf = serve::mount_shelf(&serve::load_config(&args.config)?)?;
                    services::handle_services_list(&args, &shelf).await?
                }
                ServicesCommands::Add(args) => {
                    let shelf = serve::mount_shelf(&serve::load_config(&args.config)?)?;
                    services::handle_services_add(&args, &shelf).await?
                }
                ServicesCommands::Remove(args) => {
                    let shelf = serve::mount_shelf(&serve::load_config(&args.config)?)?;
                    services::handle_services_remove(&args, &shelf).await?
                }
            };
            println!("{}", output);
            Ok(())
        }
        Commands::Ping(args) => {
            let config = serve::load_config(&args.config)?;
            let checker = ReachabilityChecker::from_config(&config.reachability);
            let output = ping::handle_ping(&args.url, &checker).await?;
            println!("{}", output);
            Ok(())
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => {
                println!("{}", handle_config_init(&args)?);
                Ok(())
            }
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
