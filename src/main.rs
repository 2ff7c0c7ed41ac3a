use clap::Parser;

use rendezvous::cli::{Cli, Commands};
use rendezvous::config::{get_config, init_config};
use rendezvous::runtime::modes;
use rendezvous::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            // guard 必须存活到进程结束
            let _guard = init_logging(&config.logging)?;
            modes::run_server(&config).await
        }
        Some(command) => {
            let code = modes::run_cli(command).await;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
