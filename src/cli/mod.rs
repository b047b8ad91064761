use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod backup;
pub mod init;
pub mod migrate;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Initialize the storage directory and database schema
    Init {},
    /// Migrate the db schema
    Migrate {},
    /// Run the API server and dashboard
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Copy the SQLite database to a timestamped backup file
    Backup {
        /// Directory to write the backup into, defaults to the storage path
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Command::Init {} => {
            init::run().await?;
        }
        Command::Migrate {} => {
            migrate::run().await?;
        }
        Command::Serve { host, port } => {
            serve::run(host, port).await;
        }
        Command::Backup { output } => {
            backup::run(output)?;
        }
    }

    Ok(())
}
