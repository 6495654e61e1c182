//! `filial`: command-line client for the directory server.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use filial_client::DirectoryClient;

/// Filial directory CLI.
#[derive(Parser, Debug)]
#[command(name = "filial", about = "Organizational directory client")]
struct Cli {
    /// Server base URL.
    #[arg(long, global = true, env = "FILIAL_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the branch hierarchy.
    Tree,

    /// List employees, optionally under a branch subtree and filtered.
    Employees {
        /// Branch id; includes every descendant branch.
        #[arg(long)]
        branch: Option<i64>,
        /// Case-insensitive name substring.
        #[arg(long, default_value = "")]
        search: String,
        /// Exact position id.
        #[arg(long, default_value = "")]
        position: String,
    },

    /// List positions.
    Positions,

    /// Add an employee.
    AddEmployee {
        #[arg(long = "name")]
        full_name: String,
        #[arg(long)]
        birth_date: NaiveDate,
        #[arg(long)]
        position: i64,
        #[arg(long)]
        branch: i64,
        #[arg(long)]
        salary: f64,
        #[arg(long)]
        hire_date: NaiveDate,
    },

    /// Delete an employee.
    DeleteEmployee {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Create a branch.
    AddBranch {
        name: String,
        /// Parent branch id (omit for a root branch).
        #[arg(long)]
        parent: Option<i64>,
    },

    /// Re-parent a branch.
    MoveBranch {
        id: i64,
        /// New parent id (omit to move to the root level).
        #[arg(long)]
        parent: Option<i64>,
    },

    /// Create a position.
    AddPosition { name: String },

    /// Show version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.output == "json";
    let client = DirectoryClient::new(&cli.server);

    match cli.command {
        Commands::Tree => commands::browse::tree(client, json).await?,
        Commands::Employees {
            branch,
            search,
            position,
        } => commands::browse::employees(client, branch, search, position, json).await?,
        Commands::Positions => commands::browse::positions(client, json).await?,
        Commands::AddEmployee {
            full_name,
            birth_date,
            position,
            branch,
            salary,
            hire_date,
        } => {
            let employee = directory::model::NewEmployee {
                full_name,
                birth_date,
                position_id: position,
                branch_id: branch,
                salary,
                hire_date,
            };
            commands::employee::add(client, &employee, json).await?;
        }
        Commands::DeleteEmployee { id, yes } => {
            if !yes {
                eprint!("Delete employee {}? [y/N]: ", id);
                let mut s = String::new();
                std::io::stdin().read_line(&mut s)?;
                if !s.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            commands::employee::delete(client, id).await?;
        }
        Commands::AddBranch { name, parent } => {
            commands::catalog::add_branch(&client, &name, parent, json).await?
        }
        Commands::MoveBranch { id, parent } => {
            commands::catalog::move_branch(&client, id, parent, json).await?
        }
        Commands::AddPosition { name } => commands::catalog::add_position(&client, &name, json).await?,
        Commands::Version => println!("filial cli v{}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
