use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{ComplaintStatus, Engine};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "campuz_admin")]
#[command(about = "Admin utilities for Campuz (triage complaints, manage registries)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./campuz.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Complaint(Complaint),
    Category(Category),
    Location(Location),
    /// Print complaint totals and per-registry counts.
    Stats,
    /// Export all complaints to a CSV file.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct Complaint {
    #[command(subcommand)]
    command: ComplaintCommand,
}

#[derive(Subcommand, Debug)]
enum ComplaintCommand {
    List(ComplaintListArgs),
    Resolve(ComplaintIdArgs),
    Reopen(ComplaintIdArgs),
    Delete(ComplaintDeleteArgs),
}

#[derive(Args, Debug)]
struct ComplaintListArgs {
    /// Only show complaints with this status (pending or resolved).
    #[arg(long)]
    status: Option<String>,
    /// Only show complaints in this category.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct ComplaintIdArgs {
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct ComplaintDeleteArgs {
    #[arg(long)]
    id: String,
    /// Deletion removes images, comments and support rows with the complaint.
    #[arg(long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: RegistryCommand,
}

#[derive(Args, Debug)]
struct Location {
    #[command(subcommand)]
    command: RegistryCommand,
}

#[derive(Subcommand, Debug)]
enum RegistryCommand {
    List,
    Add(NameArgs),
    Rm(NameArgs),
}

#[derive(Args, Debug)]
struct NameArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output file path.
    #[arg(long, default_value = "complaints.csv")]
    out: std::path::PathBuf,
}

fn parse_status(raw: &str) -> Result<ComplaintStatus, String> {
    match raw {
        "pending" => Ok(ComplaintStatus::Pending),
        "resolved" => Ok(ComplaintStatus::Resolved),
        other => Err(format!("unsupported status: {other}")),
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[derive(Serialize)]
struct ExportRow {
    id: String,
    created_at: String,
    status: String,
    category: String,
    location: Option<String>,
    title: String,
    description: String,
    student_name: Option<String>,
    email: Option<String>,
    support_count: i64,
    comment_count: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Complaint(Complaint {
            command: ComplaintCommand::List(args),
        }) => {
            let status = match args.status.as_deref().map(parse_status).transpose() {
                Ok(status) => status,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            let complaints = engine.list_complaints().await?;
            for complaint in complaints {
                if let Some(status) = status {
                    if complaint.status != status {
                        continue;
                    }
                }
                if let Some(category) = &args.category {
                    if complaint.category != *category {
                        continue;
                    }
                }
                println!(
                    "{}  [{}]  {}  {}  (+{})",
                    complaint.id,
                    complaint.status.as_str(),
                    complaint.category,
                    complaint.title,
                    complaint.support_count
                );
            }
        }
        Command::Complaint(Complaint {
            command: ComplaintCommand::Resolve(args),
        }) => {
            engine
                .update_complaint_status(&args.id, ComplaintStatus::Resolved)
                .await?;
            println!("resolved complaint: {}", args.id);
        }
        Command::Complaint(Complaint {
            command: ComplaintCommand::Reopen(args),
        }) => {
            engine
                .update_complaint_status(&args.id, ComplaintStatus::Pending)
                .await?;
            println!("reopened complaint: {}", args.id);
        }
        Command::Complaint(Complaint {
            command: ComplaintCommand::Delete(args),
        }) => {
            if !args.yes {
                eprintln!("refusing to delete without --yes");
                std::process::exit(1);
            }
            engine.delete_complaint(&args.id).await?;
            println!("deleted complaint: {}", args.id);
        }
        Command::Category(Category { command }) => match command {
            RegistryCommand::List => {
                for name in engine.categories().await? {
                    println!("{name}");
                }
            }
            RegistryCommand::Add(args) => {
                if engine.add_category(&args.name).await? {
                    println!("added category: {}", args.name);
                } else {
                    eprintln!("category already exists: {}", args.name);
                    std::process::exit(1);
                }
            }
            RegistryCommand::Rm(args) => {
                if engine.delete_category(&args.name).await? {
                    println!("removed category: {}", args.name);
                } else {
                    eprintln!("no such category: {}", args.name);
                    std::process::exit(1);
                }
            }
        },
        Command::Location(Location { command }) => match command {
            RegistryCommand::List => {
                for name in engine.locations().await? {
                    println!("{name}");
                }
            }
            RegistryCommand::Add(args) => {
                if engine.add_location(&args.name).await? {
                    println!("added location: {}", args.name);
                } else {
                    eprintln!("location already exists: {}", args.name);
                    std::process::exit(1);
                }
            }
            RegistryCommand::Rm(args) => {
                if engine.delete_location(&args.name).await? {
                    println!("removed location: {}", args.name);
                } else {
                    eprintln!("no such location: {}", args.name);
                    std::process::exit(1);
                }
            }
        },
        Command::Stats => {
            let stats = engine.statistics().await?;
            println!("total: {}", stats.total);
            println!("pending: {}", stats.pending);
            println!("resolved: {}", stats.resolved);

            let mut by_category: Vec<_> = stats.by_category.into_iter().collect();
            by_category.sort();
            println!("by category:");
            for (name, count) in by_category {
                println!("  {name}: {count}");
            }

            let mut by_location: Vec<_> = stats.by_location.into_iter().collect();
            by_location.sort();
            println!("by location:");
            for (name, count) in by_location {
                println!("  {name}: {count}");
            }
        }
        Command::Export(args) => {
            let complaints = engine.list_complaints().await?;
            let count = complaints.len();

            let mut writer = csv::Writer::from_path(&args.out)?;
            for complaint in complaints {
                writer.serialize(ExportRow {
                    id: complaint.id,
                    created_at: complaint.created_at.to_rfc3339(),
                    status: complaint.status.as_str().to_string(),
                    category: complaint.category,
                    location: complaint.location,
                    title: complaint.title,
                    description: complaint.description,
                    student_name: complaint.student_name,
                    email: complaint.email,
                    support_count: complaint.support_count,
                    comment_count: complaint.comments.len(),
                })?;
            }
            writer.flush()?;

            println!("exported {count} complaints to {}", args.out.display());
        }
    }

    Ok(())
}
