use clap::{Parser, ValueEnum};
use migration::MigrationCommand;
use sea_orm::Database;

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Codebreak database migration tool")]
struct Args {
    /// Migration command to run
    command: String,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    /// Database type
    #[arg(
        short,
        long,
        value_enum,
        default_value = "postgres",
        help = "Database type: postgres, sqlite-file"
    )]
    db: Db,
}

fn must_var(name: &str) -> String {
    match std::env::var(name) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("❌ Required environment variable '{name}' is not set");
            std::process::exit(1);
        }
    }
}

/// Build the connection URL for the selected environment and database type.
///
/// Postgres URLs are assembled from the same environment variables the
/// backend uses; the migration runner always connects as the schema owner.
fn database_url(env: &Env, db: &Db) -> String {
    match db {
        Db::Postgres => {
            let host = std::env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = match env {
                Env::Prod => must_var("PROD_DB"),
                Env::Test => {
                    let name = must_var("TEST_DB");
                    if !name.ends_with("_test") {
                        eprintln!(
                            "❌ Test profile requires database name to end with '_test', got '{name}'"
                        );
                        std::process::exit(1);
                    }
                    name
                }
            };
            let user = must_var("CODEBREAK_OWNER_USER");
            let password = must_var("CODEBREAK_OWNER_PASSWORD");
            format!("postgresql://{user}:{password}@{host}:{port}/{db_name}")
        }
        Db::SqliteFile => {
            let path = must_var("SQLITE_DB_PATH");
            format!("sqlite://{path}?mode=rwc")
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let command = match args.command.as_str() {
        "up" => MigrationCommand::Up,
        "down" => MigrationCommand::Down,
        "fresh" => MigrationCommand::Fresh,
        "reset" => MigrationCommand::Reset,
        "refresh" => MigrationCommand::Refresh,
        "status" => MigrationCommand::Status,
        other => {
            eprintln!("❌ Unknown migration command '{other}'");
            eprintln!("Supported: up, down, fresh, reset, refresh, status");
            std::process::exit(2);
        }
    };

    let url = database_url(&args.env, &args.db);
    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration::migrate(&db, command).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}
