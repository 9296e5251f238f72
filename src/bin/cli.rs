use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

use scholaris::logging::init_console_logging;
use scholaris::modules::transition::{TransitionService, current_academic_year_now};
use scholaris::store::PgStore;
use scholaris_config::{DatabaseConfig, ObservabilityConfig, TransitionConfig};
use scholaris_db::{PgPool, init_db_pool, run_migrations};
use scholaris_models::{PreviewRow, TransitionResult};

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Academic-year administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Print the academic year of today's date
    CurrentYear,
    /// Show expected approvals per class without changing anything
    Preview {
        /// Academic year to preview (default: current academic year)
        #[arg(short = 'y', long)]
        year: Option<i32>,
    },
    /// Close an academic year and move students into the next one
    Run {
        /// Academic year to close (default: current academic year)
        #[arg(short = 'y', long)]
        year: Option<i32>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_console_logging(&ObservabilityConfig::from_env().log_level);

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::CurrentYear => {
            println!("{}", current_academic_year_now());
            Ok(())
        }
        Commands::Migrate => match connect().await {
            Ok(pool) => handle_migrate(&pool).await,
            Err(e) => Err(e),
        },
        Commands::Preview { year } => match connect().await {
            Ok(pool) => {
                handle_preview(&pool, year.unwrap_or_else(current_academic_year_now)).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Run { year, yes } => match connect().await {
            Ok(pool) => handle_run(&pool, year.unwrap_or_else(current_academic_year_now), yes).await,
            Err(e) => Err(e),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    init_db_pool(&DatabaseConfig::from_env()).await
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool).await?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_preview(pool: &PgPool, academic_year: i32) {
    let store = PgStore::new(pool.clone());
    let rows = TransitionService::new(&store, TransitionConfig::from_env())
        .transition_preview(academic_year)
        .await;

    print_preview(academic_year, &rows);
}

async fn handle_run(pool: &PgPool, academic_year: i32, yes: bool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let service = TransitionService::new(&store, TransitionConfig::from_env());

    if !yes {
        print_preview(academic_year, &service.transition_preview(academic_year).await);

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Move students from {} into {}?",
                academic_year,
                academic_year + 1
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Aborted, nothing was changed.");
            return Ok(());
        }
    }

    let result = service.execute_transition(academic_year).await;
    print_result(&result);

    if result.has_errors() && result.processed() == 0 {
        anyhow::bail!("transition did not process any student");
    }
    Ok(())
}

fn print_preview(academic_year: i32, rows: &[PreviewRow]) {
    println!("\n📋 Transition preview for {}", academic_year);
    if rows.is_empty() {
        println!("   No classes found.");
        return;
    }

    println!(
        "   {:<6} {:<30} {:>8} {:>9} {:>7}",
        "Class", "Course", "Students", "Approved", "Failed"
    );
    for row in rows {
        println!(
            "   {:<6} {:<30} {:>8} {:>9} {:>7}",
            row.class_name, row.course_name, row.total_students, row.approved, row.failed
        );
    }
}

fn print_result(result: &TransitionResult) {
    let icon = if result.has_errors() { "⚠️ " } else { "✅" };
    println!(
        "\n{} Transition {} -> {} finished",
        icon, result.source_academic_year, result.target_academic_year
    );
    println!("   Promoted:        {}", result.promoted);
    println!("   Retained:        {}", result.retained);
    println!("   Graduated:       {}", result.graduated);
    println!("   Classes created: {}", result.classes_created);

    if result.has_errors() {
        println!("\n   Errors ({}):", result.errors.len());
        for error in &result.errors {
            println!("   - {}", error);
        }
    }
}
