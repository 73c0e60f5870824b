use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wbs_planner::config::Config;
use wbs_planner::store::PlanStore;
use wbs_planner::wbs::{render_gantt, render_tree, CalendarRange, Plan};
use wbs_planner::api;

#[derive(Parser)]
#[command(name = "wbs")]
#[command(about = "Work breakdown structure planner with kanban export")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the planner HTTP server
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print a plan file as a tree
    Render {
        /// Plan file (JSON)
        file: PathBuf,

        /// Also draw the schedule as a Gantt strip
        #[arg(short, long)]
        gantt: bool,
    },
    /// Print the tasks a plan file would export, as JSON
    Export {
        /// Plan file (JSON)
        file: PathBuf,

        /// Project name, overriding the one in the file
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Print the sample plan as JSON
    Sample {
        /// Calendar year of the sample
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Initialize tracing with output to stderr (for commands printing to stdout) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "wbs_planner=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout clean for rendered output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_plan(path: &Path) -> anyhow::Result<Plan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    let plan: Plan = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan file {}", path.display()))?;
    plan.calendar
        .validate()
        .context("Invalid calendar in plan file")?;
    Ok(plan)
}

async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting WBS planner on port {}", port);

    let store = PlanStore::in_memory().with_default_calendar(config.calendar);
    let app = api::create_router_with_cors(store, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("WBS planner listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let config = Config::load();

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.port);
            serve(config, port).await?;
        }
        Some(Commands::Render { file, gantt }) => {
            let plan = load_plan(&file)?;
            if !plan.project_title.is_empty() {
                println!("# {}", plan.project_title);
            }
            print!("{}", render_tree(plan.tree.nodes()));
            if gantt {
                println!();
                print!("{}", render_gantt(plan.tree.nodes(), &plan.calendar));
            }
        }
        Some(Commands::Export { file, project }) => {
            let mut plan = load_plan(&file)?;
            if let Some(project) = project {
                plan.project_title = project;
            }
            let tasks = plan.export()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Some(Commands::Sample { year }) => {
            let year = year.unwrap_or_else(|| chrono::Utc::now().year());
            let plan = Plan::sample(CalendarRange::new(year, 1, 3)?)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        None => {
            let port = config.port;
            serve(config, port).await?;
        }
    }

    Ok(())
}
