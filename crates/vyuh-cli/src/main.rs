//! Vyuh Terminal Front-End
//!
//! Drives the crew-launch workflow against a running backend: list the
//! agent catalog, assemble a crew, launch it on a topic, and follow the
//! result to completion.
//!
//! ```text
//! vyuh agents
//! vyuh launch "the future of content creation" researcher writer
//! ```

use std::sync::Arc;

use anyhow::bail;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vyuh_client::HttpCrewApi;
use vyuh_core::{CrewWorkflow, Identity, LaunchOutcome, PollEnd, display_name};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let api = Arc::new(HttpCrewApi::from_env());
    tracing::info!(backend = %api.base_url(), "connecting to backend");

    let identity = match std::env::var("VYUH_USER") {
        Ok(user) => Identity::user(user),
        Err(_) => Identity::Guest,
    };
    let workflow = CrewWorkflow::new(api, identity);

    match command {
        "agents" => {
            load_and_print_catalog(&workflow).await?;
        }
        "launch" => {
            let Some(topic) = args.get(1) else {
                bail!("usage: vyuh launch <topic> <agent-id>...");
            };
            let agent_ids = &args[2..];
            if agent_ids.is_empty() {
                bail!("usage: vyuh launch <topic> <agent-id>...");
            }
            run_launch(&workflow, topic, agent_ids).await?;
        }
        other => {
            bail!("unknown command '{}'; try 'agents' or 'launch'", other);
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Vyuh crew builder");
    println!();
    println!("Usage:");
    println!("  vyuh agents                          list the agent catalog");
    println!("  vyuh launch <topic> <agent-id>...    launch a crew on a topic");
    println!();
    println!("Environment:");
    println!("  VYUH_BACKEND_URL   backend base URL (default http://localhost:8000)");
    println!("  VYUH_USER          signed-in user id; launching requires one");
}

async fn load_and_print_catalog(workflow: &CrewWorkflow) -> anyhow::Result<()> {
    workflow.load_catalog().await?;

    let state = workflow.catalog();
    let Some(catalog) = state.catalog() else {
        bail!("catalog unavailable");
    };

    println!("Available agents:");
    for (id, agent) in catalog {
        println!("  {:<12} {} ({})", id, display_name(id), agent.role);
        println!("  {:<12} goal: {}", "", agent.goal);
    }
    Ok(())
}

async fn run_launch(
    workflow: &CrewWorkflow,
    topic: &str,
    agent_ids: &[String],
) -> anyhow::Result<()> {
    workflow.load_catalog().await?;

    {
        let state = workflow.catalog();
        let Some(catalog) = state.catalog() else {
            bail!("catalog unavailable");
        };
        for id in agent_ids {
            if !catalog.contains_key(id) {
                bail!("unknown agent '{}'; run 'vyuh agents' to see the catalog", id);
            }
        }
    }

    for id in agent_ids {
        workflow.toggle(id);
    }
    workflow.set_topic(topic);

    tracing::info!(crew = ?agent_ids, topic = %topic, "launching crew");

    match workflow.launch().await? {
        LaunchOutcome::Ready(text) => {
            print_result(&workflow.session().map(|s| s.to_string()), &text);
        }
        LaunchOutcome::Deferred(session) => {
            tracing::info!(session = %session, "execution deferred; polling for the result");
            println!("Executing crew... this may take a few moments (Ctrl-C to abandon).");

            // Ctrl-C tears the workflow down, which cancels the poll timer
            let end = tokio::select! {
                end = workflow.wait_for_result() => end?,
                _ = tokio::signal::ctrl_c() => {
                    workflow.reset();
                    PollEnd::Cancelled
                }
            };

            match end {
                PollEnd::Resolved(text) => {
                    print_result(&Some(session.to_string()), &text);
                }
                PollEnd::Cancelled => {
                    println!("Launch abandoned.");
                }
            }
        }
    }

    Ok(())
}

fn print_result(session: &Option<String>, text: &str) {
    println!();
    println!("=== Crew Execution Result ===");
    if let Some(session) = session {
        println!("Session: {}", session);
    }
    println!();
    println!("{}", text);
}
