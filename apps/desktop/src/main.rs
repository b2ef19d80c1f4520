use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    HttpRoutesApi, PreparedRouteFetcher, RouteDownloadCoordinator, RoutePreview, SelectOutcome,
    StaticToken, WorkflowController,
};
use shared::domain::RouteId;
use tracing_subscriber::EnvFilter;

mod collaborators;
mod config;

use collaborators::{FileActiveRouteStore, TerminalNavigator};
use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "cargo-picker", about = "Choose a prepared route or start manual sorting")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the routes prepared for this driver.
    List,
    /// Download a prepared route and make it the active route.
    Download { route_id: String },
    /// Skip prepared routes and sort the cargo manually.
    Manual,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.server_url {
        settings.api_base_url = url;
    }
    if let Some(token) = cli.token {
        settings.auth_token = Some(token);
    }

    let api = Arc::new(HttpRoutesApi::with_timeout(
        &settings.api_base_url,
        settings.request_timeout(),
    )?);
    let store = Arc::new(FileActiveRouteStore::new(&settings.active_route_path));
    let navigator = Arc::new(TerminalNavigator::default());
    let controller = WorkflowController::new(
        PreparedRouteFetcher::new(api.clone()),
        RouteDownloadCoordinator::new(api, store.clone(), navigator.clone()),
        navigator.clone(),
        Arc::new(StaticToken(settings.auth_token.clone())),
    );

    match cli.command {
        Command::List => {
            controller.on_enter().await;
            let previews = controller.previews().await;
            if previews.is_empty() {
                println!("No prepared routes available.");
            }
            for preview in &previews {
                print_preview(preview);
            }
        }
        Command::Download { route_id } => {
            controller.on_enter().await;
            let route_id = RouteId::new(route_id);
            if !controller.is_download_enabled(&route_id).await {
                bail!("route {route_id} is not among the prepared routes");
            }

            match controller.on_select_route(route_id.clone()).await {
                SelectOutcome::Committed => {
                    if let Some(record) = store.current().await? {
                        println!(
                            "Route {} loaded at {}",
                            record.route_id,
                            record.loaded_at.to_rfc3339()
                        );
                    }
                }
                SelectOutcome::Failed => {
                    let state = controller.state().await;
                    bail!(
                        "{}",
                        state
                            .error
                            .unwrap_or_else(|| format!("failed to download route {route_id}"))
                    );
                }
                SelectOutcome::Ignored => {
                    bail!("another route download is already in progress");
                }
            }
        }
        Command::Manual => {
            controller.on_manual_sort();
        }
    }

    controller.on_exit().await;
    if let Some(screen) = navigator.last_screen() {
        println!("Next screen: {screen}");
    }
    Ok(())
}

fn print_preview(preview: &RoutePreview) {
    println!(
        "{}  [{}]  prepared {}  {} stops, {} boxes",
        preview.title, preview.route_id, preview.prepared_at, preview.stop_count, preview.box_count
    );

    let mut chips: Vec<String> = preview
        .boxes
        .iter()
        .map(|chip| match &chip.volume {
            Some(volume) => format!("{} {} ({volume})", chip.color, chip.label),
            None => format!("{} {}", chip.color, chip.label),
        })
        .collect();
    if let Some(more) = preview.more_boxes_label() {
        chips.push(more);
    }
    if !chips.is_empty() {
        println!("    boxes: {}", chips.join(", "));
    }

    let mut stops: Vec<String> = preview
        .stops
        .iter()
        .map(|chip| format!("{} {} ({})", chip.color, chip.label, chip.city))
        .collect();
    if let Some(more) = preview.more_stops_label() {
        stops.push(more);
    }
    if !stops.is_empty() {
        println!("    stops: {}", stops.join(", "));
    }
}
