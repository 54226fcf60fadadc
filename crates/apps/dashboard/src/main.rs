mod replay;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::{ApiConfig, DepartmentUpsert, IncidentApi, IncidentReport, SimulatedIncident};
use controller::{ControllerConfig, MapController};
use foundation::geo::LatLng;
use incidents::mock::{mock_fire_departments, mock_incidents};
use incidents::{IncidentStatus, IncidentType, RecordId};
use map::adapter::ContainerHandle;
use map::recording::RecordingMap;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::replay::{Replay, Script};

type BoxError = Box<dyn std::error::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Incident map dashboard")]
struct Args {
    /// Incident API base URL (default: INCIDENT_API_URL or http://localhost:5000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a viewport session against a headless map and print a summary
    Replay {
        /// JSON script: {"steps": [{"at_ms": 0, "zoom": 8}, ...]}
        #[arg(long)]
        script: Option<PathBuf>,

        /// Controller config as JSON (default: MAP_* environment variables)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the built-in sample data instead of the API
        #[arg(long)]
        offline: bool,

        /// Pump interval in milliseconds
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },

    /// Report an incident, optionally with photos
    Report {
        /// forest_fire, flood or blackout
        #[arg(long = "type")]
        kind: IncidentType,

        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        #[arg(long)]
        description: Option<String>,

        /// 1..=5
        #[arg(long)]
        severity: Option<u8>,

        /// Attachment path; repeat for several files
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },

    /// Post a synthetic incident without attachments
    Simulate {
        #[arg(long = "type")]
        kind: IncidentType,

        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        /// 1..=5
        #[arg(long)]
        severity: u8,
    },

    /// Create a fire department, or update one when --id is given
    Departments {
        #[arg(long)]
        id: Option<RecordId>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        #[arg(long, default_value_t = 0)]
        trucks: u32,

        #[arg(long, default_value_t = 0)]
        staff: u32,
    },

    /// Change an incident's status (open, in_process, resolved)
    Status {
        #[arg(long)]
        id: RecordId,

        #[arg(long)]
        status: IncidentStatus,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut api_config = ApiConfig::from_env();
    if let Some(url) = args.api_url {
        api_config.base_url = url;
    }

    match run(args.command, api_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, api_config: ApiConfig) -> Result<(), BoxError> {
    match command {
        Command::Replay {
            script,
            config,
            offline,
            tick_ms,
        } => replay_session(api_config, script, config, offline, tick_ms).await,
        Command::Report {
            kind,
            lat,
            lng,
            description,
            severity,
            files,
        } => {
            let api = IncidentApi::new(api_config)?;
            let report = IncidentReport {
                description,
                severity,
                files,
                ..IncidentReport::new(kind, LatLng::new(lat, lng))
            };
            print_json(&api.report_incident(report).await?)
        }
        Command::Simulate {
            kind,
            lat,
            lng,
            severity,
        } => {
            let api = IncidentApi::new(api_config)?;
            let incident = SimulatedIncident::new(kind, LatLng::new(lat, lng), severity)?;
            print_json(&api.simulate_incident(&incident).await?)
        }
        Command::Departments {
            id,
            name,
            city,
            lat,
            lng,
            trucks,
            staff,
        } => {
            let api = IncidentApi::new(api_config)?;
            let body = DepartmentUpsert {
                id,
                name,
                city,
                latitude: lat,
                longitude: lng,
                available_trucks: trucks,
                available_staff: staff,
            };
            print_json(&api.upsert_fire_department(&body).await?)
        }
        Command::Status { id, status } => {
            let api = IncidentApi::new(api_config)?;
            print_json(&api.update_status(id, status).await?)
        }
    }
}

async fn replay_session(
    api_config: ApiConfig,
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    offline: bool,
    tick_ms: u64,
) -> Result<(), BoxError> {
    let config = match config {
        Some(path) => ControllerConfig::from_json_str(&tokio::fs::read_to_string(&path).await?)?,
        None => ControllerConfig::from_env()?,
    };
    let script = match script {
        Some(path) => Script::from_json_str(&tokio::fs::read_to_string(&path).await?)?,
        None => Script::default(),
    };

    let (incidents, fire_departments) = if offline {
        (mock_incidents(), mock_fire_departments())
    } else {
        let api = IncidentApi::new(api_config)?;
        (
            api.incidents_or_fallback().await,
            api.fire_departments_or_fallback().await,
        )
    };

    let mut controller = MapController::new(RecordingMap::new(), config);
    controller.initialize(&ContainerHandle::new("map"))?;
    let render = controller
        .render(incidents, fire_departments)
        .ok_or("controller did not render after initialization")?;
    info!(
        incidents = render.incidents,
        fire_departments = render.fire_departments,
        skipped = render.skipped.len(),
        steps = script.steps.len(),
        "starting replay"
    );

    let session = Replay::new(controller, script, render);
    let summary = replay::run(session, Duration::from_millis(tick_ms.max(1))).await;
    print_json(&summary)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
