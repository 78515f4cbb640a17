use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use log::info;

use proctorwatch::{
    classify::{ClassificationClient, FileFrameSource},
    dashboard::{AlertFetcher, FeedController},
    guard::{self, SessionContext},
    monitor::{MonitorController, MonitorDeps, MonitorPolicy},
    reporter::AlertReporter,
    settings::SettingsStore,
};

fn usage() -> ! {
    eprintln!("usage:");
    eprintln!("  proctorwatch monitor <candidate-token> <frame-path>");
    eprintln!("  proctorwatch dashboard");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings_path = std::env::var("PROCTORWATCH_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("proctorwatch.json"));
    let store = SettingsStore::new(settings_path)?;
    let settings = store.current().apply_env_overrides();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("monitor") => {
            let [_, token, frame_path] = args.as_slice() else {
                usage();
            };
            run_monitor(token, PathBuf::from(frame_path), settings).await
        }
        Some("dashboard") => run_dashboard(settings).await,
        _ => usage(),
    }
}

async fn run_monitor(
    token: &str,
    frame_path: PathBuf,
    settings: proctorwatch::Settings,
) -> Result<()> {
    let ctx = SessionContext::for_candidate(token);
    let session = match guard::start_session(&ctx) {
        Ok(session) => session,
        // The web surface would redirect to the login screen here
        Err(err) => bail!("cannot start session: {err}"),
    };

    info!(
        "monitoring candidate {} every {:?} against {}",
        session.candidate_id,
        settings.capture_interval(),
        settings.backend_url
    );

    let deps = MonitorDeps {
        frames: Arc::new(FileFrameSource::new(frame_path)),
        classifier: Arc::new(ClassificationClient::new(settings.backend_url.clone())),
        reporter: Arc::new(AlertReporter::new(settings.backend_url.clone())),
    };
    let policy = MonitorPolicy {
        capture_interval: settings.capture_interval(),
        classify_timeout: settings.classify_timeout(),
    };

    let mut controller = MonitorController::new();
    controller.start(session, deps, policy)?;

    tokio::signal::ctrl_c().await?;
    info!("exam submitted / session closed, terminating monitor");
    controller.stop().await
}

async fn run_dashboard(settings: proctorwatch::Settings) -> Result<()> {
    let ctx = SessionContext {
        teacher_logged_in: std::env::var("PROCTORWATCH_TEACHER")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
        teacher_username: std::env::var("PROCTORWATCH_TEACHER_USER").ok(),
        ..Default::default()
    };
    if let Err(err) = guard::ensure_teacher(&ctx) {
        bail!("cannot open dashboard: {err} (set PROCTORWATCH_TEACHER=1 after logging in)");
    }

    let controller = FeedController::new(
        Arc::new(AlertFetcher::new(settings.backend_url.clone())),
        settings.poll_interval(),
    );
    controller.start_polling().await;

    info!(
        "dashboard polling {} every {:?}",
        settings.backend_url,
        settings.poll_interval()
    );

    let mut render_interval = tokio::time::interval(settings.poll_interval());
    loop {
        tokio::select! {
            _ = render_interval.tick() => {
                render(&controller.snapshot().await);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    controller.stop_polling().await;
    Ok(())
}

fn render(snapshot: &proctorwatch::FeedSnapshot) {
    println!("== proctor dashboard: {} alerts ==", snapshot.records.len());
    if snapshot.poll_failures > 0 {
        println!("   ({} failed polls, showing last good data)", snapshot.poll_failures);
    }
    let mut candidates: Vec<_> = snapshot.stats.iter().collect();
    candidates.sort_by(|a, b| a.0.cmp(b.0));
    for (candidate, stats) in candidates {
        let mut counts: Vec<_> = stats.counts.iter().collect();
        counts.sort_by(|a, b| a.0.cmp(b.0));
        let breakdown = counts
            .iter()
            .map(|(direction, n)| format!("{direction}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {candidate}: {} alerts ({breakdown}), last {} at {}",
            stats.total, stats.last_alert.direction, stats.last_alert.alert_time
        );
    }
}
