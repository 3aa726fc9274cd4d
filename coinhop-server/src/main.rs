//! Coinhop Server
//!
//! `coinhop-server` serves the leaderboard API.
//! `coinhop-server demo [frames]` runs a headless play session instead.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coinhop::{
    config::ServerConfig,
    game::{
        best::{BestScoreStore, FileBestStore, MemoryBestStore},
        events::GameEventData,
        input::{Action, InputSnapshot},
        replay, GameSession, Level, FRAME_DT,
    },
    network::ScoreServer,
    FRAME_RATE, VERSION,
};

/// Frames simulated by `demo` when no count is given.
const DEFAULT_DEMO_FRAMES: u32 = 1200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load_or_default();
    info!("Coinhop v{}", VERSION);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("demo") => {
            let frames = match args.next() {
                Some(n) => n
                    .parse::<u32>()
                    .with_context(|| format!("invalid frame count {:?}", n))?,
                None => DEFAULT_DEMO_FRAMES,
            };
            demo_session(&config, frames);
            Ok(())
        }
        Some(other) => anyhow::bail!("unknown command {:?} (expected `demo` or nothing)", other),
        None => serve(config).await,
    }
}

/// Run the leaderboard server until Ctrl-C.
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let server = Arc::new(ScoreServer::from_config(config).context("failed to open score store")?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_server.shutdown();
        }
    });

    server.run().await.context("server failed")?;
    info!("Server stopped");
    Ok(())
}

/// Scripted input: run right, hop every 40 frames, turn back for a while
/// every 300 and finish each cycle hopping in place.
fn scripted_input(frame: u32) -> InputSnapshot {
    let phase = frame % 300;
    let jump = frame % 40 == 0;
    let snapshot = match phase {
        0..=239 => InputSnapshot::right(),
        240..=279 => InputSnapshot::left(),
        _ => InputSnapshot::jump(),
    };
    if jump {
        snapshot.with_jump()
    } else {
        snapshot
    }
}

/// Play a headless session and check it against a replay.
fn demo_session(config: &ServerConfig, frames: u32) {
    info!("=== Starting Demo Session ===");
    info!(
        "{} frames ({:.1} seconds at {} Hz)",
        frames,
        frames as f64 / FRAME_RATE as f64,
        FRAME_RATE
    );

    let best_store: Box<dyn BestScoreStore> = match &config.best_score_path {
        Some(path) => {
            let store = FileBestStore::new(path);
            info!("Best score file: {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryBestStore::new()),
    };

    let level = Level::starter();
    let mut session = GameSession::new(level, best_store);
    let initial = session.state().clone();

    let inputs: Vec<InputSnapshot> = (0..frames).map(scripted_input).collect();
    let mut coins = 0usize;
    let mut resets = 0usize;

    for input in &inputs {
        apply_snapshot(&mut session, input);
        let result = session.frame(FRAME_DT);

        for event in &result.events {
            match event.data {
                GameEventData::CoinCollected { .. } => coins += 1,
                GameEventData::LevelReset { .. } => resets += 1,
                _ => {}
            }
        }

        let state = session.state();
        if state.tick % FRAME_RATE as u64 == 0 {
            info!(
                "Tick {}: pos ({:.1}, {:.1}) score {} best {}",
                state.tick,
                state.player.position.x,
                state.player.position.y,
                state.score,
                state.best
            );
        }
    }

    let state = session.state();
    info!("=== Session Results ===");
    info!("Score: {}  Best: {}", state.score, state.best);
    info!("Coins collected: {}  Falls: {}", coins, resets);
    if let Some(status) = &state.status {
        info!("Status: {}", status);
    }
    info!("Final frame draws {} shapes", session.render().len());

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(initial, &inputs);
    if replayed == *state {
        info!("DETERMINISM VERIFIED: replay matches");
    } else {
        warn!("DETERMINISM FAILURE: replay differs");
    }
}

/// Mirror a snapshot onto the session's held buttons.
fn apply_snapshot(session: &mut GameSession, input: &InputSnapshot) {
    for (action, held) in [
        (Action::Left, input.left),
        (Action::Right, input.right),
        (Action::Jump, input.jump),
    ] {
        if held {
            session.press(action);
        } else {
            session.release(action);
        }
    }
}
