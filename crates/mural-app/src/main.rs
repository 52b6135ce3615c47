//! Mural application binary - composition root.
//!
//! Ties the mural crates into a single interactive executable:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the whiteboard (stroke renderer + snapshot history)
//! 4. Build the speech controller and the media resolver, and wire finalized
//!    transcript segments into fire-and-forget asset resolution
//! 5. Run a stdin command loop mapping the toolbar commands
//!
//! The drawing surface and the voice/media pipeline share no mutable state;
//! they are composed only here.

mod cli;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use mural_canvas::Whiteboard;
use mural_core::config::MuralConfig;
use mural_core::events::BoardEvent;
use mural_core::types::{BrushMode, Point};
use mural_media::{FsAssetProbe, MediaResolver};
use mural_speech::{MockRecognitionBackend, SpeechController, SpeechError, SpeechEvent};

#[tokio::main]
async fn main() -> mural_core::Result<()> {
    let args = cli::CliArgs::parse();
    let config_path = args.resolve_config_path();
    let config = MuralConfig::load_or_default(&config_path);

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!(config = %config_path.display(), "Mural starting");

    let mut board = Whiteboard::new(&config.canvas);

    // The host has no native continuous-recognition capability; the mock
    // backend's live-injection channel stands in for it and the `say`
    // command plays the role of the microphone.
    let backend = MockRecognitionBackend::new();
    let (speech, speech_events) = SpeechController::new(backend.clone(), &config.speech);

    let (board_tx, board_rx) = mpsc::unbounded_channel();
    let resolver =
        MediaResolver::new(FsAssetProbe::new(), &config.media).with_events(board_tx.clone());

    tokio::spawn(drain_speech_events(speech_events, resolver.clone(), board_tx));
    tokio::spawn(drain_board_events(board_rx));

    run_command_loop(&mut board, &speech, &backend, &resolver).await
}

/// Forward speech events: segments feed the media pipeline fire-and-forget,
/// and everything is republished as `BoardEvent`s for the presentation layer.
async fn drain_speech_events(
    mut events: mpsc::UnboundedReceiver<SpeechEvent>,
    resolver: MediaResolver<FsAssetProbe>,
    board_tx: mpsc::UnboundedSender<BoardEvent>,
) {
    while let Some(event) = events.recv().await {
        let board_event = match event {
            SpeechEvent::Started { session_id } => BoardEvent::SpeechStarted {
                session_id,
                timestamp: chrono::Utc::now(),
            },
            SpeechEvent::Segment { text } => {
                let r = resolver.clone();
                let segment = text.clone();
                tokio::spawn(async move { r.resolve_segment(&segment).await });
                BoardEvent::TranscriptAppended {
                    segment: text,
                    timestamp: chrono::Utc::now(),
                }
            }
            SpeechEvent::Fault { fault } => BoardEvent::SpeechFault {
                message: fault.to_string(),
                timestamp: chrono::Utc::now(),
            },
            SpeechEvent::Stopped => BoardEvent::SpeechStopped {
                timestamp: chrono::Utc::now(),
            },
        };
        let _ = board_tx.send(board_event);
    }
}

/// Present board events to the user.
async fn drain_board_events(mut events: mpsc::UnboundedReceiver<BoardEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            BoardEvent::SpeechStarted { session_id, .. } => {
                tracing::info!(session_id = %session_id, "Listening");
            }
            BoardEvent::SpeechStopped { .. } => {
                tracing::info!("Speech capture stopped");
            }
            BoardEvent::TranscriptAppended { segment, .. } => {
                println!("heard: {}", segment);
            }
            BoardEvent::OverlayResolved { kind, path, .. } => {
                println!("overlay added: [{}] {}", kind, path);
            }
            BoardEvent::OverlayMissed { kind, path, .. } => {
                tracing::debug!(kind = %kind, path = %path, "No asset for phrase");
            }
            BoardEvent::SpeechFault { message, .. } => {
                println!("! {}", message);
            }
            _ => {}
        }
    }
}

async fn run_command_loop(
    board: &mut Whiteboard,
    speech: &SpeechController<MockRecognitionBackend>,
    backend: &MockRecognitionBackend,
    resolver: &MediaResolver<FsAssetProbe>,
) -> mural_core::Result<()> {
    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };
        match command {
            "draw" => {
                let points: Vec<Point> = rest.split_whitespace().filter_map(parse_point).collect();
                match points.split_first() {
                    Some((first, remainder)) => {
                        board.pointer_pressed(*first)?;
                        for p in remainder {
                            board.pointer_moved(*p);
                        }
                        board.pointer_released();
                        println!("stroke of {} point(s), mode {}", points.len(), board.mode());
                    }
                    None => println!("usage: draw x,y [x,y ...]"),
                }
            }
            "pen" => {
                board.set_mode(BrushMode::Draw);
                println!("mode: draw");
            }
            "erase" => {
                println!("mode: {}", board.toggle_erase());
            }
            "clear" => {
                board.clear_surface();
                println!("surface cleared");
            }
            "undo" => {
                let repainted = board.undo().await?;
                println!("{}", if repainted { "undone" } else { "nothing to undo" });
            }
            "redo" => {
                let repainted = board.redo().await?;
                println!("{}", if repainted { "redone" } else { "nothing to redo" });
            }
            "speech" => match speech.toggle() {
                Ok(state) => println!("speech capture: {}", state),
                Err(SpeechError::UnsupportedCapability) => {
                    // Alert-equivalent: surfaced to the user, never fatal.
                    println!("! Speech recognition is not supported on this host");
                }
                Err(e) => println!("! {}", e),
            },
            "say" => {
                if rest.is_empty() {
                    println!("usage: say <phrase>");
                } else if !speech.is_listening() {
                    println!("speech capture is off (try `speech` first)");
                } else if !backend.push_results(vec![rest.to_string()]) {
                    println!("no active recognition session");
                }
            }
            "transcript" => {
                let text = speech.transcript_text();
                if text.is_empty() {
                    println!("(transcript empty)");
                } else {
                    println!("{}", text);
                }
            }
            "overlays" => {
                for r in resolver.images() {
                    println!("[image] {}", r.path.display());
                }
                for r in resolver.videos() {
                    println!("[video] {}", r.path.display());
                }
            }
            "clear-images" => {
                resolver.clear_images();
                println!("image overlays cleared");
            }
            "clear-videos" => {
                resolver.clear_videos();
                println!("video overlays cleared");
            }
            "status" => {
                println!(
                    "mode: {} | speech: {} | undo: {} | redo: {} | overlays: {}+{}",
                    board.mode(),
                    speech.state(),
                    board.undo_depth(),
                    board.redo_depth(),
                    resolver.images().len(),
                    resolver.videos().len(),
                );
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => println!("unknown command: {} (try `help`)", command),
        }
    }

    if speech.is_listening() {
        let _ = speech.stop();
    }
    tracing::info!("Mural exiting");
    Ok(())
}

fn parse_point(token: &str) -> Option<Point> {
    let (x, y) = token.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn print_help() {
    println!("commands:");
    println!("  draw x,y [x,y ...]   draw a stroke through the given points");
    println!("  pen                  select draw mode");
    println!("  erase                toggle erase mode");
    println!("  clear                wipe the surface (not undoable)");
    println!("  undo / redo          step through stroke history");
    println!("  speech               toggle speech capture");
    println!("  say <phrase>         inject a finalized phrase");
    println!("  transcript           show the transcript buffer");
    println!("  overlays             list resolved media overlays");
    println!("  clear-images         drop all image overlays");
    println!("  clear-videos         drop all video overlays");
    println!("  status               show current state");
    println!("  quit                 exit");
}
