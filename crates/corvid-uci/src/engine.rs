//! Event-driven UCI loop: commands on the main thread, search on a worker.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use corvid_core::divide;
use corvid_engine::{Engine, EngineConfig, SearchInfo, SearchResult, mate_distance};

use crate::command::{Command, GoParams, UciOption, parse_command};
use crate::error::UciError;

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
}

/// Payload returned by the search thread when it finishes.
struct SearchDone {
    result: SearchResult,
    engine: Engine,
}

/// `score cp N` or `score mate N`, mate counted in full moves.
pub fn format_score(score: i32) -> String {
    match mate_distance(score) {
        Some(plies) if plies > 0 => format!("mate {}", (plies + 1) / 2),
        Some(plies) => format!("mate -{}", (-plies + 1) / 2),
        None => format!("cp {score}"),
    }
}

/// One `info` line for a completed depth.
pub fn format_info(info: &SearchInfo) -> String {
    let elapsed_ms = info.elapsed.as_millis().max(1);
    let nps = info.nodes as u128 * 1000 / elapsed_ms;
    let pv: Vec<String> = info.pv.iter().map(|mv| mv.to_string()).collect();
    format!(
        "info depth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
        info.depth,
        format_score(info.score),
        info.nodes,
        nps,
        elapsed_ms,
        info.hashfull,
        pv.join(" ")
    )
}

/// The UCI engine.
///
/// Runs an event-driven loop on the main thread. While a search runs the
/// worker thread owns the [`Engine`]; commands that need it are deferred
/// until it comes back.
pub struct UciEngine {
    engine: Option<Engine>,
    stop_flag: Arc<AtomicBool>,
    deferred: Vec<Command>,
}

impl UciEngine {
    /// Create a new engine with the starting position and default settings.
    pub fn new() -> Result<UciEngine, UciError> {
        Ok(UciEngine {
            engine: Some(Engine::new(EngineConfig::default())?),
            stop_flag: Arc::new(AtomicBool::new(false)),
            deferred: Vec::new(),
        })
    }

    /// Run the UCI event loop, reading from stdin until `quit` or input closes.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!(cmd = %trimmed, "received UCI command");
                if stdin_tx.send(EngineEvent::UciCommand(parse_command(trimmed))).is_err() {
                    return;
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(Command::Quit)) | EngineEvent::InputClosed => {
                    if self.engine.is_none() {
                        self.stop_flag.store(true, Ordering::Release);
                        // Wait for the worker so its bestmove is still printed.
                        for ev in &rx {
                            if let EngineEvent::SearchDone(done) = ev {
                                self.finish_search(done, &tx);
                                break;
                            }
                        }
                    }
                    break;
                }
                EngineEvent::UciCommand(Ok(cmd)) => self.dispatch(cmd, &tx),
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                }
                EngineEvent::SearchDone(done) => self.finish_search(done, &tx),
            }
        }

        info!("corvid shutting down");
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command, tx: &mpsc::Sender<EngineEvent>) {
        match cmd {
            Command::Uci => self.handle_uci(),
            Command::IsReady => println!("readyok"),
            Command::Stop => self.stop_flag.store(true, Ordering::Release),
            Command::Unknown(_) | Command::Quit => {}
            cmd => {
                let Some(engine) = self.engine.as_mut() else {
                    debug!(?cmd, "search running, deferring");
                    self.deferred.push(cmd);
                    return;
                };
                match cmd {
                    Command::UciNewGame => engine.new_game(),
                    Command::Position { fen, moves } => {
                        let moves: Vec<&str> = moves.iter().map(String::as_str).collect();
                        if let Err(e) = engine.set_position(fen.as_deref(), &moves) {
                            warn!(error = %e, "position rejected");
                        }
                    }
                    Command::SetOption(option) => Self::handle_setoption(engine, option),
                    Command::Perft(depth) => Self::handle_perft(engine, depth),
                    Command::Display => {
                        let pos = engine.position();
                        println!("{}", pos.pretty());
                        println!("Fen: {pos}");
                    }
                    Command::Go(params) => self.handle_go(params, tx),
                    _ => {}
                }
            }
        }
    }

    fn handle_uci(&self) {
        let defaults = EngineConfig::default();
        println!("id name corvid {}", env!("CARGO_PKG_VERSION"));
        println!("id author the corvid developers");
        println!("option name Hash type spin default {} min 1 max 65536", defaults.hash_mb);
        println!("option name Contempt type spin default {} min -200 max 200", defaults.contempt);
        println!("option name Move Overhead type spin default {} min 0 max 5000", defaults.move_overhead_ms);
        println!("uciok");
    }

    fn handle_setoption(engine: &mut Engine, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                if let Err(e) = engine.set_hash_size(mb) {
                    warn!(error = %e, "Hash option rejected");
                }
            }
            UciOption::Contempt(cp) => engine.set_contempt(cp),
            UciOption::MoveOverhead(ms) => engine.set_move_overhead(ms),
        }
    }

    fn handle_perft(engine: &Engine, depth: u32) {
        let mut pos = engine.position().clone();
        let start = Instant::now();
        let counts = divide(&mut pos, depth);
        for (mv, nodes) in &counts {
            println!("{mv}: {nodes}");
        }
        let total: u64 = counts.iter().map(|(_, nodes)| nodes).sum();
        println!();
        println!("Nodes searched: {total}");
        debug!(depth, total, elapsed_ms = start.elapsed().as_millis() as u64, "perft done");
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        let Some(mut engine) = self.engine.take() else {
            warn!("go received while searching, ignoring");
            return;
        };

        // A fresh flag so a late `stop` cannot hit the next search.
        self.stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&self.stop_flag);
        let limits = params.limits(engine.position().side_to_move());
        let tx = tx.clone();

        thread::spawn(move || {
            let result = engine.search(&limits, stop, |info| println!("{}", format_info(info)));
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { result, engine }));
        });
    }

    fn finish_search(&mut self, done: SearchDone, tx: &mpsc::Sender<EngineEvent>) {
        let SearchDone { result, engine } = done;
        println!("bestmove {}", result.best_move);
        self.engine = Some(engine);

        for cmd in std::mem::take(&mut self.deferred) {
            self.dispatch(cmd, tx);
        }
    }
}
