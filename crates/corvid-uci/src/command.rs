//! UCI command parsing.

use std::time::Duration;

use corvid_core::Color;
use corvid_engine::SearchLimits;

use crate::error::UciError;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` uses defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search this many nodes only.
    pub nodes: Option<u64>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
}

impl GoParams {
    /// Limits for `side`, picking that side's clock.
    pub fn limits(&self, side: Color) -> SearchLimits {
        let (time_left, increment) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        SearchLimits {
            time_left,
            increment: increment.unwrap_or(Duration::ZERO),
            moves_to_go: self.movestogo,
            move_time: self.movetime,
            depth: self.depth,
            nodes: self.nodes,
            infinite: self.infinite,
        }
    }
}

/// Options accepted by `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
    /// Draw aversion in centipawns.
    Contempt(i32),
    /// Milliseconds reserved per move for lag.
    MoveOverhead(u64),
}

/// A parsed UCI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- a FEN (`None` for startpos) and the moves played from it.
    /// The engine validates both.
    Position { fen: Option<String>, moves: Vec<String> },
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `setoption name <name> value <value>`
    SetOption(UciOption),
    /// `perft <depth>` -- count leaf nodes per root move.
    Perft(u32),
    /// `d` -- print the current position.
    Display,
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// Unrecognized command, ignored as the protocol requires.
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&first, rest)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match first {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "d" => Ok(Command::Display),
        "position" => parse_position(rest),
        "go" => parse_go(rest),
        "setoption" => parse_setoption(rest),
        "perft" => parse_perft(rest),
        _ => Ok(Command::Unknown(first.to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let (fen, rest) = match tokens.first() {
        Some(&"startpos") => (None, &tokens[1..]),
        Some(&"fen") => {
            // The FEN runs up to the `moves` keyword or the end of the line.
            let end = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
            if end == 1 {
                return Err(UciError::MalformedPosition);
            }
            (Some(tokens[1..end].join(" ")), &tokens[end..])
        }
        _ => return Err(UciError::MalformedPosition),
    };

    let moves = match rest.split_first() {
        Some((&"moves", moves)) => moves.iter().map(|m| m.to_string()).collect(),
        Some(_) => return Err(UciError::MalformedPosition),
        None => Vec::new(),
    };

    Ok(Command::Position { fen, moves })
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime,
/// nodes, infinite. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "wtime" => params.wtime = Some(parse_millis(value, "wtime")?),
            "btime" => params.btime = Some(parse_millis(value, "btime")?),
            "winc" => params.winc = Some(parse_millis(value, "winc")?),
            "binc" => params.binc = Some(parse_millis(value, "binc")?),
            "movestogo" => params.movestogo = Some(parse_int(value, "movestogo")?),
            "depth" => params.depth = Some(parse_int(value, "depth")?),
            "movetime" => params.movetime = Some(parse_millis(value, "movetime")?),
            "nodes" => params.nodes = Some(parse_int(value, "nodes")?),
            "infinite" => {
                params.infinite = true;
                i += 1;
                continue;
            }
            _ => {
                // Unknown token -- skip per UCI convention
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(Command::Go(params))
}

/// Parse `setoption name <name...> value <value>`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.first() != Some(&"name") {
        return Err(UciError::MalformedOption);
    }
    let value_at = tokens.iter().position(|&t| t == "value").ok_or(UciError::MalformedOption)?;
    let name = tokens[1..value_at].join(" ");
    let value = tokens[value_at + 1..].join(" ");

    let invalid = || UciError::InvalidOptionValue { name: name.clone(), value: value.clone() };
    let option = match name.to_ascii_lowercase().as_str() {
        "hash" => UciOption::Hash(value.parse().map_err(|_| invalid())?),
        "contempt" => UciOption::Contempt(value.parse().map_err(|_| invalid())?),
        "move overhead" => UciOption::MoveOverhead(value.parse().map_err(|_| invalid())?),
        _ => return Err(UciError::UnknownOption { name: name.clone() }),
    };
    Ok(Command::SetOption(option))
}

fn parse_perft(tokens: &[&str]) -> Result<Command, UciError> {
    Ok(Command::Perft(parse_int(tokens.first(), "perft")?))
}

/// Parse a millisecond value from a token.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    parse_int(token, param).map(Duration::from_millis)
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use corvid_core::Color;

    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("uci").unwrap(), Command::Uci);
        assert_eq!(parse_command("isready").unwrap(), Command::IsReady);
        assert_eq!(parse_command("ucinewgame").unwrap(), Command::UciNewGame);
        assert_eq!(parse_command("stop").unwrap(), Command::Stop);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("  d ").unwrap(), Command::Display);
    }

    #[test]
    fn parse_position_startpos() {
        let cmd = parse_command("position startpos").unwrap();
        assert_eq!(cmd, Command::Position { fen: None, moves: vec![] });
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let cmd = parse_command("position startpos moves e2e4 e7e5").unwrap();
        assert_eq!(cmd, Command::Position { fen: None, moves: vec!["e2e4".into(), "e7e5".into()] });
    }

    #[test]
    fn parse_position_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let cmd = parse_command(&format!("position fen {fen} moves c7c5")).unwrap();
        assert_eq!(cmd, Command::Position { fen: Some(fen.to_string()), moves: vec!["c7c5".into()] });
    }

    #[test]
    fn parse_position_malformed() {
        assert!(matches!(parse_command("position"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position fen"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position startpos e2e4"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position somewhere"), Err(UciError::MalformedPosition)));
    }

    #[test]
    fn parse_go_depth() {
        let cmd = parse_command("go depth 6").unwrap();
        match cmd {
            Command::Go(params) => assert_eq!(params.depth, Some(6)),
            _ => panic!("expected Go"),
        }
    }

    #[test]
    fn parse_go_bare_defaults() {
        assert_eq!(parse_command("go").unwrap(), Command::Go(GoParams::default()));
    }

    #[test]
    fn parse_go_clock() {
        let cmd = parse_command("go wtime 300000 btime 200000 winc 2000 binc 1000 movestogo 20").unwrap();
        let Command::Go(params) = cmd else {
            panic!("expected Go");
        };
        assert_eq!(params.wtime, Some(Duration::from_millis(300_000)));
        assert_eq!(params.btime, Some(Duration::from_millis(200_000)));
        assert_eq!(params.winc, Some(Duration::from_millis(2000)));
        assert_eq!(params.binc, Some(Duration::from_millis(1000)));
        assert_eq!(params.movestogo, Some(20));

        let black = params.limits(Color::Black);
        assert_eq!(black.time_left, Some(Duration::from_millis(200_000)));
        assert_eq!(black.increment, Duration::from_millis(1000));
        assert_eq!(black.moves_to_go, Some(20));
    }

    #[test]
    fn parse_go_movetime_nodes_infinite() {
        let Command::Go(params) = parse_command("go movetime 5000 nodes 1000000 infinite").unwrap() else {
            panic!("expected Go");
        };
        assert_eq!(params.movetime, Some(Duration::from_millis(5000)));
        assert_eq!(params.nodes, Some(1_000_000));
        assert!(params.infinite);
    }

    #[test]
    fn parse_go_skips_unknown_tokens() {
        let Command::Go(params) = parse_command("go ponder depth 3").unwrap() else {
            panic!("expected Go");
        };
        assert_eq!(params.depth, Some(3));
    }

    #[test]
    fn parse_go_bad_values() {
        assert!(matches!(parse_command("go wtime"), Err(UciError::MissingValue { .. })));
        assert!(matches!(parse_command("go depth abc"), Err(UciError::InvalidValue { .. })));
        assert!(matches!(parse_command("go depth 300"), Err(UciError::InvalidValue { .. })));
    }

    #[test]
    fn parse_setoption() {
        assert_eq!(
            parse_command("setoption name Hash value 64").unwrap(),
            Command::SetOption(UciOption::Hash(64))
        );
        assert_eq!(
            parse_command("setoption name Contempt value -20").unwrap(),
            Command::SetOption(UciOption::Contempt(-20))
        );
        assert_eq!(
            parse_command("setoption name Move Overhead value 50").unwrap(),
            Command::SetOption(UciOption::MoveOverhead(50))
        );
    }

    #[test]
    fn parse_setoption_errors() {
        assert!(matches!(parse_command("setoption Hash 64"), Err(UciError::MalformedOption)));
        assert!(matches!(parse_command("setoption name Hash"), Err(UciError::MalformedOption)));
        assert!(matches!(
            parse_command("setoption name Threads value 4"),
            Err(UciError::UnknownOption { .. })
        ));
        assert!(matches!(
            parse_command("setoption name Hash value lots"),
            Err(UciError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn parse_perft() {
        assert_eq!(parse_command("perft 4").unwrap(), Command::Perft(4));
        assert!(parse_command("perft").is_err());
    }

    #[test]
    fn parse_unknown_and_empty() {
        assert_eq!(parse_command("foobar").unwrap(), Command::Unknown("foobar".to_string()));
        assert_eq!(parse_command("").unwrap(), Command::Unknown(String::new()));
    }
}
