use std::path::PathBuf;

use serde::Serialize;
use tetron_engine::{PieceSeed, Randomizer, Session};

use crate::{command::SessionArgs, util::Output};

mod bot;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArgs,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Stop a game after this many locked pieces
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    randomizer: Randomizer,
    max_pieces: usize,
    games: Vec<GameSummary>,
    best_score: usize,
    mean_score: f64,
    mean_lines: f64,
}

#[derive(Debug, Clone, Serialize)]
struct GameSummary {
    score: usize,
    lines: usize,
    level: usize,
    pieces: usize,
    line_clears: [usize; 5],
    topped_out: bool,
}

impl GameSummary {
    fn from_session(session: &Session) -> Self {
        let stats = session.stats();
        Self {
            score: stats.score(),
            lines: stats.total_cleared_lines(),
            level: stats.level(),
            pieces: stats.completed_pieces(),
            line_clears: *stats.line_cleared_counter(),
            topped_out: session.phase().is_game_over(),
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session: session_args,
        games,
        max_pieces,
        output,
    } = arg;

    let seed = session_args.seed();
    let spawner = session_args.spawner(seed);
    let randomizer = spawner.current_randomizer();
    let mut session = Session::with_spawner(spawner);

    eprintln!("Simulating {games} games (seed {seed})...");
    let mut summaries = Vec::with_capacity(*games);
    for game in 0..*games {
        if game > 0 {
            session.new_game();
        }
        play_game(&mut session, *max_pieces)?;
        let summary = GameSummary::from_session(&session);
        eprintln!(
            "Game {}: score {}, lines {}, pieces {}",
            game + 1,
            summary.score,
            summary.lines,
            summary.pieces
        );
        summaries.push(summary);
    }

    let report = SimulationReport {
        seed,
        randomizer,
        max_pieces: *max_pieces,
        best_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
        mean_score: mean(summaries.iter().map(|s| s.score)),
        mean_lines: mean(summaries.iter().map(|s| s.lines)),
        games: summaries,
    };
    Output::save_json(&report, output.clone())
}

fn play_game(session: &mut Session, max_pieces: usize) -> anyhow::Result<()> {
    while session.stats().completed_pieces() < max_pieces {
        if session.phase().is_spawning() && session.tick()?.is_topped_out() {
            break;
        }
        let Some((mv, _)) = bot::select_best_move(session) else {
            break;
        };
        bot::apply_move(session, mv)?;
        if session.phase().is_game_over() {
            break;
        }
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<usize>() as f64 / len as f64
}

#[cfg(test)]
mod tests {
    use tetron_engine::PieceSpawner;

    use super::*;

    #[test]
    fn test_play_game_respects_piece_limit() {
        let spawner = PieceSpawner::with_seed(PieceSeed::from_bytes([5; 16]));
        let mut session = Session::with_spawner(spawner);
        play_game(&mut session, 25).unwrap();
        assert_eq!(session.stats().completed_pieces(), 25);
        assert!(!session.phase().is_game_over());
    }

    #[test]
    fn test_mean() {
        assert!(mean([].into_iter()).abs() < f64::EPSILON);
        assert!((mean([1, 2, 3, 4].into_iter()) - 2.5).abs() < f64::EPSILON);
    }
}
