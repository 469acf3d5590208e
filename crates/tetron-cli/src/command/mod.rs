use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tetron_engine::{PieceSeed, PieceSpawner, Randomizer};

use self::{high_score::HighScoreArg, play::PlayArg, simulate::SimulateArg};

mod high_score;
mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run headless games with the built-in bot and print statistics as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Show or reset the stored high score
    HighScore(#[clap(flatten)] HighScoreArg),
}

/// Options shared by every command that creates game sessions.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArgs {
    /// Piece seed as 32 hexadecimal digits (random when omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// How the next piece is chosen
    #[clap(long, value_enum, default_value_t = RandomizerArg::Uniform)]
    randomizer: RandomizerArg,
}

impl SessionArgs {
    /// Returns the seed to use, drawing a fresh one when none was given.
    pub(crate) fn seed(&self) -> PieceSeed {
        self.seed.unwrap_or_else(PieceSeed::random)
    }

    pub(crate) fn spawner(&self, seed: PieceSeed) -> PieceSpawner {
        PieceSpawner::with_seed(seed).randomizer(self.randomizer.into())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RandomizerArg {
    #[default]
    Uniform,
    SevenBag,
}

impl From<RandomizerArg> for Randomizer {
    fn from(arg: RandomizerArg) -> Self {
        match arg {
            RandomizerArg::Uniform => Randomizer::Uniform,
            RandomizerArg::SevenBag => Randomizer::SevenBag,
        }
    }
}

/// Options for commands that touch persisted data.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DataArgs {
    /// Directory holding the high-score file
    #[clap(long, default_value = "./data")]
    data_dir: PathBuf,
}

impl Default for DataArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::HighScore(arg) => high_score::run(&arg)?,
    }
    Ok(())
}
