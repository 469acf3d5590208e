use crate::{command::DataArgs, high_score::HighScoreStore};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct HighScoreArg {
    #[clap(flatten)]
    data: DataArgs,
    /// Reset the stored high score to zero
    #[clap(long)]
    reset: bool,
}

pub(crate) fn run(arg: &HighScoreArg) -> anyhow::Result<()> {
    let HighScoreArg { data, reset } = arg;
    let store = HighScoreStore::new(&data.data_dir);

    if *reset {
        store.save(0)?;
        eprintln!("High score reset ({})", store.path().display());
        return Ok(());
    }

    println!("{}", store.load()?);
    Ok(())
}
