use crate::{
    command::{DataArgs, SessionArgs},
    high_score::HighScoreStore,
    tui::Tui,
};

use self::app::PlayApp;

mod app;

const UPDATE_RATE: f64 = 120.0;
const FPS: f64 = 60.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArgs,
    #[clap(flatten)]
    data: DataArgs,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { session, data } = arg;

    let store = HighScoreStore::new(&data.data_dir);
    let high_score = store.load()?;
    let seed = session.seed();
    let mut app = PlayApp::new(session.spawner(seed), store, high_score);

    Tui::new(UPDATE_RATE, FPS).run(&mut app)?;
    app.finish()?;

    eprintln!("Seed: {seed}");
    eprintln!("Final score: {}", app.score());
    Ok(())
}
