mod command;
mod high_score;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
