use std::path::PathBuf;

use staghunt_engine::bots::Roster;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RosterArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RosterArg) -> anyhow::Result<()> {
    let RosterArg { output } = arg;
    Output::save_json(&Roster::standard(), output.clone())
}
