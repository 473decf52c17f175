use anyhow::Result;
use clap::Parser;
use log::{error, LevelFilter};

mod commands;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Opts {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[clap(subcommand)]
    subcmd: commands::ZoneCmd,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if opts.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    let cmd_result = match opts.subcmd {
        commands::ZoneCmd::List(args) => commands::list::list(args),
        commands::ZoneCmd::Show(args) => commands::show::show(args),
        commands::ZoneCmd::Create(args) => commands::create::create(args),
        commands::ZoneCmd::Poweroff(args) => commands::power::poweroff(args),
        commands::ZoneCmd::Reset(args) => commands::power::reset(args),
        commands::ZoneCmd::Nmi(args) => commands::power::nmi(args),
        commands::ZoneCmd::Dump(args) => commands::dump::dump(args),
    };

    if let Err(ref e) = cmd_result {
        error!("error in executing command: {:?}", e);
    }

    cmd_result
}
