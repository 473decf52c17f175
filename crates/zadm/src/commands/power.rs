use anyhow::Result;
use clap::Parser;
use log::info;

use libzone::{PowerOp, PowerOutcome, ZoneConfig};

#[derive(Parser, Debug)]
pub struct Power {
    /// Name of zone
    zone: String,
}

pub fn poweroff(args: Power) -> Result<()> {
    run(&args.zone, PowerOp::Poweroff)
}

pub fn reset(args: Power) -> Result<()> {
    run(&args.zone, PowerOp::Reset)
}

pub fn nmi(args: Power) -> Result<()> {
    run(&args.zone, PowerOp::Nmi)
}

fn run(name: &str, op: PowerOp) -> Result<()> {
    let zone = ZoneConfig::load(name, None)?;

    match zone.power(op)? {
        PowerOutcome::Issued => info!("{op} issued to {name}"),
        PowerOutcome::NotRunning => println!("{name} is not running."),
    }

    Ok(())
}
