use anyhow::Result;
use clap::Parser;

use libzone::ZoneConfig;

#[derive(Parser, Debug)]
pub struct Dump {
    /// Name of zone
    zone: String,
}

pub fn dump(args: Dump) -> Result<()> {
    let zone = ZoneConfig::load(&args.zone, None)?;
    serde_yaml::to_string(&zone).map(|doc| println!("{}", doc))?;
    Ok(())
}
