use anyhow::Result;
use clap::Parser;

use libzone::registry;

#[derive(Parser, Debug)]
pub struct List {}

pub fn list(_args: List) -> Result<()> {
    let mut zones = registry::list()?;
    if zones.is_empty() {
        return Ok(());
    }

    zones.sort_by(|a, b| a.name().cmp(b.name()));
    let width = zones.iter().map(|z| z.name().len()).max().unwrap_or(0) + 1;

    println!("{:<width$} {:<6} {:<11}", "NAME", "TYPE", "STATUS");
    for zone in &zones {
        println!(
            "{:<width$} {:<6} {:<11}",
            zone.name(),
            zone.brand().to_string(),
            zone.state().unwrap_or("-"),
        );
    }

    Ok(())
}
