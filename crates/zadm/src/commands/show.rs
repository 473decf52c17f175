use anyhow::Result;
use clap::Parser;

use libzone::ZoneConfig;

#[derive(Parser, Debug)]
pub struct Show {
    /// Name of zone
    zone: String,

    /// Restrict output to the named fields (nic.<name> and attr.<name>
    /// select single entries)
    fields: Vec<String>,
}

pub fn show(args: Show) -> Result<()> {
    let zone = ZoneConfig::load(&args.zone, None)?;

    let want = |field: &str| args.fields.is_empty() || args.fields.iter().any(|f| f == field);

    if want("name") {
        println!("{:<20} {}", "name", zone.name());
    }
    if want("brand") {
        println!("{:<20} {}", "Brand (type)", zone.brand());
    }
    if want("path") {
        println!(
            "{:<20} {}",
            "Path",
            zone.get_attrib("zonepath").unwrap_or("")
        );
    }
    if want("autoboot") {
        println!(
            "{:<20} {}",
            "Auto-boot",
            zone.get_attrib("autoboot").unwrap_or("")
        );
    }

    for nic in zone.nics() {
        if want("nic") || want(&format!("nic.{}", nic.name)) {
            println!("{:<20} {}", "Network interface", nic.name);
            if let Some(address) = &nic.address {
                println!("{:>20} {}", "..address", address);
            }
            if let Some(gateway) = &nic.gateway {
                println!("{:>20} {}", "..gateway", gateway);
            }
        }
    }

    for attr in zone.attrs() {
        if want("attr") || want(&format!("attr.{}", attr.name)) {
            println!("{:<20} {}", attr.name, attr.value.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}
