use std::str::FromStr;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use libzone::{Brand, ZoneConfig, ZoneError};

#[derive(Parser, Debug)]
pub struct Create {
    /// Name of zone
    zone: String,

    /// Zone brand
    #[arg(short, long, default_value = "sparse")]
    brand: String,

    /// Zone root path
    #[arg(short = 'p', long)]
    zonepath: Option<String>,
}

pub fn create(args: Create) -> Result<()> {
    let brand =
        Brand::from_str(&args.brand).map_err(|_| ZoneError::UnknownBrand(args.brand.clone()))?;

    let mut zone = ZoneConfig::create(&args.zone, brand)?;
    if let Some(zonepath) = &args.zonepath {
        zone.set_attrib("zonepath", zonepath);
    }

    if !zone.save()? {
        bail!("{} not saved, the configuration is incomplete", args.zone)
    }

    info!("{} created", args.zone);
    Ok(())
}
