//! Zone enumeration via the system inventory command.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::{error::ZoneError, ZoneConfig, ZONE_DIR};

const ZONEADM: &str = "/usr/sbin/zoneadm";
const GLOBAL_ZONE: &str = "global";

#[derive(Debug, PartialEq)]
pub(crate) struct InventoryEntry {
    pub name: String,
    pub state: String,
    pub brand: String,
}

/// One parsable inventory line: `id:name:state:path:uuid:brand:ip-type`,
/// possibly with trailing fields. Lines with fewer than seven fields are
/// dropped.
pub(crate) fn parse_inventory_line(line: &str) -> Option<InventoryEntry> {
    let mut fields = line.splitn(7, ':');
    let _id = fields.next()?;
    let name = fields.next()?.to_owned();
    let state = fields.next()?.to_owned();
    let _path = fields.next()?;
    let _uuid = fields.next()?;
    let brand = fields.next()?.to_owned();
    fields.next()?;

    Some(InventoryEntry { name, state, brand })
}

/// Enumerate all configured zones on the host.
pub fn list() -> Result<Vec<ZoneConfig>, ZoneError> {
    let output = Command::new(ZONEADM).args(["list", "-pc"]).output()?;
    if !output.status.success() {
        return Err(ZoneError::Inventory(ZONEADM.to_owned(), output.status));
    }

    list_from(
        Path::new(ZONE_DIR),
        &String::from_utf8_lossy(&output.stdout),
    )
}

/// Load every non-global zone named in the inventory output. Entries of a
/// brand with no registered variant are skipped so one unrecognized zone
/// cannot break the whole listing; any other load failure propagates.
pub fn list_from(dir: &Path, inventory: &str) -> Result<Vec<ZoneConfig>, ZoneError> {
    let mut zones = Vec::new();
    for entry in inventory.lines().filter_map(parse_inventory_line) {
        if entry.name == GLOBAL_ZONE {
            continue;
        }

        match ZoneConfig::load_in(dir, &entry.name, Some(&entry.state)) {
            Ok(zone) => zones.push(zone),
            Err(ZoneError::UnknownBrand(_)) => {
                debug!(
                    "skipping zone {} with unhandled brand {}",
                    entry.name, entry.brand
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(zones)
}
