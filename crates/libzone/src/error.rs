use std::process::ExitStatus;

use crate::brand::Brand;
use crate::power::PowerOp;

/// Errors from this crate.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    /// No configuration file exists for the requested zone.
    #[error("zone {0} not found")]
    NotFound(String),

    /// A configuration file already exists for the zone being created.
    #[error("zone {0} already exists")]
    AlreadyExists(String),

    /// The brand string has no registered variant.
    #[error("unknown zone brand {0}")]
    UnknownBrand(String),

    /// Power operation invoked on a brand without power support. Distinct
    /// from a supported brand whose instance is simply not running.
    #[error("no {op} method for zone brand {brand}")]
    UnsupportedOp { brand: Brand, op: PowerOp },

    /// The control utility ran but reported failure.
    #[error("control utility failed on zone {zone} ({op}): {status}")]
    CtlFailed {
        zone: String,
        op: PowerOp,
        status: ExitStatus,
    },

    /// The zone inventory command could not be run or reported failure.
    #[error("inventory command {0} failed: {1}")]
    Inventory(String, ExitStatus),

    /// Malformed zone configuration document.
    #[error("malformed zone configuration: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error doing I/O.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
