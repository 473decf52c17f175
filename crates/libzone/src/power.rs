use std::path::Path;
use std::process::Command;

use log::debug;
use nix::unistd::{access, AccessFlags};
use strum::Display;

use crate::{error::ZoneError, ZoneConfig};

const VM_CTL: &str = "/usr/sbin/bhyvectl";
const VMM_DEV_DIR: &str = "/dev/vmm";

#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum PowerOp {
    Poweroff,
    Reset,
    Nmi,
}

impl PowerOp {
    fn flag(&self) -> &'static str {
        match self {
            PowerOp::Poweroff => "--force-poweroff",
            PowerOp::Reset => "--force-reboot",
            PowerOp::Nmi => "--inject-nmi",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PowerOutcome {
    /// The control utility was invoked and reported success.
    Issued,
    /// The zone instance is not active; nothing was invoked.
    NotRunning,
}

/// Power control for a zone brand. The default methods reject every
/// operation; brands with a control utility override `power`.
pub trait PowerControl {
    fn power(&self, zone: &ZoneConfig, op: PowerOp) -> Result<PowerOutcome, ZoneError> {
        Err(ZoneError::UnsupportedOp {
            brand: zone.brand(),
            op,
        })
    }
}

/// Brands without a control utility.
pub struct NoPowerControl;

impl PowerControl for NoPowerControl {}

/// bhyve zones are driven through bhyvectl against the in-kernel vmm
/// instance.
pub struct BhyveCtl;

impl BhyveCtl {
    /// A running bhyve zone has a writable vmm device node.
    fn exists(name: &str) -> bool {
        access(
            &Path::new(VMM_DEV_DIR).join(name),
            AccessFlags::W_OK,
        )
        .is_ok()
    }
}

impl PowerControl for BhyveCtl {
    fn power(&self, zone: &ZoneConfig, op: PowerOp) -> Result<PowerOutcome, ZoneError> {
        if !Self::exists(zone.name()) {
            return Ok(PowerOutcome::NotRunning);
        }

        let mut cmd = Command::new(VM_CTL);
        cmd.arg(format!("--vm={}", zone.name()));
        cmd.arg(op.flag());

        debug!("{:?}", cmd);
        let status = cmd.status()?;
        if !status.success() {
            return Err(ZoneError::CtlFailed {
                zone: zone.name().to_owned(),
                op,
                status,
            });
        }

        Ok(PowerOutcome::Issued)
    }
}
