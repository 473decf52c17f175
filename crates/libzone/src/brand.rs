use serde::Serialize;
use strum::{Display, EnumString};

use crate::power::{BhyveCtl, NoPowerControl, PowerControl};

/// Zone brands with a registered variant. The string forms are the `brand`
/// values accepted in configuration files; anything else is an unknown
/// brand. New brands require an entry here, there is no fallback.
#[derive(Debug, EnumString, Display, Serialize, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    /// Native container zone.
    Ipkg,
    /// Linked-image container zone, structurally identical to ipkg.
    Lipkg,
    /// Sparse-root container zone, structurally identical to lipkg.
    Sparse,
    /// kvm hardware-virtualized zone. No control utility wired up.
    Kvm,
    /// bhyve hardware-virtualized zone, power-controllable via bhyvectl.
    Bhyve,
}

impl Brand {
    pub fn power_control(&self) -> &'static dyn PowerControl {
        match self {
            Brand::Bhyve => &BhyveCtl,
            _ => &NoPowerControl,
        }
    }
}
