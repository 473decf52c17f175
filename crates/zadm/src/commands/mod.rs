use clap::Parser;

use self::{create::Create, dump::Dump, list::List, power::Power, show::Show};

pub mod create;
pub mod dump;
pub mod list;
pub mod power;
pub mod show;

#[derive(Parser, Debug)]
pub enum ZoneCmd {
    /// List configured zones
    List(List),

    /// Show a zone's configuration
    Show(Show),

    /// Create a zone configuration
    Create(Create),

    /// Force a virtual-machine zone off
    Poweroff(Power),

    /// Force-reboot a virtual-machine zone
    Reset(Power),

    /// Inject an NMI into a virtual-machine zone
    Nmi(Power),

    /// Dump a zone's parsed configuration
    Dump(Dump),
}
