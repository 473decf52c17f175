use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::Serialize;

pub use brand::Brand;
pub use error::ZoneError;
pub use power::{PowerOp, PowerOutcome};

pub mod brand;
pub mod error;
pub mod power;
pub mod registry;
mod xml;

#[cfg(test)]
mod test;

/// System directory holding one XML document per configured zone.
pub const ZONE_DIR: &str = "/etc/zones";

/// Root attribute keys reachable through [`ZoneConfig::set_attrib`]. Every
/// one of them must be non-empty for a configuration to be written.
pub const ROOT_ATTRIBS: [&str; 4] = ["zonepath", "brand", "autoboot", "ip-type"];

const IP_TYPE_EXCLUSIVE: &str = "exclusive";

#[inline]
pub fn config_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.xml"))
}

/// The inventory reports freshly installed zones as "installed"; present
/// those as stopped. Everything else passes through untouched.
fn canonical_state(state: &str) -> &str {
    match state {
        "installed" => "stopped",
        other => other,
    }
}

/// The four required attributes of the `zone` root element.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RootAttribs {
    pub zonepath: Option<String>,
    pub brand: Option<String>,
    pub autoboot: Option<String>,
    #[serde(rename = "ip-type")]
    pub ip_type: Option<String>,
}

impl RootAttribs {
    fn get(&self, key: &str) -> Option<&str> {
        match key {
            "zonepath" => self.zonepath.as_deref(),
            "brand" => self.brand.as_deref(),
            "autoboot" => self.autoboot.as_deref(),
            "ip-type" => self.ip_type.as_deref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "zonepath" => Some(&mut self.zonepath),
            "brand" => Some(&mut self.brand),
            "autoboot" => Some(&mut self.autoboot),
            "ip-type" => Some(&mut self.ip_type),
            _ => None,
        }
    }
}

/// A zone network interface, from a `network` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nic {
    pub name: String,
    pub address: Option<String>,
    pub gateway: Option<String>,
}

/// A free-form custom attribute, from an `attr` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

/// One zone's persisted configuration plus its inventory-supplied runtime
/// state. Mutation goes through `set_attrib`, which keeps the dirty flag
/// honest; `save` only touches the disk when there is something to write.
#[derive(Debug, Serialize)]
pub struct ZoneConfig {
    name: String,
    brand: Brand,
    state: Option<String>,
    #[serde(flatten)]
    attribs: RootAttribs,
    nics: Vec<Nic>,
    attrs: Vec<Attr>,
    #[serde(skip)]
    path: PathBuf,
    #[serde(skip)]
    dirty: bool,
}

impl ZoneConfig {
    pub fn load(name: &str, state: Option<&str>) -> Result<Self, ZoneError> {
        Self::load_in(Path::new(ZONE_DIR), name, state)
    }

    pub fn load_in(dir: &Path, name: &str, state: Option<&str>) -> Result<Self, ZoneError> {
        let path = config_path(dir, name);
        let doc = match fs::read_to_string(&path) {
            Ok(doc) => doc,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ZoneError::NotFound(name.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };

        let raw = xml::parse(&doc)?;
        let brand_attr = raw.attribs.brand.clone().unwrap_or_default();
        let brand =
            Brand::from_str(&brand_attr).map_err(|_| ZoneError::UnknownBrand(brand_attr))?;

        // interfaces belong to the zone only with a dedicated IP stack
        let nics = if raw.attribs.ip_type.as_deref() == Some(IP_TYPE_EXCLUSIVE) {
            raw.nics
        } else {
            Vec::new()
        };

        Ok(ZoneConfig {
            name: name.to_owned(),
            brand,
            state: state.map(|s| canonical_state(s).to_owned()),
            attribs: raw.attribs,
            nics,
            attrs: raw.attrs,
            path,
            dirty: false,
        })
    }

    pub fn create(name: &str, brand: Brand) -> Result<Self, ZoneError> {
        Self::create_in(Path::new(ZONE_DIR), name, brand)
    }

    pub fn create_in(dir: &Path, name: &str, brand: Brand) -> Result<Self, ZoneError> {
        let path = config_path(dir, name);
        if path.exists() {
            return Err(ZoneError::AlreadyExists(name.to_owned()));
        }

        Ok(ZoneConfig {
            name: name.to_owned(),
            brand,
            state: None,
            attribs: RootAttribs {
                zonepath: None,
                brand: Some(brand.to_string()),
                autoboot: Some("false".to_owned()),
                ip_type: Some(IP_TYPE_EXCLUSIVE.to_owned()),
            },
            nics: Vec::new(),
            attrs: Vec::new(),
            path,
            dirty: true,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn brand(&self) -> Brand {
        self.brand
    }

    #[inline]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[inline]
    pub fn nics(&self) -> &[Nic] {
        &self.nics
    }

    #[inline]
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get_attrib(&self, key: &str) -> Option<&str> {
        self.attribs.get(key)
    }

    /// Set a root attribute, returning the previous value. Keys outside
    /// [`ROOT_ATTRIBS`] are ignored and leave the object untouched; custom
    /// data belongs in `attr` elements.
    pub fn set_attrib(&mut self, key: &str, value: &str) -> Option<String> {
        let slot = self.attribs.slot_mut(key)?;
        let old = slot.replace(value.to_owned());
        self.dirty = true;
        old
    }

    pub fn validate(&self) -> bool {
        for key in ROOT_ATTRIBS {
            match self.attribs.get(key) {
                Some(value) if !value.is_empty() => {}
                _ => {
                    warn!("zone validation failed, {key} is missing");
                    return false;
                }
            }
        }
        true
    }

    /// Persist the configuration. `Ok(false)` means validation rejected it
    /// and nothing was written; the object stays dirty so a later save can
    /// succeed once the fields are fixed. A clean object is a no-op.
    ///
    /// The document is written to a sibling `.new` file and renamed over
    /// the target, so a partial configuration is never observable at the
    /// canonical path.
    pub fn save(&mut self) -> Result<bool, ZoneError> {
        if !self.validate() {
            return Ok(false);
        }
        if !self.dirty {
            return Ok(true);
        }

        let doc = xml::serialize(self)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".new");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &doc)?;
        fs::rename(&tmp, &self.path)?;
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o644))?;

        self.dirty = false;
        Ok(true)
    }

    pub fn power(&self, op: PowerOp) -> Result<PowerOutcome, ZoneError> {
        self.brand.power_control().power(self, op)
    }

    pub fn poweroff(&self) -> Result<PowerOutcome, ZoneError> {
        self.power(PowerOp::Poweroff)
    }

    pub fn reset(&self) -> Result<PowerOutcome, ZoneError> {
        self.power(PowerOp::Reset)
    }

    pub fn nmi(&self) -> Result<PowerOutcome, ZoneError> {
        self.power(PowerOp::Nmi)
    }
}
