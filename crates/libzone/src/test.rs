use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;

use crate::power::{PowerOp, PowerOutcome};
use crate::registry::{list_from, parse_inventory_line};
use crate::{config_path, Brand, ZoneConfig, ZoneError};

const TESTZONE_XML: &str = r#"<?xml version="1.0"?>
<!DOCTYPE zone PUBLIC "-//Sun Microsystems Inc//DTD Zones//EN" "file:///usr/share/lib/xml/dtd/zonecfg.dtd.1">
<zone zonepath="/zones/testzone" brand="bhyve" autoboot="true" ip-type="exclusive">
  <network physical="testzone0" allowed-address="10.0.0.5/24" defrouter="10.0.0.1"/>
  <network physical="testzone1"/>
  <attr name="ram" value="4G"/>
  <attr name="vcpus" value="2"/>
</zone>
"#;

const SHAREDZONE_XML: &str = r#"<?xml version="1.0"?>
<!DOCTYPE zone PUBLIC "-//Sun Microsystems Inc//DTD Zones//EN" "file:///usr/share/lib/xml/dtd/zonecfg.dtd.1">
<zone zonepath="/zones/shared" brand="sparse" autoboot="false" ip-type="shared">
  <network physical="shared0" defrouter="10.0.0.1"/>
</zone>
"#;

fn write_zone(dir: &Path, name: &str, doc: &str) {
    fs::write(config_path(dir, name), doc).unwrap();
}

#[test]
fn test_load_parses_model() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let zone = ZoneConfig::load_in(dir.path(), "testzone", Some("running")).unwrap();
    assert_eq!(zone.name(), "testzone");
    assert_eq!(zone.brand(), Brand::Bhyve);
    assert_eq!(zone.state(), Some("running"));
    assert!(!zone.is_dirty());

    assert_eq!(zone.get_attrib("zonepath"), Some("/zones/testzone"));
    assert_eq!(zone.get_attrib("brand"), Some("bhyve"));
    assert_eq!(zone.get_attrib("autoboot"), Some("true"));
    assert_eq!(zone.get_attrib("ip-type"), Some("exclusive"));

    assert_eq!(zone.nics().len(), 2);
    assert_eq!(zone.nics()[0].name, "testzone0");
    assert_eq!(zone.nics()[0].address.as_deref(), Some("10.0.0.5/24"));
    assert_eq!(zone.nics()[0].gateway.as_deref(), Some("10.0.0.1"));
    assert_eq!(zone.nics()[1].name, "testzone1");
    assert_eq!(zone.nics()[1].address, None);

    assert_eq!(zone.attrs().len(), 2);
    assert_eq!(zone.attrs()[0].name, "ram");
    assert_eq!(zone.attrs()[0].value.as_deref(), Some("4G"));
    assert_eq!(zone.attrs()[1].name, "vcpus");
}

#[test]
fn test_state_remap() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let zone = ZoneConfig::load_in(dir.path(), "testzone", Some("installed")).unwrap();
    assert_eq!(zone.state(), Some("stopped"));

    let zone = ZoneConfig::load_in(dir.path(), "testzone", Some("configured")).unwrap();
    assert_eq!(zone.state(), Some("configured"));

    let zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    assert_eq!(zone.state(), None);
}

#[test]
fn test_nics_gated_on_ip_type() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "shared", SHAREDZONE_XML);

    let zone = ZoneConfig::load_in(dir.path(), "shared", None).unwrap();
    assert_eq!(zone.get_attrib("ip-type"), Some("shared"));
    assert!(zone.nics().is_empty());
}

#[test]
fn test_load_missing() {
    let dir = TempDir::new().unwrap();
    let err = ZoneConfig::load_in(dir.path(), "nozone", None).unwrap_err();
    assert!(matches!(err, ZoneError::NotFound(name) if name == "nozone"));
}

#[test]
fn test_load_unknown_brand() {
    let dir = TempDir::new().unwrap();
    write_zone(
        dir.path(),
        "weird",
        r#"<?xml version="1.0"?>
<zone zonepath="/zones/weird" brand="cloud" autoboot="false" ip-type="exclusive"/>
"#,
    );

    let err = ZoneConfig::load_in(dir.path(), "weird", None).unwrap_err();
    assert!(matches!(err, ZoneError::UnknownBrand(brand) if brand == "cloud"));
}

#[test]
fn test_set_attrib() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let mut zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    let old = zone.set_attrib("zonepath", "/zones/elsewhere");
    assert_eq!(old.as_deref(), Some("/zones/testzone"));
    assert_eq!(zone.get_attrib("zonepath"), Some("/zones/elsewhere"));
    assert!(zone.is_dirty());

    let mut zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    assert_eq!(zone.set_attrib("bogus", "y"), None);
    assert_eq!(zone.get_attrib("bogus"), None);
    assert!(!zone.is_dirty());
}

#[test]
fn test_create_defaults() {
    let dir = TempDir::new().unwrap();

    let zone = ZoneConfig::create_in(dir.path(), "newzone", Brand::Sparse).unwrap();
    assert_eq!(zone.brand(), Brand::Sparse);
    assert_eq!(zone.get_attrib("brand"), Some("sparse"));
    assert_eq!(zone.get_attrib("autoboot"), Some("false"));
    assert_eq!(zone.get_attrib("ip-type"), Some("exclusive"));
    assert_eq!(zone.get_attrib("zonepath"), None);
    assert!(zone.is_dirty());

    write_zone(dir.path(), "testzone", TESTZONE_XML);
    let err = ZoneConfig::create_in(dir.path(), "testzone", Brand::Sparse).unwrap_err();
    assert!(matches!(err, ZoneError::AlreadyExists(name) if name == "testzone"));
}

#[test]
fn test_validation_gates_save() {
    let dir = TempDir::new().unwrap();
    let target = config_path(dir.path(), "newzone");

    let mut zone = ZoneConfig::create_in(dir.path(), "newzone", Brand::Lipkg).unwrap();
    assert!(!zone.validate());
    assert!(!zone.save().unwrap());
    assert!(!target.exists());
    assert!(zone.is_dirty());

    // fixing the missing field lets the same object save
    zone.set_attrib("zonepath", "/zones/newzone");
    assert!(zone.validate());
    assert!(zone.save().unwrap());
    assert!(target.exists());
    assert!(!zone.is_dirty());

    let reloaded = ZoneConfig::load_in(dir.path(), "newzone", None).unwrap();
    assert_eq!(reloaded.brand(), Brand::Lipkg);
    assert_eq!(reloaded.get_attrib("zonepath"), Some("/zones/newzone"));
}

#[test]
fn test_clean_save_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let mut zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    assert!(zone.save().unwrap());

    let on_disk = fs::read_to_string(config_path(dir.path(), "testzone")).unwrap();
    assert_eq!(on_disk, TESTZONE_XML);
}

#[test]
fn test_rewrite_is_format_stable() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);
    let target = config_path(dir.path(), "testzone");

    // rewriting the same value dirties the object and forces a real write
    let mut zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    zone.set_attrib("autoboot", "true");
    assert!(zone.save().unwrap());
    assert_eq!(fs::read_to_string(&target).unwrap(), TESTZONE_XML);

    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);

    // saving again with no mutation changes nothing
    assert!(zone.save().unwrap());
    assert_eq!(fs::read_to_string(&target).unwrap(), TESTZONE_XML);
}

#[test]
fn test_save_escapes_attribute_values() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let mut zone = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    zone.set_attrib("zonepath", "/zones/a&b");
    assert!(zone.save().unwrap());

    let reloaded = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    assert_eq!(reloaded.get_attrib("zonepath"), Some("/zones/a&b"));
}

#[test]
fn test_power_dispatch() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);
    write_zone(dir.path(), "shared", SHAREDZONE_XML);

    // no vmm device node for this name, so the op is a benign no-op
    let bhyve = ZoneConfig::load_in(dir.path(), "testzone", None).unwrap();
    assert_eq!(bhyve.poweroff().unwrap(), PowerOutcome::NotRunning);
    assert_eq!(bhyve.reset().unwrap(), PowerOutcome::NotRunning);
    assert_eq!(bhyve.nmi().unwrap(), PowerOutcome::NotRunning);

    let sparse = ZoneConfig::load_in(dir.path(), "shared", None).unwrap();
    for op in [PowerOp::Poweroff, PowerOp::Reset, PowerOp::Nmi] {
        let err = sparse.power(op).unwrap_err();
        assert!(matches!(
            err,
            ZoneError::UnsupportedOp {
                brand: Brand::Sparse,
                op: got,
            } if got == op
        ));
    }
}

#[test]
fn test_parse_inventory_line() {
    let entry = parse_inventory_line("1:testzone:running:/zones/testzone:uuid:bhyve:excl").unwrap();
    assert_eq!(entry.name, "testzone");
    assert_eq!(entry.state, "running");
    assert_eq!(entry.brand, "bhyve");

    // trailing fields are tolerated
    let entry =
        parse_inventory_line("0:global:running:/::ipkg:shared:extra:fields").unwrap();
    assert_eq!(entry.name, "global");
    assert_eq!(entry.brand, "ipkg");

    assert!(parse_inventory_line("1:short:line").is_none());
    assert!(parse_inventory_line("").is_none());
}

#[test]
fn test_list_excludes_global_and_unknown_brands() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);
    write_zone(dir.path(), "shared", SHAREDZONE_XML);
    write_zone(
        dir.path(),
        "weird",
        r#"<?xml version="1.0"?>
<zone zonepath="/zones/weird" brand="cloud" autoboot="false" ip-type="exclusive"/>
"#,
    );

    let inventory = "\
0:global:running:/:uuid0:ipkg:shared
1:testzone:running:/zones/testzone:uuid1:bhyve:excl
2:shared:installed:/zones/shared:uuid2:sparse:shared
3:weird:installed:/zones/weird:uuid3:cloud:excl
";

    let zones = list_from(dir.path(), inventory).unwrap();
    let names: Vec<&str> = zones.iter().map(|z| z.name()).collect();
    assert_eq!(names, vec!["testzone", "shared"]);
    assert_eq!(zones[0].state(), Some("running"));
    assert_eq!(zones[1].state(), Some("stopped"));
}

#[test]
fn test_list_propagates_missing_config() {
    let dir = TempDir::new().unwrap();
    write_zone(dir.path(), "testzone", TESTZONE_XML);

    let inventory = "\
1:testzone:running:/zones/testzone:uuid1:bhyve:excl
2:ghost:installed:/zones/ghost:uuid2:bhyve:excl
";

    let err = list_from(dir.path(), inventory).unwrap_err();
    assert!(matches!(err, ZoneError::NotFound(name) if name == "ghost"));
}
