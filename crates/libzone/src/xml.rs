//! XML boundary for the zone configuration dialect.
//!
//! Parsing is tolerant: only the root attributes and the direct `network`
//! and `attr` children feed the model, anything else is ignored. Writing is
//! format-stable with a byte-exact prolog and DOCTYPE so the produced files
//! stay compatible with the system zone utilities.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::{error::ZoneError, Attr, Nic, RootAttribs, ZoneConfig, ROOT_ATTRIBS};

pub(crate) const XML_DECL: &[u8] = b"<?xml version=\"1.0\"?>\n";
pub(crate) const DOCTYPE: &[u8] = b"<!DOCTYPE zone PUBLIC \"-//Sun Microsystems Inc//DTD Zones//EN\" \"file:///usr/share/lib/xml/dtd/zonecfg.dtd.1\">\n";

#[derive(Debug, Default)]
pub(crate) struct RawConfig {
    pub attribs: RootAttribs,
    pub nics: Vec<Nic>,
    pub attrs: Vec<Attr>,
}

pub(crate) fn parse(doc: &str) -> Result<RawConfig, ZoneError> {
    let mut reader = Reader::from_str(doc);
    reader.trim_text(true);

    let mut raw = RawConfig::default();
    let mut depth = 0u32;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                element(&mut raw, &e, depth)?;
                depth += 1;
            }
            Event::Empty(e) => element(&mut raw, &e, depth)?,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(raw)
}

fn element(raw: &mut RawConfig, e: &BytesStart, depth: u32) -> Result<(), ZoneError> {
    match (depth, e.name().as_ref()) {
        (0, b"zone") => {
            for attr in e.attributes() {
                let attr = attr.map_err(quick_xml::Error::from)?;
                let value = attr.unescape_value()?.into_owned();
                match attr.key.as_ref() {
                    b"zonepath" => raw.attribs.zonepath = Some(value),
                    b"brand" => raw.attribs.brand = Some(value),
                    b"autoboot" => raw.attribs.autoboot = Some(value),
                    b"ip-type" => raw.attribs.ip_type = Some(value),
                    _ => {}
                }
            }
        }
        (1, b"network") => {
            let mut name = None;
            let mut address = None;
            let mut gateway = None;
            for attr in e.attributes() {
                let attr = attr.map_err(quick_xml::Error::from)?;
                let value = attr.unescape_value()?.into_owned();
                match attr.key.as_ref() {
                    b"physical" => name = Some(value),
                    b"allowed-address" => address = Some(value),
                    b"defrouter" => gateway = Some(value),
                    _ => {}
                }
            }
            // network elements without a physical link are meaningless
            if let Some(name) = name {
                raw.nics.push(Nic {
                    name,
                    address,
                    gateway,
                });
            }
        }
        (1, b"attr") => {
            let mut name = None;
            let mut value = None;
            for attr in e.attributes() {
                let attr = attr.map_err(quick_xml::Error::from)?;
                let v = attr.unescape_value()?.into_owned();
                match attr.key.as_ref() {
                    b"name" => name = Some(v),
                    b"value" => value = Some(v),
                    _ => {}
                }
            }
            if let Some(name) = name {
                raw.attrs.push(Attr { name, value });
            }
        }
        _ => {}
    }

    Ok(())
}

/// Serialize the whole document, preamble included, as the bytes to land
/// on disk.
pub(crate) fn serialize(zone: &ZoneConfig) -> Result<Vec<u8>, ZoneError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut root = BytesStart::new("zone");
    for key in ROOT_ATTRIBS {
        if let Some(value) = zone.get_attrib(key) {
            root.push_attribute((key, value));
        }
    }

    if zone.nics().is_empty() && zone.attrs().is_empty() {
        writer.write_event(Event::Empty(root))?;
    } else {
        writer.write_event(Event::Start(root))?;
        for nic in zone.nics() {
            let mut e = BytesStart::new("network");
            e.push_attribute(("physical", nic.name.as_str()));
            if let Some(address) = &nic.address {
                e.push_attribute(("allowed-address", address.as_str()));
            }
            if let Some(gateway) = &nic.gateway {
                e.push_attribute(("defrouter", gateway.as_str()));
            }
            writer.write_event(Event::Empty(e))?;
        }
        for attr in zone.attrs() {
            let mut e = BytesStart::new("attr");
            e.push_attribute(("name", attr.name.as_str()));
            if let Some(value) = &attr.value {
                e.push_attribute(("value", value.as_str()));
            }
            writer.write_event(Event::Empty(e))?;
        }
        writer.write_event(Event::End(BytesEnd::new("zone")))?;
    }

    let body = writer.into_inner();
    let mut doc = Vec::with_capacity(XML_DECL.len() + DOCTYPE.len() + body.len() + 1);
    doc.extend_from_slice(XML_DECL);
    doc.extend_from_slice(DOCTYPE);
    doc.extend_from_slice(&body);
    doc.push(b'\n');

    Ok(doc)
}
