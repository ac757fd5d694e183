use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};

/// A named port to probe on the local host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortTarget {
    pub name: String,
    pub port: u16,
}

/// Build the target list from the `ports` config mapping (port number -> display name).
///
/// Port keys must be decimal numbers in 1..=65535. Targets are returned sorted by port.
/// Two ports sharing a display name are accepted, but they write to the same status
/// entry, so a warning is logged.
pub fn targets_from_map(map: &BTreeMap<String, String>) -> Result<Vec<PortTarget>> {
    let mut out = Vec::with_capacity(map.len());
    for (raw_port, name) in map {
        let port = parse_port_str(raw_port.trim())
            .with_context(|| format!("ports: invalid port key: {raw_port}"))?;
        out.push(PortTarget {
            name: name.clone(),
            port,
        });
    }
    out.sort_by_key(|t| t.port);

    let mut seen = HashSet::new();
    for t in &out {
        if !seen.insert(t.name.as_str()) {
            tracing::warn!(name = %t.name, port = t.port, "display name used by more than one port");
        }
    }
    Ok(out)
}

pub fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}
