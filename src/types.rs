use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reachability verdict for a single probed port.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Open,
    Closed,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Open => "Open",
            Verdict::Closed => "Closed",
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Verdict::Open)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known verdict per target display name.
pub type Snapshot = BTreeMap<String, Verdict>;

/// Body returned by the status route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusBody {
    pub status: String,
    pub ports: Snapshot,
}

impl StatusBody {
    pub fn running(ports: Snapshot) -> Self {
        Self {
            status: "running".into(),
            ports,
        }
    }
}
