use std::fmt;
use std::str::FromStr;

use crate::error::AlertsError;

/// Land-use layers that alerts can be intersected with.
///
/// The physical table name is spliced into SQL, so it only ever comes from
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseTable {
    Mining,
    OilPalm,
    Fiber,
    Logging,
}

impl UseTable {
    pub const ALL: [UseTable; 4] = [
        UseTable::Mining,
        UseTable::OilPalm,
        UseTable::Fiber,
        UseTable::Logging,
    ];

    /// Route name, as in `/use/{name}/{id}`.
    pub fn name(&self) -> &'static str {
        match self {
            UseTable::Mining => "mining",
            UseTable::OilPalm => "oilpalm",
            UseTable::Fiber => "fiber",
            UseTable::Logging => "logging",
        }
    }

    /// CartoDB table holding the polygons.
    pub fn table(&self) -> &'static str {
        match self {
            UseTable::Mining => "gfw_mining",
            UseTable::OilPalm => "gfw_oil_palm",
            UseTable::Fiber => "gfw_wood_fiber",
            UseTable::Logging => "gfw_logging",
        }
    }
}

impl FromStr for UseTable {
    type Err = AlertsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UseTable::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| AlertsError::invalid("Name param invalid"))
    }
}

impl fmt::Display for UseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
