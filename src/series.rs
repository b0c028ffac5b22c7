use std::fmt;

use clap::ValueEnum;

/// Ubuntu series that can back a development container.
///
/// The set is closed: new releases are added here and nowhere else. One tag
/// is the daily/rolling channel, which is published on a different image
/// remote than the stable releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Series {
    Bionic,
    Focal,
    Jammy,
    Noble,
    Questing,
    /// Current development release, published on the daily remote.
    Resolute,
}

impl Series {
    pub fn as_str(self) -> &'static str {
        match self {
            Series::Bionic => "bionic",
            Series::Focal => "focal",
            Series::Jammy => "jammy",
            Series::Noble => "noble",
            Series::Questing => "questing",
            Series::Resolute => "resolute",
        }
    }

    /// Whether this series tracks the daily/rolling channel.
    pub fn is_daily(self) -> bool {
        matches!(self, Series::Resolute)
    }

    /// Image remote the series is published on.
    pub fn remote(self) -> &'static str {
        if self.is_daily() {
            "ubuntu-daily"
        } else {
            "ubuntu"
        }
    }

    /// Full image reference passed to the container manager.
    pub fn image(self) -> String {
        format!("{}:{}", self.remote(), self.as_str())
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
