use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the bulk color comparison runs.
///
/// The device only affects throughput; every device produces the same mask.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// Single-threaded batched predicate over the whole buffer.
    #[default]
    Cpu,
    /// Row-chunked evaluation on the rayon thread pool (feature `parallel`).
    ///
    /// Without the `parallel` feature this falls back to [`ComputeDevice::Cpu`].
    Accelerated,
}

impl ComputeDevice {
    pub fn as_str(self) -> &'static str {
        match self {
            ComputeDevice::Cpu => "cpu",
            ComputeDevice::Accelerated => "accelerated",
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(ComputeDevice::Cpu),
            "accelerated" | "parallel" | "cuda" | "gpu" => Ok(ComputeDevice::Accelerated),
            other => Err(format!(
                "unknown compute device '{other}' (expected 'cpu' or 'accelerated')"
            )),
        }
    }
}
