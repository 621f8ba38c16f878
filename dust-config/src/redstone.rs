use serde::{Deserialize, Serialize};

/// Which wire propagation algorithm the engine runs.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RedstoneImplementation {
    /// Worklist relaxation: re-evaluate a wire, and when it changes queue every
    /// position that might read it.
    Vanilla,
    /// Breadth-first resolution of the whole network, one write per wire.
    #[default]
    Eigencraft,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RedstoneConfig {
    pub implementation: RedstoneImplementation,
    /// Remove wires whose floor is no longer solid before propagating.
    pub break_unsupported_wire: bool,
    /// Delay, in ticks, of the tick scheduled on a directional device whose
    /// input wire changed power.
    pub device_tick_delay: u32,
}

impl Default for RedstoneConfig {
    fn default() -> Self {
        Self {
            implementation: RedstoneImplementation::default(),
            break_unsupported_wire: true,
            device_tick_delay: 2,
        }
    }
}

impl RedstoneConfig {
    #[must_use]
    pub fn with_implementation(implementation: RedstoneImplementation) -> Self {
        Self {
            implementation,
            ..Self::default()
        }
    }
}
