use serde::{Deserialize, Serialize};

use super::identifiers::EnergyMeterId;

/// Calibration-law relevant energy meter of a charging station or EVSE.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyMeter {
    pub id: EnergyMeterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_url: Option<String>,
}

impl EnergyMeter {
    pub fn new(id: EnergyMeterId) -> Self {
        Self {
            id,
            model: None,
            model_url: None,
            hardware_version: None,
            firmware_version: None,
            manufacturer: None,
            manufacturer_url: None,
        }
    }
}
