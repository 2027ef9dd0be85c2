//! Vendor property sets appended to the registry.
//!
//! Extensions are plain data. The core never branches on which ones are
//! present; they only add descriptors before the registry is frozen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::registry::RegistryError;
use crate::value::ValueKind;

const MTK_GAUGE: &[&str] = &[
    "batt_vol",
    "batt_temp",
    "TemperatureR",
    "TempBattVoltage",
    "InstatVolt",
    "BatteryAverageCurrent",
    "BatterySenseVoltage",
    "ISenseVoltage",
    "ChargerVoltage",
    "status_smb",
    "capacity_smb",
    "present_smb",
    "adjust_power",
];

const OPPO: &[&str] = &[
    "authenticate",
    "charge_timeout",
    "battery_request_poweroff",
    "charge_technology",
    "fastcharger",
    "mmi_charging_enable",
    "stop_charging_enable",
    "otg_switch",
    "otg_online",
    "batt_fcc",
    "batt_soh",
    "batt_cc",
    "batt_rm",
    "notify_code",
    "cool_down",
    "charger_ic",
    "hmac",
    "adapter_fw_update",
    "internal_capacity",
    "chargerid_volt",
    "voocchg_ing",
    "primal_type",
    "call_mode",
    "ship_mode",
    "short_c_batt_update_change",
    "short_c_batt_in_idle",
    "short_c_batt_cv_status",
    "short_c_hw_feature",
    "short_c_hw_status",
    "short_ic_otp_status",
    "short_ic_volt_thresh",
    "short_ic_otp_value",
    "fast2normal_chg",
    "chip_soc",
    "smooth_soc",
    "typec_cc_orientation",
    "usb_status",
    "usbtemp_volt_l",
    "usbtemp_volt_r",
    "typec_sbu_voltage",
    "water_detect_feature",
    "fast_chg_type",
];

/// Userspace short-circuit check nodes. Kernels built this way expose these
/// in place of `short_c_batt_update_change`, `short_c_batt_in_idle` and
/// `short_c_batt_cv_status`.
const OPPO_SHORT_USERSPACE: &[&str] = &[
    "short_c_batt_limit_chg",
    "short_c_batt_limit_rechg",
    "input_current_settled",
];

/// A built-in vendor property list. Every entry is an `int` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionSet {
    /// MediaTek fuel gauge v1.0 engineering-mode nodes.
    MtkGauge,
    /// OPPO charger and battery-check nodes.
    Oppo,
    /// OPPO userspace short-circuit check nodes.
    OppoShortUserspace,
}

impl ExtensionSet {
    pub const ALL: [ExtensionSet; 3] = [
        ExtensionSet::MtkGauge,
        ExtensionSet::Oppo,
        ExtensionSet::OppoShortUserspace,
    ];

    pub fn properties(self) -> &'static [&'static str] {
        match self {
            ExtensionSet::MtkGauge => MTK_GAUGE,
            ExtensionSet::Oppo => OPPO,
            ExtensionSet::OppoShortUserspace => OPPO_SHORT_USERSPACE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtensionSet::MtkGauge => "mtk-gauge",
            ExtensionSet::Oppo => "oppo",
            ExtensionSet::OppoShortUserspace => "oppo-short-userspace",
        }
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ExtensionSet {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtensionSet::ALL
            .into_iter()
            .find(|set| set.name() == s)
            .ok_or_else(|| RegistryError::UnknownExtensionSet(s.to_string()))
    }
}

/// Kind of a configured extension property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    #[default]
    Int,
    Int64,
    Text,
}

impl From<ExtensionKind> for ValueKind {
    fn from(kind: ExtensionKind) -> Self {
        match kind {
            ExtensionKind::Int => ValueKind::Int32,
            ExtensionKind::Int64 => ValueKind::Int64,
            ExtensionKind::Text => ValueKind::Text,
        }
    }
}

/// A single extension descriptor, typically read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionProperty {
    pub name: String,
    #[serde(default)]
    pub kind: ExtensionKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;

    #[test]
    fn test_parse_set_names() {
        assert_eq!("mtk-gauge".parse::<ExtensionSet>(), Ok(ExtensionSet::MtkGauge));
        assert_eq!("oppo".parse::<ExtensionSet>(), Ok(ExtensionSet::Oppo));
        assert_eq!(
            "oppo-short-userspace".parse::<ExtensionSet>(),
            Ok(ExtensionSet::OppoShortUserspace)
        );
        assert!("OPPO".parse::<ExtensionSet>().is_err());
    }

    #[test]
    fn test_all_sets_combine_without_collisions() {
        let mut builder = RegistryBuilder::new();
        for set in ExtensionSet::ALL {
            builder = builder.extension_set(set);
        }
        let registry = builder.build().unwrap();
        let extra: usize = ExtensionSet::ALL.iter().map(|s| s.properties().len()).sum();
        assert_eq!(
            registry.len(),
            crate::registry::Registry::standard_len() + extra
        );
    }

    #[test]
    fn test_oppo_short_userspace_nodes() {
        let registry = RegistryBuilder::new()
            .extension_set(ExtensionSet::Oppo)
            .extension_set(ExtensionSet::OppoShortUserspace)
            .build()
            .unwrap();
        for name in [
            "short_c_batt_limit_chg",
            "short_c_batt_limit_rechg",
            "input_current_settled",
        ] {
            assert_eq!(registry.lookup(name).unwrap().kind, ValueKind::Int32);
        }
    }

    #[test]
    fn test_kind_conversion() {
        assert_eq!(ValueKind::from(ExtensionKind::Int), ValueKind::Int32);
        assert_eq!(ValueKind::from(ExtensionKind::Text), ValueKind::Text);
    }
}
