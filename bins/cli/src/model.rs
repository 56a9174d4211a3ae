//! Built-in virtual machine model used by `decode`, `encode`, and `keys`.
//!
//! Covers the commonly edited parts of a hosted VM descriptor. Keys the
//! model does not name are ignored on decode and absent on encode.

use serde::{Deserialize, Serialize};
use vmx_codec::Vmx;

/// Top-level `.vmx` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachine {
    #[vmx(".encoding")]
    pub encoding: String,
    #[vmx("annotation,omitempty")]
    pub annotation: String,
    #[vmx("config.version,omitempty")]
    pub config_version: u32,
    #[vmx("virtualHW")]
    pub hardware: VirtualHardware,
    #[vmx("displayName")]
    pub display_name: String,
    #[vmx("guestOS")]
    pub guest_os: String,
    #[vmx("memsize")]
    pub memsize: u32,
    #[vmx("numvcpus")]
    pub numvcpus: u32,
    #[vmx("cpuid.coresPerSocket,omitempty")]
    pub cores_per_socket: u32,
    #[vmx("mem.hotadd,omitempty")]
    pub mem_hot_add: bool,
    #[vmx("msg.autoAnswer,omitempty")]
    pub auto_answer: bool,
    #[vmx("nvram,omitempty")]
    pub nvram: String,
    #[vmx("extendedConfigFile,omitempty")]
    pub extended_config_file: String,
    #[vmx("uuid.bios,omitempty")]
    pub bios_uuid: String,
    #[vmx("ethernet")]
    pub ethernet: Vec<Ethernet>,
    #[vmx("ide")]
    pub ide: Vec<Disk>,
    #[vmx("scsi")]
    pub scsi: Vec<Disk>,
    #[vmx("sata")]
    pub sata: Vec<Disk>,
    #[vmx("pciBridge")]
    pub pci_bridges: Vec<PciBridge>,
    #[vmx("remotedisplay.vnc")]
    pub vnc: Vnc,
    #[vmx("tools")]
    pub tools: Tools,
}

/// `virtualHW.*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualHardware {
    #[vmx("version")]
    pub version: String,
    #[vmx("productCompatibility,omitempty")]
    pub compat: String,
}

/// One `ethernetN.*` adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct Ethernet {
    #[vmx("present")]
    pub present: bool,
    #[vmx("startConnected")]
    pub start_connected: bool,
    #[vmx("connectionType")]
    pub connection_type: String,
    #[vmx("virtualDev")]
    pub virtual_dev: String,
    #[vmx("wakeOnPcktRcv")]
    pub wake_on_packet: bool,
    #[vmx("addressType")]
    pub address_type: String,
    #[vmx("address,omitempty")]
    pub address: String,
    #[vmx("generatedAddress,omitempty")]
    pub generated_address: String,
    #[vmx("pciSlotNumber,omitempty")]
    pub pci_slot: i32,
    #[vmx("linkStatePropagation.enable,omitempty")]
    pub link_state_propagation: bool,
}

/// An `ideN:M.*`, `scsiN:M.*`, or `sataN:M.*` entry (controller or disk).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct Disk {
    #[vmx("present")]
    pub present: bool,
    #[vmx("deviceType,omitempty")]
    pub device_type: String,
    #[vmx("fileName,omitempty")]
    pub filename: String,
    #[vmx("virtualDev,omitempty")]
    pub virtual_dev: String,
    #[vmx("pciSlotNumber,omitempty")]
    pub pci_slot: i32,
}

/// One `pciBridgeN.*` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct PciBridge {
    #[vmx("present")]
    pub present: bool,
    #[vmx("pciSlotNumber")]
    pub pci_slot: i32,
    #[vmx("functions,omitempty")]
    pub functions: u8,
    #[vmx("virtualDev,omitempty")]
    pub virtual_dev: String,
}

/// `remotedisplay.vnc.*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct Vnc {
    #[vmx("enabled,omitempty")]
    pub enabled: bool,
    #[vmx("port,omitempty")]
    pub port: u16,
}

/// `tools.*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Vmx)]
#[serde(rename_all = "camelCase", default)]
pub struct Tools {
    #[vmx("syncTime")]
    pub sync_time: bool,
    #[vmx("upgrade.policy,omitempty")]
    pub upgrade_policy: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmx_codec::{Record, from_str, to_string};

    #[test]
    fn model_schema_builds() -> Result<(), Box<dyn std::error::Error>> {
        let schema = vmx_codec::check_tree(VirtualMachine::record_schema)?;
        assert_eq!(schema.type_name(), "VirtualMachine");
        Ok(())
    }

    #[test]
    fn model_round_trips_through_text() -> Result<(), Box<dyn std::error::Error>> {
        let vm = VirtualMachine {
            encoding: "UTF-8".to_owned(),
            display_name: "core01".to_owned(),
            guest_os: "other3xlinux-64".to_owned(),
            memsize: 1024,
            numvcpus: 1,
            hardware: VirtualHardware {
                version: "9".to_owned(),
                compat: "hosted".to_owned(),
            },
            ethernet: vec![Ethernet {
                present: true,
                start_connected: true,
                connection_type: "nat".to_owned(),
                virtual_dev: "e1000".to_owned(),
                wake_on_packet: true,
                address_type: "generated".to_owned(),
                ..Ethernet::default()
            }],
            pci_bridges: vec![PciBridge {
                present: true,
                pci_slot: 17,
                ..PciBridge::default()
            }],
            tools: Tools {
                sync_time: true,
                upgrade_policy: String::new(),
            },
            ..VirtualMachine::default()
        };

        let text = to_string(&vm)?;
        assert!(text.contains("ethernet0.connectionType = \"nat\"\n"));
        assert!(!text.contains("annotation"));
        assert_eq!(from_str::<VirtualMachine>(&text)?, vm);
        Ok(())
    }
}
