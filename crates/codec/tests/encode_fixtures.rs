//! Integration tests for encoding records to VMX text.

use std::error::Error;
use vmx_codec::{CodecOptions, DepthPolicy, Encoder, RawPair, Vmx, to_string, to_string_with};

#[derive(Debug, Default, Vmx)]
struct FlatVm {
    #[vmx(".encoding")]
    encoding: String,
    #[vmx("annotation")]
    annotation: String,
    #[vmx("virtualHW.version")]
    hw_version: u8,
    #[vmx("virtualHW.productCompatibility")]
    hw_compat: String,
    #[vmx("memsize")]
    memsize: u32,
    #[vmx("numvcpus")]
    numvcpus: u32,
    #[vmx("mem.hotadd")]
    mem_hot_add: bool,
    #[vmx("displayName")]
    display_name: String,
    #[vmx("guestOS")]
    guest_os: String,
    #[vmx("msg.autoAnswer")]
    auto_answer: bool,
}

const BASE_OUTPUT: &str = r#".encoding = "utf-8"
annotation = "Test VM"
virtualHW.version = "10"
virtualHW.productCompatibility = "hosted"
memsize = "1024"
numvcpus = "2"
mem.hotadd = "false"
displayName = "test"
guestOS = "other3xlinux-64"
msg.autoAnswer = "true"
"#;

#[test]
fn encodes_flat_record_in_declaration_order() -> Result<(), Box<dyn Error>> {
    let vm = FlatVm {
        encoding: "utf-8".to_owned(),
        annotation: "Test VM".to_owned(),
        hw_version: 10,
        hw_compat: "hosted".to_owned(),
        memsize: 1024,
        numvcpus: 2,
        mem_hot_add: false,
        display_name: "test".to_owned(),
        guest_os: "other3xlinux-64".to_owned(),
        auto_answer: true,
    };
    assert_eq!(to_string(&vm)?, BASE_OUTPUT);
    Ok(())
}

#[derive(Debug, Default, Vmx)]
struct VirtualHardware {
    #[vmx("version")]
    version: String,
    #[vmx("productCompatibility")]
    compat: String,
}

#[derive(Debug, Default, Vmx)]
struct NestedVm {
    #[vmx(".encoding")]
    encoding: String,
    #[vmx("annotation")]
    annotation: String,
    #[vmx("virtualHW")]
    hardware: VirtualHardware,
    #[vmx("memsize")]
    memsize: u32,
    #[vmx("numvcpus")]
    numvcpus: u32,
    #[vmx("mem.hotadd")]
    mem_hot_add: bool,
    #[vmx("displayName")]
    display_name: String,
    #[vmx("guestOS")]
    guest_os: String,
    #[vmx("msg.autoAnswer")]
    auto_answer: bool,
    #[vmx("ethernet")]
    ethernet: Vec<Ethernet>,
    #[vmx("ide")]
    ide: Vec<IdeDevice>,
    #[vmx("scsi")]
    scsi: Vec<IdeDevice>,
    #[vmx("usb")]
    usb: Vec<UsbDevice>,
}

#[derive(Debug, Default, Vmx)]
struct Ethernet {
    #[vmx("startConnected")]
    start_connected: bool,
    #[vmx("present")]
    present: bool,
    #[vmx("connectionType")]
    connection_type: String,
    #[vmx("virtualDev")]
    virtual_dev: String,
    #[vmx("wakeOnPcktRcv")]
    wake_on_packet: bool,
    #[vmx("addressType")]
    address_type: String,
    #[vmx("linkStatePropagation.enable,omitempty")]
    link_state_propagation: bool,
}

#[derive(Debug, Default, Vmx)]
struct IdeDevice {
    #[vmx("present,omitempty")]
    present: bool,
    #[vmx("devicetype,omitempty")]
    device_type: String,
    #[vmx("filename,omitempty")]
    filename: String,
}

#[derive(Debug, Default, Vmx)]
struct UsbDevice {
    #[vmx("present,omitempty")]
    present: bool,
    #[vmx("speed,omitempty")]
    speed: u32,
    #[vmx("devicetype,omitempty")]
    device_type: String,
    #[vmx("port,omitempty")]
    port: u32,
    #[vmx("parent,omitmepty")]
    parent: String,
}

fn nested_vm() -> NestedVm {
    NestedVm {
        encoding: "utf-8".to_owned(),
        annotation: "Test VM".to_owned(),
        hardware: VirtualHardware {
            version: "10".to_owned(),
            compat: "hosted".to_owned(),
        },
        memsize: 1024,
        numvcpus: 2,
        mem_hot_add: false,
        display_name: "test".to_owned(),
        guest_os: "other3xlinux-64".to_owned(),
        auto_answer: true,
        ..NestedVm::default()
    }
}

fn ide(device_type: &str, filename: &str) -> IdeDevice {
    IdeDevice {
        present: true,
        device_type: device_type.to_owned(),
        filename: filename.to_owned(),
    }
}

#[test]
fn nested_record_composes_dotted_keys() -> Result<(), Box<dyn Error>> {
    assert_eq!(to_string(&nested_vm())?, BASE_OUTPUT);
    Ok(())
}

#[test]
fn sequences_get_zero_based_indices() -> Result<(), Box<dyn Error>> {
    let mut vm = nested_vm();
    vm.hardware.version = "9".to_owned();
    vm.ethernet = vec![
        Ethernet {
            start_connected: true,
            present: true,
            connection_type: "bridged".to_owned(),
            virtual_dev: "e1000".to_owned(),
            wake_on_packet: false,
            address_type: "generated".to_owned(),
            link_state_propagation: true,
        },
        Ethernet {
            start_connected: true,
            present: true,
            connection_type: "nat".to_owned(),
            virtual_dev: "e1000".to_owned(),
            wake_on_packet: false,
            address_type: "generated".to_owned(),
            link_state_propagation: false,
        },
    ];
    vm.ide = vec![
        ide("cdrom-image", "coreos.img"),
        ide("cdrom-raw", ""),
        ide("cdrom-image", "coreos-alpha.img"),
    ];
    vm.usb = vec![
        UsbDevice {
            present: true,
            speed: 2,
            device_type: "hub".to_owned(),
            port: 1,
            parent: "1".to_owned(),
        },
        UsbDevice {
            present: true,
            speed: 0,
            device_type: "hid".to_owned(),
            port: 0,
            parent: "-1".to_owned(),
        },
    ];

    let expected = BASE_OUTPUT.replace("virtualHW.version = \"10\"", "virtualHW.version = \"9\"")
        + r#"ethernet0.startConnected = "true"
ethernet0.present = "true"
ethernet0.connectionType = "bridged"
ethernet0.virtualDev = "e1000"
ethernet0.wakeOnPcktRcv = "false"
ethernet0.addressType = "generated"
ethernet0.linkStatePropagation.enable = "true"
ethernet1.startConnected = "true"
ethernet1.present = "true"
ethernet1.connectionType = "nat"
ethernet1.virtualDev = "e1000"
ethernet1.wakeOnPcktRcv = "false"
ethernet1.addressType = "generated"
ide0.present = "true"
ide0.devicetype = "cdrom-image"
ide0.filename = "coreos.img"
ide1.present = "true"
ide1.devicetype = "cdrom-raw"
ide2.present = "true"
ide2.devicetype = "cdrom-image"
ide2.filename = "coreos-alpha.img"
usb0.present = "true"
usb0.speed = "2"
usb0.devicetype = "hub"
usb0.port = "1"
usb0.parent = "1"
usb1.present = "true"
usb1.devicetype = "hid"
usb1.parent = "-1"
"#;
    assert_eq!(to_string(&vm)?, expected);
    Ok(())
}

#[derive(Debug, Default, Vmx)]
struct Chain {
    #[vmx("name")]
    name: String,
    #[vmx("next")]
    next: Vec<Chain>,
}

fn chain(depth: usize) -> Chain {
    let mut node = Chain {
        name: format!("n{depth}"),
        next: Vec::new(),
    };
    for level in (0..depth).rev() {
        node = Chain {
            name: format!("n{level}"),
            next: vec![node],
        };
    }
    node
}

#[test]
fn depth_bound_truncates_by_default() -> Result<(), Box<dyn Error>> {
    let options = CodecOptions::default().with_max_depth(2);
    let pairs = Encoder::new(options).encode_pairs(&chain(4))?;
    assert_eq!(
        pairs,
        vec![
            RawPair::new("name", "n0"),
            RawPair::new("next0.name", "n1"),
            RawPair::new("next0.next0.name", "n2"),
        ]
    );
    Ok(())
}

#[test]
fn depth_bound_can_fail_instead() {
    let options = CodecOptions::default()
        .with_max_depth(2)
        .with_depth_policy(DepthPolicy::Error);
    let result = to_string_with(&chain(4), &options);
    assert!(matches!(
        result,
        Err(vmx_codec::Error::DepthExceeded { ref path, max_depth: 2 }) if path == "next0.next0.next0"
    ));
}
