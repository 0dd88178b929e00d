//! Protocol interface types referenced by the tables.
//!
//! The console protocols are opaque here: the system table carries pointers to them, but
//! their function tables are not part of this crate. The device-path node header is
//! described, since boot services take device paths as parameters.

use core::marker::{PhantomData, PhantomPinned};

use crate::EfiGuid;

/// A protocol identified by a GUID.
///
/// # Safety
///
/// `GUID` must identify a protocol whose interface has the layout of `Raw`.
pub unsafe trait Protocol {
    /// The protocol GUID.
    const GUID: EfiGuid;
    /// The interface type located through the GUID.
    type Raw;
}

/// The console text input protocol. Opaque.
#[repr(C)]
pub struct SimpleTextInputProtocol {
    _opaque: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// The console text output protocol. Opaque.
#[repr(C)]
pub struct SimpleTextOutputProtocol {
    _opaque: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

// SAFETY: The GUIDs are the text console protocol GUIDs.
unsafe impl Protocol for SimpleTextInputProtocol {
    const GUID: EfiGuid = EfiGuid::SIMPLE_TEXT_INPUT_PROTOCOL;
    type Raw = Self;
}

// SAFETY: As above.
unsafe impl Protocol for SimpleTextOutputProtocol {
    const GUID: EfiGuid = EfiGuid::SIMPLE_TEXT_OUTPUT_PROTOCOL;
    type Raw = Self;
}

/// Header of one device-path node.
///
/// A device path is a sequence of variable-length nodes ending with an end-of-path node.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePathProtocol {
    /// Node type; see [`node_type`].
    pub node_type: u8,
    /// Type-specific sub-type.
    pub sub_type: u8,
    /// Length of the node in bytes, header included, little-endian.
    pub length: [u8; 2],
}

impl DevicePathProtocol {
    /// Sub-type that ends the entire path when paired with [`node_type::END`].
    pub const END_ENTIRE_SUBTYPE: u8 = 0xff;

    /// Length of the node in bytes.
    #[must_use]
    pub const fn node_length(&self) -> u16 {
        u16::from_le_bytes(self.length)
    }

    /// Returns `true` for the node that terminates the path.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node_type == node_type::END && self.sub_type == Self::END_ENTIRE_SUBTYPE
    }
}

// SAFETY: The GUID is the device path protocol GUID, whose interface is a node list.
unsafe impl Protocol for DevicePathProtocol {
    const GUID: EfiGuid = EfiGuid::DEVICE_PATH_PROTOCOL;
    type Raw = Self;
}

/// Device-path node types.
pub mod node_type {
    /// Hardware device path.
    pub const HARDWARE: u8 = 0x01;
    /// ACPI device path.
    pub const ACPI: u8 = 0x02;
    /// Messaging device path.
    pub const MESSAGING: u8 = 0x03;
    /// Media device path.
    pub const MEDIA: u8 = 0x04;
    /// BIOS boot specification device path.
    pub const BIOS_BOOT_SPEC: u8 = 0x05;
    /// End of the path or of one instance.
    pub const END: u8 = 0x7f;
}

const _: () = assert!(core::mem::size_of::<DevicePathProtocol>() == 4);
