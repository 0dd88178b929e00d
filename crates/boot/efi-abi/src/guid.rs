//! UEFI Globally Unique Identifier (GUID) type and well-known constants.
//!
//! The ABI treats a GUID as 128 opaque bits laid out as four 32-bit parts; two GUIDs are
//! equal exactly when all 128 bits are equal. The familiar registry notation
//! (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`) only matters when writing constants down, so
//! [`EfiGuid::from_fields`] packs that notation into the in-memory representation.

use core::fmt;

/// A UEFI Globally Unique Identifier.
///
/// Stored as four little-endian 32-bit parts, which is byte-for-byte the layout firmware
/// uses for `EFI_GUID` (`UINT32 Data1; UINT16 Data2; UINT16 Data3; UINT8 Data4[8]`).
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EfiGuid {
    parts: [u32; 4],
}

#[expect(
    clippy::unreadable_literal,
    reason = "GUID bytes are inherently opaque"
)]
impl EfiGuid {
    /// The all-zero GUID.
    pub const NULL: Self = Self::from_parts([0; 4]);

    /// Creates a GUID from its four in-memory 32-bit parts.
    #[must_use]
    pub const fn from_parts(parts: [u32; 4]) -> Self {
        Self { parts }
    }

    /// Creates a GUID from the registry fields `data1-data2-data3-data4`.
    #[must_use]
    pub const fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        let d2 = data2.to_le_bytes();
        let d3 = data3.to_le_bytes();
        Self {
            parts: [
                data1,
                u32::from_le_bytes([d2[0], d2[1], d3[0], d3[1]]),
                u32::from_le_bytes([data4[0], data4[1], data4[2], data4[3]]),
                u32::from_le_bytes([data4[4], data4[5], data4[6], data4[7]]),
            ],
        }
    }

    /// Returns the four in-memory 32-bit parts.
    #[must_use]
    pub const fn parts(&self) -> [u32; 4] {
        self.parts
    }

    /// Returns the registry fields `(data1, data2, data3, data4)`.
    #[must_use]
    pub const fn fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let mid = self.parts[1].to_le_bytes();
        let lo = self.parts[2].to_le_bytes();
        let hi = self.parts[3].to_le_bytes();
        (
            self.parts[0],
            u16::from_le_bytes([mid[0], mid[1]]),
            u16::from_le_bytes([mid[2], mid[3]]),
            [lo[0], lo[1], lo[2], lo[3], hi[0], hi[1], hi[2], hi[3]],
        )
    }

    /// Returns the 16 bytes of the GUID in memory order.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        let mut i = 0;
        while i < 4 {
            let b = self.parts[i].to_le_bytes();
            out[i * 4] = b[0];
            out[i * 4 + 1] = b[1];
            out[i * 4 + 2] = b[2];
            out[i * 4 + 3] = b[3];
            i += 1;
        }
        out
    }

    // ── Protocol GUIDs ───────────────────────────────────────────────

    /// Simple Text Input Protocol GUID.
    pub const SIMPLE_TEXT_INPUT_PROTOCOL: Self = Self::from_fields(
        0x387477c1,
        0x69c7,
        0x11d2,
        [0x8e, 0x39, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
    );

    /// Simple Text Output Protocol GUID.
    pub const SIMPLE_TEXT_OUTPUT_PROTOCOL: Self = Self::from_fields(
        0x387477c2,
        0x69c7,
        0x11d2,
        [0x8e, 0x39, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
    );

    /// Loaded Image Protocol GUID.
    pub const LOADED_IMAGE_PROTOCOL: Self = Self::from_fields(
        0x5b1b31a1,
        0x9562,
        0x11d2,
        [0x8e, 0x3f, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
    );

    /// Device Path Protocol GUID.
    pub const DEVICE_PATH_PROTOCOL: Self = Self::from_fields(
        0x09576e91,
        0x6d3f,
        0x11d2,
        [0x8e, 0x39, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
    );

    // ── Configuration Table GUIDs ────────────────────────────────────

    /// ACPI 2.0 Table GUID.
    pub const ACPI_20_TABLE: Self = Self::from_fields(
        0x8868e871,
        0xe4f1,
        0x11d3,
        [0xbc, 0x22, 0x00, 0x80, 0xc7, 0x3c, 0x88, 0x81],
    );

    /// ACPI 1.0 Table GUID.
    pub const ACPI_TABLE: Self = Self::from_fields(
        0xeb9d2d30,
        0x2d88,
        0x11d3,
        [0x9a, 0x16, 0x00, 0x90, 0x27, 0x3f, 0xc1, 0x4d],
    );

    /// SMBIOS Table GUID.
    pub const SMBIOS_TABLE: Self = Self::from_fields(
        0xeb9d2d31,
        0x2d88,
        0x11d3,
        [0x9a, 0x16, 0x00, 0x90, 0x27, 0x3f, 0xc1, 0x4d],
    );

    /// SMBIOS 3.0 Table GUID.
    pub const SMBIOS3_TABLE: Self = Self::from_fields(
        0xf2fd1544,
        0x9794,
        0x4a2c,
        [0x99, 0x2e, 0xe5, 0xbb, 0xcf, 0x20, 0xe3, 0x94],
    );

    /// Device Tree Table GUID.
    pub const DEVICE_TREE_TABLE: Self = Self::from_fields(
        0xb1b621d5,
        0xf19c,
        0x41a5,
        [0x83, 0x0b, 0xd9, 0x15, 0x2c, 0x69, 0xaa, 0xe0],
    );
}

impl fmt::Debug for EfiGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EfiGuid({self})")
    }
}

impl fmt::Display for EfiGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (data1, data2, data3, data4) = self.fields();
        write!(f, "{data1:08x}-{data2:04x}-{data3:04x}-")?;
        for byte in &data4[..2] {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("-")?;
        for byte in &data4[2..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    assert!(core::mem::size_of::<EfiGuid>() == 16);
    assert!(core::mem::align_of::<EfiGuid>() == 4);
};
