//! Hardware and network address types.
//!
//! These are fixed-size byte containers. Their contents are opaque at this layer; network
//! protocol bindings interpret them.

/// A 32-byte buffer holding a network interface's hardware (MAC) address.
///
/// Only the first `HwAddressSize` bytes reported by the owning protocol are meaningful; the
/// rest is zero padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EfiMacAddress {
    /// The address bytes.
    pub addr: [u8; 32],
}

/// A 4-byte IPv4 address.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EfiIpv4Address {
    /// The address bytes in network order.
    pub addr: [u8; 4],
}

/// A 16-byte IPv6 address.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EfiIpv6Address {
    /// The address bytes in network order.
    pub addr: [u8; 16],
}

/// A 16-byte buffer holding either an IPv4 or an IPv6 address.
///
/// Which member is live is determined by context (usually an adjacent "is IPv6" flag).
#[repr(C)]
#[derive(Clone, Copy)]
pub union EfiIpAddress {
    /// Raw 32-bit words, also forcing 4-byte alignment.
    pub addr: [u32; 4],
    /// IPv4 view.
    pub v4: EfiIpv4Address,
    /// IPv6 view.
    pub v6: EfiIpv6Address,
}

impl EfiIpAddress {
    /// Creates an IP address holding an IPv4 address, zero-padded to 16 bytes.
    #[must_use]
    pub const fn from_v4(v4: EfiIpv4Address) -> Self {
        let mut addr = [0u8; 16];
        addr[0] = v4.addr[0];
        addr[1] = v4.addr[1];
        addr[2] = v4.addr[2];
        addr[3] = v4.addr[3];
        Self {
            v6: EfiIpv6Address { addr },
        }
    }

    /// Creates an IP address holding an IPv6 address.
    #[must_use]
    pub const fn from_v6(v6: EfiIpv6Address) -> Self {
        Self { v6 }
    }

    /// Returns the 16 bytes of the buffer.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 16] {
        // SAFETY: Every member is plain bytes covering the full 16-byte union.
        unsafe { self.v6.addr }
    }
}

impl core::fmt::Debug for EfiIpAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EfiIpAddress").field(&self.as_bytes()).finish()
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    assert!(core::mem::size_of::<EfiMacAddress>() == 32);
    assert!(core::mem::size_of::<EfiIpv4Address>() == 4);
    assert!(core::mem::size_of::<EfiIpv6Address>() == 16);
    assert!(core::mem::size_of::<EfiIpAddress>() == 16);
    assert!(core::mem::align_of::<EfiIpAddress>() == 4);
};
