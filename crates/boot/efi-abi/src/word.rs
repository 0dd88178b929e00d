//! Native word width selection.
//!
//! UEFI defines `UINTN`/`INTN` and `EFI_STATUS` in terms of the processor's native word,
//! which is 32 bits on IA-32/ARM32 and 64 bits on x86-64/AArch64/RISC-V 64. Rather than
//! duplicating every width-dependent definition per architecture, this module describes a
//! word width once as a [`NativeWord`] implementation and lets the rest of the crate be
//! generic over it.
//!
//! The width used for real firmware calls is [`Native`], chosen once at build time from
//! `target_pointer_width`. The other width stays available so that encodings (for example
//! the error bit of a status code) can be checked for both configurations on any host.

use core::fmt;
use core::hash::Hash;
use core::ops::{BitAnd, BitOr, Not};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Word32 {}
    impl Sealed for super::Word64 {}
}

/// A native word width supported by the UEFI specification.
///
/// This trait is sealed; [`Word32`] and [`Word64`] are the only implementations.
pub trait NativeWord: sealed::Sealed + Copy + Eq + fmt::Debug + 'static {
    /// The unsigned native integer (`UINTN`) for this width.
    type Uint: Copy
        + Eq
        + Ord
        + Hash
        + Default
        + fmt::Debug
        + fmt::LowerHex
        + BitAnd<Output = Self::Uint>
        + BitOr<Output = Self::Uint>
        + Not<Output = Self::Uint>
        + From<u32>
        + Into<u64>;

    /// The signed native integer (`INTN`) for this width.
    type Int: Copy + Eq + Ord + Hash + Default + fmt::Debug + From<i32> + Into<i64>;

    /// Width of the native word in bits.
    const BITS: u32;

    /// Width of the native word in bytes.
    const BYTES: usize;

    /// The top bit of the native word. Set in every error status code.
    const ERROR_BIT: Self::Uint;

    /// The zero value of [`Self::Uint`].
    const ZERO: Self::Uint;
}

/// The 32-bit native word (IA-32, ARM32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word32 {}

/// The 64-bit native word (x86-64, AArch64, RISC-V 64, LoongArch64).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word64 {}

impl NativeWord for Word32 {
    type Uint = u32;
    type Int = i32;

    const BITS: u32 = u32::BITS;
    const BYTES: usize = core::mem::size_of::<u32>();
    const ERROR_BIT: u32 = 1 << (u32::BITS - 1);
    const ZERO: u32 = 0;
}

impl NativeWord for Word64 {
    type Uint = u64;
    type Int = i64;

    const BITS: u32 = u64::BITS;
    const BYTES: usize = core::mem::size_of::<u64>();
    const ERROR_BIT: u64 = 1 << (u64::BITS - 1);
    const ZERO: u64 = 0;
}

/// The native word of the build target.
#[cfg(target_pointer_width = "64")]
pub type Native = Word64;

/// The native word of the build target.
#[cfg(target_pointer_width = "32")]
pub type Native = Word32;

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("UEFI is only defined for 32-bit and 64-bit native words");

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    assert!(Native::BYTES == core::mem::size_of::<usize>());
    assert!(Native::BITS == usize::BITS);
    assert!(Word32::ERROR_BIT == 0x8000_0000);
    assert!(Word64::ERROR_BIT == 0x8000_0000_0000_0000);
};
