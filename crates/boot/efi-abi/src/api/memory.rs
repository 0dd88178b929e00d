use core::iter::FusedIterator;
use core::mem::size_of;

use crate::memory::EfiMemoryDescriptor;

/// Sizes reported by a `GetMemoryMap` call made with an empty buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMapSize {
    /// Bytes needed for the map as it is now.
    pub map_size: usize,
    /// Stride between descriptors.
    pub descriptor_size: usize,
}

impl MemoryMapSize {
    /// `map_size` plus room for `extra` more descriptors.
    ///
    /// Allocating the map buffer can itself add descriptors, so a buffer sized exactly to
    /// `map_size` is often too small by the time it is used.
    #[must_use]
    pub fn with_slack(&self, extra: usize) -> usize {
        self.map_size
            .saturating_add(extra.saturating_mul(self.descriptor_size))
    }
}

/// A memory map written by `GetMemoryMap` into a caller-provided buffer.
pub struct MemoryMap<'buf> {
    buffer: &'buf [u8],
    map_key: usize,
    descriptor_size: usize,
    descriptor_version: u32,
}

impl<'buf> MemoryMap<'buf> {
    pub(crate) fn new(
        buffer: &'buf [u8],
        map_key: usize,
        descriptor_size: usize,
        descriptor_version: u32,
    ) -> Self {
        Self {
            buffer,
            map_key,
            descriptor_size,
            descriptor_version,
        }
    }

    /// The key to pass to `ExitBootServices`.
    #[must_use]
    pub fn map_key(&self) -> usize {
        self.map_key
    }

    /// Number of descriptors.
    ///
    /// Zero if the firmware reported a descriptor size smaller than [`EfiMemoryDescriptor`].
    #[must_use]
    pub fn len(&self) -> usize {
        if self.descriptor_size < size_of::<EfiMemoryDescriptor>() {
            return 0;
        }
        self.buffer.len() / self.descriptor_size
    }

    /// Returns `true` if there are no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Firmware-reported stride between descriptors.
    #[must_use]
    pub fn descriptor_size(&self) -> usize {
        self.descriptor_size
    }

    /// Firmware-reported descriptor version.
    #[must_use]
    pub fn descriptor_version(&self) -> u32 {
        self.descriptor_version
    }

    /// Iterates the descriptors at the firmware stride.
    #[must_use]
    pub fn iter(&self) -> MemoryMapIter<'buf> {
        MemoryMapIter {
            buffer: self.buffer,
            descriptor_size: self.descriptor_size,
            remaining: self.len(),
        }
    }
}

impl<'buf> IntoIterator for &MemoryMap<'buf> {
    type Item = EfiMemoryDescriptor;
    type IntoIter = MemoryMapIter<'buf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the descriptors of a [`MemoryMap`].
///
/// Descriptors are copied out, since the buffer carries no alignment guarantee.
pub struct MemoryMapIter<'buf> {
    buffer: &'buf [u8],
    descriptor_size: usize,
    remaining: usize,
}

impl Iterator for MemoryMapIter<'_> {
    type Item = EfiMemoryDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let desc = self.buffer.get(..size_of::<EfiMemoryDescriptor>())?;
        // SAFETY: `desc` covers a whole descriptor and every bit pattern is a valid
        // `EfiMemoryDescriptor`.
        let desc = unsafe { desc.as_ptr().cast::<EfiMemoryDescriptor>().read_unaligned() };
        self.buffer = self.buffer.get(self.descriptor_size..).unwrap_or_default();
        self.remaining -= 1;
        Some(desc)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MemoryMapIter<'_> {}

impl FusedIterator for MemoryMapIter<'_> {}
