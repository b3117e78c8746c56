//! # Chain
//!
//! A chain is a single cycle threaded through one contiguous, cache-line aligned buffer. Every
//! slot holds the byte offset (native-endian `usize`) of its successor, so a walk is a sequence
//! of loads where each address comes out of the previous load. Offsets are relative to the buffer
//! start, which keeps the links valid without storing raw pointers inside the buffer.
//!
//! Two slot layouts are supported:
//! - [`SlotLayout::Dense`]: slots `stride` bytes apart, as many as fit in `range_bytes`. Used to
//!   size the working set against the cache hierarchy.
//! - [`SlotLayout::Padded`]: `slots` slots spaced `slide + CACHE_LINE_BYTES` apart, so
//!   consecutive slots never share a cache line and the walk stresses the TLB instead.
use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::fmt;
use std::ptr::NonNull;

use log::trace;

use crate::error::BenchError;
use crate::format_size_fixed_int;

/// Gap inserted after every slot of a [`SlotLayout::Padded`] chain
pub const CACHE_LINE_BYTES: usize = 64;

/// Bytes occupied by one next-relation inside a slot
pub const LINK_BYTES: usize = std::mem::size_of::<usize>();

/// Placement of chain slots inside the backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLayout {
    /// Slot i at `i * stride`, `range_bytes / stride` slots
    Dense { range_bytes: usize, stride: usize },
    /// Slot i at `i * (slide + CACHE_LINE_BYTES)`, `slots` slots
    Padded { slots: usize, slide: usize },
}

impl SlotLayout {
    /// Number of slots, i.e. the cycle length
    pub fn slot_count(&self) -> usize {
        match *self {
            SlotLayout::Dense {
                range_bytes,
                stride,
            } => range_bytes.checked_div(stride).unwrap_or(0),
            SlotLayout::Padded { slots, .. } => slots,
        }
    }

    /// Byte distance between logically consecutive slots
    pub fn pitch(&self) -> usize {
        match *self {
            SlotLayout::Dense { stride, .. } => stride,
            SlotLayout::Padded { slide, .. } => slide.saturating_add(CACHE_LINE_BYTES),
        }
    }

    /// Size of the backing buffer, `None` if it does not fit in `usize`
    pub fn buffer_len(&self) -> Option<usize> {
        match *self {
            SlotLayout::Dense { range_bytes, .. } => Some(range_bytes),
            SlotLayout::Padded { slots, slide } => slide
                .checked_add(CACHE_LINE_BYTES)
                .and_then(|pitch| slots.checked_mul(pitch)),
        }
    }

    fn invalid(self, reason: &'static str) -> BenchError {
        BenchError::InvalidLayout {
            layout: self,
            reason,
        }
    }

    /// Reject layouts that cannot hold a closed cycle of in-bounds links
    pub fn validate(&self) -> Result<(), BenchError> {
        match *self {
            SlotLayout::Dense {
                range_bytes,
                stride,
            } => {
                if stride == 0 {
                    return Err(self.invalid("stride must be non-zero"));
                }
                if stride < LINK_BYTES {
                    return Err(self.invalid("stride is smaller than one link"));
                }
                if range_bytes < stride {
                    return Err(self.invalid("range holds no complete slot"));
                }
            }
            SlotLayout::Padded { slots, slide } => {
                if slots == 0 {
                    return Err(self.invalid("slot count must be non-zero"));
                }
                if slide == 0 {
                    return Err(self.invalid("slide must be non-zero"));
                }
            }
        }

        match self.buffer_len() {
            Some(_) => Ok(()),
            None => Err(self.invalid("buffer size overflows usize")),
        }
    }
}

impl fmt::Display for SlotLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotLayout::Dense {
                range_bytes,
                stride,
            } => write!(f, "stride={}B, range={}B", stride, range_bytes),
            SlotLayout::Padded { slots, slide } => write!(f, "slide={}B, slots={}", slide, slots),
        }
    }
}

/// A cyclic pointer chain owning its backing buffer. Dropping the chain releases the buffer.
pub struct Chain {
    base: NonNull<u8>,
    alloc_layout: Layout,
    layout: SlotLayout,
    entry: usize,
}

impl Chain {
    /// Allocate a fresh zeroed buffer for `layout` and link every slot into one cycle
    pub fn build(layout: SlotLayout) -> Result<Self, BenchError> {
        layout.validate()?;
        let bytes = layout
            .buffer_len()
            .ok_or_else(|| layout.invalid("buffer size overflows usize"))?;
        let alloc_layout = Layout::from_size_align(bytes, CACHE_LINE_BYTES)
            .map_err(|_| layout.invalid("buffer size exceeds the address space"))?;

        // SAFETY: `validate` guarantees at least one slot, so the layout size is non-zero
        let base = NonNull::new(unsafe { alloc_zeroed(alloc_layout) })
            .ok_or(BenchError::Allocation { layout, bytes })?;

        let mut chain = Chain {
            base,
            alloc_layout,
            layout,
            entry: 0,
        };

        let pitch = layout.pitch();
        let mut tail = 0;
        for i in 1..layout.slot_count() {
            let next = i * pitch;
            chain.store(tail, next);
            tail = next;
        }

        // Link the tail to the head
        chain.store(tail, 0);
        chain.entry = chain.next_of(tail).unwrap_or(0);
        debug_assert_eq!(chain.entry, 0);

        trace!(
            "built chain ({}): {} slots over {}",
            layout,
            chain.len(),
            format_size_fixed_int(bytes as u64).trim_start()
        );
        Ok(chain)
    }

    /// Offset of the slot a walk starts from (always the first slot)
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// Cycle length
    pub fn len(&self) -> usize {
        self.layout.slot_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pitch(&self) -> usize {
        self.layout.pitch()
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    /// Size of the backing buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.alloc_layout.size()
    }

    /// Start of the backing buffer, for the walker's unchecked loads
    pub(crate) fn base_ptr(&self) -> *const u8 {
        self.base.as_ptr()
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: `base` points at `alloc_layout.size()` initialized (zeroed) bytes owned by self
        unsafe { std::slice::from_raw_parts(self.base.as_ptr(), self.alloc_layout.size()) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `bytes`, and `&mut self` guarantees exclusive access
        unsafe { std::slice::from_raw_parts_mut(self.base.as_ptr(), self.alloc_layout.size()) }
    }

    fn store(&mut self, offset: usize, next: usize) {
        self.bytes_mut()[offset..offset + LINK_BYTES].copy_from_slice(&next.to_ne_bytes());
    }

    /// Successor of the slot at `offset`, `None` if no full link fits there
    pub fn next_of(&self, offset: usize) -> Option<usize> {
        let end = offset.checked_add(LINK_BYTES)?;
        let link = self.bytes().get(offset..end)?;
        Some(usize::from_ne_bytes(link.try_into().ok()?))
    }

    /// Slot offsets visited by one full cycle, starting at [`Chain::entry`]
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.entry), |&offset| self.next_of(offset)).take(self.len())
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        // SAFETY: `base` came from `alloc_zeroed` with exactly this layout and is freed once
        unsafe { dealloc(self.base.as_ptr(), self.alloc_layout) };
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("layout", &self.layout)
            .field("len", &self.len())
            .field("entry", &self.entry)
            .finish()
    }
}
