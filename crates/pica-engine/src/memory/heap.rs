use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bytemuck::Pod;

use super::{AllocError, DeviceBuffer};

/// Linear heap parameters.
#[derive(Debug, Clone)]
pub struct HeapInit {
    /// Physical address of the first byte of the region.
    pub phys_base: u32,

    /// Region size in bytes.
    pub size: u32,

    /// Allocation granularity in bytes. Must be a power of two.
    pub alignment: u32,
}

impl Default for HeapInit {
    fn default() -> Self {
        Self {
            phys_base: 0x1400_0000,
            size: 4 * 1024 * 1024,
            alignment: 0x80,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Block {
    offset: u32,
    size: u32,
}

#[derive(Debug)]
pub(super) struct HeapState {
    phys_base: u32,
    size: u32,
    alignment: u32,
    /// Free blocks sorted by offset, never adjacent.
    free: Vec<Block>,
}

impl HeapState {
    pub(super) fn phys_base(&self) -> u32 {
        self.phys_base
    }

    fn round_up(&self, bytes: usize) -> Option<u32> {
        let bytes = u32::try_from(bytes.max(1)).ok()?;
        let mask = self.alignment - 1;
        bytes.checked_add(mask).map(|b| b & !mask)
    }

    fn reserve(&mut self, bytes: usize) -> Result<(u32, u32), AllocError> {
        let size = self
            .round_up(bytes)
            .ok_or(AllocError::TooLarge { requested: bytes })?;

        let Some(idx) = self.free.iter().position(|b| b.size >= size) else {
            let largest_free = self.free.iter().map(|b| b.size).max().unwrap_or(0);
            return Err(AllocError::OutOfMemory { requested: bytes, largest_free });
        };

        let block = &mut self.free[idx];
        let offset = block.offset;
        if block.size == size {
            self.free.remove(idx);
        } else {
            block.offset += size;
            block.size -= size;
        }
        Ok((offset, size))
    }

    pub(super) fn release(&mut self, offset: u32, size: u32) {
        let idx = self.free.partition_point(|b| b.offset < offset);
        self.free.insert(idx, Block { offset, size });

        // Coalesce with the following block, then the preceding one.
        if idx + 1 < self.free.len() {
            let next = self.free[idx + 1];
            if offset + size == next.offset {
                self.free[idx].size += next.size;
                self.free.remove(idx + 1);
            }
        }
        if idx > 0 {
            let prev = self.free[idx - 1];
            if prev.offset + prev.size == offset {
                self.free[idx - 1].size += self.free[idx].size;
                self.free.remove(idx);
            }
        }
    }

    fn free_bytes(&self) -> u32 {
        self.free.iter().map(|b| b.size).sum()
    }
}

/// Reserved range of the linear heap. Released on drop.
#[derive(Debug)]
pub(super) struct Region {
    heap: Weak<RefCell<HeapState>>,
    offset: u32,
    size: u32,
}

impl Region {
    pub(super) fn phys_addr(&self) -> Option<u32> {
        let heap = self.heap.upgrade()?;
        let base = heap.borrow().phys_base();
        Some(base + self.offset)
    }

    pub(super) fn size(&self) -> u32 {
        self.size
    }

    pub(super) fn heap(&self) -> Option<LinearHeap> {
        self.heap.upgrade().map(|inner| LinearHeap { inner })
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        if let Some(heap) = self.heap.upgrade() {
            heap.borrow_mut().release(self.offset, self.size);
        }
    }
}

/// Allocator for the GPU-addressable linear region.
///
/// Cloning yields another handle to the same heap. Buffers keep only a weak
/// reference; once every handle is dropped they lose their physical address.
#[derive(Debug, Clone)]
pub struct LinearHeap {
    inner: Rc<RefCell<HeapState>>,
}

impl LinearHeap {
    pub fn new(init: HeapInit) -> anyhow::Result<Self> {
        anyhow::ensure!(init.size > 0, "linear heap has zero size");
        anyhow::ensure!(
            init.alignment.is_power_of_two(),
            "linear heap alignment {} is not a power of two",
            init.alignment
        );
        anyhow::ensure!(
            init.phys_base % init.alignment == 0,
            "linear heap base {:#x} is not aligned to {}",
            init.phys_base,
            init.alignment
        );
        anyhow::ensure!(
            init.phys_base.checked_add(init.size).is_some(),
            "linear heap overflows the physical address space"
        );

        log::debug!(
            "linear heap at {:#010x}, {} bytes, {}-byte blocks",
            init.phys_base,
            init.size,
            init.alignment
        );

        let state = HeapState {
            phys_base: init.phys_base,
            size: init.size,
            alignment: init.alignment,
            free: vec![Block { offset: 0, size: init.size }],
        };
        Ok(Self { inner: Rc::new(RefCell::new(state)) })
    }

    /// Allocates a zeroed buffer of `len` elements.
    pub fn alloc<T: Pod>(&self, len: usize) -> Result<DeviceBuffer<T>, AllocError> {
        DeviceBuffer::zeroed(self, len)
    }

    /// Allocates a buffer holding a copy of `data`.
    pub fn alloc_from_slice<T: Pod>(&self, data: &[T]) -> Result<DeviceBuffer<T>, AllocError> {
        let mut buf = DeviceBuffer::zeroed(self, data.len())?;
        buf.copy_from_slice(data);
        Ok(buf)
    }

    pub fn capacity(&self) -> u32 {
        self.inner.borrow().size
    }

    pub fn free_bytes(&self) -> u32 {
        self.inner.borrow().free_bytes()
    }

    pub fn used_bytes(&self) -> u32 {
        self.capacity() - self.free_bytes()
    }

    pub(super) fn reserve(&self, bytes: usize) -> Result<Region, AllocError> {
        let (offset, size) = self.inner.borrow_mut().reserve(bytes)?;
        Ok(Region {
            heap: Rc::downgrade(&self.inner),
            offset,
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap(size: u32) -> LinearHeap {
        LinearHeap::new(HeapInit { phys_base: 0x1000, size, alignment: 16 }).unwrap()
    }

    #[test]
    fn rejects_unaligned_config() {
        assert!(LinearHeap::new(HeapInit { alignment: 12, ..Default::default() }).is_err());
        assert!(LinearHeap::new(HeapInit { phys_base: 8, alignment: 16, size: 64 }).is_err());
    }

    #[test]
    fn allocations_are_aligned_and_disjoint() {
        let h = heap(256);
        let a = h.alloc::<u8>(3).unwrap();
        let b = h.alloc::<u8>(20).unwrap();
        assert_eq!(a.physical_address(), Some(0x1000));
        assert_eq!(b.physical_address(), Some(0x1010));
        assert_eq!(h.used_bytes(), 48);
    }

    #[test]
    fn freed_ranges_coalesce() {
        let h = heap(64);
        let a = h.alloc::<u8>(16).unwrap();
        let b = h.alloc::<u8>(16).unwrap();
        let c = h.alloc::<u8>(16).unwrap();
        drop(a);
        drop(c);
        drop(b);
        assert_eq!(h.free_bytes(), 64);
        // The whole region is one block again.
        assert!(h.alloc::<u8>(64).is_ok());
    }

    #[test]
    fn exhaustion_reports_largest_free_block() {
        let h = heap(64);
        let _a = h.alloc::<u8>(48).unwrap();
        let err = h.alloc::<u8>(32).unwrap_err();
        assert_eq!(err, AllocError::OutOfMemory { requested: 32, largest_free: 16 });
    }

    #[test]
    fn reused_range_gets_same_address() {
        let h = heap(64);
        let a = h.alloc::<u32>(4).unwrap();
        let addr = a.physical_address();
        drop(a);
        let b = h.alloc::<u32>(4).unwrap();
        assert_eq!(b.physical_address(), addr);
    }
}
