use core::ops::{Deref, DerefMut, Range};

use bytemuck::Pod;

use super::heap::Region;
use super::{AllocError, LinearHeap};

/// Array of `T` living in the linear heap.
///
/// Behaves like a fixed-address `Vec<T>`: the contents are addressable by the
/// GPU at [`physical_address`](Self::physical_address). Growing past the
/// reserved capacity moves the buffer to a new range.
#[derive(Debug)]
pub struct DeviceBuffer<T: Pod> {
    data: Vec<T>,
    region: Region,
}

impl<T: Pod> DeviceBuffer<T> {
    pub(super) fn zeroed(heap: &LinearHeap, len: usize) -> Result<Self, AllocError> {
        let bytes = len
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::TooLarge { requested: usize::MAX })?;
        let region = heap.reserve(bytes)?;
        Ok(Self {
            data: vec![<T as bytemuck::Zeroable>::zeroed(); len],
            region,
        })
    }

    /// Physical address of element 0, or `None` once the heap is gone.
    pub fn physical_address(&self) -> Option<u32> {
        self.region.phys_addr()
    }

    /// Number of elements that fit without moving the buffer.
    pub fn capacity(&self) -> usize {
        match size_of::<T>() {
            0 => usize::MAX,
            n => self.region.size() as usize / n,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Borrows `range` for a draw call.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds, like slice indexing.
    pub fn slice(&self, range: Range<usize>) -> DeviceSlice<'_, T> {
        let start = range.start;
        let data = &self.data[range];
        let phys = self
            .physical_address()
            .and_then(|base| u32::try_from(start * size_of::<T>()).ok().map(|off| base + off));
        DeviceSlice { data, phys }
    }

    pub fn push(&mut self, value: T) -> Result<(), AllocError> {
        self.reserve(1)?;
        self.data.push(value);
        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), AllocError> {
        self.reserve(values.len())?;
        self.data.extend_from_slice(values);
        Ok(())
    }

    pub fn resize(&mut self, len: usize, value: T) -> Result<(), AllocError> {
        if len > self.data.len() {
            self.reserve(len - self.data.len())?;
        }
        self.data.resize(len, value);
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Empties the buffer. The reserved range is kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Ensures room for `additional` more elements, moving to a larger range
    /// if needed.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let needed = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(AllocError::TooLarge { requested: usize::MAX })?;
        if needed <= self.capacity() {
            return Ok(());
        }

        let heap = self.region.heap().ok_or(AllocError::HeapGone)?;
        let new_cap = needed.next_power_of_two();
        let bytes = new_cap
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::TooLarge { requested: usize::MAX })?;
        self.region = heap.reserve(bytes)?;
        Ok(())
    }
}

impl<T: Pod> Deref for DeviceBuffer<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Pod> DerefMut for DeviceBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Borrowed run of elements handed to a draw call.
///
/// `phys` is `None` when the data does not live in the linear heap.
#[derive(Debug, Copy, Clone)]
pub struct DeviceSlice<'a, T> {
    data: &'a [T],
    phys: Option<u32>,
}

impl<'a, T> DeviceSlice<'a, T> {
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Physical address of the first element, if GPU-addressable.
    pub fn physical_address(&self) -> Option<u32> {
        self.phys
    }
}

impl<'a, T: Pod> From<&'a DeviceBuffer<T>> for DeviceSlice<'a, T> {
    fn from(buf: &'a DeviceBuffer<T>) -> Self {
        DeviceSlice {
            data: buf.as_slice(),
            phys: buf.physical_address(),
        }
    }
}

/// Host memory (stack, `Vec`, statics). Not GPU-addressable.
impl<'a, T> From<&'a [T]> for DeviceSlice<'a, T> {
    fn from(data: &'a [T]) -> Self {
        DeviceSlice { data, phys: None }
    }
}
