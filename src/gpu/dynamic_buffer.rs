//! Uniform buffers addressed by dynamic offset.
//!
//! Each item occupies one slot padded to the device's uniform offset
//! alignment. The buffer grows by 2x when a write needs more slots than it
//! has; it never shrinks.

use std::marker::PhantomData;

/// Slot size for `item_size` bytes under `alignment` (a power of two).
#[must_use]
pub fn aligned_stride(item_size: u64, alignment: u64) -> u64 {
    item_size.div_ceil(alignment) * alignment
}

/// Copy `items` into a byte vector with one item every `stride` bytes.
pub fn pack_slots<T: bytemuck::Pod>(items: &[T], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; items.len() * stride];
    for (slot, item) in bytes.chunks_exact_mut(stride).zip(items) {
        let src = bytemuck::bytes_of(item);
        slot[..src.len()].copy_from_slice(src);
    }
    bytes
}

/// A uniform buffer of `T` slots for use with dynamic offsets.
pub struct DynamicUniformBuffer<T> {
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: usize,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DynamicUniformBuffer<T> {
    /// Buffer with room for `capacity` items (at least one).
    pub fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let alignment =
            u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = aligned_stride(size_of::<T>() as u64, alignment);
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, stride, capacity),
            stride,
            capacity,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        stride: u64,
        capacity: usize,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write `items` into slots `0..items.len()`, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups need
    /// recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[T],
    ) -> bool {
        let reallocated = if items.len() > self.capacity {
            self.capacity = (items.len() * 2).max(self.capacity + 1);
            self.buffer =
                Self::allocate(device, &self.label, self.stride, self.capacity);
            true
        } else {
            false
        };

        if !items.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_slots(items, self.stride));
        }
        reallocated
    }

    /// Dynamic offset of slot `index`.
    #[must_use]
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (self.stride * index as u64) as wgpu::DynamicOffset
    }

    /// Binding covering exactly one slot, for a dynamic-offset bind group.
    #[must_use]
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(size_of::<T>() as u64),
        })
    }

    /// Size of one item, for the layout's `min_binding_size`.
    #[must_use]
    pub fn item_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(size_of::<T>() as u64)
    }

    /// Slots the buffer holds before it must grow.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(128, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(80, 64), 128);
    }

    #[test]
    fn slots_start_at_stride_boundaries() {
        let items = [[1.0_f32, 2.0], [3.0, 4.0]];
        let bytes = pack_slots(&items, 16);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[16..24], bytemuck::bytes_of(&items[1]));
        assert!(bytes[8..16].iter().all(|&b| b == 0));
    }
}
