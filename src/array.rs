
use {
    crate::error::{Error, Result},
    std::{
        ptr::{self, read, write, copy, NonNull},
        alloc::{alloc, dealloc, realloc, handle_alloc_error, Layout},
        marker::PhantomData,
    },
};

/// A fixed block of `size` uninitialized slots of type T.
///
/// RawStorage owns the allocation but not the values in it: it never reads,
/// writes or drops a slot on its own. Whoever holds it decides which slots are
/// live and must drop them before the storage goes away.
pub struct RawStorage<T> {
    ptr: NonNull<T>,
    size: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawStorage<T> {}
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    // Public methods

    /// Creates storage for `size` values of type T.
    /// Panics on capacity overflow, aborts if the allocator fails
    pub fn new(size: usize) -> Self {
        Self::try_new(size).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_new(size: usize) -> Result<Self> {
        let layout = Self::layout_for_size(size)?;
        Ok(RawStorage {
            ptr: Self::allocate(layout),
            size,
            _marker: PhantomData,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Moves the storage to a block of `new_size` slots, keeping the first
    /// `min(size, new_size)` slots bit-for-bit.
    /// Slots past `new_size` must already be dead, they are not dropped here
    pub fn resize(&mut self, new_size: usize) {
        if let Err(e) = self.try_resize(new_size) {
            panic!("{}", e);
        }
    }

    pub fn try_resize(&mut self, new_size: usize) -> Result<()> {
        let new_layout = Self::layout_for_size(new_size)?;
        // the current layout was valid when it was allocated
        let old_layout = Self::layout_for_size(self.size)?;

        let ptr = if old_layout.size() == 0 {
            Self::allocate(new_layout)
        } else if new_layout.size() == 0 {
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, old_layout); }
            NonNull::dangling()
        } else {
            let raw = unsafe { realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) };
            NonNull::new(raw as *mut T).unwrap_or_else(|| handle_alloc_error(new_layout))
        };

        self.ptr = ptr;
        self.size = new_size;
        Ok(())
    }

    /// Writes `value` into slot `index` without dropping whatever was there.
    ///
    /// # Safety
    /// `index` must be less than `size`.
    pub unsafe fn write(&mut self, index: usize, value: T) {
        write(self.as_mut_raw_ptr().add(index), value);
    }

    /// Moves the value out of slot `index`, leaving the slot logically dead.
    ///
    /// # Safety
    /// `index` must be less than `size` and the slot must hold a live value.
    pub unsafe fn read(&self, index: usize) -> T {
        read(self.as_raw_ptr().add(index))
    }

    /// Moves `count` slots starting at `index` by `amt` positions, source and
    /// destination may overlap.
    ///
    /// # Safety
    /// Both `index..index + count` and the shifted range must lie inside the storage.
    pub unsafe fn shift_from(&mut self, index: usize, amt: isize, count: usize) {
        let src = self.as_mut_raw_ptr().add(index);
        copy(src, src.offset(amt), count);
    }

    /// Drops the values in slots `start..start + count` in place.
    ///
    /// # Safety
    /// Every slot in the range must hold a live value, and none may be used afterwards.
    pub unsafe fn drop_range(&mut self, start: usize, count: usize) {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_raw_ptr().add(start), count));
    }

    pub fn as_mut_raw_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub fn as_raw_ptr(&self) -> *const T {
        self.ptr.as_ptr() as *const T
    }
}

// Private methods
impl<T> RawStorage<T> {
    /// Get a Layout for `size` slots of T, or a CapacityOverflow if the
    /// block would be larger than isize::MAX bytes
    fn layout_for_size(size: usize) -> Result<Layout> {
        Layout::array::<T>(size).map_err(|_| Error::CapacityOverflow { requested: size })
    }

    fn allocate(layout: Layout) -> NonNull<T> {
        // zero-sized types and empty blocks never touch the allocator
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        let raw = unsafe { alloc(layout) };
        NonNull::new(raw as *mut T).unwrap_or_else(|| handle_alloc_error(layout))
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if let Ok(layout) = Self::layout_for_size(self.size) {
            if layout.size() != 0 {
                unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout); }
            }
        }
    }
}
