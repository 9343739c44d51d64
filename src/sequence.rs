use {
    crate::{
        array::RawStorage,
        error::{Error, Result},
    },
    std::{
        fmt::{Debug, Display, Formatter, Result as fmt_Result},
        mem::size_of,
        ops::{Bound, Deref, DerefMut, RangeBounds},
        slice,
    },
    tracing::trace,
};

/// How a DynamicSequence picks a new capacity when it runs out of room.
///
/// initial_capacity: usize,
///   slots allocated up front by `DynamicSequence::with_policy`
/// growth_percent: usize,
///   new capacity as a percentage of the old one, must be above 100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    pub initial_capacity: usize,
    pub growth_percent: usize,
}

impl Default for GrowthPolicy {
    /// Grows by half again each time, starting from no allocation at all
    fn default() -> Self {
        GrowthPolicy {
            initial_capacity: 0,
            growth_percent: 150,
        }
    }
}

impl GrowthPolicy {
    /// Capacity to grow to from `current` so that at least `required` slots exist
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        let grown = current.saturating_mul(self.growth_percent) / 100;
        grown.max(required)
    }
}

/// buf: RawStorage<T>,
///   the slots; `[0, len)` are live, `[len, buf.size())` are reserved
/// len: usize,
///   current number of live values
/// policy: GrowthPolicy,
///   decides the capacity used when a push or resize outgrows `buf`
pub struct DynamicSequence<T> {
    buf: RawStorage<T>,
    len: usize,
    policy: GrowthPolicy,
}

// Public methods
impl<T> DynamicSequence<T> {
    /// Creates an empty sequence with the default growth policy
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(GrowthPolicy {
            initial_capacity: capacity,
            ..GrowthPolicy::default()
        })
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        assert!(policy.growth_percent > 100, "growth_percent must be above 100, got {}", policy.growth_percent);
        // zero-sized values never need storage, so every slot is always available
        let size = if size_of::<T>() == 0 { usize::MAX } else { policy.initial_capacity };
        DynamicSequence {
            buf: RawStorage::new(size),
            len: 0,
            policy,
        }
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Same as `len`
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.buf.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest length a sequence of T could ever reach. Purely informational
    pub fn max_size(&self) -> usize {
        match size_of::<T>() {
            0 => usize::MAX,
            n => isize::MAX as usize / n,
        }
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Appends `value` after the last live value, growing the storage if it is full
    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            let required = self.len.checked_add(1).unwrap_or_else(|| capacity_overflow());
            self.grow_for(required);
        }
        unsafe { self.buf.write(self.len, value); }
        self.len += 1;
    }

    /// Appends a clone of every value in `values`, reallocating at most once
    pub fn extend_from_slice(&mut self, values: &[T])
    where T: Clone {
        self.make_room_for(values.len());
        for value in values {
            self.push_back(value.clone());
        }
    }

    /// Makes sure the capacity is at least `capacity`. Never shrinks, never touches len
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            self.reallocate(capacity);
        }
    }

    /// Like `reserve`, but reports a capacity that cannot be allocated instead of panicking
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity > self.capacity() {
            let from = self.capacity();
            self.buf.try_resize(capacity)?;
            trace!(target: "dynseq::grow", from, to = capacity, len = self.len, "reserved");
        }
        Ok(())
    }

    /// Sets the length to `new_len`, dropping values past it or filling the gap with `T::default()`
    pub fn resize(&mut self, new_len: usize)
    where T: Default {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        if new_len > self.capacity() {
            self.grow_for(new_len);
        }
        while self.len < new_len {
            unsafe { self.buf.write(self.len, T::default()); }
            self.len += 1;
        }
    }

    /// Drops every value. The capacity stays where it was
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Removes the values in `range` and shifts everything after it left to close the gap.
    /// Panics if the range is reversed or reaches past the end
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len,
        };
        assert!(start <= end, "erase range starts at {} but ends at {}", start, end);
        assert!(end <= self.len, "erase range end {} out of range for sequence of length {}", end, self.len);

        let removed = end - start;
        if removed == 0 {
            return;
        }
        let tail = self.len - end;
        unsafe {
            // if a destructor panics the tail leaks instead of being dropped twice
            self.len = start;
            self.buf.drop_range(start, removed);
            self.buf.shift_from(end, -(removed as isize), tail);
        }
        self.len = start + tail;
    }

    /// Removes and returns the last value. Panics if the sequence is empty
    pub fn pop_back(&mut self) -> T {
        assert!(self.len > 0, "pop_back on empty sequence");
        self.len -= 1;
        unsafe { self.buf.read(self.len) }
    }

    /// Gets the value at `index`, or OutOfRange if `index` is not below len
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice().get(index).ok_or(Error::OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_raw_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_raw_ptr(), self.len) }
    }
}

// Private methods
impl<T> DynamicSequence<T> {
    /// Grows according to the policy so that `required` slots fit
    fn grow_for(&mut self, required: usize) {
        let to = self.policy.next_capacity(self.capacity(), required);
        self.reallocate(to);
    }

    fn make_room_for(&mut self, additional: usize) {
        let required = self.len.checked_add(additional).unwrap_or_else(|| capacity_overflow());
        if required > self.capacity() {
            self.grow_for(required);
        }
    }

    fn reallocate(&mut self, to: usize) {
        let from = self.capacity();
        self.buf.resize(to);
        trace!(target: "dynseq::grow", from, to, len = self.len, "reallocated");
    }

    fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let dropped = self.len - new_len;
        self.len = new_len;
        unsafe { self.buf.drop_range(new_len, dropped); }
    }
}

fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

// Trait implementations
impl<T> Drop for DynamicSequence<T> {
    fn drop(&mut self) {
        // the storage releases itself once the values are gone
        self.clear();
    }
} impl<T> Default for DynamicSequence<T> {
    fn default() -> Self {
        Self::new()
    }
} impl<T> Deref for DynamicSequence<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
} impl<T> DerefMut for DynamicSequence<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
} impl<T: Clone> Clone for DynamicSequence<T> {
    fn clone(&self) -> Self {
        let mut seq = Self::with_policy(GrowthPolicy {
            initial_capacity: self.len,
            ..self.policy
        });
        seq.extend_from_slice(self.as_slice());
        seq
    }
} impl<T: Debug> Debug for DynamicSequence<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        f.debug_struct("DynamicSequence")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("data", &self.as_slice())
            .finish()
    }
} impl<T: Display> Display for DynamicSequence<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        write!(f, "[")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
} impl<T: PartialEq> PartialEq for DynamicSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
} impl<T> Extend<T> for DynamicSequence<T> {
    fn extend<U: IntoIterator<Item=T>>(&mut self, other: U) {
        let iter = other.into_iter();
        self.make_room_for(iter.size_hint().0);
        for value in iter {
            self.push_back(value);
        }
    }
} impl<T> From<Vec<T>> for DynamicSequence<T> {
    fn from(v: Vec<T>) -> Self {
        let mut seq = Self::with_capacity(v.len());
        seq.extend(v);
        seq
    }
} impl<'a, T> IntoIterator for &'a DynamicSequence<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
