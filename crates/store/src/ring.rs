use std::collections::VecDeque;

/// Fixed-capacity buffer with drop-oldest eviction and paginated reads.
///
/// Backed by a `VecDeque`: pushing at capacity evicts the single oldest
/// element in O(1), never shifting the rest. Logical position 0 is the
/// oldest retained element; iteration and pages run oldest → newest.
/// Insertion order is the only ordering — elements carry no timestamp the
/// buffer interprets.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` elements.
    ///
    /// Capacity validation belongs to the configuration layer; this
    /// constructor still refuses the one value that makes the buffer
    /// unusable.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value at the newest end, evicting the oldest when full.
    pub fn push(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Number of elements currently retained. Never exceeds capacity.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the next push will evict.
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    /// Maximum number of elements the buffer retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// The most recently pushed element, if any.
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Drop all retained elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Return up to `limit` elements starting at logical position `offset`
    /// (0 = oldest), oldest → newest.
    ///
    /// Out-of-range inputs clamp rather than error: the returned length is
    /// always `min(limit, len().saturating_sub(offset))`, so an `offset`
    /// past the retained window yields an empty vec.
    pub fn page(&self, limit: usize, offset: usize) -> Vec<T> {
        self.buf
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}
