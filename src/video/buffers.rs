use gl::types::GLuint;

/// How the data of a draw must be written into its buffer slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferWrite {
    /// The slot is too small, its storage must be (re)allocated with `glBufferData`.
    Allocate,
    /// The data fits into the slot, it is updated in place with `glBufferSubData`.
    Update,
}

/// A fixed set of vertex buffers used round-robin, so that a draw never overwrites
/// a buffer the driver may still be reading from the previous draws.
#[derive(Debug, Clone)]
pub struct BufferRing {
    ids: Vec<GLuint>,
    capacities: Vec<usize>,
    cursor: usize,
}

impl BufferRing {
    pub fn new(ids: Vec<GLuint>) -> Self {
        let capacities = vec![0; ids.len()];
        BufferRing {
            ids,
            capacities,
            cursor: 0,
        }
    }

    /// Takes the next slot for `len` bytes of data and advances the rotation.
    ///
    /// Returns `None` if the ring has no slot at all.
    pub fn next(&mut self, len: usize) -> Option<(GLuint, BufferWrite)> {
        if self.ids.is_empty() {
            return None;
        }

        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.ids.len();

        let write = if len > self.capacities[slot] {
            self.capacities[slot] = len;
            BufferWrite::Allocate
        } else {
            BufferWrite::Update
        };

        Some((self.ids[slot], write))
    }

    /// The slot the next draw will write into.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The recorded storage size in bytes of every slot.
    #[inline]
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    #[inline]
    pub fn ids(&self) -> &[GLuint] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Empties the ring, returning the buffer names so they can be deleted.
    pub fn take(&mut self) -> Vec<GLuint> {
        self.capacities.clear();
        self.cursor = 0;
        ::std::mem::replace(&mut self.ids, Vec::new())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rotation() {
        let mut ring = BufferRing::new(vec![11, 12, 13]);

        let ids: Vec<_> = (0..7).map(|_| ring.next(64).unwrap().0).collect();
        assert_eq!(ids, vec![11, 12, 13, 11, 12, 13, 11]);
        assert_eq!(ring.cursor(), 1);
    }

    #[test]
    fn capacity() {
        let mut ring = BufferRing::new(vec![1, 2]);

        assert_eq!(ring.next(64), Some((1, BufferWrite::Allocate)));
        assert_eq!(ring.next(32), Some((2, BufferWrite::Allocate)));
        assert_eq!(ring.capacities(), &[64, 32]);

        assert_eq!(ring.next(64), Some((1, BufferWrite::Update)));
        assert_eq!(ring.next(48), Some((2, BufferWrite::Allocate)));
        assert_eq!(ring.next(16), Some((1, BufferWrite::Update)));
        assert_eq!(ring.capacities(), &[64, 48]);
    }

    #[test]
    fn empty() {
        let mut ring = BufferRing::new(vec![]);
        assert!(ring.is_empty());
        assert_eq!(ring.next(16), None);

        let mut ring = BufferRing::new(vec![4, 5]);
        ring.next(16);
        assert_eq!(ring.take(), vec![4, 5]);
        assert_eq!(ring.next(16), None);
    }
}
