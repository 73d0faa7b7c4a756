use std::ops::{Index, IndexMut};

/// A fixed-size sequence whose indices wrap around, modelling a closed loop.
///
/// Indexing with `usize` wraps modulo the length; [`Cyclic::at`] accepts
/// negative offsets so `at(i - 1)` at the seam reads the last element.
#[derive(Debug, Clone, PartialEq)]
pub struct Cyclic<T> {
    items: Vec<T>,
}

impl<T> Cyclic<T> {
    /// Wraps an ordered sequence as a closed loop.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Number of elements in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the loop is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps a signed index onto `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if the loop is empty.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.items.len() as isize) as usize
    }

    /// Element at a signed, wrapping index.
    ///
    /// # Panics
    ///
    /// Panics if the loop is empty.
    #[must_use]
    pub fn at(&self, index: isize) -> &T {
        &self.items[self.wrap(index)]
    }

    /// Index following `index`, wrapping at the seam.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.items.len()
    }

    /// Index preceding `index`, wrapping at the seam.
    #[must_use]
    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.items.len() - 1) % self.items.len()
    }

    /// Consecutive `(current, next)` pairs, including the closing pair.
    pub fn pairs(&self) -> impl Iterator<Item = (&T, &T)> {
        let n = self.items.len();
        (0..n).map(move |i| (&self.items[i], &self.items[(i + 1) % n]))
    }

    /// Iterates elements in loop order starting at index 0.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Borrows the underlying storage.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutably borrows the underlying storage.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Unwraps into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Index<usize> for Cyclic<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index % self.items.len()]
    }
}

impl<T> IndexMut<usize> for Cyclic<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let n = self.items.len();
        &mut self.items[index % n]
    }
}

impl<T> From<Vec<T>> for Cyclic<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for &'a Cyclic<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
