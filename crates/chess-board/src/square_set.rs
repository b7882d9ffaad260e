//! Sets of board squares.
//!
//! Every query that answers with "a set of squares" returns a [`SquareSet`]:
//! a 64-bit mask where bit `n` is the square with index `n`.

use chess_core::Square;
use std::fmt;
use std::ops::BitOrAssign;

/// A set of squares, iterated in index order (a1, b1, ..., h8).
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    /// The empty set.
    pub const EMPTY: SquareSet = SquareSet(0);

    /// Returns true if the set is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of squares in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the given square is in the set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Adds the given square.
    #[inline]
    pub fn insert(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// Returns an iterator over the squares in index order.
    #[inline]
    pub fn iter(self) -> SquareSetIter {
        SquareSetIter(self.0)
    }
}

impl BitOrAssign for SquareSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for sq in iter {
            set.insert(sq);
        }
        set
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the squares of a [`SquareSet`].
pub struct SquareSetIter(u64);

impl Iterator for SquareSetIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Square::from_index(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn insert_and_contains() {
        let mut set = SquareSet::EMPTY;
        assert!(set.is_empty());

        set.insert(sq("e4"));
        set.insert(sq("a1"));
        assert_eq!(set.len(), 2);
        assert!(set.contains(sq("e4")));
        assert!(!set.contains(sq("e5")));

        set.insert(sq("a1"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iterates_in_index_order() {
        let set: SquareSet = [sq("h8"), sq("a1"), sq("e2")].into_iter().collect();
        let squares: Vec<Square> = set.iter().collect();
        assert_eq!(squares, vec![sq("a1"), sq("e2"), sq("h8")]);
        assert_eq!(set.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn union_assign() {
        let mut a: SquareSet = [sq("a1"), sq("b1")].into_iter().collect();
        a |= [sq("b1"), sq("c1")].into_iter().collect();
        assert_eq!(a.len(), 3);
        assert!(a.contains(sq("c1")));
    }

    #[test]
    fn debug_lists_squares() {
        let set: SquareSet = [sq("e4"), sq("d5")].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{Square(e4), Square(d5)}");
    }
}
