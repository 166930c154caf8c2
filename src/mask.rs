//! Fixed-width attribute bitsets.
//!
//! A [`Mask`] records which attribute types an object owns,
//! and a system signature is a `Mask` of the attribute types it requires.

use std::fmt;

use bitvec::array::BitArray;
use bitvec::order::Lsb0;

use crate::attribute::AttrTypeId;

/// The number of attribute types representable in a [`Mask`].
pub const MASK_BITS: usize = 32;

type Bits = BitArray<[u32; 1], Lsb0>;

/// A set of attribute types, one bit per [`AttrTypeId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(Bits);

impl Mask {
    /// The mask with no bits set.
    pub fn empty() -> Self { Self(Bits::new([0])) }

    /// Constructs a mask from its raw bit pattern.
    pub fn from_bits(bits: u32) -> Self { Self(Bits::new([bits])) }

    /// Returns the raw bit pattern.
    pub fn bits(self) -> u32 { self.0.into_inner()[0] }

    /// Returns a copy of this mask with `attr` set.
    #[must_use]
    pub fn with(mut self, attr: AttrTypeId) -> Self {
        self.set(attr);
        self
    }

    /// Sets the bit for `attr`.
    pub fn set(&mut self, attr: AttrTypeId) { self.0.set(attr.index(), true); }

    /// Clears the bit for `attr`.
    pub fn clear(&mut self, attr: AttrTypeId) { self.0.set(attr.index(), false); }

    /// Tests the bit for `attr`.
    pub fn test(&self, attr: AttrTypeId) -> bool { self.0[attr.index()] }

    /// Returns true if every bit set in `signature` is also set in `self`.
    ///
    /// Additional bits in `self` are ignored,
    /// so the empty signature is contained in every mask.
    pub fn contains(&self, signature: &Mask) -> bool {
        signature.bits() & !self.bits() == 0
    }

    /// Whether no bits are set.
    pub fn is_empty(&self) -> bool { self.0.not_any() }

    /// The number of bits set.
    pub fn len(&self) -> usize { self.0.count_ones() }

    /// Iterates over the set attribute types in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = AttrTypeId> + '_ {
        self.0.iter_ones().map(AttrTypeId::from_index)
    }
}

impl FromIterator<AttrTypeId> for Mask {
    fn from_iter<I: IntoIterator<Item = AttrTypeId>>(iter: I) -> Self {
        let mut mask = Self::empty();
        for attr in iter {
            mask.set(attr);
        }
        mask
    }
}

impl From<AttrTypeId> for Mask {
    fn from(attr: AttrTypeId) -> Self { Self::empty().with(attr) }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter().map(AttrTypeId::get)).finish()
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{:#034b}", self.bits()) }
}

#[cfg(test)]
mod tests {
    use super::Mask;
    use crate::attribute::AttrTypeId;

    const A0: AttrTypeId = AttrTypeId::new(0);
    const A1: AttrTypeId = AttrTypeId::new(1);
    const A31: AttrTypeId = AttrTypeId::new(31);

    #[test]
    fn test_contains_is_subset() {
        let signature = crate::mask![A0, A1];

        assert!(!Mask::empty().contains(&signature));
        assert!(!Mask::from(A0).contains(&signature));
        assert!(crate::mask![A0, A1].contains(&signature));
        assert!(crate::mask![A0, A1, A31].contains(&signature), "extra bits are ignored");
        assert!(Mask::from(A31).contains(&Mask::empty()), "empty signature matches everything");
        assert!(Mask::empty().contains(&Mask::empty()));
    }

    #[test]
    fn test_set_clear() {
        let mut mask = Mask::empty();
        mask.set(A31);
        mask.set(A1);
        assert_eq!(mask.bits(), (1 << 31) | 0b10);
        assert_eq!(mask.len(), 2);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![A1, A31]);

        mask.clear(A31);
        assert!(!mask.test(A31));
        assert!(mask.test(A1));

        mask.clear(A1);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_bits_roundtrip() {
        let mask = Mask::from_bits(0xdead_beef);
        assert_eq!(mask.iter().collect::<Mask>(), mask);
        assert_eq!(format!("{:?}", crate::mask![A0, A31]), "{0, 31}");
    }
}
