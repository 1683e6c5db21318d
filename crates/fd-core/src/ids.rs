//! Typed identifiers.
//!
//! Graph handles (`NodeId`, `EdgeId`) are dense arena indices.  `CourierId`
//! and `OrderId` are issued sequentially and never reused within a run, so
//! sorting by id is sorting by age.  Each id prints as a one-letter tag plus
//! the number (`n12`, `c3`, `o40`) to keep log lines short.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "no id"; never issued.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id at arena position `index`, if it fits.
            pub fn from_index(index: usize) -> Option<$name> {
                <$inner>::try_from(index).ok().map($name)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($tag, "{}"), self.0)
                } else {
                    f.write_str(concat!($tag, "?"))
                }
            }
        }
    };
}

typed_id! {
    /// Position of a node in the graph arena.
    pub struct NodeId(u32) = "n";
}

typed_id! {
    /// Position of a directed edge in the graph arena.
    pub struct EdgeId(u32) = "e";
}

typed_id! {
    pub struct CourierId(u32) = "c";
}

typed_id! {
    /// Also the order's index in the order history.
    pub struct OrderId(u32) = "o";
}
