use core::fmt;

/// Cardinality of one side of a relation, as seen from the other side.
///
/// A relation declares `right_arity = One` when every left object must be linked to exactly one
/// right object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    One,
    ZeroOrOne,
    Many,
}

impl Arity {
    /// Does `n` linked objects satisfy this arity?
    pub fn admits(self, n: usize) -> bool {
        match self {
            Arity::One => n == 1,
            Arity::ZeroOrOne => n <= 1,
            Arity::Many => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arity::One => "ONE",
            Arity::ZeroOrOne => "ZERO_OR_ONE",
            Arity::Many => "MANY",
        };
        f.write_str(name)
    }
}

/// Which end of a relation a setter or key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}
