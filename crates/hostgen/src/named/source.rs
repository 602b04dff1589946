use serde::Serialize;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of syntactic positions a named type was seen in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ValueTypeSource(u8);

impl ValueTypeSource {
    pub const NONE: Self = Self(0);
    pub const FIELD: Self = Self(1 << 0);
    pub const PARAMETER: Self = Self(1 << 1);
    pub const RETURN: Self = Self(1 << 2);

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ValueTypeSource {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValueTypeSource {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ValueTypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::FIELD, "field"),
            (Self::PARAMETER, "parameter"),
            (Self::RETURN, "return"),
        ]
        .into_iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}
