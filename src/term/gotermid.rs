use core::fmt::Debug;
use std::fmt::Display;

use crate::{GoError, GoResult};

/// The numeric identifier of a GO term
///
/// This is the term id of the ontology source, not the `GO:0006512`
/// accession. The accession is stored alongside the term.
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GoTermId {
    inner: u32,
}

impl GoTermId {
    /// Returns the id as `u32`
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for GoTermId {
    type Error = GoError;
    fn try_from(s: &str) -> GoResult<Self> {
        Ok(GoTermId {
            inner: s.trim().parse::<u32>()?,
        })
    }
}

impl From<u16> for GoTermId {
    fn from(n: u16) -> Self {
        Self { inner: n.into() }
    }
}

impl From<u32> for GoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoTermId({})", self)
    }
}

impl Display for GoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_from_str() {
        assert_eq!(GoTermId::try_from("42").unwrap(), GoTermId::from(42u32));
        assert_eq!(GoTermId::try_from(" 7\n").unwrap().as_u32(), 7);
        assert!(GoTermId::try_from("GO:0000007").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(GoTermId::from(12u32).to_string(), "12");
        assert_eq!(format!("{:?}", GoTermId::from(12u32)), "GoTermId(12)");
    }
}
