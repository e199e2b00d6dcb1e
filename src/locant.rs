//! Locant labels and locant-list comparison.
//!
//! A locant is normally a plain position (`3`). Interior atoms of fused ring
//! systems carry a letter after the position of the preceding peripheral
//! atom (`4a`, `8a`); for substituent purposes those normalise to the
//! integer part.

use crate::{AtomId, NamingError};
use nom::{
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, map_res, opt},
    multi::separated_list1,
    sequence::{delimited, pair},
    IResult,
};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locant {
    number: u32,
    fusion: Option<char>,
}

impl Locant {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fusion: None,
        }
    }

    pub fn fusion(number: u32, letter: char) -> Self {
        Self {
            number,
            fusion: Some(letter),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn letter(&self) -> Option<char> {
        self.fusion
    }

    pub fn is_fusion(&self) -> bool {
        self.fusion.is_some()
    }

    /// The integer used when this locant is cited for a substituent.
    pub fn normalized(&self) -> u32 {
        self.number
    }
}

impl Display for Locant {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.fusion {
            Some(letter) => write!(f, "{}{}", self.number, letter),
            None => write!(f, "{}", self.number),
        }
    }
}

fn locant(input: &str) -> IResult<&str, Locant> {
    map(
        pair(
            map_res(digit1, |digits: &str| digits.parse::<u32>()),
            opt(satisfy(|c| c.is_ascii_lowercase())),
        ),
        |(number, fusion)| Locant { number, fusion },
    )(input)
}

fn locant_list(input: &str) -> IResult<&str, Vec<Locant>> {
    separated_list1(delimited(multispace0, char(','), multispace0), locant)(input)
}

impl FromStr for Locant {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(delimited(multispace0, locant, multispace0))(s)
            .map(|(_, parsed)| parsed)
            .map_err(|_| NamingError::InvalidLocant(s.to_string()))
    }
}

/// Parse a comma separated locant set such as `1,2,4a`.
pub fn parse_locant_set(s: &str) -> Result<Vec<Locant>, NamingError> {
    all_consuming(delimited(multispace0, locant_list, multispace0))(s)
        .map(|(_, parsed)| parsed)
        .map_err(|_| NamingError::InvalidLocant(s.to_string()))
}

/// Compare two ascending locant lists term by term. A list that runs out
/// first is treated as holding +inf at that index, so `[1, 2]` loses to
/// `[1, 2, 3]`.
pub fn compare_locant_lists<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        let ordering = match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Locants of a functional group, tagged by conversion phase.
///
/// Detector output references atoms by id; once a parent structure has been
/// numbered those ids are rewritten to 1-based positions. The conversion is
/// a one-way transition, so a group can never be converted twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locants {
    AtomIds(Vec<AtomId>),
    Positions(Vec<u32>),
}

impl Locants {
    pub fn is_converted(&self) -> bool {
        matches!(self, Locants::Positions(_))
    }

    pub fn positions(&self) -> Option<&[u32]> {
        match self {
            Locants::Positions(positions) => Some(positions),
            Locants::AtomIds(_) => None,
        }
    }

    pub fn atom_ids(&self) -> Option<&[AtomId]> {
        match self {
            Locants::AtomIds(ids) => Some(ids),
            Locants::Positions(_) => None,
        }
    }

    /// Rewrite atom ids to positions. Ids `position_of` cannot place fall
    /// back to position 1 and are returned alongside the converted value.
    /// Already converted locants pass through untouched.
    pub fn resolve<F>(self, position_of: F) -> (Locants, Vec<AtomId>)
    where
        F: Fn(AtomId) -> Option<u32>,
    {
        match self {
            Locants::Positions(_) => (self, Vec::new()),
            Locants::AtomIds(ids) => {
                let mut unresolved = Vec::new();
                let mut positions: Vec<u32> = ids
                    .into_iter()
                    .map(|id| {
                        position_of(id).unwrap_or_else(|| {
                            unresolved.push(id);
                            1
                        })
                    })
                    .collect();
                positions.sort_unstable();
                (Locants::Positions(positions), unresolved)
            }
        }
    }
}
