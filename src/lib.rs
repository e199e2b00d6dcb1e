//! Parent-structure selection and locant numbering for organic molecules.
//!
//! The engine takes a [`Molecule`] together with the functional groups a
//! detector found in it, chooses the parent chain or ring system and numbers
//! it by the IUPAC lowest-locant rules. Name strings are left to the caller.

mod molecule;
pub use molecule::*;

mod intern;
pub use intern::*;

mod locant;
pub use locant::*;

mod groups;
pub use groups::*;

mod chain;
pub use chain::*;

mod ring;
pub use ring::*;

mod rules;
pub use rules::*;

mod validate;
pub use validate::*;

mod engine;
pub use engine::*;

mod trace;
pub use trace::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

#[cfg(test)]
mod testing;
