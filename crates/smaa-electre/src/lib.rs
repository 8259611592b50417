//! ELECTRE TRI - Outranking-based sorting of alternatives into ordered categories
//!
//! Each category below the top one is bounded by a profile: a reference
//! value per criterion. An alternative is compared with the profiles using
//! weighted concordance, optional vetoes and a cutting level `lambda`, then
//! assigned pessimistically or optimistically.

pub mod concordance;
pub mod tri;

pub use concordance::{concordance, vetoes};
pub use tri::{classify, AssignmentRule, ElectreTri, Performance};

#[cfg(test)]
mod tests;
