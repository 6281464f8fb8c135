//! Value objects representing immutable domain concepts.

pub mod token_pair;

pub use token_pair::TokenPair;
