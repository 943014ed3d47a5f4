//! Internal test modules - whitebox tests with crate access
//!
//! Tests here exercise the decoders end to end against fixture data and
//! can reach crate-private helpers.
