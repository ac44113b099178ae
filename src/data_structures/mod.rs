//! Data structures for Pin Assist.
//!
//! This module contains the matching structures used to decide which tracked
//! object, if any, a free-form object name refers to.

pub mod loose_dictionary;

// Re-export common data structures
pub use loose_dictionary::{
    Entry, LooseDictionary, LooseDictionaryConfig, LooseDictionaryError, LooseDictionaryResult,
    SharedLooseDictionary, SharedLooseMatch,
};
