//! Infrastructure implementations

pub mod source;
