//! Request handlers, one module per endpoint family.

pub mod chat;
pub mod pages;
pub mod speech;
pub mod vision;
