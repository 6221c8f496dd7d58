//! Client library for the Navitia public-transit API.
//!
//! Turns typed request options into queries, issues authenticated calls and
//! decodes the replies into a typed model. Start from
//! [`navitia::Session`].

pub mod domain;
pub mod navitia;
