//! Decoding of replies discriminated by which list field is present.
//!
//! Several Navitia endpoints answer with the same envelope shape where one
//! of a few mutually exclusive fields carries the payload (`departures` or
//! `arrivals`, for instance) next to a shared `links` field. A result type
//! declares its discriminant fields in priority order by implementing
//! [`Discriminated`]; the decoding and the resolution of which field wins
//! are shared.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, Deserializer, IgnoredAny, MapAccess, Visitor};
use tracing::warn;

use super::types::Paging;

/// An envelope whose payload list comes from one of several wire fields.
pub trait Discriminated: Sized {
    /// Element type shared by every discriminant field.
    type Item: DeserializeOwned;

    /// Wire field names, highest priority first.
    const DISCRIMINANTS: &'static [&'static str];

    /// Wire field holding the paging links.
    const PAGING_FIELD: &'static str = "links";

    /// Build the envelope from the resolved payload and the paging links.
    fn assemble(selection: Selection<Self::Item>, paging: Paging) -> Self;
}

/// The outcome of resolving the discriminant fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    /// The field that supplied `items`, if any was present.
    pub field: Option<&'static str>,
    /// The payload; empty when no field had elements.
    pub items: Vec<T>,
}

impl<T> Selection<T> {
    fn empty(field: Option<&'static str>) -> Self {
        Self {
            field,
            items: Vec::new(),
        }
    }
}

/// Pick the payload among the decoded discriminant slots.
///
/// `slots[i]` holds what was decoded for `fields[i]` (`None` when absent or
/// `null`). The first slot in priority order with at least one element wins
/// and is moved out. When none has elements the selection is empty and
/// names the first field that was present, if any. Several non-empty slots
/// mean a malformed reply; the priority order still decides and a warning is
/// logged.
pub fn resolve<T>(fields: &'static [&'static str], slots: Vec<Option<Vec<T>>>) -> Selection<T> {
    let mut first_present = None;
    let mut chosen: Option<Selection<T>> = None;

    for (&field, slot) in fields.iter().zip(slots) {
        let Some(items) = slot else { continue };
        if first_present.is_none() {
            first_present = Some(field);
        }
        if items.is_empty() {
            continue;
        }
        if let Some(winner) = &chosen {
            warn!(
                kept = winner.field.unwrap_or_default(),
                dropped = field,
                "reply populates several exclusive fields"
            );
            continue;
        }
        chosen = Some(Selection {
            field: Some(field),
            items,
        });
    }

    chosen.unwrap_or_else(|| Selection::empty(first_present))
}

/// Deserialize a [`Discriminated`] envelope.
///
/// Use it as the body of the envelope's `Deserialize` impl. Each
/// discriminant field gets its own shadow slot; the paging field is decoded
/// once and moved into the envelope; every other field is skipped.
pub fn deserialize<'de, D, E>(deserializer: D) -> Result<E, D::Error>
where
    D: Deserializer<'de>,
    E: Discriminated,
{
    deserializer.deserialize_map(EnvelopeVisitor(PhantomData))
}

struct EnvelopeVisitor<E>(PhantomData<E>);

impl<'de, E: Discriminated> Visitor<'de> for EnvelopeVisitor<E> {
    type Value = E;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object with one of {:?}", E::DISCRIMINANTS)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<E, A::Error> {
        let mut slots: Vec<Option<Vec<E::Item>>> =
            std::iter::repeat_with(|| None).take(E::DISCRIMINANTS.len()).collect();
        let mut paging: Option<Paging> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == E::PAGING_FIELD {
                paging = map.next_value()?;
            } else if let Some(i) = E::DISCRIMINANTS.iter().position(|f| *f == key) {
                slots[i] = map.next_value()?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        let selection = resolve(E::DISCRIMINANTS, slots);
        Ok(E::assemble(selection, paging.unwrap_or_default()))
    }
}
