//! Typed records for everything that enters from the external document store.
//!
//! Deserialization is the validation boundary: missing or malformed optional
//! fields fall back to defaults here (a non-numeric age becomes `None`, a
//! plain-string name becomes a single-language [`LocalizedText`]) so the rest
//! of the crate never handles loosely shaped input.

mod ad;
mod de;
mod engagement;
mod profile;
mod service;


pub use ad::AdCandidate;
pub use engagement::EngagementEvent;
pub use profile::{ChildProfile, ConsentFlags, FamilyProfile, UserProfile};
pub use service::{LocalizedText, QaItem, ServiceDocument, Subservice};
