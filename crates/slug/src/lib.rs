//! # Codex Slug
//!
//! Stable machine keys for named catalog sub-entities that carry no source id.
//!
//! ## Architecture
//!
//! ```text
//! Display name ("Rot", "Heal (Off-hand)")
//!     │
//!     ├──> canonicalize()          pure text -> slug
//!     │
//!     └──> KeyGenerator::generate  (name, payload) -> memoized key
//!            ├─ first identity for a slug keeps the bare slug
//!            └─ later identities get slug + "_" + hash8(payload)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codex_slug::{canonicalize, KeyGenerator};
//!
//! assert_eq!(canonicalize("Heal (Off-hand)"), "heal__off_hand_");
//!
//! let mut status = KeyGenerator::new("status");
//! let a = status.generate("Rot", "status/rot.png");
//! let b = status.generate("Rot", "status/rot_blue.png");
//! assert_eq!(a, "rot");
//! assert_ne!(a, b);
//! assert_eq!(status.generate("Rot", "status/rot.png"), a);
//! ```

mod canonical;
mod digest;
mod generator;

pub use canonical::canonicalize;
pub use digest::{content_hash, hash8};
pub use generator::{Identity, KeyGenerator};
