//! Wire-level client for the Shikimori REST API.
//!
//! The [`shikimori::ShikimoriApi`] trait is the seam the tracker adapter talks
//! through; [`shikimori::ShikimoriClient`] is the reqwest-backed implementation.

pub mod shikimori;
