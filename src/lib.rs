//! Codec and gesture resolver for the RMP rhythm-game chart format.
//!
//! An `.rmp` chart is chart JSON wrapped in four layers:
//! zlib DEFLATE, base64, an XXTEA block cipher salted per chart, and an
//! outer base64. This crate decodes and re-encodes that wire format
//! compatibly with the game client's own encoder, and reconstructs the
//! continuous multi-track gestures (holds, slide chains) the flat
//! per-track note lists encode.
//!
//! ## Layout
//! - [`identity`] - filename ⇄ chart identity, salt derivation
//! - [`text`] - UTF-8 / Latin-1 byte codecs
//! - [`cipher`] - XXTEA word transforms and packing
//! - [`codec`] - the full wire pipeline
//! - [`chart`] - document model, gesture resolution, the [`Chart`] surface
//!
//! ## Example
//! ```rust,ignore
//! use rmp_chart::Chart;
//!
//! let chart = Chart::load("please_4k_hd.rmp", Some(&raw_payload))?;
//! for action in chart.actions().actions() {
//!     println!("gesture of {} notes", action.len());
//! }
//! let re_encrypted = chart.to_raw()?;
//! ```

pub mod chart;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod identity;
pub mod text;

pub use chart::{ActionIndex, Chart, ChartDocument, Note, PlacedNote, Track};
pub use error::{Result, RmpError};
pub use identity::{resolve_filename, ChartFormat, ChartIdentity, ResolvedName};
pub use text::EncodingError;
