//! Small standard-library extensions shared by the workspace.
//!
//! Mirrors the subset of `sl-std` that the URL implementation leans on: an
//! ASCII-only string type (so percent-encoded/IDNA output can be typed as
//! "guaranteed ASCII" rather than `String`) and a cursor that can step
//! backwards over a `char` sequence, which the URL state machine relies on
//! heavily (`decrease()`/re-process-current-codepoint transitions).

pub mod ascii;
pub mod chars;
