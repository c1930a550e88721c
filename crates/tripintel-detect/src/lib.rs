//! Best-effort offer detection over post captions.
//!
//! [`detect_offer`] is a pure function: regex and keyword matching only, no
//! I/O, no error states beyond "nothing found" (confidence `0.0`, all fields
//! `None`). There is no grammar here — travel agencies write captions
//! free-form and the patterns chase the shapes that actually occur.

mod detector;
mod patterns;

pub use detector::{detect_offer, OfferDetection};
