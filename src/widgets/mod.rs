//! Drawing building blocks shared by the gauge adapters.
//!
//! - [`primitives`]: arcs, ticks, needles, pointers, faces, bezels, readouts
//!   and the color-keyed blit
//!
//! # Conventions
//!
//! All widgets use the static styles from [`styles`](crate::styles) and
//! `heapless::String` for value formatting. Colors always come from the
//! gauge's resolved [`Palette`](crate::colors::Palette); widgets never pick
//! colors of their own.

pub mod primitives;
