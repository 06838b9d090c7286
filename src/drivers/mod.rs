//! Hardware drivers.

pub mod net;
