//! Instruments describe what is being priced. For now this is limited to
//! European options on a single underlying, defined by their option
//! parameters.

pub mod options;
