pub mod brent;
pub mod numerics;
pub mod optionpricing;
