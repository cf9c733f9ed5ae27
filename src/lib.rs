extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate statrs;

// listed in dependency order, though this is not essential for compilation
pub mod core;
pub mod math;
pub mod dates;
pub mod instruments;
pub mod pricers;
pub mod solvers;
pub mod facade;
