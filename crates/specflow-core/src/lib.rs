pub mod config;
pub mod error;
pub mod feature;
pub mod io;
pub mod naming;
pub mod numbering;
pub mod paths;
pub mod resolver;
pub mod root;
pub mod template;
pub mod vcs;

pub use error::{Result, SpecflowError};
