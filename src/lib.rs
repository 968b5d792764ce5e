//! `overload_bridge`: a CLI demo harness around [`overload_resolver`], exercising
//! the resolution pipeline end-to-end against a JSON-described call site.

pub mod cli;

pub use overload_resolver as resolver;
