//! Application services built on the core ports.

pub mod resolver;

pub use resolver::{Resolution, ResolveRequest, Resolver, SurveyEntry};
