//! Commands
//!
//! Bridge between the presentation layer and the registry/dispatch core.
//! Every command returns `Result<T, String>` so errors can be shown verbatim.

pub mod compose;
pub mod webhooks;
