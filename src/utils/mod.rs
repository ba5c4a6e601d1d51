//! Utility modules shared by the server, the CLI and the browse session.

pub mod escape;
pub mod slug;
