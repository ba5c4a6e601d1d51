//! Views and their head lifecycle.

pub mod controller;
pub mod route;
pub mod session;

pub use controller::{Applied, DetailPhase, ListingPhase, View, ViewController};
pub use route::{Route, StaticPage};
pub use session::Session;
