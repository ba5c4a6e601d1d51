//! Admin entry point: the hidden keystroke gate and sign-in.

pub mod gate;
pub mod identity;

pub use gate::{AdminGate, Key};
pub use identity::{
    AdminSession, ConfigIdentity, Credentials, IdentityProvider, hash_password, is_password_hash,
};
