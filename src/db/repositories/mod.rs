//! Repository implementations.
//!
//! Only the in-memory [`LocalRepository`] ships with the engine; production
//! storage lives elsewhere in the portal and plugs in through the traits in
//! [`crate::db::repository`].

pub mod local;

pub use local::LocalRepository;
