//! Repository functions for the domain layer (generic over ConnectionTrait).
//!
//! Repos return domain models and `DomainError`; raw `DbErr` stays below in
//! the adapters.

pub mod rooms;
pub mod rounds;
pub mod users;
