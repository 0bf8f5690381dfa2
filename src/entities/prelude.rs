//! `SeaORM` Entity prelude

pub use super::events::Entity as Events;
