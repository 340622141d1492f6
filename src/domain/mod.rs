//! Domain Layer
//!
//! Entities, value objects, ports and the services built on top of them.
//! Nothing here knows about HTTP, SQLite or the geolocation provider.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
