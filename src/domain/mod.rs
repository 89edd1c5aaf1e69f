//! Domain Layer
//!
//! Value objects, entities, pure services and the ports the core talks to.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
