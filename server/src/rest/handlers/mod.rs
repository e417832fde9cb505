//! REST-Handler fuer die Torhaus-API

pub mod authenticate;
pub mod users;
