//! OCPI protocol-level types

pub mod version;

pub use version::OcpiVersion;
