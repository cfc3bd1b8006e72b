//! Registry implementations for looking up image tags

pub mod oci;

pub use oci::OciRegistry;
