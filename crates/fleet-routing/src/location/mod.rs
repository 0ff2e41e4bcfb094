//! Location storage contract and its HTTP surface.

pub mod repository;
pub mod router;

pub use repository::LocationRepository;
pub use router::location_router;
