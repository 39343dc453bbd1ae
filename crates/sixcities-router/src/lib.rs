//! Route table for the six cities service.
//!
//! Routes are registered as a method plus an Express-style path template
//! (`/offers/:offerId`). Lookup is an exact match on method and segment
//! count; a literal segment beats a parameter segment at the first position
//! where two candidate templates differ, and remaining ties go to the route
//! registered first.
//!
//! # Example
//!
//! ```rust
//! use sixcities_router::RouteTable;
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.insert(Method::GET, "/offers/:offerId", "show").unwrap();
//! table.insert(Method::GET, "/offers/premium", "premium").unwrap();
//!
//! let found = table.lookup(&Method::GET, "/offers/premium").unwrap();
//! assert_eq!(*found.value, "premium");
//!
//! let found = table.lookup(&Method::GET, "/offers/65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
//! assert_eq!(*found.value, "show");
//! assert_eq!(found.params.get("offerId"), Some("65a1f0c2e4b0a1b2c3d4e5f6"));
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod params;
mod table;
mod template;

pub use error::RouteError;
pub use params::Params;
pub use table::{RouteMatch, RouteTable};
pub use template::{PathTemplate, Segment};
