//! # Repositories
//!
//! One repository per aggregate:
//!
//! - [`product`] - catalog lookups, search, stock mutation primitives
//! - [`sale`] - sale and sale-line persistence
//! - [`ticket`] - kitchen ticket queue
//!
//! Methods that must participate in the checkout transaction take a
//! `&mut SqliteConnection` explicitly; everything else runs on the pool.

pub mod product;
pub mod sale;
pub mod ticket;
