//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! entity records returned by the backend.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod input;
pub mod order;
pub mod price;
pub mod status;
pub mod user;

pub use cart::{Cart, CartItem};
pub use catalog::{Category, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use input::*;
pub use order::{Order, OrderItem};
pub use price::{format_price, parse_price};
pub use status::*;
pub use user::User;
