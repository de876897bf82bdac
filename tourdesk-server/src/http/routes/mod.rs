//! Route handlers organized by resource

pub mod crud;
pub mod currencies;
pub mod customers;
pub mod enrollments;
pub mod groups;
pub mod health;
pub mod locations;
