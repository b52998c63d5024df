#![warn(clippy::all, missing_docs)]

//! Core domain logic for the hotel manager.
//!
//! This crate hosts the client/room/reservation records, the store that owns
//! and persists them, the input checks applied before mutations, the report
//! calculations, and configuration handling used by the terminal UI.

pub mod config;
pub mod forms;
pub mod models;
pub mod reports;
pub mod store;

pub use config::AppConfig;
pub use forms::{ClientForm, FormError, ReservationForm, ReservationRequest, RoomForm};
pub use models::{Client, Reservation, Room};
pub use reports::{Occupancy, ReportKind};
pub use store::{HotelStore, LoadError, StoreError};
