//! Occupancy and revenue summaries.

use chrono::NaiveDate;

use crate::{
    models::{stay_total, Reservation, Room},
    store::HotelStore,
};

/// Rooms currently booked out of all registered rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    /// Rooms flagged unavailable.
    pub occupied: usize,
    /// All rooms.
    pub total: usize,
}

impl Occupancy {
    /// Occupied share as a percentage; 0 when there are no rooms.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.occupied as f64 / self.total as f64 * 100.0
        }
    }
}

/// Count occupied rooms.
pub fn occupancy(rooms: &[Room]) -> Occupancy {
    Occupancy {
        occupied: rooms.iter().filter(|room| !room.available).count(),
        total: rooms.len(),
    }
}

/// Sum of every reservation total.
pub fn revenue(reservations: &[Reservation]) -> f64 {
    reservations.iter().map(|reservation| reservation.total).sum()
}

/// Price preview for a stay, using the same formula as a reservation.
pub fn quote(room: &Room, checkin: NaiveDate, checkout: NaiveDate) -> f64 {
    stay_total(room.price, checkin, checkout)
}

/// Format an amount the way the interface shows money.
pub fn format_currency(value: f64) -> String {
    format!("R$ {value:.2}")
}

/// Reports available on the reports screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Share of booked rooms.
    Occupancy,
    /// Revenue from all reservations.
    Financial,
}

impl ReportKind {
    /// Every report, in menu order.
    pub const ALL: [ReportKind; 2] = [ReportKind::Occupancy, ReportKind::Financial];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Occupancy => "Occupancy",
            ReportKind::Financial => "Financial",
        }
    }

    /// Description/value rows for the report table.
    pub fn rows(self, store: &HotelStore) -> Vec<(String, String)> {
        match self {
            ReportKind::Occupancy => {
                let summary = occupancy(store.rooms());
                vec![
                    (
                        "Occupancy rate".to_string(),
                        format!("{:.1}%", summary.rate()),
                    ),
                    (
                        "Occupied rooms".to_string(),
                        format!("{} / {}", summary.occupied, summary.total),
                    ),
                ]
            }
            ReportKind::Financial => vec![
                (
                    "Total revenue".to_string(),
                    format_currency(revenue(store.reservations())),
                ),
                (
                    "Reservations".to_string(),
                    store.reservations().len().to_string(),
                ),
            ],
        }
    }
}
