//! Input checks applied before any store mutation.
//!
//! Each form turns raw text fields into a domain value or a [`FormError`]
//! whose message is shown to the user as-is.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::{
    models::{Client, Room, DATE_FORMAT},
    store::HotelStore,
};

/// Room types offered by the interface.
pub const ROOM_KINDS: [&str; 3] = ["Double", "Single", "Presidential"];

// Day and month may be written with one or two digits, as the data file accepts.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").expect("failed to compile date regex")
});

/// User-facing validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was left blank.
    #[error("Fill in all fields!")]
    MissingFields,
    /// The room number is not a whole number.
    #[error("Room number must be a whole number: {0}")]
    InvalidNumber(String),
    /// The price is not a non-negative decimal.
    #[error("Price must be a non-negative number: {0}")]
    InvalidPrice(String),
    /// A date does not match `dd/mm/yyyy` or is not a real day.
    #[error("Invalid date {0}, expected dd/mm/yyyy")]
    InvalidDate(String),
    /// Checkout falls on or before checkin.
    #[error("Check-out must be after check-in")]
    CheckoutNotAfterCheckin,
    /// The selected client no longer exists.
    #[error("Selected client not found")]
    UnknownClient,
    /// The selected room does not exist or is already booked.
    #[error("Selected room is not available")]
    UnavailableRoom,
}

/// Parse a `dd/mm/yyyy` date. Single-digit day and month are accepted.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FormError> {
    let trimmed = raw.trim();
    if !DATE_PATTERN.is_match(trimmed) {
        return Err(FormError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

/// Render a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn required(value: &str) -> Result<&str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingFields)
    } else {
        Ok(trimmed)
    }
}

/// Raw client registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    /// Full name.
    pub name: String,
    /// Phone.
    pub phone: String,
    /// E-mail.
    pub email: String,
}

impl ClientForm {
    /// Pre-fill the form from an existing client.
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
        }
    }

    /// Build a new client when every field is present.
    pub fn validate(&self) -> Result<Client, FormError> {
        let name = required(&self.name)?;
        let phone = required(&self.phone)?;
        let email = required(&self.email)?;
        Ok(Client::new(name, phone, email))
    }
}

/// Raw room registration fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomForm {
    /// Room number.
    pub number: String,
    /// Room type.
    pub kind: String,
    /// Nightly price.
    pub price: String,
}

impl RoomForm {
    /// Build a new available room from the fields.
    pub fn validate(&self) -> Result<Room, FormError> {
        let number = required(&self.number)?;
        let kind = required(&self.kind)?;
        let price = required(&self.price)?;

        let number = number
            .parse::<u32>()
            .map_err(|_| FormError::InvalidNumber(number.to_string()))?;
        let price = price
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| FormError::InvalidPrice(price.to_string()))?;
        Ok(Room::new(number, kind, price))
    }
}

/// Raw reservation fields: picker selections plus typed dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationForm {
    /// Id of the chosen client.
    pub client_id: Option<String>,
    /// Number of the chosen room.
    pub room_number: Option<u32>,
    /// Check-in date text.
    pub checkin: String,
    /// Check-out date text.
    pub checkout: String,
}

/// A reservation request that passed every boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Booking client.
    pub client_id: String,
    /// Booked room.
    pub room_number: u32,
    /// Arrival.
    pub checkin: NaiveDate,
    /// Departure, strictly after arrival.
    pub checkout: NaiveDate,
}

impl ReservationForm {
    /// Parse both dates and require checkout after checkin.
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), FormError> {
        let checkin = parse_date(required(&self.checkin)?)?;
        let checkout = parse_date(required(&self.checkout)?)?;
        if checkin >= checkout {
            return Err(FormError::CheckoutNotAfterCheckin);
        }
        Ok((checkin, checkout))
    }

    /// Check selections against the store and the dates against each other.
    pub fn validate(&self, store: &HotelStore) -> Result<ReservationRequest, FormError> {
        let client_id = self.client_id.as_deref().ok_or(FormError::MissingFields)?;
        let room_number = self.room_number.ok_or(FormError::MissingFields)?;
        let (checkin, checkout) = self.dates()?;

        if store.client(client_id).is_none() {
            return Err(FormError::UnknownClient);
        }
        if !store
            .available_rooms()
            .any(|room| room.number == room_number)
        {
            return Err(FormError::UnavailableRoom);
        }

        Ok(ReservationRequest {
            client_id: client_id.to_string(),
            room_number,
            checkin,
            checkout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn client_form_requires_every_field() {
        let form = ClientForm {
            name: "Ana".to_string(),
            phone: "  ".to_string(),
            email: "a@x.com".to_string(),
        };
        assert_eq!(form.validate(), Err(FormError::MissingFields));

        let form = ClientForm {
            phone: " 111 ".to_string(),
            ..form
        };
        let client = form.validate().expect("valid client");
        assert_eq!(client.phone, "111");
        assert!(!client.id.is_empty());
    }

    #[test]
    fn client_form_prefills_from_record() {
        let client = Client::new("Ana", "111", "a@x.com");
        let form = ClientForm::from_client(&client);
        assert_eq!(form.name, "Ana");
        assert_eq!(form.email, "a@x.com");
    }

    #[test]
    fn room_form_parses_number_and_price() {
        let form = RoomForm {
            number: "101".to_string(),
            kind: "Double".to_string(),
            price: "100,50".to_string(),
        };
        let room = form.validate().expect("valid room");
        assert_eq!(room.number, 101);
        assert_eq!(room.price, 100.5);
        assert!(room.available);

        let bad_number = RoomForm {
            number: "1a".to_string(),
            ..form.clone()
        };
        assert!(matches!(
            bad_number.validate(),
            Err(FormError::InvalidNumber(_))
        ));

        let negative = RoomForm {
            price: "-3".to_string(),
            ..form
        };
        assert!(matches!(negative.validate(), Err(FormError::InvalidPrice(_))));
    }

    #[test]
    fn dates_follow_fixed_format() {
        assert_eq!(
            parse_date("10/01/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"))
        );
        assert_eq!(
            parse_date("10/1/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"))
        );
        assert_eq!(
            parse_date("1/1/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"))
        );
        assert!(parse_date("1/1/24").is_err());
        assert!(parse_date("١٠/٠١/٢٠٢٤").is_err());
        assert!(parse_date("2024-01-10").is_err());
        assert!(parse_date("31/02/2024").is_err());
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(format_date(date), "05/03/2024");
    }

    #[test]
    fn equal_dates_are_rejected_before_mutation() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        let client = Client::new("Ana", "111", "a@x.com");
        let client_id = client.id.clone();
        store.add_client(client)?;
        store.add_room(Room::new(101, "Double", 100.0))?;

        let form = ReservationForm {
            client_id: Some(client_id),
            room_number: Some(101),
            checkin: "15/01/2024".to_string(),
            checkout: "15/01/2024".to_string(),
        };
        assert_eq!(
            form.validate(&store),
            Err(FormError::CheckoutNotAfterCheckin)
        );
        assert!(store.reservations().is_empty());
        assert!(store.room(101).expect("room exists").available);
        Ok(())
    }

    #[test]
    fn reservation_form_checks_selections() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        let client = Client::new("Ana", "111", "a@x.com");
        let client_id = client.id.clone();
        store.add_client(client)?;
        store.add_room(Room::new(101, "Double", 100.0))?;

        let mut form = ReservationForm {
            client_id: None,
            room_number: Some(101),
            checkin: "10/01/2024".to_string(),
            checkout: "13/01/2024".to_string(),
        };
        assert_eq!(form.validate(&store), Err(FormError::MissingFields));

        form.client_id = Some("ghost".to_string());
        assert_eq!(form.validate(&store), Err(FormError::UnknownClient));

        form.client_id = Some(client_id.clone());
        let request = form.validate(&store).expect("valid request");
        assert_eq!(request.room_number, 101);

        store.make_reservation(&client_id, 101, request.checkin, request.checkout)?;
        assert_eq!(form.validate(&store), Err(FormError::UnavailableRoom));
        Ok(())
    }
}
