//! Hotel domain records.
//!
//! Field names on the wire follow the historical `dados.json` layout so that
//! files written by earlier versions of the tool remain readable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed textual date format used in the data file and in forms.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Status assigned to every freshly made reservation.
pub const DEFAULT_STATUS: &str = "Active";

/// A registered hotel guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Generated identifier, immutable once created.
    pub id: String,
    /// Full name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Contact phone.
    #[serde(rename = "telefone")]
    pub phone: String,
    /// Contact e-mail.
    pub email: String,
}

impl Client {
    /// Create a client with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Label used in pickers: `name - phone`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.phone)
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room number. Expected to be unique, not enforced.
    #[serde(rename = "numero")]
    pub number: u32,
    /// Free-form room type (the shell offers a closed set).
    #[serde(rename = "tipo")]
    pub kind: String,
    /// Nightly price.
    #[serde(rename = "preco")]
    pub price: f64,
    /// Whether the room may be selected for a new reservation.
    #[serde(rename = "disponivel", default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Room {
    /// Create a room that starts out available.
    pub fn new(number: u32, kind: impl Into<String>, price: f64) -> Self {
        Self {
            number,
            kind: kind.into(),
            price,
            available: true,
        }
    }

    /// Label used in pickers: `number - kind`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.number, self.kind)
    }
}

/// A booking of one room by one client.
///
/// `client_id` and `room_number` are plain references; the reservation does
/// not own either record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Generated identifier.
    pub id: String,
    /// Id of the booking client.
    #[serde(rename = "cliente_id")]
    pub client_id: String,
    /// Number of the booked room.
    #[serde(rename = "quarto_numero")]
    pub room_number: u32,
    /// Arrival date.
    #[serde(with = "dmy_date")]
    pub checkin: NaiveDate,
    /// Departure date.
    #[serde(with = "dmy_date")]
    pub checkout: NaiveDate,
    /// Free-form status, `Active` unless restored otherwise.
    #[serde(default = "default_status")]
    pub status: String,
    /// Nights multiplied by the room's nightly price.
    #[serde(rename = "valor_total", default)]
    pub total: f64,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Reservation {
    /// Build a new active reservation, computing its total from `room.price`.
    ///
    /// Dates are not checked: a checkout on or before checkin produces a zero
    /// or negative total.
    pub fn new(client: &Client, room: &Room, checkin: NaiveDate, checkout: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client.id.clone(),
            room_number: room.number,
            checkin,
            checkout,
            status: default_status(),
            total: stay_total(room.price, checkin, checkout),
        }
    }

    /// Whole days between checkin and checkout.
    pub fn nights(&self) -> i64 {
        nights_between(self.checkin, self.checkout)
    }

    /// Recompute the total against the given nightly price.
    pub fn recompute_total(&mut self, price: f64) {
        self.total = stay_total(price, self.checkin, self.checkout);
    }

    /// `dd/mm/yyyy a dd/mm/yyyy` period label.
    pub fn period_label(&self) -> String {
        format!(
            "{} a {}",
            self.checkin.format(DATE_FORMAT),
            self.checkout.format(DATE_FORMAT)
        )
    }
}

/// Whole days from `checkin` to `checkout`, negative when reversed.
pub fn nights_between(checkin: NaiveDate, checkout: NaiveDate) -> i64 {
    (checkout - checkin).num_days()
}

/// Nights multiplied by the nightly price.
pub fn stay_total(price: f64, checkin: NaiveDate, checkout: NaiveDate) -> f64 {
    nights_between(checkin, checkout) as f64 * price
}

mod dmy_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn reservation_total_is_nights_times_price() {
        let client = Client::new("Ana", "111", "a@x.com");
        let room = Room::new(101, "Double", 100.0);
        let reservation = Reservation::new(&client, &room, date(10, 1, 2024), date(13, 1, 2024));

        assert_eq!(reservation.nights(), 3);
        assert_eq!(reservation.total, 300.0);
        assert_eq!(reservation.status, "Active");
        assert_eq!(reservation.client_id, client.id);
        assert_eq!(reservation.room_number, 101);
    }

    #[test]
    fn total_spans_month_boundaries() {
        let client = Client::new("Ana", "111", "a@x.com");
        let room = Room::new(7, "Single", 85.5);
        let reservation = Reservation::new(&client, &room, date(28, 2, 2024), date(2, 3, 2024));
        assert_eq!(reservation.nights(), 3);
        assert_eq!(reservation.total, 256.5);
    }

    #[test]
    fn reversed_dates_yield_non_positive_total() {
        let client = Client::new("Ana", "111", "a@x.com");
        let room = Room::new(1, "Single", 50.0);
        let same_day = Reservation::new(&client, &room, date(15, 1, 2024), date(15, 1, 2024));
        assert_eq!(same_day.total, 0.0);
        let reversed = Reservation::new(&client, &room, date(15, 1, 2024), date(13, 1, 2024));
        assert_eq!(reversed.total, -100.0);
    }

    #[test]
    fn records_use_data_file_keys() {
        let client = Client {
            id: "c1".to_string(),
            name: "Ana".to_string(),
            phone: "111".to_string(),
            email: "a@x.com".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&client).unwrap(),
            json!({"id": "c1", "nome": "Ana", "telefone": "111", "email": "a@x.com"})
        );

        let room = Room::new(101, "Double", 100.0);
        assert_eq!(
            serde_json::to_value(&room).unwrap(),
            json!({"numero": 101, "tipo": "Double", "preco": 100.0, "disponivel": true})
        );

        let mut reservation = Reservation::new(&client, &room, date(10, 1, 2024), date(13, 1, 2024));
        reservation.id = "r1".to_string();
        assert_eq!(
            serde_json::to_value(&reservation).unwrap(),
            json!({
                "id": "r1",
                "cliente_id": "c1",
                "quarto_numero": 101,
                "checkin": "10/01/2024",
                "checkout": "13/01/2024",
                "status": "Active",
                "valor_total": 300.0
            })
        );
    }

    #[test]
    fn missing_optional_keys_fall_back_to_defaults() {
        let room: Room =
            serde_json::from_value(json!({"numero": 3, "tipo": "Single", "preco": 40})).unwrap();
        assert!(room.available);

        let reservation: Reservation = serde_json::from_value(json!({
            "id": "r1",
            "cliente_id": "c1",
            "quarto_numero": 3,
            "checkin": "01/02/2024",
            "checkout": "03/02/2024"
        }))
        .unwrap();
        assert_eq!(reservation.status, DEFAULT_STATUS);
        assert_eq!(reservation.checkin, date(1, 2, 2024));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let result: Result<Reservation, _> = serde_json::from_value(json!({
            "id": "r1",
            "cliente_id": "c1",
            "quarto_numero": 3,
            "checkin": "2024-02-01",
            "checkout": "03/02/2024"
        }));
        assert!(result.is_err());
    }
}
