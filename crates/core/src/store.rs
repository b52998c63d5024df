//! In-memory hotel data and its single-file persistence.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Client, Reservation, Room};

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "dados.json";

/// Reasons a data file could not be turned back into a store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No data file exists yet.
    #[error("data file {} does not exist", path.display())]
    FileMissing {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not a valid snapshot.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A reservation points at a client that is not in the file.
    #[error("reservation {reservation_id} references unknown client {client_id}")]
    DanglingClient {
        /// Orphaned reservation.
        reservation_id: String,
        /// Missing client id.
        client_id: String,
    },
    /// A reservation points at a room that is not in the file.
    #[error("reservation {reservation_id} references unknown room {room_number}")]
    DanglingRoom {
        /// Orphaned reservation.
        reservation_id: String,
        /// Missing room number.
        room_number: u32,
    },
}

/// Failures reported by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No client with the given id.
    #[error("client {0} not found")]
    UnknownClient(String),
    /// No room with the given number.
    #[error("room {0} not found")]
    UnknownRoom(u32),
    /// The in-memory change was applied but could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        /// Data file path.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialized representation of the whole data file.
#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(rename = "clientes", default)]
    clients: Vec<Client>,
    #[serde(rename = "quartos", default)]
    rooms: Vec<Room>,
    #[serde(rename = "reservas", default)]
    reservations: Vec<Reservation>,
}

/// Owner of all clients, rooms and reservations.
///
/// Every mutating operation writes the full dataset back to the data file
/// before returning.
#[derive(Debug)]
pub struct HotelStore {
    path: PathBuf,
    clients: Vec<Client>,
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
}

impl HotelStore {
    /// Create an empty store backed by `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clients: Vec::new(),
            rooms: Vec::new(),
            reservations: Vec::new(),
        }
    }

    /// Create a store backed by `path` and load it.
    ///
    /// When loading fails the store starts empty and the failure is returned
    /// alongside it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<LoadError>) {
        let mut store = Self::new(path);
        match store.load() {
            Ok(()) => (store, None),
            Err(err) => {
                warn!("Starting with empty data: {err}");
                (store, Some(err))
            }
        }
    }

    /// Path of the backing data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registered clients in insertion order.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Registered rooms in insertion order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Reservations in creation order.
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Look up a client by id.
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// Look up the first room with `number`.
    pub fn room(&self, number: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.number == number)
    }

    /// Rooms currently flagged available, recomputed on every call.
    pub fn available_rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.iter().filter(|room| room.available)
    }

    /// Register a client.
    pub fn add_client(&mut self, client: Client) -> Result<(), StoreError> {
        info!(id = %client.id, name = %client.name, "Client added");
        self.clients.push(client);
        self.save()
    }

    /// Remove the client with `id`. Reservations referencing it are kept.
    pub fn remove_client(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.clients.len();
        self.clients.retain(|client| client.id != id);
        debug!(id, removed = before - self.clients.len(), "Client removal");
        self.save()
    }

    /// Register a room. Duplicate numbers are accepted.
    pub fn add_room(&mut self, room: Room) -> Result<(), StoreError> {
        info!(number = room.number, kind = %room.kind, "Room added");
        self.rooms.push(room);
        self.save()
    }

    /// Remove the first room with `number`, returning it if one existed.
    ///
    /// Reservations referencing the room are kept.
    pub fn remove_room(&mut self, number: u32) -> Result<Option<Room>, StoreError> {
        let index = self.rooms.iter().position(|room| room.number == number);
        let removed = index.map(|index| self.rooms.remove(index));
        debug!(number, removed = removed.is_some(), "Room removal");
        self.save()?;
        Ok(removed)
    }

    /// Remove the room at position `index` in [`rooms`](Self::rooms).
    ///
    /// Unlike [`remove_room`](Self::remove_room) this picks out one record
    /// even when several rooms share a number. Out-of-range indexes are a
    /// no-op that still persists.
    pub fn remove_room_at(&mut self, index: usize) -> Result<Option<Room>, StoreError> {
        let removed = (index < self.rooms.len()).then(|| self.rooms.remove(index));
        debug!(
            index,
            number = removed.as_ref().map(|room| room.number),
            "Room removal by position"
        );
        self.save()?;
        Ok(removed)
    }

    /// Book `room_number` for `client_id`, marking the room unavailable.
    ///
    /// Dates are taken as given; callers are expected to check that checkout
    /// falls after checkin.
    pub fn make_reservation(
        &mut self,
        client_id: &str,
        room_number: u32,
        checkin: NaiveDate,
        checkout: NaiveDate,
    ) -> Result<Reservation, StoreError> {
        let client = self
            .clients
            .iter()
            .find(|client| client.id == client_id)
            .ok_or_else(|| StoreError::UnknownClient(client_id.to_string()))?;
        let room = self
            .rooms
            .iter_mut()
            .find(|room| room.number == room_number)
            .ok_or(StoreError::UnknownRoom(room_number))?;

        let reservation = Reservation::new(client, room, checkin, checkout);
        room.available = false;
        info!(
            id = %reservation.id,
            room = room_number,
            total = reservation.total,
            "Reservation made"
        );
        self.reservations.push(reservation.clone());
        self.save()?;
        Ok(reservation)
    }

    /// Write the full dataset to the data file.
    pub fn save(&self) -> Result<(), StoreError> {
        let snapshot = SnapshotRef {
            clients: &self.clients,
            rooms: &self.rooms,
            reservations: &self.reservations,
        };
        let serialised = serde_json::to_vec_pretty(&snapshot)?;
        write_file(&self.path, &serialised).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Data saved");
        Ok(())
    }

    /// Replace the in-memory collections with the contents of the data file.
    ///
    /// Totals are recomputed from the dates and the referenced room's current
    /// price. On any failure all three collections are left empty.
    pub fn load(&mut self) -> Result<(), LoadError> {
        self.clients.clear();
        self.rooms.clear();
        self.reservations.clear();

        let snapshot = self.read_snapshot()?;
        let mut reservations = Vec::with_capacity(snapshot.reservations.len());
        for mut reservation in snapshot.reservations {
            if !snapshot
                .clients
                .iter()
                .any(|client| client.id == reservation.client_id)
            {
                return Err(LoadError::DanglingClient {
                    reservation_id: reservation.id,
                    client_id: reservation.client_id,
                });
            }
            let Some(room) = snapshot
                .rooms
                .iter()
                .find(|room| room.number == reservation.room_number)
            else {
                return Err(LoadError::DanglingRoom {
                    reservation_id: reservation.id,
                    room_number: reservation.room_number,
                });
            };
            reservation.recompute_total(room.price);
            reservations.push(reservation);
        }

        info!(
            clients = snapshot.clients.len(),
            rooms = snapshot.rooms.len(),
            reservations = reservations.len(),
            "Data loaded"
        );
        self.clients = snapshot.clients;
        self.rooms = snapshot.rooms;
        self.reservations = reservations;
        Ok(())
    }

    fn read_snapshot(&self) -> Result<Snapshot, LoadError> {
        let path = &self.path;
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::FileMissing { path: path.clone() }
            } else {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })
    }
}

/// Borrowed counterpart of [`Snapshot`] used when writing.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    #[serde(rename = "clientes")]
    clients: &'a [Client],
    #[serde(rename = "quartos")]
    rooms: &'a [Room],
    #[serde(rename = "reservas")]
    reservations: &'a [Reservation],
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn read_json(path: &Path) -> Result<Value> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    #[test]
    fn reservation_scenario_books_room() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));

        let ana = Client::new("Ana", "111", "a@x.com");
        let ana_id = ana.id.clone();
        store.add_client(ana)?;
        store.add_room(Room::new(101, "Double", 100.0))?;

        let reservation = store.make_reservation(&ana_id, 101, date(10, 1, 2024), date(13, 1, 2024))?;

        assert_eq!(reservation.total, 300.0);
        assert_eq!(reservation.status, "Active");
        assert_eq!(store.reservations().len(), 1);
        assert!(!store.room(101).expect("room exists").available);
        assert_eq!(store.available_rooms().count(), 0);
        Ok(())
    }

    #[test]
    fn every_mutation_persists() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("dados.json");
        let mut store = HotelStore::new(&path);

        let client = Client::new("Ana", "111", "a@x.com");
        let client_id = client.id.clone();
        store.add_client(client)?;
        assert_eq!(read_json(&path)?["clientes"].as_array().map(Vec::len), Some(1));

        store.add_room(Room::new(101, "Double", 100.0))?;
        assert_eq!(read_json(&path)?["quartos"][0]["numero"], json!(101));

        store.make_reservation(&client_id, 101, date(1, 3, 2024), date(2, 3, 2024))?;
        let on_disk = read_json(&path)?;
        assert_eq!(on_disk["quartos"][0]["disponivel"], json!(false));
        assert_eq!(on_disk["reservas"][0]["valor_total"], json!(100.0));

        store.remove_room(101)?;
        assert_eq!(read_json(&path)?["quartos"], json!([]));
        Ok(())
    }

    #[test]
    fn available_rooms_tracks_flags_in_order() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        let client = Client::new("Bob", "222", "b@x.com");
        let client_id = client.id.clone();
        store.add_client(client)?;
        for number in [101, 102, 103] {
            store.add_room(Room::new(number, "Single", 80.0))?;
        }

        store.make_reservation(&client_id, 102, date(1, 5, 2024), date(4, 5, 2024))?;

        let numbers: Vec<u32> = store.available_rooms().map(|room| room.number).collect();
        assert_eq!(numbers, vec![101, 103]);
        for reservation in store.reservations() {
            assert!(store
                .available_rooms()
                .all(|room| room.number != reservation.room_number));
        }
        Ok(())
    }

    #[test]
    fn unknown_references_leave_state_untouched() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        store.add_room(Room::new(101, "Double", 100.0))?;

        let err = store
            .make_reservation("missing", 101, date(1, 1, 2024), date(2, 1, 2024))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownClient(id) if id == "missing"));

        let client = Client::new("Ana", "111", "a@x.com");
        let client_id = client.id.clone();
        store.add_client(client)?;
        let err = store
            .make_reservation(&client_id, 999, date(1, 1, 2024), date(2, 1, 2024))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownRoom(999)));

        assert!(store.reservations().is_empty());
        assert!(store.room(101).expect("room exists").available);
        Ok(())
    }

    #[test]
    fn round_trip_restores_everything() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");
        let mut store = HotelStore::new(&path);
        let ana = Client::new("Ana", "111", "a@x.com");
        let ana_id = ana.id.clone();
        store.add_client(ana)?;
        store.add_client(Client::new("Bob", "222", "b@x.com"))?;
        store.add_room(Room::new(101, "Double", 100.0))?;
        store.add_room(Room::new(202, "Presidential", 450.0))?;
        store.make_reservation(&ana_id, 202, date(10, 1, 2024), date(12, 1, 2024))?;

        let (reloaded, err) = HotelStore::open(&path);
        assert!(err.is_none());
        assert_eq!(reloaded.clients(), store.clients());
        assert_eq!(reloaded.rooms(), store.rooms());
        assert_eq!(reloaded.reservations(), store.reservations());
        assert_eq!(reloaded.reservations()[0].total, 900.0);
        Ok(())
    }

    #[test]
    fn load_recomputes_totals_and_restores_status() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");
        let snapshot = json!({
            "clientes": [{"id": "c1", "nome": "Ana", "telefone": "111", "email": "a@x.com"}],
            "quartos": [{"numero": 101, "tipo": "Double", "preco": 120.0, "disponivel": false}],
            "reservas": [{
                "id": "r1",
                "cliente_id": "c1",
                "quarto_numero": 101,
                "checkin": "10/01/2024",
                "checkout": "13/01/2024",
                "status": "Ativa",
                "valor_total": 1.0
            }]
        });
        fs::write(&path, serde_json::to_vec(&snapshot)?)?;

        let mut store = HotelStore::new(&path);
        store.load()?;
        let reservation = &store.reservations()[0];
        assert_eq!(reservation.total, 360.0);
        assert_eq!(reservation.status, "Ativa");
        assert!(!store.rooms()[0].available);
        Ok(())
    }

    #[test]
    fn removing_client_keeps_reservations_and_breaks_next_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");
        let mut store = HotelStore::new(&path);
        let ana = Client::new("Ana", "111", "a@x.com");
        let ana_id = ana.id.clone();
        store.add_client(ana)?;
        store.add_room(Room::new(101, "Double", 100.0))?;
        let reservation =
            store.make_reservation(&ana_id, 101, date(10, 1, 2024), date(13, 1, 2024))?;

        store.remove_client(&ana_id)?;
        assert!(store.clients().is_empty());
        assert_eq!(store.reservations().len(), 1);

        let (reloaded, err) = HotelStore::open(&path);
        match err {
            Some(LoadError::DanglingClient {
                reservation_id,
                client_id,
            }) => {
                assert_eq!(reservation_id, reservation.id);
                assert_eq!(client_id, ana_id);
            }
            other => panic!("unexpected load outcome: {other:?}"),
        }
        assert!(reloaded.clients().is_empty());
        assert!(reloaded.rooms().is_empty());
        assert!(reloaded.reservations().is_empty());
        Ok(())
    }

    #[test]
    fn removing_booked_room_reports_dangling_room() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");
        let mut store = HotelStore::new(&path);
        let ana = Client::new("Ana", "111", "a@x.com");
        let ana_id = ana.id.clone();
        store.add_client(ana)?;
        store.add_room(Room::new(101, "Double", 100.0))?;
        store.make_reservation(&ana_id, 101, date(10, 1, 2024), date(13, 1, 2024))?;
        assert!(store.remove_room(101)?.is_some());
        assert!(store.remove_room(101)?.is_none());

        let (_, err) = HotelStore::open(&path);
        assert!(matches!(err, Some(LoadError::DanglingRoom { room_number: 101, .. })));
        Ok(())
    }

    #[test]
    fn missing_and_malformed_files_fall_back_to_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");

        let (store, err) = HotelStore::open(&path);
        assert!(matches!(err, Some(LoadError::FileMissing { .. })));
        assert!(store.clients().is_empty());

        fs::write(&path, "{ not json")?;
        let (store, err) = HotelStore::open(&path);
        assert!(matches!(err, Some(LoadError::Parse { .. })));
        assert!(store.rooms().is_empty());

        let dir_path = dir.path().join("as_directory");
        fs::create_dir(&dir_path)?;
        let (store, err) = HotelStore::open(&dir_path);
        assert!(matches!(err, Some(LoadError::Io { .. })));
        assert!(store.reservations().is_empty());
        Ok(())
    }

    #[test]
    fn duplicate_room_numbers_are_accepted() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        store.add_room(Room::new(5, "Single", 50.0))?;
        store.add_room(Room::new(5, "Double", 90.0))?;
        assert_eq!(store.rooms().len(), 2);
        assert_eq!(store.room(5).map(|room| room.kind.as_str()), Some("Single"));

        store.remove_room(5)?;
        assert_eq!(store.rooms().len(), 1);
        assert_eq!(store.rooms()[0].kind, "Double");
        Ok(())
    }

    #[test]
    fn removing_by_position_targets_the_selected_duplicate() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dados.json");
        let mut store = HotelStore::new(&path);
        store.add_room(Room::new(5, "Single", 50.0))?;
        store.add_room(Room::new(5, "Double", 90.0))?;

        let removed = store.remove_room_at(1)?;
        assert_eq!(removed.map(|room| room.kind), Some("Double".to_string()));
        assert_eq!(store.rooms().len(), 1);
        assert_eq!(store.rooms()[0].kind, "Single");
        assert_eq!(read_json(&path)?["quartos"][0]["tipo"], json!("Single"));

        assert!(store.remove_room_at(3)?.is_none());
        assert_eq!(store.rooms().len(), 1);
        Ok(())
    }

    #[test]
    fn removing_absent_client_is_a_no_op() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HotelStore::new(dir.path().join("dados.json"));
        store.add_client(Client::new("Ana", "111", "a@x.com"))?;
        store.remove_client("nobody")?;
        assert_eq!(store.clients().len(), 1);
        Ok(())
    }

    #[test]
    fn failed_write_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory")?;
        let mut store = HotelStore::new(blocker.join("dados.json"));

        let err = store
            .add_client(Client::new("Ana", "111", "a@x.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(store.clients().len(), 1);
        Ok(())
    }
}
