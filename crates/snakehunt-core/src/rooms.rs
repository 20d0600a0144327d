//! Room and map placement.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::id::{MapId, RoomId};
use crate::model::{BoardMap, Room};

/// Picks the room a team is sent to after a roll.
///
/// Only active rooms below capacity qualify. The team's current room is
/// skipped while another candidate exists, so consecutive checkpoints happen
/// in different rooms. The least-occupied candidates win; ties are broken at
/// random.
pub fn select_room<R: Rng + ?Sized>(
    rooms: &[Room],
    current: Option<RoomId>,
    rng: &mut R,
) -> Option<RoomId> {
    let open: Vec<&Room> = rooms.iter().filter(|r| r.has_space()).collect();
    let elsewhere: Vec<&Room> = open
        .iter()
        .copied()
        .filter(|r| Some(r.id) != current)
        .collect();
    let pool = if elsewhere.is_empty() { open } else { elsewhere };

    let least = pool.iter().map(|r| r.occupancy).min()?;
    let tied: Vec<RoomId> = pool
        .iter()
        .filter(|r| r.occupancy == least)
        .map(|r| r.id)
        .collect();
    tied.choose(rng).copied()
}

/// Picks the map a new team is placed on: the active map with spare
/// capacity and the fewest teams, lowest id first.
pub fn select_map(maps: &[BoardMap]) -> Option<MapId> {
    maps.iter()
        .filter(|m| m.has_capacity())
        .min_by_key(|m| (m.assigned_teams, m.id))
        .map(|m| m.id)
}
