//! Obstacle map loading.
//!
//! The server reads `map.json` (produced by the offline map editor) once at
//! start-up: a JSON array of objects with a position, a collision area and
//! a visibility flag. Four invisible boundary walls are appended after
//! parsing so the integrator never has to special-case the field edges.

use serde::Deserialize;
use shared::{CollisionArea, CollisionBox, Vec2, FIELD_MAX_X, FIELD_MAX_Y};
use std::error::Error;
use std::fs;
use std::path::Path;

/// A static rectangular obstacle. Read-only after start-up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapObject {
    pub position: Vec2,
    pub collision_area: CollisionArea,
    pub is_visible: bool,
}

impl MapObject {
    pub fn collision_box(&self) -> CollisionBox {
        CollisionBox::from_area(self.position, self.collision_area, true)
    }
}

/// Loads the map file and appends the boundary walls.
///
/// A missing or malformed file is fatal: the caller aborts before
/// accepting any connection.
pub fn load_map(path: &Path) -> Result<Vec<MapObject>, Box<dyn Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read map file {}: {}", path.display(), e))?;
    let objects: Vec<MapObject> = serde_json::from_str(&contents)
        .map_err(|e| format!("failed to parse map file {}: {}", path.display(), e))?;
    Ok(append_boundaries(objects))
}

/// Appends the four implicit boundary walls: one unit thick, placed one
/// unit outside the field so positions 0 and `FIELD_MAX - 1` stay legal.
pub fn append_boundaries(mut objects: Vec<MapObject>) -> Vec<MapObject> {
    let boundary = |x: f64, y: f64, w: f64, h: f64| MapObject {
        position: Vec2::new(x, y),
        collision_area: CollisionArea::new(w, h),
        is_visible: false,
    };

    objects.push(boundary(-1.0, -1.0, FIELD_MAX_X + 2.0, 1.0)); // bottom
    objects.push(boundary(-1.0, FIELD_MAX_Y, FIELD_MAX_X + 2.0, 1.0)); // top
    objects.push(boundary(-1.0, -1.0, 1.0, FIELD_MAX_Y + 2.0)); // left
    objects.push(boundary(FIELD_MAX_X, -1.0, 1.0, FIELD_MAX_Y + 2.0)); // right
    objects
}
