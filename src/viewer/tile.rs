//! Tile cache with per-tile render state and LRU eviction.

use std::fmt;
use std::num::NonZeroUsize;

use glam::IVec2;
use image::RgbaImage;
use lru::LruCache;

use crate::geometry::Rect2i;

/// Render state of a cached tile.
///
/// `Valid` tiles are reused as-is. Invalidation moves every tile to
/// `Invalidated`; the next render re-renders them (`Rendering`) and stores
/// the result as `Valid` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Valid,
    Invalidated,
    Rendering,
}

/// World rectangle covered by the tile at `coord`.
pub fn tile_bounds(coord: IVec2, tile_size: u32) -> Rect2i {
    let ts = tile_size as i32;
    Rect2i::new(coord.x * ts, coord.y * ts, tile_size, tile_size)
}

/// Whether every tile overlapping `area` lies inside the `i32` world, so
/// its bounds can be computed without overflow.
pub fn tiles_in_range(area: Rect2i, tile_size: u32) -> bool {
    if area.is_empty() || tile_size == 0 {
        return true;
    }
    if !area.fits() {
        return false;
    }
    let ts = tile_size as i64;
    let span = |min: i32, max: i32| {
        let first = (min as i64).div_euclid(ts) * ts;
        let end = ((max as i64 - 1).div_euclid(ts) + 1) * ts;
        first >= i32::MIN as i64 && end <= i32::MAX as i64
    };
    span(area.min_x, area.max_x()) && span(area.min_y, area.max_y())
}

/// Coordinates of every tile overlapping `area`, row by row.
pub fn tiles_overlapping(area: Rect2i, tile_size: u32) -> Vec<IVec2> {
    if area.is_empty() || tile_size == 0 {
        return Vec::new();
    }
    let ts = tile_size as i32;
    let (x0, x1) = (area.min_x.div_euclid(ts), (area.max_x() - 1).div_euclid(ts));
    let (y0, y1) = (area.min_y.div_euclid(ts), (area.max_y() - 1).div_euclid(ts));

    let mut coords = Vec::with_capacity((x1 - x0 + 1) as usize * (y1 - y0 + 1) as usize);
    for y in y0..=y1 {
        for x in x0..=x1 {
            coords.push(IVec2::new(x, y));
        }
    }
    coords
}

#[derive(Debug)]
struct Tile {
    image: RgbaImage,
    state: TileState,
}

fn capacity_of(max_tiles: usize) -> NonZeroUsize {
    NonZeroUsize::new(max_tiles).unwrap_or(NonZeroUsize::MIN)
}

/// Rendered tiles keyed by tile coordinate, bounded with least recently used
/// eviction.
pub struct TileCache {
    tiles: LruCache<IVec2, Tile>,
}

impl TileCache {
    /// Cache holding at most `max_tiles` tiles (at least one).
    pub fn new(max_tiles: usize) -> Self {
        Self {
            tiles: LruCache::new(capacity_of(max_tiles)),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tiles.cap().get()
    }

    /// State of a cached tile. Does not count as a use.
    pub fn state(&self, coord: IVec2) -> Option<TileState> {
        self.tiles.peek(&coord).map(|t| t.state)
    }

    /// Whether the tile at `coord` must be rendered before use.
    pub fn needs_render(&self, coord: IVec2) -> bool {
        self.state(coord) != Some(TileState::Valid)
    }

    /// Image of a tile, marking it as recently used.
    pub fn get(&mut self, coord: IVec2) -> Option<&RgbaImage> {
        self.tiles.get(&coord).map(|t| &t.image)
    }

    /// Stores a freshly rendered tile as `Valid`, evicting the least recently
    /// used tile when full.
    pub fn insert(&mut self, coord: IVec2, image: RgbaImage) {
        self.tiles.put(
            coord,
            Tile {
                image,
                state: TileState::Valid,
            },
        );
    }

    /// Sets the state of an existing tile; returns false if it is not cached.
    pub fn set_state(&mut self, coord: IVec2, state: TileState) -> bool {
        match self.tiles.peek_mut(&coord) {
            Some(tile) => {
                tile.state = state;
                true
            }
            None => false,
        }
    }

    /// Marks every tile `Invalidated`. Returns how many tiles were affected.
    pub fn invalidate_all(&mut self) -> usize {
        let mut count = 0;
        for (_, tile) in self.tiles.iter_mut() {
            if tile.state != TileState::Invalidated {
                tile.state = TileState::Invalidated;
                count += 1;
            }
        }
        count
    }

    /// Changes the capacity, evicting least recently used tiles that no
    /// longer fit. Returns how many were evicted.
    pub fn resize(&mut self, max_tiles: usize) -> usize {
        let before = self.tiles.len();
        self.tiles.resize(capacity_of(max_tiles));
        before - self.tiles.len()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

impl fmt::Debug for TileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileCache")
            .field("len", &self.tiles.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
