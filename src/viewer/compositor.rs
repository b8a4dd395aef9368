//! Tile-based compositor: owns the generator, the layer set and the tile
//! cache, and turns viewport requests into composed images.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use glam::IVec2;
use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::tile::{tile_bounds, tiles_in_range, tiles_overlapping, TileCache, TileState};
use super::ViewerError;
use crate::config::{LayerConfig, LayerConfigState, ViewConfig};
use crate::facets::FacetType;
use crate::generator::{GeneratorError, WorldGenerator};
use crate::geometry::Rect2i;
use crate::layers::{ControlValue, FacetLayer, Listener, ListenerId};
use crate::raster::{blit, Canvas};

/// Tile counts of the most recent [`Compositor::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub tiles_rendered: usize,
    pub tiles_reused: usize,
    /// Rendered tiles not stored because an invalidation raced the render.
    pub tiles_discarded: usize,
    /// Tiles whose region could not be generated; shown as background.
    pub tiles_failed: usize,
}

/// Shared between the compositor and the listeners it attaches to layers.
#[derive(Debug, Default)]
struct Invalidation {
    pending: AtomicBool,
    epoch: AtomicU64,
}

impl Invalidation {
    fn signal(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.pending.store(true, Ordering::SeqCst);
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

/// Composes visible layers over generated regions, tile by tile.
pub struct Compositor<G: WorldGenerator> {
    generator: G,
    layers: LayerConfig,
    view: ViewConfig,
    cache: TileCache,
    invalidation: Arc<Invalidation>,
    listeners: Vec<(FacetType, ListenerId)>,
    stats: RenderStats,
    disposed: bool,
}

impl<G: WorldGenerator> Compositor<G> {
    /// Takes ownership of the generator and layers and subscribes to every
    /// layer's change notifications.
    pub fn new(generator: G, layers: LayerConfig, view: ViewConfig) -> Result<Self, ViewerError> {
        view.validate()?;
        let mut compositor = Self {
            cache: TileCache::new(view.max_cached_tiles),
            generator,
            layers,
            view,
            invalidation: Arc::new(Invalidation::default()),
            listeners: Vec::new(),
            stats: RenderStats::default(),
            disposed: false,
        };
        let facets = compositor.layers.facet_types();
        for facet in facets {
            compositor.attach(facet);
        }
        Ok(compositor)
    }

    fn listener(&self) -> Listener {
        let invalidation = Arc::clone(&self.invalidation);
        Arc::new(move || invalidation.signal())
    }

    fn attach(&mut self, facet: FacetType) {
        let listener = self.listener();
        if let Some(layer) = self.layers.get_mut(facet) {
            let id = layer.add_listener(listener);
            self.listeners.push((facet, id));
        }
    }

    fn detach(&mut self, facet: FacetType, layer: &mut dyn FacetLayer) {
        if let Some(i) = self.listeners.iter().position(|(f, _)| *f == facet) {
            let (_, id) = self.listeners.swap_remove(i);
            layer.remove_listener(id);
        }
    }

    fn ensure_live(&self) -> Result<(), ViewerError> {
        if self.disposed {
            error!("compositor used after dispose");
            return Err(ViewerError::Disposed);
        }
        Ok(())
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn layers(&self) -> &LayerConfig {
        &self.layers
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Replaces the view settings. A new tile size or background drops the
    /// cache.
    pub fn set_view(&mut self, view: ViewConfig) -> Result<(), ViewerError> {
        self.ensure_live()?;
        view.validate()?;
        if view.tile_size != self.view.tile_size || view.background != self.view.background {
            self.cache.clear();
        }
        let evicted = self.cache.resize(view.max_cached_tiles);
        if evicted > 0 {
            debug!(tiles = evicted, "tiles evicted after cache resize");
        }
        self.view = view;
        Ok(())
    }

    pub fn tile_state(&self, coord: IVec2) -> Option<TileState> {
        self.cache.state(coord)
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    pub fn last_stats(&self) -> RenderStats {
        self.stats
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tile coordinate containing a world point.
    pub fn tile_at(&self, wx: i32, wy: i32) -> IVec2 {
        let ts = self.view.tile_size as i32;
        IVec2::new(wx.div_euclid(ts), wy.div_euclid(ts))
    }

    /// Marks every cached tile for re-rendering on the next request.
    pub fn invalidate_world(&mut self) {
        self.invalidation.signal();
    }

    /// Reseeds the generator and invalidates everything.
    pub fn reload(&mut self, seed: &str) -> Result<(), ViewerError> {
        self.ensure_live()?;
        self.generator.set_seed(seed);
        self.generator.initialize();
        self.invalidate_world();
        info!(seed, "world reloaded");
        Ok(())
    }

    /// Mutable access to one layer. Changes made through it notify the
    /// compositor like any other layer change.
    pub fn layer_mut(&mut self, facet: FacetType) -> Option<&mut dyn FacetLayer> {
        self.layers.get_mut(facet)
    }

    /// Inserts or replaces the layer for its facet, returning the old one
    /// detached from this compositor.
    pub fn put_layer(&mut self, layer: Box<dyn FacetLayer>) -> Option<Box<dyn FacetLayer>> {
        let facet = layer.facet_type();
        let mut old = self.layers.put(layer);
        if let Some(old) = old.as_deref_mut() {
            self.detach(facet, old);
        }
        self.attach(facet);
        self.invalidate_world();
        old
    }

    pub fn remove_layer(&mut self, facet: FacetType) -> Option<Box<dyn FacetLayer>> {
        let mut layer = self.layers.remove(facet)?;
        self.detach(facet, layer.as_mut());
        self.invalidate_world();
        Some(layer)
    }

    pub fn move_layer(&mut self, facet: FacetType, index: usize) -> bool {
        let moved = self.layers.move_to(facet, index);
        if moved {
            self.invalidate_world();
        }
        moved
    }

    pub fn set_layer_visible(&mut self, facet: FacetType, visible: bool) -> Result<bool, ViewerError> {
        let layer = self.layers.get_mut(facet).ok_or(ViewerError::UnknownLayer(facet))?;
        Ok(layer.set_visible(visible))
    }

    pub fn set_layer_control(
        &mut self,
        facet: FacetType,
        name: &str,
        value: ControlValue,
    ) -> Result<bool, ViewerError> {
        let layer = self.layers.get_mut(facet).ok_or(ViewerError::UnknownLayer(facet))?;
        Ok(layer.set_control(name, value)?)
    }

    /// Applies saved layer state; see [`LayerConfig::apply_state`].
    pub fn apply_layer_state(&mut self, state: &LayerConfigState) -> bool {
        let changed = self.layers.apply_state(state);
        if changed {
            self.invalidate_world();
        }
        changed
    }

    /// Renders `viewport` (world coordinates, one unit per pixel).
    ///
    /// Cached `Valid` tiles are reused; missing and invalidated tiles are
    /// rendered, in parallel when enabled, and stored back unless an
    /// invalidation arrived while they were being rendered. A tile whose
    /// region fails to generate is left as background and stays
    /// `Invalidated`. Fails with [`ViewerError::OutOfRange`] when a covering
    /// tile would extend past the `i32` world.
    pub fn render(&mut self, viewport: Rect2i) -> Result<RgbaImage, ViewerError> {
        self.ensure_live()?;
        let ts = self.view.tile_size;
        if !tiles_in_range(viewport, ts) {
            warn!(?viewport, "viewport outside the representable world");
            return Err(ViewerError::OutOfRange(viewport));
        }

        if self.invalidation.take_pending() {
            let n = self.cache.invalidate_all();
            debug!(tiles = n, "tiles invalidated");
        }

        let coords = tiles_overlapping(viewport, ts);
        let stale: Vec<IVec2> = coords.iter().copied().filter(|c| self.cache.needs_render(*c)).collect();
        for &coord in &stale {
            self.cache.set_state(coord, TileState::Rendering);
        }

        let epoch = self.invalidation.epoch();
        let results = self.render_tiles(&stale);
        let discard = self.invalidation.epoch() != epoch;

        let mut fresh = HashMap::with_capacity(results.len());
        let mut failed = HashSet::new();
        for (coord, result) in results {
            match result {
                Ok(image) => {
                    fresh.insert(coord, image);
                }
                Err(err) => {
                    warn!(x = coord.x, y = coord.y, error = %err, "tile failed to render, showing background");
                    failed.insert(coord);
                }
            }
        }

        let background = self.view.background.to_rgba();
        let mut out = RgbaImage::from_pixel(viewport.width, viewport.height, background);
        let viewport_min = viewport.min();
        for &coord in &coords {
            if failed.contains(&coord) {
                continue;
            }
            let tile = match fresh.get(&coord) {
                Some(image) => Some(image),
                None => self.cache.get(coord),
            };
            if let Some(tile) = tile {
                blit(&mut out, tile, tile_bounds(coord, ts).min() - viewport_min);
            }
        }

        let rendered = fresh.len();
        if discard {
            debug!(tiles = rendered, "discarding tiles rendered across an invalidation");
            for &coord in &stale {
                self.cache.set_state(coord, TileState::Invalidated);
            }
        } else {
            for (coord, image) in fresh {
                self.cache.insert(coord, image);
            }
            for &coord in &failed {
                self.cache.set_state(coord, TileState::Invalidated);
            }
        }

        self.stats = RenderStats {
            tiles_rendered: rendered,
            tiles_reused: coords.len() - stale.len(),
            tiles_discarded: if discard { rendered } else { 0 },
            tiles_failed: failed.len(),
        };
        debug!(
            rendered = self.stats.tiles_rendered,
            reused = self.stats.tiles_reused,
            failed = self.stats.tiles_failed,
            "viewport rendered"
        );
        Ok(out)
    }

    fn render_tiles(&self, coords: &[IVec2]) -> Vec<(IVec2, Result<RgbaImage, GeneratorError>)> {
        let generator = &self.generator;
        let layers = &self.layers;
        let view = &self.view;

        if view.parallel {
            coords
                .par_iter()
                .map(|&c| (c, render_tile(generator, layers, view, c)))
                .collect()
        } else {
            coords
                .iter()
                .map(|&c| (c, render_tile(generator, layers, view, c)))
                .collect()
        }
    }

    /// Description of a world point: one `"{layer}: {text}"` line per
    /// visible layer with something to say, in draw order.
    pub fn describe(&self, wx: i32, wy: i32) -> Result<String, ViewerError> {
        self.ensure_live()?;
        let point = Rect2i::new(wx, wy, 1, 1);
        if !tiles_in_range(point, self.view.tile_size) {
            return Err(ViewerError::OutOfRange(point));
        }
        let bounds = tile_bounds(self.tile_at(wx, wy), self.view.tile_size);
        let region = self.generator.region(bounds)?;

        let lines: Vec<String> = self
            .layers
            .visible()
            .filter_map(|layer| {
                let text = layer.describe(&region, wx, wy);
                (!text.is_empty()).then(|| format!("{}: {}", layer.name(), text))
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Detaches from all layers and drops the cache. Any later use fails
    /// with [`ViewerError::Disposed`].
    pub fn dispose(&mut self) -> Result<(), ViewerError> {
        self.ensure_live()?;
        for (facet, id) in std::mem::take(&mut self.listeners) {
            if let Some(layer) = self.layers.get_mut(facet) {
                layer.remove_listener(id);
            }
        }
        self.cache.clear();
        self.disposed = true;
        info!("compositor disposed");
        Ok(())
    }

    /// Consumes the compositor, handing back the generator and layers.
    pub fn into_parts(mut self) -> (G, LayerConfig) {
        if !self.disposed {
            for (facet, id) in std::mem::take(&mut self.listeners) {
                if let Some(layer) = self.layers.get_mut(facet) {
                    layer.remove_listener(id);
                }
            }
        }
        (self.generator, self.layers)
    }
}

/// Renders one tile: background, then every visible layer in draw order.
/// A failing layer is logged and skipped.
fn render_tile<G: WorldGenerator>(
    generator: &G,
    layers: &LayerConfig,
    view: &ViewConfig,
    coord: IVec2,
) -> Result<RgbaImage, GeneratorError> {
    let bounds = tile_bounds(coord, view.tile_size);
    let region = generator.region(bounds)?;

    let mut image = RgbaImage::from_pixel(bounds.width, bounds.height, view.background.to_rgba());
    let mut canvas = Canvas::for_region(&mut image, bounds);
    for layer in layers.visible() {
        if let Err(err) = layer.render(&mut canvas, &region) {
            warn!(layer = layer.name(), error = %err, "layer failed to render, skipping");
        }
    }
    debug!(x = coord.x, y = coord.y, "tile rendered");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::facets::SpatialRegion;
    use crate::layers::LayerBase;
    use std::sync::atomic::AtomicUsize;

    struct EmptyWorld;

    impl WorldGenerator for EmptyWorld {
        fn all_facets(&self) -> Vec<FacetType> {
            vec![FacetType::Elevation]
        }

        fn region(&self, bounds: Rect2i) -> Result<SpatialRegion, GeneratorError> {
            Ok(SpatialRegion::new(bounds))
        }

        fn seed(&self) -> &str {
            "empty"
        }

        fn set_seed(&mut self, _seed: &str) {}

        fn initialize(&mut self) {}
    }

    /// Paints solid red and fires its own change notification while
    /// `fires` is above zero.
    struct RacingLayer {
        base: LayerBase,
        fires: Arc<AtomicUsize>,
    }

    impl FacetLayer for RacingLayer {
        fn facet_type(&self) -> FacetType {
            FacetType::Elevation
        }

        fn base(&self) -> &LayerBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut LayerBase {
            &mut self.base
        }

        fn render(&self, canvas: &mut Canvas<'_>, region: &SpatialRegion) -> Result<(), crate::layers::LayerError> {
            let b = region.bounds();
            canvas.fill_rect(b.min_x, b.min_y, b.width as i32, b.height as i32, Color::RED);
            let left = self.fires.load(Ordering::SeqCst);
            if left > 0 {
                self.fires.store(left - 1, Ordering::SeqCst);
                self.base.notify();
            }
            Ok(())
        }

        fn describe(&self, _region: &SpatialRegion, _wx: i32, _wy: i32) -> String {
            "red".to_string()
        }
    }

    fn racing() -> (Compositor<EmptyWorld>, Arc<AtomicUsize>) {
        let fires = Arc::new(AtomicUsize::new(0));
        let mut layers = LayerConfig::new();
        layers.put(Box::new(RacingLayer {
            base: LayerBase::default(),
            fires: Arc::clone(&fires),
        }));
        let view = ViewConfig {
            tile_size: 4,
            parallel: false,
            ..Default::default()
        };
        (Compositor::new(EmptyWorld, layers, view).unwrap(), fires)
    }

    #[test]
    fn test_tiles_rendered_across_invalidation_are_discarded() {
        let (mut compositor, fires) = racing();
        let area = Rect2i::new(0, 0, 8, 4);
        compositor.render(area).unwrap();
        assert_eq!(compositor.tile_state(IVec2::new(0, 0)), Some(TileState::Valid));

        fires.store(1, Ordering::SeqCst);
        compositor.invalidate_world();
        let img = compositor.render(area).unwrap();
        // The caller still gets a complete picture.
        assert!(img.pixels().all(|p| *p == Color::RED.to_rgba()));
        assert_eq!(compositor.last_stats().tiles_discarded, 2);
        assert_eq!(compositor.tile_state(IVec2::new(0, 0)), Some(TileState::Invalidated));

        compositor.render(area).unwrap();
        let stats = compositor.last_stats();
        assert_eq!((stats.tiles_rendered, stats.tiles_discarded), (2, 0));
        assert_eq!(compositor.tile_state(IVec2::new(1, 0)), Some(TileState::Valid));

        compositor.render(area).unwrap();
        assert_eq!(compositor.last_stats().tiles_reused, 2);
    }

    #[test]
    fn test_invalidate_world_is_lazy() {
        let (mut compositor, _) = racing();
        compositor.render(Rect2i::new(0, 0, 4, 4)).unwrap();

        compositor.invalidate_world();
        assert_eq!(compositor.tile_state(IVec2::ZERO), Some(TileState::Valid));
        compositor.render(Rect2i::new(0, 0, 4, 4)).unwrap();
        assert_eq!(compositor.last_stats().tiles_rendered, 1);
    }

    #[test]
    fn test_set_view_drops_cache_on_tile_size_change() {
        let (mut compositor, _) = racing();
        compositor.render(Rect2i::new(0, 0, 8, 8)).unwrap();
        assert_eq!(compositor.cached_tiles(), 4);

        let mut view = compositor.view().clone();
        view.parallel = true;
        compositor.set_view(view.clone()).unwrap();
        assert_eq!(compositor.cached_tiles(), 4);

        view.max_cached_tiles = 1;
        compositor.set_view(view.clone()).unwrap();
        assert_eq!(compositor.cached_tiles(), 1);

        view.tile_size = 8;
        compositor.set_view(view).unwrap();
        assert_eq!(compositor.cached_tiles(), 0);
        assert_eq!(compositor.tile_at(-1, 9), IVec2::new(-1, 1));
    }

    #[test]
    fn test_describe_reports_visible_layers() {
        let (mut compositor, _) = racing();
        assert_eq!(compositor.describe(1, 1).unwrap(), "Elevation: red");
        compositor.set_layer_visible(FacetType::Elevation, false).unwrap();
        assert_eq!(compositor.describe(1, 1).unwrap(), "");
    }
}
