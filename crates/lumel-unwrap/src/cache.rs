use std::hash::Hasher;
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;
use lumel_scene::{MeshSurface, SurfaceUnwrap, UnwrappedSurface};

use crate::contract::{UnwrapError, UnwrapInput, UnwrapOutput, Unwrapper};
use crate::remap::apply_unwrap;

/// Content-derived cache key: buffer bits, counts, and texel size. Two
/// byte-identical inputs always map to the same key within a process.
pub fn cache_key(input: &UnwrapInput) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    h.write_usize(input.positions.len());
    h.write_usize(input.normals.len());
    h.write_usize(input.indices.len());
    h.write_u32(input.texel_size.to_bits());
    for p in input.positions {
        h.write_u32(p.x.to_bits());
        h.write_u32(p.y.to_bits());
        h.write_u32(p.z.to_bits());
    }
    for n in input.normals {
        h.write_u32(n.x.to_bits());
        h.write_u32(n.y.to_bits());
        h.write_u32(n.z.to_bits());
    }
    for &i in input.indices {
        h.write_u32(i);
    }
    h.finish()
}

struct Entry {
    output: Arc<UnwrapOutput>,
    /// Last-touched stamp for LRU eviction.
    tick: u64,
}

/// Memoizes unwrap results by content key. Owned and injected explicitly
/// (no process-global state); entries are evicted least-recently-used once
/// `capacity` is reached.
pub struct UnwrapCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    map: HashMap<u64, Entry>,
    capacity: usize,
    tick: u64,
}

impl UnwrapCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        UnwrapCache {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                capacity: capacity.max(1),
                tick: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("unwrap cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cache hit returns the stored output unchanged (bit-exact); a miss
    /// runs the unwrapper and stores the result. Errors are not cached.
    pub fn unwrap_cached(
        &self,
        unwrapper: &dyn Unwrapper,
        input: &UnwrapInput,
    ) -> Result<Arc<UnwrapOutput>, UnwrapError> {
        input.validate()?;
        let key = cache_key(input);

        {
            let mut inner = self.inner.lock().expect("unwrap cache poisoned");
            inner.tick += 1;
            let tick = inner.tick;
            if let Some(e) = inner.map.get_mut(&key) {
                e.tick = tick;
                return Ok(e.output.clone());
            }
        }

        // Compute outside the lock; duplicated work on a race is harmless
        // because outputs for one key are identical.
        let output = Arc::new(unwrapper.unwrap(input)?);

        let mut inner = self.inner.lock().expect("unwrap cache poisoned");
        if inner.map.len() >= inner.capacity && !inner.map.contains_key(&key) {
            if let Some((&oldest, _)) = inner.map.iter().min_by_key(|(_, e)| e.tick) {
                inner.map.remove(&oldest);
            }
        }
        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner.map.entry(key).or_insert(Entry {
            output: output.clone(),
            tick,
        });
        Ok(entry.output.clone())
    }
}

impl Default for UnwrapCache {
    fn default() -> Self {
        UnwrapCache::new(Self::DEFAULT_CAPACITY)
    }
}

/// Adapter that plugs an unwrapper + cache into the scene gatherer's
/// auto-unwrap hook. Surfaces are rewritten as private copies.
pub struct CachedSurfaceUnwrap<'a> {
    pub unwrapper: &'a dyn Unwrapper,
    pub cache: &'a UnwrapCache,
    pub texel_size: f32,
}

impl SurfaceUnwrap for CachedSurfaceUnwrap<'_> {
    fn unwrap_surface(&self, surface: &MeshSurface) -> Option<UnwrappedSurface> {
        let indices: Vec<u32> = if surface.indices.is_empty() {
            (0..surface.positions.len() as u32).collect()
        } else {
            surface.indices.clone()
        };
        let input = UnwrapInput {
            positions: &surface.positions,
            normals: &surface.normals,
            indices: &indices,
            texel_size: self.texel_size,
        };
        match self.cache.unwrap_cached(self.unwrapper, &input) {
            Ok(out) => Some(UnwrappedSurface {
                surface: apply_unwrap(surface, &out),
                size_hint: out.size_hint,
            }),
            Err(e) => {
                log::warn!("auto-unwrap failed: {e}");
                None
            }
        }
    }
}
