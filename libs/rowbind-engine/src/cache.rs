use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rowbind_api::mapping::lowercase_columns;
use rowbind_api::{ColumnFieldMap, Record};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MapKey {
    shape: TypeId,
    /// Lower-cased, in result order.
    columns: Vec<String>,
}

/// Column maps kept across calls, keyed by (record type, column set).
///
/// Shared between threads; readers never block each other.
#[derive(Debug, Default)]
pub struct MapCache {
    maps: RwLock<HashMap<MapKey, Arc<ColumnFieldMap>>>,
}

impl MapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached map for `T` over `columns`, building it on first use.
    pub fn get_or_build<T: Record>(&self, columns: &[String]) -> Arc<ColumnFieldMap> {
        let key = MapKey {
            shape: TypeId::of::<T>(),
            columns: lowercase_columns(columns),
        };

        {
            let guard = match self.maps.read() {
                Ok(g) => g,
                Err(poisoned) => {
                    tracing::warn!("column map cache read lock was poisoned, recovering");
                    poisoned.into_inner()
                }
            };
            if let Some(map) = guard.get(&key) {
                tracing::trace!(shape = T::shape().name, "column map cache hit");
                return Arc::clone(map);
            }
        }

        let map = Arc::new(ColumnFieldMap::build_lowered(&key.columns, T::shape()));
        tracing::debug!(
            shape = T::shape().name,
            columns = key.columns.len(),
            mapped = map.len(),
            "cached column map"
        );

        let mut guard = match self.maps.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("column map cache write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        // Another thread may have built the same map meanwhile; keep the first.
        Arc::clone(guard.entry(key).or_insert(map))
    }

    pub fn len(&self) -> usize {
        match self.maps.read() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.maps.write() {
            Ok(mut g) => g.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rowbind_api::Record;

    use super::*;

    #[derive(Default, Record)]
    struct Row {
        id: i64,
        name: String,
    }

    #[derive(Default, Record)]
    struct Other {
        id: i64,
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reuses_map_for_same_shape_and_columns() {
        let cache = MapCache::new();
        let a = cache.get_or_build::<Row>(&cols(&["ID", "Name"]));
        let b = cache.get_or_build::<Row>(&cols(&["id", "NAME"]));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn keys_on_shape_and_column_set() {
        let cache = MapCache::new();
        let row = cache.get_or_build::<Row>(&cols(&["id", "name"]));
        let other = cache.get_or_build::<Other>(&cols(&["id", "name"]));
        let reordered = cache.get_or_build::<Row>(&cols(&["name", "id"]));
        assert_eq!(cache.len(), 3);
        assert_eq!(row.len(), 2);
        assert_eq!(other.len(), 1);
        assert_eq!(reordered.bindings()[0].column, 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_lookups_agree() {
        let cache = Arc::new(MapCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_build::<Row>(&cols(&["id", "name"])))
            })
            .collect();
        let maps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(maps.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }
}
