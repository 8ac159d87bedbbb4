use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::schema::{LessonDefinition, parse_catalog};
use crate::store::source::LessonSource;

/// Read-through cache of lesson catalogs keyed by course identity.
///
/// A catalog is read from the source at most once per identity until
/// [`LessonCatalog::clear_cache`]. The check-and-populate sequence runs under
/// one lock and only fully parsed catalogs are published, so concurrent
/// callers all observe the same complete lesson list.
pub struct LessonCatalog {
    source: Box<dyn LessonSource>,
    cache: Mutex<HashMap<String, Arc<[LessonDefinition]>>>,
}

impl LessonCatalog {
    pub fn new(source: impl LessonSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(&self, course: &str) -> Result<Arc<[LessonDefinition]>> {
        // The lock spans the source read: a course is read at most once, and
        // a cold load holds up lookups of other courses until it finishes.
        let mut cache = self.cache.lock();
        if let Some(lessons) = cache.get(course) {
            debug!(course, "lesson catalog cache hit");
            return Ok(Arc::clone(lessons));
        }

        let document = self.source.read(course)?;
        let lessons: Arc<[LessonDefinition]> = parse_catalog(course, &document)
            .inspect_err(|err| warn!(course, %err, "rejected lesson catalog"))?
            .into();
        info!(course, lessons = lessons.len(), "loaded lesson catalog");
        cache.insert(course.to_string(), Arc::clone(&lessons));
        Ok(lessons)
    }

    pub fn is_cached(&self, course: &str) -> bool {
        self.cache.lock().contains_key(course)
    }

    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        info!(entries = cache.len(), "clearing lesson catalog cache");
        cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::error::EngineError;
    use crate::store::source::MemorySource;

    const CATALOG: &str = r#"[
        {"id": 1, "target": ["a", "s"], "instruction": "left"},
        {"id": 2, "target": ["j", "k"], "instruction": "right"}
    ]"#;

    struct CountingSource {
        inner: MemorySource,
        reads: Arc<AtomicUsize>,
    }

    impl LessonSource for CountingSource {
        fn read(&self, course: &str) -> Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(course)
        }
    }

    fn counting_catalog(docs: &[(&str, &str)]) -> (LessonCatalog, Arc<AtomicUsize>) {
        let mut inner = MemorySource::new();
        for (course, json) in docs {
            inner.insert(course, json);
        }
        let reads = Arc::new(AtomicUsize::new(0));
        let catalog = LessonCatalog::new(CountingSource {
            inner,
            reads: Arc::clone(&reads),
        });
        (catalog, reads)
    }

    #[test]
    fn test_second_load_is_served_from_cache() {
        let (catalog, reads) = counting_catalog(&[("home", CATALOG)]);
        let first = catalog.load("home").unwrap();
        let second = catalog.load("home").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_clear_cache_forces_reload() {
        let (catalog, reads) = counting_catalog(&[("home", CATALOG)]);
        catalog.load("home").unwrap();
        assert!(catalog.is_cached("home"));
        catalog.clear_cache();
        assert!(!catalog.is_cached("home"));
        catalog.load("home").unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_course_is_not_found() {
        let (catalog, _) = counting_catalog(&[]);
        assert!(matches!(catalog.load("ghost"), Err(EngineError::NotFound(_))));
        assert!(!catalog.is_cached("ghost"));
    }

    #[test]
    fn test_malformed_catalog_is_never_cached() {
        let (catalog, reads) = counting_catalog(&[("bad", r#"[{"id": 1, "target": ["xy"]}]"#)]);
        assert!(matches!(
            catalog.load("bad"),
            Err(EngineError::MalformedData { .. })
        ));
        assert!(!catalog.is_cached("bad"));
        assert!(catalog.load("bad").is_err());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_courses_are_cached_independently() {
        let (catalog, reads) = counting_catalog(&[("one", CATALOG), ("two", CATALOG)]);
        catalog.load("one").unwrap();
        catalog.load("two").unwrap();
        catalog.load("one").unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_loads_read_source_once() {
        let (catalog, reads) = counting_catalog(&[("home", CATALOG)]);
        let catalog = Arc::new(catalog);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || catalog.load("home").unwrap())
            })
            .collect();
        let results: Vec<Arc<[LessonDefinition]>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        for lessons in &results {
            assert!(Arc::ptr_eq(lessons, &results[0]));
            assert_eq!(lessons.len(), 2);
        }
    }
}
