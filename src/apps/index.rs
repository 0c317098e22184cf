//! Per-session application index

use std::collections::{HashMap, HashSet};

use super::types::{MappedApp, RawApp};

/// Derive the numeric input identifier for a device-native app id
///
/// Rolling `h * 31 + unit` over UTF-16 code units with 32-bit wrapping, so the
/// value matches what earlier bridge versions persisted on the host.
#[must_use]
pub fn derive_numeric_id(raw_id: &str) -> i32 {
    raw_id
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

/// Immutable mapping between device app ids and numeric input identifiers
///
/// Built once per device session. The home entry is always first, followed by
/// the device's apps in the order they were reported.
///
/// Every entry whose hash is unclaimed keeps it. When two raw ids hash to the
/// same value, the entry built first keeps the hash and the later one takes the
/// next identifier no other entry holds. Entries that never collided keep their
/// pure hash, and every identifier handed out resolves back to exactly one app.
#[derive(Debug, Clone)]
pub struct AppIndex {
    apps: Vec<MappedApp>,
    by_numeric: HashMap<i32, usize>,
    by_native: HashMap<String, usize>,
}

impl AppIndex {
    /// Build the index from the device's app list plus the home entry
    #[must_use]
    pub fn build(raw_apps: &[RawApp]) -> Self {
        let home = RawApp::home();
        let entries: Vec<&RawApp> = std::iter::once(&home).chain(raw_apps).collect();
        let mut ids: Vec<i32> = entries.iter().map(|raw| derive_numeric_id(&raw.id)).collect();

        // Every pure hash is claimed before any probing starts, so a shifted
        // entry never lands on the hash of an entry built after it
        let mut taken = HashSet::with_capacity(ids.len());
        let collided: Vec<usize> = ids
            .iter()
            .enumerate()
            .filter(|&(_, id)| !taken.insert(*id))
            .map(|(position, _)| position)
            .collect();

        for position in collided {
            let hashed = ids[position];
            let mut id = hashed.wrapping_add(1);
            while !taken.insert(id) {
                id = id.wrapping_add(1);
            }

            let raw = entries[position];
            tracing::warn!(
                app_id = %raw.id,
                name = %raw.name,
                hashed,
                assigned = id,
                "input identifier collision, assigned next free identifier"
            );
            ids[position] = id;
        }

        let mut index = Self {
            apps: Vec::with_capacity(entries.len()),
            by_numeric: HashMap::with_capacity(entries.len()),
            by_native: HashMap::with_capacity(entries.len()),
        };
        for (raw, id) in entries.into_iter().zip(ids) {
            index.push(raw, id);
        }

        index
    }

    fn push(&mut self, raw: &RawApp, id: i32) {
        let position = self.apps.len();
        self.by_numeric.insert(id, position);
        self.by_native.entry(raw.id.clone()).or_insert(position);
        self.apps.push(MappedApp {
            id,
            roku_app_id: raw.id.clone(),
            name: raw.name.clone(),
            app_type: raw.app_type.clone(),
            version: raw.version.clone(),
        });
    }

    /// Look up an app by its numeric input identifier
    #[must_use]
    pub fn by_numeric_id(&self, id: i32) -> Option<&MappedApp> {
        self.by_numeric.get(&id).map(|&i| &self.apps[i])
    }

    /// Look up an app by its device-native id
    ///
    /// If the device reported the same id more than once, the first is returned.
    #[must_use]
    pub fn by_native_id(&self, raw_id: &str) -> Option<&MappedApp> {
        self.by_native.get(raw_id).map(|&i| &self.apps[i])
    }

    /// The home screen entry
    #[must_use]
    pub fn home(&self) -> &MappedApp {
        // Always pushed first by `build`
        &self.apps[0]
    }

    /// All apps in build order
    #[must_use]
    pub fn all(&self) -> &[MappedApp] {
        &self.apps
    }

    /// Apps whose name is not in the exclusion set, in build order
    pub fn visible<'a>(
        &'a self,
        excluded: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a MappedApp> + 'a {
        self.apps.iter().filter(|app| !excluded.contains(&app.name))
    }

    /// Number of entries, including the home entry
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Always false; the home entry is present in every index
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
