use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Versioned local-storage slot of one persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// An optional value shares the slot of its payload.
impl<T: StorageKey> StorageKey for Option<T> {
    const KEY: &'static str = T::KEY;
}

pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("could not persist {}: {:?}", T::KEY, err);
        }
    }
}

/// Clock driving the engine timeline. Wall time is fine here; the engine
/// only compares millisecond deltas.
pub(crate) fn now_millis() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// One vibration pulse; a no-op where the browser denies it.
pub(crate) fn vibrate(duration_ms: u32) {
    use gloo::utils::window;

    if !window().navigator().vibrate_with_duration(duration_ms) {
        log::trace!("vibration request ignored");
    }
}
