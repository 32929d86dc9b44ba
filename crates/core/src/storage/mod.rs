use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const USER_KEY: &str = "user";
pub const SEARCHES_KEY: &str = "searches";

/// String key/value storage. Both persisted entities (session user and
/// search history) are JSON documents under a fixed key.
///
/// Read-modify-write sequences over a key are not atomic; concurrent writers
/// sharing a backend are last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let parsed = serde_json::from_str::<T>(&raw)
        .with_context(|| format!("stored value under {key:?} is not valid JSON for its type"))?;
    Ok(Some(parsed))
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("failed to serialize value for {key:?}"))?;
    store.put(key, &raw)
}
