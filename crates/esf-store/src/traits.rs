use crate::error::StoreResult;

/// Text key-value store.
///
/// Implementations hold opaque text values and never interpret them. All
/// methods take `&self`; backends use interior mutability.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// On error the previous value must be left untouched.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn remove_item(&self, key: &str) -> StoreResult<bool>;
}
