use crate::{database::ValueType, error::StoreResult};

/// Keyspace operations shared by every store front-end.
///
/// Implemented by [`super::InMemoryStore`] directly and by
/// [`super::SharedStore`], which takes its lock around each call.
pub trait Storage {
    /// `true` if the key holds a value.
    fn exists(
        &self,
        key: &str,
    ) -> bool;

    /// Removes the key and whatever it holds. Returns `true` if it existed.
    fn del(
        &mut self,
        key: &str,
    ) -> bool;

    /// Moves the value of `from` to `to`, replacing `to`.
    ///
    /// Fails with `NoSuchKey` when `from` is absent.
    fn rename(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<()>;

    /// Like [`Storage::rename`], but leaves everything untouched and returns
    /// `false` if `to` already exists.
    fn renamenx(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<bool>;

    /// Type tag of the key, `None` if absent.
    fn type_of(
        &self,
        key: &str,
    ) -> Option<ValueType>;

    /// Number of live keys.
    fn dbsize(&self) -> usize;

    /// Drops every key.
    fn flushdb(&mut self);
}
