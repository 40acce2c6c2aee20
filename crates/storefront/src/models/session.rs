//! Session-stored shopping state.
//!
//! Each list is stored under its own key so a request touching the wishlist
//! never rewrites the cart.

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;

/// Session keys for shopping data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the visitor's compare list.
    pub const COMPARE: &str = "compare";

    /// Key for recently viewed shoe IDs.
    pub const RECENTLY_VIEWED: &str = "recently_viewed";
}

/// Read a value from the session, falling back to its default when absent.
///
/// A value that no longer deserializes (after a format change) is treated as
/// absent rather than failing the request.
///
/// # Errors
///
/// Returns the session store error if the session cannot be loaded.
pub async fn load<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(key, error = %e, "Discarding unreadable session value");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Write a value to the session.
///
/// # Errors
///
/// Returns the session store error if the value cannot be stored.
pub async fn store<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Sync,
{
    session.insert(key, value).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use edge_shoes_core::{ShoeId, Wishlist};

    use super::*;

    #[tokio::test]
    async fn test_load_defaults_and_round_trips() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        let empty: Wishlist = load(&session, keys::WISHLIST).await.unwrap();
        assert!(empty.ids().is_empty());

        let mut wishlist = Wishlist::default();
        wishlist.toggle(ShoeId::new(3));
        store(&session, keys::WISHLIST, &wishlist).await.unwrap();

        let loaded: Wishlist = load(&session, keys::WISHLIST).await.unwrap();
        assert_eq!(loaded, wishlist);
    }

    #[tokio::test]
    async fn test_unreadable_value_is_discarded() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert(keys::WISHLIST, "not a list").await.unwrap();

        let loaded: Wishlist = load(&session, keys::WISHLIST).await.unwrap();
        assert!(loaded.ids().is_empty());
    }
}
