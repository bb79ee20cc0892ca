//! Typed records for the resources reached through the endpoint facades.
//!
//! The API omits or nulls fields freely, so every record defaults missing
//! values instead of failing.

use serde::{Deserialize, Deserializer};

mod extension;
mod producer;
mod profile;
mod review;
mod shop;

pub use extension::{Extension, ExtensionBinary, ExtensionImage};
pub use producer::Producer;
pub use profile::Profile;
pub use review::BinaryReviewResult;
pub use shop::MerchantShop;

/// Deserialize `null` as the type's default value
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
