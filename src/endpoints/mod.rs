//! Resource facades. They only build paths and bodies and map results;
//! authentication and transport go through [`AccountClient`](crate::AccountClient).

mod merchant;
mod producer;

pub use merchant::MerchantEndpoint;
pub use producer::{BinaryInfo, ExtensionQuery, ProducerEndpoint};
