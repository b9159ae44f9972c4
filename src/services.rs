//! Thin typed services over [`ApiRequester`](crate::api::ApiRequester).
//!
//! Every service holds an `Arc<R>` and maps one method to one endpoint. List operations return
//! the full [`ListResponse`] envelope; single-item operations unwrap `{"data": [item]}` and turn
//! an empty `data` array into [`Error::NotFound`].

pub mod compute;
pub mod dns;
pub mod network;
pub mod secret;
pub mod storage;
pub mod tag;
pub mod user;

pub use compute::ComputeService;
pub use dns::DnsService;
pub use network::NetworkService;
pub use secret::SecretService;
pub use storage::StorageService;
pub use tag::TagService;
pub use user::UserService;

// self
use crate::{
	_prelude::*,
	api::{DataEnvelope, ListResponse},
};

// `None` body for verbs that send nothing.
pub(crate) const NO_BODY: Option<&'static ()> = None;

pub(crate) fn first<T>(envelope: Option<DataEnvelope<T>>, resource: &'static str) -> Result<T> {
	envelope.unwrap_or_default().into_first(resource)
}

pub(crate) fn page<T>(list: Option<ListResponse<T>>) -> ListResponse<T> {
	list.unwrap_or_default()
}
