//! One-stop handle wiring a single request pipeline into every resource service.

// self
use crate::{
	_prelude::*,
	api::ApiRequester,
	services::{
		ComputeService, DnsService, NetworkService, SecretService, StorageService, TagService,
		UserService,
	},
};
#[cfg(feature = "reqwest")] use crate::{client::ReqwestApiClient, config::Config};

/// All resource services sharing one requester, and therefore one cached token.
#[derive(Debug)]
pub struct Sdk<R> {
	requester: Arc<R>,
	/// Instances, snapshots, and images.
	pub compute: ComputeService<R>,
	/// Zones, records, and PTR entries.
	pub dns: DnsService<R>,
	/// Private networks.
	pub network: NetworkService<R>,
	/// Object storages.
	pub storage: StorageService<R>,
	/// Secrets.
	pub secret: SecretService<R>,
	/// Tags.
	pub tag: TagService<R>,
	/// Users and roles.
	pub user: UserService<R>,
}
impl<R> Sdk<R>
where
	R: ApiRequester,
{
	/// Wires every service to `requester`.
	pub fn from_requester(requester: R) -> Self {
		Self::from_shared(Arc::new(requester))
	}

	/// Wires every service to a requester that is already shared elsewhere.
	pub fn from_shared(requester: Arc<R>) -> Self {
		Self {
			compute: ComputeService::new(requester.clone()),
			dns: DnsService::new(requester.clone()),
			network: NetworkService::new(requester.clone()),
			storage: StorageService::new(requester.clone()),
			secret: SecretService::new(requester.clone()),
			tag: TagService::new(requester.clone()),
			user: UserService::new(requester.clone()),
			requester,
		}
	}

	/// Requester shared by every service.
	pub fn requester(&self) -> &Arc<R> {
		&self.requester
	}
}
#[cfg(feature = "reqwest")]
impl Sdk<ReqwestApiClient> {
	/// Builds a reqwest-backed client from `config` and wires it into every service.
	///
	/// No network call happens until the first operation.
	pub fn new(config: &Config) -> Result<Self> {
		Ok(Self::from_requester(ReqwestApiClient::new(config)?))
	}
}
impl<R> Clone for Sdk<R> {
	fn clone(&self) -> Self {
		Self {
			requester: self.requester.clone(),
			compute: self.compute.clone(),
			dns: self.dns.clone(),
			network: self.network.clone(),
			storage: self.storage.clone(),
			secret: self.secret.clone(),
			tag: self.tag.clone(),
			user: self.user.clone(),
		}
	}
}
