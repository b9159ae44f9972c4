//! Capability trait consumed by the resource services, plus query and envelope helpers.

// crates.io
use serde::de::DeserializeOwned;
use url::form_urlencoded::Serializer as QuerySerializer;
// self
use crate::{
	_prelude::*,
	client::{CallContext, Client},
	http::ApiHttpClient,
	oauth::TransportErrorMapper,
};

/// Boxed future returned by [`ApiRequester`] verbs.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Minimal HTTP capability every resource service needs.
///
/// [`Client`] implements it over the real pipeline; tests may provide a fake.
/// `get`, `post`, `put`, and `patch` decode a non-empty body into `T` and return `None` for an
/// empty one. `delete` never sends a body and discards whatever comes back.
pub trait ApiRequester
where
	Self: Send + Sync,
{
	/// `GET path`.
	fn get<'a, T>(&'a self, ctx: &'a CallContext, path: &'a str) -> ApiFuture<'a, Option<T>>
	where
		T: 'a + DeserializeOwned + Send;

	/// `POST path` with an optional JSON body.
	fn post<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send;

	/// `PUT path` with an optional JSON body.
	fn put<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send;

	/// `PATCH path` with an optional JSON body.
	fn patch<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send;

	/// `DELETE path`.
	fn delete<'a>(&'a self, ctx: &'a CallContext, path: &'a str) -> ApiFuture<'a, ()>;
}
impl<C, M> ApiRequester for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn get<'a, T>(&'a self, ctx: &'a CallContext, path: &'a str) -> ApiFuture<'a, Option<T>>
	where
		T: 'a + DeserializeOwned + Send,
	{
		Box::pin(Client::get(self, ctx, path))
	}

	fn post<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send,
	{
		Box::pin(Client::post(self, ctx, path, body))
	}

	fn put<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send,
	{
		Box::pin(Client::put(self, ctx, path, body))
	}

	fn patch<'a, B, T>(
		&'a self,
		ctx: &'a CallContext,
		path: &'a str,
		body: Option<&'a B>,
	) -> ApiFuture<'a, Option<T>>
	where
		B: 'a + ?Sized + Serialize + Sync,
		T: 'a + DeserializeOwned + Send,
	{
		Box::pin(Client::patch(self, ctx, path, body))
	}

	fn delete<'a>(&'a self, ctx: &'a CallContext, path: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(Client::delete(self, ctx, path))
	}
}

/// Pagination and ordering for list operations.
///
/// Zero or empty fields are omitted from the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
	/// 1-based page number.
	pub page: u32,
	/// Page size.
	pub size: u32,
	/// Ordering entries such as `name:asc`, sent in order as repeated `orderBy` parameters.
	pub order_by: Vec<String>,
}
impl ListOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the page number.
	pub fn page(mut self, page: u32) -> Self {
		self.page = page;

		self
	}

	/// Sets the page size.
	pub fn size(mut self, size: u32) -> Self {
		self.size = size;

		self
	}

	/// Appends an ordering entry (`<field>:<asc|desc>`).
	pub fn order_by(mut self, order: impl Into<String>) -> Self {
		self.order_by.push(order.into());

		self
	}

	/// Encodes the options as a query string with a leading `?`, or an empty string when
	/// nothing is set.
	pub fn to_query(&self) -> String {
		self.query_with(&[])
	}

	/// Encodes the options followed by resource-specific `filters`; filters with empty values
	/// are skipped.
	pub fn query_with(&self, filters: &[(&str, &str)]) -> String {
		let mut serializer = QuerySerializer::new(String::new());

		if self.page > 0 {
			serializer.append_pair("page", &self.page.to_string());
		}
		if self.size > 0 {
			serializer.append_pair("size", &self.size.to_string());
		}

		for order in self.order_by.iter().filter(|order| !order.is_empty()) {
			serializer.append_pair("orderBy", order);
		}
		for (key, value) in filters.iter().filter(|(_, value)| !value.is_empty()) {
			serializer.append_pair(key, value);
		}

		let query = serializer.finish();

		if query.is_empty() { query } else { format!("?{query}") }
	}
}

/// Pagination metadata attached to list responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
	/// Page size.
	pub size: u32,
	/// Total number of elements across pages.
	pub total_elements: u64,
	/// Total number of pages.
	pub total_pages: u32,
	/// Current page number.
	pub number: u32,
}

/// Navigation links attached to list responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
	/// Link to the current page.
	#[serde(rename = "self")]
	pub self_: Option<String>,
	/// Link to the first page.
	pub first: Option<String>,
	/// Link to the previous page.
	pub previous: Option<String>,
	/// Link to the next page.
	pub next: Option<String>,
	/// Link to the last page.
	pub last: Option<String>,
}

/// `{"_pagination": {...}, "_links": {...}, "data": [...]}` envelope returned by list operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
	/// Pagination metadata.
	#[serde(rename = "_pagination", default)]
	pub pagination: Pagination,
	/// Navigation links.
	#[serde(rename = "_links", default)]
	pub links: Links,
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub data: Vec<T>,
}
impl<T> Default for ListResponse<T> {
	fn default() -> Self {
		Self { pagination: Pagination::default(), links: Links::default(), data: Vec::new() }
	}
}

/// `{"data": [item]}` envelope returned by single-item operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
	/// Wrapped items; normally exactly one.
	#[serde(default = "Vec::new")]
	pub data: Vec<T>,
}
impl<T> DataEnvelope<T> {
	/// Returns the first item, or [`Error::NotFound`] when `data` is empty.
	pub fn into_first(self, resource: &'static str) -> Result<T> {
		self.data.into_iter().next().ok_or(Error::NotFound { resource })
	}
}
impl<T> Default for DataEnvelope<T> {
	fn default() -> Self {
		Self { data: Vec::new() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_options_encode_to_empty_string() {
		assert_eq!(ListOptions::new().to_query(), "");
		assert_eq!(ListOptions::new().query_with(&[("standardImage", "")]), "");
	}

	#[test]
	fn options_encode_in_order() {
		let options =
			ListOptions::new().page(2).size(5).order_by("name:asc").order_by("createdDate:desc");

		assert_eq!(
			options.to_query(),
			"?page=2&size=5&orderBy=name%3Aasc&orderBy=createdDate%3Adesc"
		);
	}

	#[test]
	fn zero_fields_are_skipped_and_filters_appended() {
		let options = ListOptions::new().size(10);

		assert_eq!(options.query_with(&[("standardImage", "true")]), "?size=10&standardImage=true");
		assert_eq!(ListOptions::new().query_with(&[("name", "a b")]), "?name=a+b");
	}

	#[test]
	fn list_envelope_tolerates_missing_sections() {
		let list: ListResponse<u32> =
			serde_json::from_str(r#"{"data":[1,2]}"#).expect("Partial list envelope should decode.");

		assert_eq!(list.data, vec![1, 2]);
		assert_eq!(list.pagination, Pagination::default());

		let list: ListResponse<u32> = serde_json::from_str(
			r#"{"_pagination":{"size":5,"totalElements":12,"totalPages":3,"number":2},"_links":{"self":"/v1/x?page=2","next":"/v1/x?page=3"},"data":[]}"#,
		)
		.expect("Full list envelope should decode.");

		assert_eq!(list.pagination.total_elements, 12);
		assert_eq!(list.pagination.total_pages, 3);
		assert_eq!(list.links.self_.as_deref(), Some("/v1/x?page=2"));
		assert_eq!(list.links.next.as_deref(), Some("/v1/x?page=3"));
	}

	#[test]
	fn empty_data_envelope_is_not_found() {
		let envelope: DataEnvelope<u32> =
			serde_json::from_str(r#"{"data":[]}"#).expect("Empty envelope should decode.");

		assert!(matches!(
			envelope.into_first("instance"),
			Err(Error::NotFound { resource: "instance" })
		));
		let first = DataEnvelope { data: vec![7, 8] }
			.into_first("instance")
			.expect("First item should be returned.");

		assert_eq!(first, 7);
	}
}
