//! Thin HTTP wrappers for tree loading and family-member CRUD.
//!
//! Member payloads stay as raw JSON values here; the tree normalizer owns
//! canonicalization, and callers surface [`ServiceError`]s as user-facing
//! messages without touching layout state.

use std::time::Duration;

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::retry::RetryPolicy;
use super::routes::RouteResolver;

/// A selectable relationship label, as listed by the server.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RelationshipType {
	pub id: i64,
	#[serde(alias = "label")]
	pub name: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("HTTP {status}: {body}")]
	Status { status: u16, body: String },
	#[error("no route named {0}")]
	UnknownRoute(String),
}

/// Family-member requests against a tree, addressed through an injected
/// [`RouteResolver`]. Reads retry transient transport failures under the
/// configured [`RetryPolicy`]; mutations are single-shot so a timed-out
/// add cannot apply twice.
pub struct MemberService<R: RouteResolver> {
	base_url: String,
	routes: R,
	retry: RetryPolicy,
	client: reqwest::Client,
}

impl<R: RouteResolver> MemberService<R> {
	pub fn new(base_url: impl Into<String>, routes: R) -> Self {
		Self {
			base_url: base_url.into(),
			routes,
			retry: RetryPolicy::default(),
			client: reqwest::Client::new(),
		}
	}

	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	/// Fetch the raw hierarchical tree payload for normalization.
	pub async fn tree(&self, tree_id: &str) -> Result<Value, ServiceError> {
		let url = self.url("tree.show", &[("tree", tree_id)])?;
		self.get_with_retry(&url).await
	}

	/// List the tree's members as raw records.
	pub async fn list(&self, tree_id: &str) -> Result<Vec<Value>, ServiceError> {
		let url = self.url("members.list", &[("tree", tree_id)])?;
		self.get_with_retry(&url).await
	}

	/// Create a member; returns the stored record.
	pub async fn add(&self, tree_id: &str, member: &Value) -> Result<Value, ServiceError> {
		let url = self.url("members.add", &[("tree", tree_id)])?;
		let response = self.client.post(&url).json(member).send().await?;
		Ok(Self::check(response).await?.json().await?)
	}

	/// Update a member; returns the stored record.
	pub async fn update(
		&self,
		tree_id: &str,
		member_id: &str,
		member: &Value,
	) -> Result<Value, ServiceError> {
		let url = self.url("members.update", &[("tree", tree_id), ("member", member_id)])?;
		let response = self.client.put(&url).json(member).send().await?;
		Ok(Self::check(response).await?.json().await?)
	}

	/// Delete a member.
	pub async fn remove(&self, tree_id: &str, member_id: &str) -> Result<(), ServiceError> {
		let url = self.url("members.remove", &[("tree", tree_id), ("member", member_id)])?;
		let response = self.client.delete(&url).send().await?;
		Self::check(response).await?;
		Ok(())
	}

	/// List the relationship labels offered when adding a member.
	pub async fn relationship_types(&self) -> Result<Vec<RelationshipType>, ServiceError> {
		let url = self.url("relationships.types", &[])?;
		self.get_with_retry(&url).await
	}

	fn url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, ServiceError> {
		let path = self
			.routes
			.resolve(name, params)
			.ok_or_else(|| ServiceError::UnknownRoute(name.to_string()))?;
		Ok(format!("{}{}", self.base_url, path))
	}

	async fn get_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
		let mut attempt = 1;
		loop {
			match self.get_json::<T>(url).await {
				Ok(value) => return Ok(value),
				Err(err) => {
					let retryable = matches!(err, ServiceError::Transport(_));
					match self.retry.delay_after(attempt).filter(|_| retryable) {
						Some(delay) => {
							warn!("GET {url} attempt {attempt} failed, retrying: {err}");
							sleep(delay).await;
							attempt += 1;
						}
						None => return Err(err),
					}
				}
			}
		}
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
		let response = self.client.get(url).send().await?;
		Ok(Self::check(response).await?.json::<T>().await?)
	}

	async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let body = response.text().await.unwrap_or_default();
		Err(ServiceError::Status {
			status: status.as_u16(),
			body,
		})
	}
}

/// Browser-event-loop sleep; there is no runtime timer on the WASM target.
async fn sleep(duration: Duration) {
	let millis = duration.as_millis().min(i32::MAX as u128) as i32;
	let promise = js_sys::Promise::new(&mut |resolve, _reject| {
		if let Some(window) = web_sys::window() {
			let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
		}
	});
	let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
