//! Named-route resolution for the service layer.
//!
//! Endpoint paths are looked up through an injected [`RouteResolver`]
//! rather than a global URL builder, so tests and alternate deployments
//! can swap the table without touching the services.

use std::collections::HashMap;

/// Resolves a route name plus path parameters to a concrete URL path.
pub trait RouteResolver {
	/// `None` when the name is unknown or a `{placeholder}` in the
	/// template has no matching parameter.
	fn resolve(&self, name: &str, params: &[(&str, &str)]) -> Option<String>;
}

/// Static name → path-template table, `{param}` placeholders substituted
/// from the call site.
#[derive(Clone, Debug)]
pub struct StaticRoutes {
	routes: HashMap<&'static str, &'static str>,
}

impl StaticRoutes {
	/// The application's route table.
	pub fn new() -> Self {
		Self::with_routes([
			("tree.show", "/trees/{tree}"),
			("members.list", "/trees/{tree}/members"),
			("members.add", "/trees/{tree}/members"),
			("members.update", "/trees/{tree}/members/{member}"),
			("members.remove", "/trees/{tree}/members/{member}"),
			("relationships.types", "/relationship-types"),
		])
	}

	pub fn with_routes(pairs: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
		Self {
			routes: pairs.into_iter().collect(),
		}
	}
}

impl Default for StaticRoutes {
	fn default() -> Self {
		Self::new()
	}
}

impl RouteResolver for StaticRoutes {
	fn resolve(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
		let template = self.routes.get(name)?;
		let mut path = (*template).to_string();
		for (key, value) in params {
			path = path.replace(&format!("{{{key}}}"), value);
		}
		// A leftover placeholder means a missing parameter; refuse to
		// produce a half-built URL.
		(!path.contains('{')).then_some(path)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn resolves_with_params() {
		let routes = StaticRoutes::new();
		assert_eq!(
			routes.resolve("members.update", &[("tree", "12"), ("member", "7")]),
			Some("/trees/12/members/7".into())
		);
		assert_eq!(
			routes.resolve("relationships.types", &[]),
			Some("/relationship-types".into())
		);
	}

	#[test]
	fn unknown_name_is_none() {
		assert_eq!(StaticRoutes::new().resolve("members.frobnicate", &[]), None);
	}

	#[test]
	fn missing_param_is_none() {
		assert_eq!(StaticRoutes::new().resolve("members.list", &[]), None);
	}
}
