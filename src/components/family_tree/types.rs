use serde::Serialize;

/// Gender of a family member. Unrecognized server values collapse to `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
	Male,
	Female,
	#[default]
	Other,
}

impl Gender {
	/// Parse a loosely-typed server value ("male", "F", "Female", ...).
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"male" | "m" => Gender::Male,
			"female" | "f" => Gender::Female,
			_ => Gender::Other,
		}
	}
}

/// Canonical family-tree vertex produced by the normalizer.
///
/// Serializes to the same camelCase shape the normalizer reads, so a
/// serialized tree re-enters normalization as a fixed point.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
	pub id: String,
	pub first_name: String,
	pub last_name: String,
	pub date_of_birth: Option<String>,
	pub date_of_death: Option<String>,
	pub gender: Gender,
	pub relationship_to_user: String,
	pub is_current_user: bool,
	pub is_partner: bool,
	pub partners: Vec<PersonNode>,
	pub children: Vec<PersonNode>,
}

impl PersonNode {
	/// The minimal node substituted for missing or malformed input.
	pub fn fallback() -> Self {
		Self {
			first_name: "?".into(),
			..Self::default()
		}
	}

	/// Full display name for node cards and tooltips.
	pub fn display_name(&self) -> String {
		if self.last_name.is_empty() {
			self.first_name.clone()
		} else {
			format!("{} {}", self.first_name, self.last_name)
		}
	}

	/// Birth/death year line, e.g. "1948 - 2011" or "1990 -". Empty when
	/// no dates are known.
	pub fn lifespan(&self) -> String {
		let year = |date: &Option<String>| {
			date.as_deref()
				.map(|d| d.chars().take(4).collect::<String>())
				.unwrap_or_default()
		};
		let (born, died) = (year(&self.date_of_birth), year(&self.date_of_death));
		if born.is_empty() && died.is_empty() {
			String::new()
		} else {
			format!("{} - {}", born, died).trim().to_string()
		}
	}

	/// A copy of this node's own fields with the subtree stripped, for
	/// hit-test results and click callbacks.
	pub fn card(&self) -> Self {
		Self {
			id: self.id.clone(),
			first_name: self.first_name.clone(),
			last_name: self.last_name.clone(),
			date_of_birth: self.date_of_birth.clone(),
			date_of_death: self.date_of_death.clone(),
			gender: self.gender,
			relationship_to_user: self.relationship_to_user.clone(),
			is_current_user: self.is_current_user,
			is_partner: self.is_partner,
			partners: Vec::new(),
			children: Vec::new(),
		}
	}
}
