//! Naming helpers for field labels and resource names

/// Convert a snake_case identifier to a human-readable label.
///
/// # Examples
///
/// ```
/// use grappelli::text::humanize;
///
/// assert_eq!(humanize("active_user"), "Active User");
/// assert_eq!(humanize("email"), "Email");
/// ```
pub fn humanize(name: &str) -> String {
	name.split('_')
		.filter(|part| !part.is_empty())
		.map(capitalize)
		.collect::<Vec<_>>()
		.join(" ")
}

/// Derive the conventional plural form of an entity name.
///
/// Covers the regular English cases the naming convention relies on;
/// hosts with irregular entity names set the resource name explicitly.
///
/// # Examples
///
/// ```
/// use grappelli::text::pluralize;
///
/// assert_eq!(pluralize("user"), "users");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("address"), "addresses");
/// ```
pub fn pluralize(name: &str) -> String {
	if let Some(stem) = name.strip_suffix('y') {
		let preceded_by_vowel = stem
			.chars()
			.next_back()
			.is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
		if !preceded_by_vowel {
			return format!("{stem}ies");
		}
	}
	if name.ends_with('s')
		|| name.ends_with('x')
		|| name.ends_with('z')
		|| name.ends_with("ch")
		|| name.ends_with("sh")
	{
		return format!("{name}es");
	}
	format!("{name}s")
}

fn capitalize(part: &str) -> String {
	let mut chars = part.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_humanize_multi_word() {
		assert_eq!(humanize("created_at"), "Created At");
		assert_eq!(humanize("first_name"), "First Name");
	}

	#[test]
	fn test_humanize_single_word() {
		assert_eq!(humanize("status"), "Status");
	}

	#[test]
	fn test_humanize_collapses_empty_parts() {
		assert_eq!(humanize("_internal__flag"), "Internal Flag");
	}

	#[test]
	fn test_pluralize_regular() {
		assert_eq!(pluralize("post"), "posts");
		assert_eq!(pluralize("organization"), "organizations");
	}

	#[test]
	fn test_pluralize_consonant_y() {
		assert_eq!(pluralize("company"), "companies");
	}

	#[test]
	fn test_pluralize_vowel_y() {
		assert_eq!(pluralize("day"), "days");
	}

	#[test]
	fn test_pluralize_sibilants() {
		assert_eq!(pluralize("box"), "boxes");
		assert_eq!(pluralize("batch"), "batches");
		assert_eq!(pluralize("flash"), "flashes");
	}
}
