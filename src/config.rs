use core::{fmt::Display, str::FromStr};
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "/api/cupcakes";
pub const DEFAULT_IMAGE_WIDTH: u32 = 200;

/// Client settings.
///
/// In the browser these come from the list container's `data-*` attributes
/// (`data-api-base`, `data-edit-in-place`, `data-image-width`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Collection endpoint, absolute or relative to the page origin.
	pub api_base: String,
	pub capabilities: Capabilities,
	pub image_width: u32,
}

/// Optional workflow sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
	/// Inline edit form and partial updates. Without it, items can only be listed, created, searched and deleted.
	pub edit_in_place: bool,
}

impl Default for Capabilities {
	fn default() -> Self {
		Self { edit_in_place: true }
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_owned(),
			capabilities: Capabilities::default(),
			image_width: DEFAULT_IMAGE_WIDTH,
		}
	}
}

impl Config {
	/// Loads each setting through `lookup`, falling back to its default when missing or invalid.
	pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let defaults = Self::default();
		Self {
			api_base: try_load(&lookup, "api-base", defaults.api_base),
			capabilities: Capabilities {
				edit_in_place: try_load(&lookup, "edit-in-place", defaults.capabilities.edit_in_place),
			},
			image_width: try_load(&lookup, "image-width", defaults.image_width),
		}
	}
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
	T: FromStr + Display,
	T::Err: Display,
{
	match lookup(key) {
		None => {
			info!("{key} not set, using default: {default}");
			default
		}
		Some(value) => value.trim().parse().unwrap_or_else(|e| {
			warn!("Invalid {key} value {value:?} ({e}), using default: {default}");
			default
		}),
	}
}
