//! Markup for list items and the inline edit form.
//!
//! Values are interpolated as they are. Nothing is escaped.

use crate::{action::Action, config::Config, model::Cupcake};

/// Attribute that ties a rendered node to its record.
pub const IDENTIFIER_ATTRIBUTE: &str = "data-identifier";
/// Attribute naming the [`Action`] a control or form triggers.
pub const ACTION_ATTRIBUTE: &str = "data-action";
/// Class of an item's body, which is everything the edit form replaces.
pub const BODY_CLASS: &str = "cupcake__body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
	pub image_width: u32,
	pub edit_in_place: bool,
}

impl From<&Config> for RenderOptions {
	fn from(config: &Config) -> Self {
		Self {
			image_width: config.image_width,
			edit_in_place: config.capabilities.edit_in_place,
		}
	}
}

impl Default for RenderOptions {
	fn default() -> Self {
		(&Config::default()).into()
	}
}

/// Renders one `<li>`. The image acts as the item's heading; the rest sits in the body.
///
/// A missing image renders as an empty `src`.
#[must_use]
pub fn render_item(cupcake: &Cupcake, options: &RenderOptions) -> String {
	let Cupcake { id, flavor, size, rating, image } = cupcake;
	let image = image.as_deref().unwrap_or_default();
	let edit = if options.edit_in_place {
		format!(r#"<button type="button" {ACTION_ATTRIBUTE}="{}">Edit</button>"#, Action::Edit)
	} else {
		String::new()
	};
	format!(
		r#"<li class="cupcake" {IDENTIFIER_ATTRIBUTE}="{id}">
	<img src="{image}" alt="{flavor} cupcake image" width="{width}" />
	<div class="{BODY_CLASS}">
		<p>Flavor: {flavor}</p>
		<p>Size: {size}</p>
		<p>Rating: {rating}</p>
		{edit}<button type="button" {ACTION_ATTRIBUTE}="{delete}">Delete</button>
	</div>
</li>"#,
		width = options.image_width,
		delete = Action::Delete,
	)
}

/// Renders the edit form that replaces an item's body.
///
/// Inputs start empty, with the current values as placeholders, so that only what the user types ends up in the update.
#[must_use]
pub fn render_edit_form(cupcake: &Cupcake) -> String {
	let Cupcake { id, flavor, size, rating, image } = cupcake;
	let image = image.as_deref().unwrap_or_default();
	format!(
		r#"<form class="cupcake__edit" {IDENTIFIER_ATTRIBUTE}="{id}" {ACTION_ATTRIBUTE}="{update}">
	<input name="flavor" placeholder="{flavor}" />
	<input name="size" placeholder="{size}" />
	<input name="rating" type="number" step="any" placeholder="{rating}" />
	<input name="image" type="url" placeholder="{image}" />
	<button type="submit">Save</button>
	<button type="button" {ACTION_ATTRIBUTE}="{cancel}">Cancel</button>
</form>"#,
		update = Action::Update,
		cancel = Action::Cancel,
	)
}
