//! Reading state back out of the page: configuration, form inputs, and which action an event stands for.

use crate::{
	action::{Action, Invocation},
	config::Config,
	model::{field, CupcakeId, FormFields},
	render::{ACTION_ATTRIBUTE, IDENTIFIER_ATTRIBUTE},
};
use hashbrown::HashMap;
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Attr, Element, Event, HtmlFormElement, HtmlInputElement, NamedNodeMap};

/// Loads [`Config`] from `element`'s `data-*` attributes.
#[must_use]
pub fn load_config(element: &Element) -> Config {
	let data = load_data_attributes(&element.attributes());
	Config::load(|key| data.get(key).cloned())
}

/// Collects `data-*` attributes with the prefix stripped.
pub fn load_data_attributes(attributes: &NamedNodeMap) -> HashMap<String, String> {
	(0..attributes.length())
		.filter_map(|i| attributes.item(i))
		.filter_map(|attribute| load_data_attribute(&attribute))
		.collect()
}

fn load_data_attribute(attribute: &Attr) -> Option<(String, String)> {
	let name = attribute.local_name();
	let key = name.strip_prefix("data-")?;
	Some((key.to_owned(), attribute.value()))
}

/// Reads the cupcake inputs of `form` by name. Inputs the form doesn't have are skipped.
#[must_use]
pub fn load_fields(form: &HtmlFormElement) -> FormFields {
	let mut fields = FormFields::new();
	for name in field::ALL {
		let input = match form.query_selector(&format!(r#"[name="{}"]"#, name)) {
			Ok(Some(input)) => input,
			Ok(None) => continue,
			Err(error) => {
				warn!("Could not look up input {:?}: {:?}", name, error);
				continue;
			}
		};
		match input.dyn_ref::<HtmlInputElement>() {
			Some(input) => fields.insert(name, &input.value()),
			None => warn!("Expected <input name={:?}> but found <{}>.", name, input.tag_name()),
		}
	}
	fields
}

/// Resolves the identifier of the item `element` sits in, if any.
#[must_use]
pub fn load_identifier(element: &Element) -> Option<CupcakeId> {
	let item = element.closest(&format!("[{}]", IDENTIFIER_ATTRIBUTE)).ok()??;
	let value = item.get_attribute(IDENTIFIER_ATTRIBUTE)?;
	match value.parse() {
		Ok(id) => Some(id),
		Err(error) => {
			warn!("Unreadable {} {:?}: {}", IDENTIFIER_ATTRIBUTE, value, error);
			None
		}
	}
}

/// Turns a `click` or `submit` event into an [`Invocation`].
///
/// Clicks resolve to the closest control with a `data-action`; forms only answer to `submit`.
/// Events that don't concern an action resolve to [`None`].
#[must_use]
pub fn load_invocation(event: &Event) -> Option<Invocation> {
	let target = event.target()?;
	let element = target.dyn_ref::<Element>()?;
	let actor = element.closest(&format!("[{}]", ACTION_ATTRIBUTE)).ok()??;
	let form = actor.dyn_ref::<HtmlFormElement>();
	match (event.type_().as_str(), form) {
		("click", None) | ("submit", Some(_)) => (),
		(event_type, _) => {
			trace!("Ignoring {} on <{}>.", event_type, actor.tag_name());
			return None;
		}
	}

	let name = actor.get_attribute(ACTION_ATTRIBUTE)?;
	let action = match name.parse::<Action>() {
		Ok(action) => action,
		Err(error) => {
			warn!("{}", error);
			return None;
		}
	};

	let mut invocation = Invocation::new(action);
	if let Some(id) = load_identifier(&actor) {
		invocation = invocation.on(id);
	}
	if let Some(form) = form {
		invocation = invocation.with_fields(load_fields(form));
	}
	Some(invocation)
}
