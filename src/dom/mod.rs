//! The browser binding: a [`ListView`] over a `<ul>`, event delegation into the [`ActionRegistry`], and the Wasm entry point.

use crate::{
	action::ActionRegistry,
	api::{Endpoints, HttpApi},
	controller::CupcakeController,
	model::CupcakeId,
	render::{ACTION_ATTRIBUTE, BODY_CLASS, IDENTIFIER_ATTRIBUTE},
	view::ListView,
};
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, error, info, instrument, trace_span, warn};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlFormElement, Window};

pub mod listeners;
pub mod load;

use listeners::ListenerSet;

/// `id` of the list container.
pub const LIST_ID: &str = "cupcake-list";

/// Attached to the list container during instantiation, this patches its items in place.
///
/// The create form is the page's `<form data-action="create">`, looked up on each reset.
#[derive(Debug)]
pub struct DomListView {
	list: Element,
	document: Document,
	window: Window,
}

impl DomListView {
	#[must_use]
	pub fn new(list: Element, document: Document, window: Window) -> Self {
		Self { list, document, window }
	}

	#[must_use]
	pub fn list(&self) -> &Element {
		&self.list
	}

	fn item(&self, id: CupcakeId) -> Option<Element> {
		match self.list.query_selector(&format!(r#"li[{}="{}"]"#, IDENTIFIER_ATTRIBUTE, id)) {
			Ok(Some(item)) => Some(item),
			Ok(None) => {
				warn!("No list item for cupcake {}.", id);
				None
			}
			Err(error) => {
				error!("Could not look up list item for cupcake {}: {:?}", id, error);
				None
			}
		}
	}
}

impl ListView for DomListView {
	fn clear(&self) {
		self.list.set_inner_html("");
	}

	fn append(&self, id: CupcakeId, markup: &str) {
		if let Err(error) = self.list.insert_adjacent_html("beforeend", markup) {
			error!("Failed to append cupcake {}: {:?}", id, error);
		}
	}

	fn replace(&self, id: CupcakeId, markup: &str) {
		if let Some(item) = self.item(id) {
			item.set_outer_html(markup);
		}
	}

	fn show_edit_form(&self, id: CupcakeId, form_markup: &str) {
		let item = match self.item(id) {
			Some(item) => item,
			None => return,
		};
		match item.query_selector(&format!(".{}", BODY_CLASS)) {
			Ok(Some(body)) => body.set_inner_html(form_markup),
			Ok(None) => error!("List item for cupcake {} has no .{}.", id, BODY_CLASS),
			Err(error) => error!("Could not look up the body of cupcake {}: {:?}", id, error),
		}
	}

	fn remove(&self, id: CupcakeId) {
		if let Some(item) = self.item(id) {
			item.remove();
		}
	}

	fn reset_create_form(&self) {
		match self.document.query_selector(&format!(r#"form[{}="create"]"#, ACTION_ATTRIBUTE)) {
			Ok(Some(form)) => match form.dyn_ref::<HtmlFormElement>() {
				Some(form) => form.reset(),
				None => error!("Create form is a <{}>.", form.tag_name()),
			},
			Ok(None) => warn!("No create form to reset."),
			Err(error) => error!("Could not look up the create form: {:?}", error),
		}
	}

	fn alert(&self, message: &str) {
		if let Err(error) = self.window.alert_with_message(message) {
			error!("Failed to show alert {:?}: {:?}", message, error);
		}
	}
}

pub type DomController = CupcakeController<HttpApi, DomListView>;

/// A controller bound to a page. Dropping it detaches the page's event listeners.
pub struct Mounted {
	pub controller: Rc<DomController>,
	pub registry: Rc<ActionRegistry>,
	_listeners: ListenerSet,
}

/// Binds a controller to `list` and routes `click` and `submit` events under `root` through an [`ActionRegistry`].
///
/// Configuration is read from `list`'s `data-*` attributes.
///
/// # Errors
///
/// Iff the collection URL can't be formed or a listener couldn't be added.
#[instrument(skip_all)]
pub fn mount(window: &Window, root: &Element, list: Element) -> Result<Mounted, JsValue> {
	let document = window.document().ok_or_else(|| JsValue::from_str("cupcake-dom: No document."))?;
	let config = load::load_config(&list);
	debug!(?config);

	let origin = window.location().origin()?;
	let endpoints = Endpoints::new(Some(&origin), &config.api_base).map_err(|e| JsValue::from_str(&e.to_string()))?;
	let view = DomListView::new(list, document, window.clone());
	let controller = Rc::new(CupcakeController::new(HttpApi::new(endpoints), view, &config));
	let registry = Rc::new(ActionRegistry::for_controller(&controller));

	let mut listeners = ListenerSet::new(root.clone().into());
	for event_type in ["click", "submit"] {
		let registry = Rc::clone(&registry);
		listeners.listen(event_type, move |event| handle(&registry, &event))?;
	}
	info!("Mounted with {:?}.", registry);

	Ok(Mounted {
		controller,
		registry,
		_listeners: listeners,
	})
}

fn handle(registry: &Rc<ActionRegistry>, event: &Event) {
	let span = trace_span!("handle", event_type = %event.type_());
	let _enter = span.enter();

	let invocation = match load::load_invocation(event) {
		Some(invocation) => invocation,
		None => return,
	};
	if event.type_() == "submit" {
		event.prevent_default();
	}

	let registry = Rc::clone(registry);
	spawn_local(async move {
		if let Err(error) = registry.dispatch(invocation).await {
			debug!("Dispatch ended with: {}", error.log_message());
		}
	});
}

thread_local! {
	static MOUNTED: RefCell<Option<Mounted>> = RefCell::new(None);
}

/// Installs logging, mounts on `#cupcake-list` and lists every cupcake.
///
/// # Errors
///
/// Iff there is no page to mount on or mounting failed.
#[cfg_attr(feature = "entry", wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
	tracing_wasm::set_as_global_default();

	let window = web_sys::window().ok_or_else(|| JsValue::from_str("cupcake-dom: No window."))?;
	let document = window.document().ok_or_else(|| JsValue::from_str("cupcake-dom: No document."))?;
	let list = document
		.get_element_by_id(LIST_ID)
		.ok_or_else(|| JsValue::from_str("cupcake-dom: No #cupcake-list element."))?;
	let root = document.document_element().ok_or_else(|| JsValue::from_str("cupcake-dom: No document element."))?;

	let mounted = mount(&window, &root, list)?;
	let controller = Rc::clone(&mounted.controller);
	MOUNTED.with(|slot| *slot.borrow_mut() = Some(mounted));

	spawn_local(async move {
		// Failures were already alerted.
		let _ = controller.list(None).await;
	});
	Ok(())
}
