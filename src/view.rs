use crate::model::CupcakeId;
use std::cell::RefCell;
use tracing::warn;

/// The surface the controller patches after each successful round trip.
///
/// Items are addressed by identifier. Patching an item that isn't rendered is a no-op.
pub trait ListView {
	/// Removes every item.
	fn clear(&self);

	/// Adds an item after all others.
	fn append(&self, id: CupcakeId, markup: &str);

	/// Swaps the whole item node for `markup`.
	fn replace(&self, id: CupcakeId, markup: &str);

	/// Swaps the item's body for an edit form, keeping its heading.
	fn show_edit_form(&self, id: CupcakeId, form_markup: &str);

	fn remove(&self, id: CupcakeId);

	/// Clears the create form's inputs.
	fn reset_create_form(&self);

	/// Shows a blocking error message.
	fn alert(&self, message: &str);
}

/// One rendered list item of a [`HeadlessView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
	pub id: CupcakeId,
	pub markup: String,
	/// Markup of the open edit form, if any.
	pub edit_form: Option<String>,
}

/// A [`ListView`] that keeps its state in memory, for hosts without a DOM.
#[derive(Debug, Default)]
pub struct HeadlessView {
	items: RefCell<Vec<RenderedItem>>,
	alerts: RefCell<Vec<String>>,
	form_resets: RefCell<usize>,
}

impl HeadlessView {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn items(&self) -> Vec<RenderedItem> {
		self.items.borrow().clone()
	}

	#[must_use]
	pub fn item(&self, id: CupcakeId) -> Option<RenderedItem> {
		self.items.borrow().iter().find(|item| item.id == id).cloned()
	}

	#[must_use]
	pub fn ids(&self) -> Vec<CupcakeId> {
		self.items.borrow().iter().map(|item| item.id).collect()
	}

	#[must_use]
	pub fn alerts(&self) -> Vec<String> {
		self.alerts.borrow().clone()
	}

	#[must_use]
	pub fn form_resets(&self) -> usize {
		*self.form_resets.borrow()
	}

	fn with_item(&self, id: CupcakeId, f: impl FnOnce(&mut RenderedItem)) {
		match self.items.borrow_mut().iter_mut().find(|item| item.id == id) {
			Some(item) => f(item),
			None => warn!("No rendered item for cupcake {}.", id),
		}
	}
}

impl ListView for HeadlessView {
	fn clear(&self) {
		self.items.borrow_mut().clear();
	}

	fn append(&self, id: CupcakeId, markup: &str) {
		self.items.borrow_mut().push(RenderedItem {
			id,
			markup: markup.to_owned(),
			edit_form: None,
		});
	}

	fn replace(&self, id: CupcakeId, markup: &str) {
		self.with_item(id, |item| {
			item.markup = markup.to_owned();
			item.edit_form = None;
		});
	}

	fn show_edit_form(&self, id: CupcakeId, form_markup: &str) {
		self.with_item(id, |item| item.edit_form = Some(form_markup.to_owned()));
	}

	fn remove(&self, id: CupcakeId) {
		self.items.borrow_mut().retain(|item| item.id != id);
	}

	fn reset_create_form(&self) {
		*self.form_resets.borrow_mut() += 1;
	}

	fn alert(&self, message: &str) {
		self.alerts.borrow_mut().push(message.to_owned());
	}
}
