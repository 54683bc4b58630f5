use crate::{
	api::CupcakeApi,
	config::{Capabilities, Config},
	error::WorkflowError,
	model::{Cupcake, CupcakeId, CupcakePatch, FormFields, NewCupcake},
	render::{render_edit_form, render_item, RenderOptions},
	store::{CupcakeStore, ItemState},
	view::ListView,
};
use std::cell::RefCell;
use tracing::{debug, info, instrument, trace, warn};

/// Keeps a [`ListView`] in sync with a remote collection.
///
/// Every workflow makes at most one request and patches the view only after it succeeds.
/// Failures are alerted through the view, logged, and returned; nothing is retried.
///
/// The store is never borrowed across an `.await`, so workflows may interleave freely on one thread.
/// Two workflows on the same identifier race, and the later view patch wins.
#[derive(Debug)]
pub struct CupcakeController<A, V> {
	api: A,
	view: V,
	options: RenderOptions,
	capabilities: Capabilities,
	store: RefCell<CupcakeStore>,
}

impl<A: CupcakeApi, V: ListView> CupcakeController<A, V> {
	pub fn new(api: A, view: V, config: &Config) -> Self {
		Self {
			api,
			view,
			options: config.into(),
			capabilities: config.capabilities,
			store: RefCell::new(CupcakeStore::new()),
		}
	}

	pub fn api(&self) -> &A {
		&self.api
	}

	pub fn view(&self) -> &V {
		&self.view
	}

	#[must_use]
	pub fn capabilities(&self) -> Capabilities {
		self.capabilities
	}

	/// Snapshot of the listed records, in list order.
	#[must_use]
	pub fn cupcakes(&self) -> Vec<Cupcake> {
		self.store.borrow().iter().cloned().collect()
	}

	#[must_use]
	pub fn state(&self, id: CupcakeId) -> Option<ItemState> {
		self.store.borrow().state(id)
	}

	/// Clears the list, then fills it with the records matching `flavor`, in server order.
	///
	/// On failure the list stays empty. If another list request started in the meantime, the response is dropped.
	///
	/// # Errors
	///
	/// The request failed.
	#[instrument(skip(self, flavor))]
	pub async fn list(&self, flavor: Option<&str>) -> Result<(), WorkflowError> {
		if cfg!(feature = "dangerous-logging") {
			trace!(?flavor, "Listing cupcakes.");
		}
		let generation = self.store.borrow_mut().begin_list();
		self.view.clear();

		let cupcakes = match self.api.list(flavor).await {
			Ok(cupcakes) => cupcakes,
			Err(error) => return self.fail(error.into()),
		};

		let mut store = self.store.borrow_mut();
		if !store.is_current(generation) {
			debug!("Discarding {} cupcake(s) from a superseded list request.", cupcakes.len());
			return Ok(());
		}
		for cupcake in cupcakes {
			let markup = render_item(&cupcake, &self.options);
			let id = cupcake.id;
			if store.insert(cupcake) {
				self.view.append(id, &markup);
			} else {
				warn!("Cupcake {} was listed twice; showing the later record.", id);
				self.view.replace(id, &markup);
			}
		}
		info!("Listed {} cupcake(s).", store.len());
		Ok(())
	}

	/// Replaces the list with the records whose flavor matches `flavor`.
	///
	/// # Errors
	///
	/// See [`list`](Self::list).
	pub async fn search(&self, flavor: &str) -> Result<(), WorkflowError> {
		self.list(Some(flavor)).await
	}

	/// Creates a cupcake from the create form's fields, then resets the form and appends the new item.
	///
	/// # Errors
	///
	/// The rating isn't numeric, or the request failed.
	#[instrument(skip(self, fields))]
	pub async fn create(&self, fields: &FormFields) -> Result<(), WorkflowError> {
		let cupcake = match NewCupcake::from_fields(fields) {
			Ok(cupcake) => cupcake,
			Err(error) => return self.fail(error),
		};
		if cfg!(feature = "dangerous-logging") {
			trace!(?cupcake, "Creating cupcake.");
		}

		let created = match self.api.create(&cupcake).await {
			Ok(created) => created,
			Err(error) => return self.fail(error.into()),
		};

		self.view.reset_create_form();
		let markup = render_item(&created, &self.options);
		let id = created.id;
		if self.store.borrow_mut().insert(created) {
			self.view.append(id, &markup);
		} else {
			self.view.replace(id, &markup);
		}
		info!("Created cupcake {}.", id);
		Ok(())
	}

	/// Opens the inline edit form of a listed item. No request is made.
	///
	/// # Errors
	///
	/// Editing is switched off, or `id` isn't listed.
	#[instrument(skip(self))]
	pub fn edit(&self, id: CupcakeId) -> Result<(), WorkflowError> {
		if !self.capabilities.edit_in_place {
			return self.fail(WorkflowError::Unsupported("Editing"));
		}
		let form = {
			let mut store = self.store.borrow_mut();
			let form = store.get(id).map(render_edit_form);
			if form.is_some() {
				store.set_state(id, ItemState::Editing);
			}
			form
		};
		match form {
			Some(form) => {
				self.view.show_edit_form(id, &form);
				Ok(())
			}
			None => self.fail(WorkflowError::UnknownCupcake(id)),
		}
	}

	/// Closes the edit form and shows the item as it was.
	///
	/// # Errors
	///
	/// Editing is switched off, or `id` isn't listed.
	#[instrument(skip(self))]
	pub fn cancel_edit(&self, id: CupcakeId) -> Result<(), WorkflowError> {
		if !self.capabilities.edit_in_place {
			return self.fail(WorkflowError::Unsupported("Editing"));
		}
		let markup = {
			let mut store = self.store.borrow_mut();
			let markup = store.get(id).map(|cupcake| render_item(cupcake, &self.options));
			if markup.is_some() {
				store.set_state(id, ItemState::Listed);
			}
			markup
		};
		match markup {
			Some(markup) => {
				self.view.replace(id, &markup);
				Ok(())
			}
			None => self.fail(WorkflowError::UnknownCupcake(id)),
		}
	}

	/// Sends the fields the user filled in and replaces the item with the record the server returns.
	///
	/// If nothing was filled in, no request is made. On failure the edit form stays open.
	///
	/// # Errors
	///
	/// Editing is switched off, the patch is empty or has a non-numeric rating, or the request failed.
	#[instrument(skip(self, fields))]
	pub async fn update(&self, id: CupcakeId, fields: &FormFields) -> Result<(), WorkflowError> {
		if !self.capabilities.edit_in_place {
			return self.fail(WorkflowError::Unsupported("Editing"));
		}
		let patch = match CupcakePatch::from_fields(fields) {
			Ok(patch) if patch.is_empty() => return self.fail(WorkflowError::EmptyUpdate),
			Ok(patch) => patch,
			Err(error) => return self.fail(error),
		};
		if cfg!(feature = "dangerous-logging") {
			trace!(?patch, "Updating cupcake.");
		}

		self.store.borrow_mut().set_state(id, ItemState::SubmittingEdit);
		let updated = match self.api.update(id, &patch).await {
			Ok(updated) => updated,
			Err(error) => {
				// A list that completed in the meantime already re-rendered the item as listed.
				self.store.borrow_mut().transition(id, ItemState::SubmittingEdit, ItemState::Editing);
				return self.fail(error.into());
			}
		};

		self.replace_listed(updated);
		Ok(())
	}

	/// Deletes a cupcake and removes its item. Other items are left alone.
	///
	/// # Errors
	///
	/// The request failed.
	#[instrument(skip(self))]
	pub async fn delete(&self, id: CupcakeId) -> Result<(), WorkflowError> {
		let message = match self.api.delete(id).await {
			Ok(message) => message,
			Err(error) => return self.fail(error.into()),
		};
		debug!("Server confirmed deletion: {}", message);

		if self.store.borrow_mut().remove(id).is_none() {
			debug!("Cupcake {} was no longer listed.", id);
		}
		self.view.remove(id);
		Ok(())
	}

	/// Fetches one record again and re-renders its item.
	///
	/// # Errors
	///
	/// The request failed.
	#[instrument(skip(self))]
	pub async fn refresh(&self, id: CupcakeId) -> Result<(), WorkflowError> {
		match self.api.get(id).await {
			Ok(cupcake) => {
				self.replace_listed(cupcake);
				Ok(())
			}
			Err(error) => self.fail(error.into()),
		}
	}

	fn replace_listed(&self, cupcake: Cupcake) {
		let markup = render_item(&cupcake, &self.options);
		let id = cupcake.id;
		if self.store.borrow_mut().replace(cupcake) {
			self.view.replace(id, &markup);
		} else {
			debug!("Cupcake {} is no longer listed; not rendering it.", id);
		}
	}

	fn fail(&self, error: WorkflowError) -> Result<(), WorkflowError> {
		warn!("{}", error.log_message());
		self.view.alert(&error.to_string());
		Err(error)
	}
}
