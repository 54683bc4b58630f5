//! Dispatch table from UI actions to workflows.
//!
//! Controls and forms name their action in a `data-action` attribute. The DOM binding resolves each event
//! into an [`Invocation`] and hands it to an [`ActionRegistry`], which is the only place handlers are bound.

use crate::{
	api::CupcakeApi,
	controller::CupcakeController,
	error::WorkflowError,
	model::{field, CupcakeId, FormFields},
	view::ListView,
};
use core::{fmt, str::FromStr};
use futures::future::{FutureExt, LocalBoxFuture};
use hashbrown::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, trace_span, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	Create,
	Search,
	Edit,
	Update,
	Cancel,
	Delete,
	Refresh,
}

impl Action {
	pub const ALL: [Self; 7] = [Self::Create, Self::Search, Self::Edit, Self::Update, Self::Cancel, Self::Delete, Self::Refresh];

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Search => "search",
			Self::Edit => "edit",
			Self::Update => "update",
			Self::Cancel => "cancel",
			Self::Delete => "delete",
			Self::Refresh => "refresh",
		}
	}

	/// Whether the action targets one listed item, and so needs an identifier.
	#[must_use]
	pub fn targets_item(self) -> bool {
		!matches!(self, Self::Create | Self::Search)
	}

	/// Whether the action is part of the edit-in-place capability.
	#[must_use]
	pub fn edits_in_place(self) -> bool {
		matches!(self, Self::Edit | Self::Update | Self::Cancel)
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
	type Err = UnknownAction;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|action| action.as_str() == s)
			.ok_or_else(|| UnknownAction(s.to_owned()))
	}
}

/// One resolved UI event.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
	pub action: Action,
	/// From the closest `data-identifier` around the event target.
	pub identifier: Option<CupcakeId>,
	/// Inputs of the submitted form, if the event was a submission.
	pub fields: FormFields,
}

impl Invocation {
	#[must_use]
	pub fn new(action: Action) -> Self {
		Self {
			action,
			identifier: None,
			fields: FormFields::new(),
		}
	}

	#[must_use]
	pub fn on(mut self, id: CupcakeId) -> Self {
		self.identifier = Some(id);
		self
	}

	#[must_use]
	pub fn with_fields(mut self, fields: FormFields) -> Self {
		self.fields = fields;
		self
	}
}

#[derive(Debug, Error)]
pub enum DispatchError {
	#[error("no handler registered for {0}")]
	Unregistered(Action),

	#[error("{0} needs a cupcake identifier")]
	MissingIdentifier(Action),

	#[error(transparent)]
	Workflow(#[from] WorkflowError),
}

impl DispatchError {
	/// See [`WorkflowError::log_message`].
	#[must_use]
	pub fn log_message(&self) -> String {
		match self {
			Self::Workflow(error) => error.log_message(),
			_ => self.to_string(),
		}
	}
}

pub type Handler = Box<dyn Fn(Invocation) -> LocalBoxFuture<'static, Result<(), WorkflowError>>>;

/// Maps each [`Action`] to at most one handler.
#[derive(Default)]
pub struct ActionRegistry {
	handlers: HashMap<Action, Handler>,
}

impl fmt::Debug for ActionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.handlers.keys()).finish()
	}
}

impl ActionRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `handler` to `action`, returning the handler it displaced.
	pub fn register(&mut self, action: Action, handler: Handler) -> Option<Handler> {
		self.handlers.insert(action, handler)
	}

	pub fn unregister(&mut self, action: Action) -> Option<Handler> {
		self.handlers.remove(&action)
	}

	#[must_use]
	pub fn is_registered(&self, action: Action) -> bool {
		self.handlers.contains_key(&action)
	}

	/// Binds every workflow of `controller` that its capabilities allow.
	pub fn for_controller<A, V>(controller: &Rc<CupcakeController<A, V>>) -> Self
	where
		A: CupcakeApi + 'static,
		V: ListView + 'static,
	{
		let mut registry = Self::new();
		let edit_in_place = controller.capabilities().edit_in_place;
		for action in Action::ALL {
			if action.edits_in_place() && !edit_in_place {
				continue;
			}
			let controller = Rc::clone(controller);
			registry.register(action, Box::new(move |invocation| run(Rc::clone(&controller), invocation)));
		}
		registry
	}

	/// Runs the handler bound to the invocation's action.
	///
	/// # Errors
	///
	/// Nothing is bound to the action, an item action came without an identifier, or the workflow failed.
	pub async fn dispatch(&self, invocation: Invocation) -> Result<(), DispatchError> {
		let action = invocation.action;
		let handler = self.handlers.get(&action).ok_or(DispatchError::Unregistered(action))?;
		if action.targets_item() && invocation.identifier.is_none() {
			return Err(DispatchError::MissingIdentifier(action));
		}
		let span = trace_span!("dispatch", %action, identifier = ?invocation.identifier);
		debug!(parent: &span, "Dispatching.");
		handler(invocation).instrument(span).await?;
		Ok(())
	}
}

fn run<A, V>(controller: Rc<CupcakeController<A, V>>, invocation: Invocation) -> LocalBoxFuture<'static, Result<(), WorkflowError>>
where
	A: CupcakeApi + 'static,
	V: ListView + 'static,
{
	let Invocation { action, identifier, fields } = invocation;
	async move {
		match (action, identifier) {
			(Action::Create, _) => controller.create(&fields).await,
			(Action::Search, _) => controller.search(fields.get(field::FLAVOR).unwrap_or_default()).await,
			(Action::Edit, Some(id)) => controller.edit(id),
			(Action::Update, Some(id)) => controller.update(id, &fields).await,
			(Action::Cancel, Some(id)) => controller.cancel_edit(id),
			(Action::Delete, Some(id)) => controller.delete(id).await,
			(Action::Refresh, Some(id)) => controller.refresh(id).await,
			(_, None) => {
				error!("{} reached its handler without an identifier.", action);
				Ok(())
			}
		}
	}
	.boxed_local()
}
