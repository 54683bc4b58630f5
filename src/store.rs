use crate::model::{Cupcake, CupcakeId};
use hashbrown::HashMap;

/// Where a listed record stands in the edit workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
	Listed,
	Editing,
	SubmittingEdit,
}

/// Identifies one list request. Only the newest may populate the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug)]
struct Entry {
	cupcake: Cupcake,
	state: ItemState,
}

/// The client-side collection: every record currently listed, in server order.
///
/// The rendered list is derived from this.
#[derive(Debug, Default)]
pub struct CupcakeStore {
	entries: HashMap<CupcakeId, Entry>,
	order: Vec<CupcakeId>,
	generation: u64,
}

impl CupcakeStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Empties the store and starts a new list generation, superseding all earlier ones.
	pub fn begin_list(&mut self) -> Generation {
		self.entries.clear();
		self.order.clear();
		self.generation += 1;
		Generation(self.generation)
	}

	#[must_use]
	pub fn is_current(&self, generation: Generation) -> bool {
		generation.0 == self.generation
	}

	/// Appends a record. Returns `false` and keeps the position if the identifier was already listed, in which case the record is replaced.
	pub fn insert(&mut self, cupcake: Cupcake) -> bool {
		match self.entries.get_mut(&cupcake.id) {
			Some(entry) => {
				entry.cupcake = cupcake;
				false
			}
			None => {
				self.order.push(cupcake.id);
				self.entries.insert(
					cupcake.id,
					Entry {
						cupcake,
						state: ItemState::Listed,
					},
				);
				true
			}
		}
	}

	/// Replaces a listed record and returns it to [`ItemState::Listed`]. Returns `false` if it isn't listed.
	pub fn replace(&mut self, cupcake: Cupcake) -> bool {
		match self.entries.get_mut(&cupcake.id) {
			Some(entry) => {
				entry.cupcake = cupcake;
				entry.state = ItemState::Listed;
				true
			}
			None => false,
		}
	}

	pub fn remove(&mut self, id: CupcakeId) -> Option<Cupcake> {
		let entry = self.entries.remove(&id)?;
		self.order.retain(|listed| *listed != id);
		Some(entry.cupcake)
	}

	#[must_use]
	pub fn get(&self, id: CupcakeId) -> Option<&Cupcake> {
		self.entries.get(&id).map(|entry| &entry.cupcake)
	}

	#[must_use]
	pub fn state(&self, id: CupcakeId) -> Option<ItemState> {
		self.entries.get(&id).map(|entry| entry.state)
	}

	/// Moves a listed record to `state`. Returns `false` if it isn't listed.
	pub fn set_state(&mut self, id: CupcakeId, state: ItemState) -> bool {
		match self.entries.get_mut(&id) {
			Some(entry) => {
				entry.state = state;
				true
			}
			None => false,
		}
	}

	/// Moves a listed record from `from` to `to`. Returns `false`, changing nothing, if it isn't listed or not in `from`.
	pub fn transition(&mut self, id: CupcakeId, from: ItemState, to: ItemState) -> bool {
		match self.entries.get_mut(&id) {
			Some(entry) if entry.state == from => {
				entry.state = to;
				true
			}
			_ => false,
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.order.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Records in list order.
	pub fn iter(&self) -> impl Iterator<Item = &Cupcake> {
		self.order.iter().filter_map(move |id| self.get(*id))
	}
}
