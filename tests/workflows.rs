use cupcake_dom::{ApiError, Capabilities, Config, CupcakeController, CupcakeId, FormFields, HeadlessView, ItemState, WorkflowError};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::rc::Rc;

use fake_api_::{cupcake, FakeApi, Request};

type Controller = CupcakeController<FakeApi, HeadlessView>;

fn controller() -> Controller {
	CupcakeController::new(FakeApi::new(), HeadlessView::new(), &Config::default())
}

fn fields(pairs: &[(&str, &str)]) -> FormFields {
	pairs.iter().copied().collect()
}

/// Lists cherry (1) and chocolate (2).
fn listed() -> Controller {
	let controller = controller();
	controller.api().reply(json!({"cupcakes": [
		cupcake(1, "cherry", "large", 5.0, None),
		cupcake(2, "chocolate", "small", 9.0, Some("http://x/c.png")),
	]}));
	block_on(controller.list(None)).unwrap();
	controller
}

fn markup(controller: &Controller, id: u64) -> String {
	controller.view().item(CupcakeId(id)).expect("item is rendered").markup
}

#[test]
fn list_renders_each_record() {
	let controller = controller();
	controller
		.api()
		.reply(json!({"cupcakes": [cupcake(1, "Vanilla", "large", 4.0, Some("http://x/v.png"))]}));

	block_on(controller.list(None)).unwrap();

	let items = controller.view().items();
	assert_eq!(items.len(), 1);
	assert!(items[0].markup.contains(r#"data-identifier="1""#));
	assert!(items[0].markup.contains("Flavor: Vanilla"));
	assert!(items[0].markup.contains("Size: large"));
	assert!(items[0].markup.contains("Rating: 4"));
	assert!(items[0].markup.contains(r#"src="http://x/v.png""#));
	assert_eq!(controller.api().requests(), [Request::List(None)]);
}

#[test]
fn list_keeps_server_order() {
	let controller = listed();
	assert_eq!(controller.view().ids(), [CupcakeId(1), CupcakeId(2)]);
	let flavors: Vec<_> = controller.cupcakes().into_iter().map(|c| c.flavor).collect();
	assert_eq!(flavors, ["cherry", "chocolate"]);
}

#[test]
fn failed_list_leaves_the_list_empty() {
	let controller = listed();
	controller.api().fail(ApiError::NoResponse);

	let result = block_on(controller.list(None));

	assert!(matches!(result, Err(WorkflowError::Api(ApiError::NoResponse))));
	assert!(controller.view().items().is_empty());
	assert!(controller.cupcakes().is_empty());
	assert_eq!(controller.view().alerts(), ["Did not receive a response from the server."]);
}

#[test]
fn search_replaces_instead_of_merging() {
	let controller = listed();
	controller
		.api()
		.reply(json!({"cupcakes": [cupcake(2, "chocolate", "small", 9.0, None)]}));

	block_on(controller.search("choc")).unwrap();

	assert_eq!(controller.view().ids(), [CupcakeId(2)]);
	assert_eq!(controller.api().requests().last(), Some(&Request::List(Some("choc".to_owned()))));
}

#[test]
fn create_appends_one_item_after_the_others() {
	let controller = listed();
	controller
		.api()
		.reply(json!({"cupcake": cupcake(3, "lemon", "medium", 7.0, None)}));

	block_on(controller.create(&fields(&[("flavor", "lemon"), ("size", "medium"), ("rating", "7"), ("image", "")]))).unwrap();

	assert_eq!(controller.view().ids(), [CupcakeId(1), CupcakeId(2), CupcakeId(3)]);
	assert!(markup(&controller, 3).contains("Flavor: lemon"));
	assert_eq!(controller.view().form_resets(), 1);
	match controller.api().requests().last() {
		Some(Request::Create(new)) => {
			assert_eq!(new.flavor, "lemon");
			assert_eq!(new.rating, 7.0);
			assert_eq!(new.image, None);
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn failed_create_changes_nothing() {
	let controller = listed();
	let before = controller.view().items();
	controller.api().fail(ApiError::Setup("bad URL".to_owned()));

	let result = block_on(controller.create(&fields(&[("flavor", "lemon"), ("size", "medium"), ("rating", "7")])));

	assert!(result.is_err());
	assert_eq!(controller.view().items(), before);
	assert_eq!(controller.view().form_resets(), 0);
	assert_eq!(controller.view().alerts(), ["Error occurred while setting up request."]);
}

#[test]
fn create_with_a_non_numeric_rating_sends_nothing() {
	let controller = listed();
	let requests = controller.api().requests().len();

	let result = block_on(controller.create(&fields(&[("flavor", "lemon"), ("size", "medium"), ("rating", "high")])));

	assert!(matches!(result, Err(WorkflowError::InvalidField { field: "rating", .. })));
	assert_eq!(controller.api().requests().len(), requests);
	assert_eq!(controller.view().alerts().len(), 1);
}

#[test]
fn edit_opens_a_form_without_a_request() {
	let controller = listed();
	let requests = controller.api().requests().len();

	controller.edit(CupcakeId(2)).unwrap();

	let item = controller.view().item(CupcakeId(2)).unwrap();
	let form = item.edit_form.expect("edit form is shown");
	assert!(form.contains(r#"data-identifier="2""#));
	assert!(form.contains(r#"placeholder="chocolate""#));
	assert_eq!(controller.state(CupcakeId(2)), Some(ItemState::Editing));
	assert_eq!(controller.api().requests().len(), requests);
}

#[test]
fn edit_of_an_unlisted_cupcake() {
	let controller = listed();
	assert!(matches!(controller.edit(CupcakeId(9)), Err(WorkflowError::UnknownCupcake(CupcakeId(9)))));
	assert_eq!(controller.view().alerts(), ["Cupcake 9 is not in the list."]);
}

#[test]
fn update_sends_only_changed_fields() {
	let controller = listed();
	controller.edit(CupcakeId(1)).unwrap();
	controller
		.api()
		.reply(json!({"cupcake": cupcake(1, "cherry", "jumbo", 6.5, None)}));

	block_on(controller.update(CupcakeId(1), &fields(&[("flavor", ""), ("size", "jumbo"), ("rating", "6.5"), ("image", " ")]))).unwrap();

	assert_eq!(
		controller.api().requests().last(),
		Some(&Request::Update(CupcakeId(1), json!({"size": "jumbo", "rating": 6.5})))
	);
	let item = controller.view().item(CupcakeId(1)).unwrap();
	assert_eq!(item.edit_form, None);
	assert!(item.markup.contains("Size: jumbo"));
	assert!(item.markup.contains("Rating: 6.5"));
	assert_eq!(controller.state(CupcakeId(1)), Some(ItemState::Listed));
	assert_eq!(controller.view().ids(), [CupcakeId(1), CupcakeId(2)]);
}

#[test]
fn failed_update_keeps_the_form() {
	let controller = listed();
	controller.edit(CupcakeId(1)).unwrap();
	let before = controller.view().item(CupcakeId(1)).unwrap();
	controller.api().fail(ApiError::Status(cupcake_dom::error::ServerError {
		status: 404,
		title: Some("Not Found".to_owned()),
		message: None,
	}));

	let result = block_on(controller.update(CupcakeId(1), &fields(&[("size", "jumbo")])));

	assert!(result.is_err());
	assert_eq!(controller.view().item(CupcakeId(1)).unwrap(), before);
	assert_eq!(controller.state(CupcakeId(1)), Some(ItemState::Editing));
	assert_eq!(controller.view().alerts(), ["status: 404\nNot Found"]);
}

#[test]
fn failed_update_after_a_relist_leaves_the_item_listed() {
	let controller = Rc::new(listed());
	controller.edit(CupcakeId(1)).unwrap();
	let updated = controller.api().defer();
	controller
		.api()
		.reply(json!({"cupcakes": [cupcake(1, "cherry", "large", 5.0, None)]}));

	let mut pool = LocalPool::new();
	{
		let controller = Rc::clone(&controller);
		pool.spawner()
			.spawn_local(async move {
				let _ = controller.update(CupcakeId(1), &fields(&[("size", "jumbo")])).await;
			})
			.unwrap();
	}
	pool.run_until_stalled();
	assert_eq!(controller.state(CupcakeId(1)), Some(ItemState::SubmittingEdit));

	block_on(controller.list(None)).unwrap();
	updated.send(Err(ApiError::NoResponse)).unwrap();
	pool.run_until_stalled();

	assert_eq!(controller.state(CupcakeId(1)), Some(ItemState::Listed));
	assert_eq!(controller.view().item(CupcakeId(1)).unwrap().edit_form, None);
	assert_eq!(controller.view().alerts(), ["Did not receive a response from the server."]);
}

#[test]
fn empty_update_sends_nothing() {
	let controller = listed();
	controller.edit(CupcakeId(1)).unwrap();
	let requests = controller.api().requests().len();

	let result = block_on(controller.update(CupcakeId(1), &fields(&[("flavor", ""), ("size", "")])));

	assert!(matches!(result, Err(WorkflowError::EmptyUpdate)));
	assert_eq!(controller.api().requests().len(), requests);
	assert_eq!(controller.state(CupcakeId(1)), Some(ItemState::Editing));
	assert!(controller.view().item(CupcakeId(1)).unwrap().edit_form.is_some());
}

#[test]
fn cancel_restores_the_item() {
	let controller = listed();
	let before = controller.view().item(CupcakeId(2)).unwrap();
	controller.edit(CupcakeId(2)).unwrap();

	controller.cancel_edit(CupcakeId(2)).unwrap();

	assert_eq!(controller.view().item(CupcakeId(2)).unwrap(), before);
	assert_eq!(controller.state(CupcakeId(2)), Some(ItemState::Listed));
}

#[test]
fn delete_removes_only_that_item() {
	let controller = listed();
	let other = controller.view().item(CupcakeId(2)).unwrap();
	controller.api().reply(json!({"message": "deleted"}));

	block_on(controller.delete(CupcakeId(1))).unwrap();

	assert_eq!(controller.view().ids(), [CupcakeId(2)]);
	assert_eq!(controller.view().item(CupcakeId(2)).unwrap(), other);
	assert_eq!(controller.state(CupcakeId(1)), None);
	assert_eq!(controller.api().requests().last(), Some(&Request::Delete(CupcakeId(1))));
}

#[test]
fn failed_delete_leaves_the_item() {
	let controller = listed();
	let before = controller.view().items();
	controller.api().fail(ApiError::NoResponse);

	assert!(block_on(controller.delete(CupcakeId(1))).is_err());

	assert_eq!(controller.view().items(), before);
	assert_eq!(controller.cupcakes().len(), 2);
}

#[test]
fn refresh_rerenders_from_the_server() {
	let controller = listed();
	controller
		.api()
		.reply(json!({"cupcake": cupcake(2, "dark chocolate", "small", 9.0, None)}));

	block_on(controller.refresh(CupcakeId(2))).unwrap();

	assert!(markup(&controller, 2).contains("Flavor: dark chocolate"));
	assert_eq!(controller.api().requests().last(), Some(&Request::Get(CupcakeId(2))));
}

#[test]
fn editing_can_be_switched_off() {
	let config = Config {
		capabilities: Capabilities { edit_in_place: false },
		..Config::default()
	};
	let controller = CupcakeController::new(FakeApi::new(), HeadlessView::new(), &config);
	controller
		.api()
		.reply(json!({"cupcakes": [cupcake(1, "cherry", "large", 5.0, None)]}));
	block_on(controller.list(None)).unwrap();

	assert!(!markup(&controller, 1).contains(r#"data-action="edit""#));
	assert!(matches!(controller.edit(CupcakeId(1)), Err(WorkflowError::Unsupported(_))));
	assert!(controller.view().item(CupcakeId(1)).unwrap().edit_form.is_none());
}

#[test]
fn stale_list_response_is_discarded() {
	let controller = Rc::new(controller());
	let first = controller.api().defer();
	let second = controller.api().defer();

	let mut pool = LocalPool::new();
	let spawner = pool.spawner();
	for flavor in ["c", "ch"] {
		let controller = Rc::clone(&controller);
		spawner
			.spawn_local(async move {
				let _ = controller.search(flavor).await;
			})
			.unwrap();
	}
	pool.run_until_stalled();
	assert_eq!(controller.api().requests().len(), 2);

	second
		.send(Ok(json!({"cupcakes": [cupcake(2, "chocolate", "small", 9.0, None)]})))
		.unwrap();
	pool.run_until_stalled();
	first
		.send(Ok(json!({"cupcakes": [
			cupcake(1, "cherry", "large", 5.0, None),
			cupcake(2, "chocolate", "small", 9.0, None),
		]})))
		.unwrap();
	pool.run_until_stalled();

	assert_eq!(controller.view().ids(), [CupcakeId(2)]);
	assert!(controller.view().alerts().is_empty());
}

#[test]
fn delete_racing_a_list_leaves_the_new_list_alone() {
	let controller = Rc::new(listed());
	let deleted = controller.api().defer();
	controller
		.api()
		.reply(json!({"cupcakes": [cupcake(2, "chocolate", "small", 9.0, None)]}));

	let mut pool = LocalPool::new();
	let spawner = pool.spawner();
	{
		let controller = Rc::clone(&controller);
		spawner
			.spawn_local(async move {
				let _ = controller.delete(CupcakeId(1)).await;
			})
			.unwrap();
	}
	pool.run_until_stalled();
	block_on(controller.list(None)).unwrap();
	deleted.send(Ok(json!({"message": "Deleted"}))).unwrap();
	pool.run_until_stalled();

	assert_eq!(controller.view().ids(), [CupcakeId(2)]);
	assert_eq!(controller.api().pending_replies(), 0);
}
