//! A browser-side cupcake list, kept in sync with a REST collection.
//!
//! [`CupcakeController`] owns the client-side [`CupcakeStore`] and drives the list, create, search, edit, update and delete
//! workflows against a [`CupcakeApi`], patching a [`ListView`] once each round trip succeeds.
//! On `wasm32`, [`dom`] binds all of this to a page.

#![doc(html_root_url = "https://docs.rs/cupcake-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub mod readme {}

pub mod action;
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod store;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use {
	action::{Action, ActionRegistry, Invocation},
	api::{CupcakeApi, Endpoints, HttpApi},
	config::{Capabilities, Config},
	controller::CupcakeController,
	error::{ApiError, WorkflowError},
	model::{Cupcake, CupcakeId, CupcakePatch, FormFields, NewCupcake},
	store::{CupcakeStore, ItemState},
	view::{HeadlessView, ListView},
};
