use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use serde_json::json;

use crate::components::family_tree::{FamilyTreeCanvas, PersonNode, normalize};
use crate::services::{MemberService, StaticRoutes};

const TREE_ID: &str = "1";
const CURRENT_USER_ID: &str = "5";

/// Sample tree shown until the server responds (and kept when it can't).
/// Field styles are deliberately mixed the way the API mixes them.
fn sample_tree() -> PersonNode {
	let raw = json!({
		"id": 1,
		"name": "Margaret Reed",
		"attributes": { "gender": "female", "date_of_birth": "1948-03-02", "relationship": "Grandmother" },
		"partners": [
			{ "id": 2, "firstName": "Harold", "lastName": "Reed",
			  "dateOfBirth": "1945-11-17", "dateOfDeath": "2019-06-30", "gender": "male",
			  "relationshipToUser": "Grandfather" }
		],
		"children": [
			{
				"id": 3, "name": "Susan Park",
				"attributes": { "gender": "female", "date_of_birth": "1972-07-21", "relationship": "Mother" },
				"partners": [
					{ "id": 4, "name": "David Park",
					  "attributes": { "gender": "male", "date_of_birth": "1970-01-09", "relationship": "Father" } }
				],
				"children": [
					{ "id": 5, "name": "Emma Park",
					  "attributes": { "gender": "female", "date_of_birth": "1999-04-14" } },
					{ "id": 6, "name": "Noah Park",
					  "attributes": { "gender": "male", "date_of_birth": "2003-09-02", "relationship": "Brother" } }
				]
			},
			{
				"id": 7, "name": "Thomas Reed",
				"attributes": { "gender": "male", "date_of_birth": "1975-12-05", "relationship": "Uncle" },
				"children": [
					{ "id": 8, "name": "Liam Reed",
					  "attributes": { "gender": "male", "date_of_birth": "2005-02-27", "relationship": "Cousin" } }
				]
			}
		]
	});
	normalize(&raw, CURRENT_USER_ID)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (tree, set_tree) = signal(sample_tree());
	let (notice, set_notice) = signal(Option::<String>::None);
	let (selected, set_selected) = signal(Option::<PersonNode>::None);

	// Try the backend once on mount; dev builds run without a server, so
	// a failed fetch keeps the sample data and shows a notice instead.
	Effect::new(move |_| {
		spawn_local(async move {
			let service = MemberService::new("/api", StaticRoutes::new());
			match service.tree(TREE_ID).await {
				Ok(raw) => set_tree.set(normalize(&raw, CURRENT_USER_ID)),
				Err(err) => {
					warn!("tree fetch failed, keeping sample data: {err}");
					set_notice.set(Some("Showing sample data (server unreachable).".into()));
				}
			}
		});
	});

	let on_node_click = Callback::new(move |person: PersonNode| {
		info!("selected {}", person.display_name());
		set_selected.set(Some(person));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-tree">
				<FamilyTreeCanvas data=tree fullscreen=true on_node_click=on_node_click />
				<div class="tree-overlay">
					<h1>"Family Tree"</h1>
					<p class="subtitle">
						"Hover a card for details. Click to select. Scroll or use the buttons to zoom. Drag the background to pan."
					</p>
					{move || notice.get().map(|text| view! { <p class="notice">{text}</p> })}
				</div>
				{move || {
					selected
						.get()
						.map(|person| {
							view! {
								<div class="member-card">
									<h2>{person.display_name()}</h2>
									<p class="lifespan">{person.lifespan()}</p>
									<p class="relationship">{person.relationship_to_user.clone()}</p>
									<button on:click=move |_| set_selected.set(None)>"Close"</button>
								</div>
							}
						})
				}}
			</div>
		</ErrorBoundary>
	}
}
