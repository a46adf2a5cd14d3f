use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"404"</h1>
			<p>"This branch of the tree doesn't exist."</p>
			<a href="/">"Back to the tree"</a>
		</div>
	}
}
