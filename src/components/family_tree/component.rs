use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CLICK_SLOP, FamilyTreeState};
use super::types::PersonNode;

fn draw(canvas: &HtmlCanvasElement, state: &FamilyTreeState) {
	let Ok(Some(ctx)) = canvas.get_context("2d") else {
		return;
	};
	let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
		return;
	};
	render::render(state, &ctx);
}

fn mouse_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Canvas widget rendering a normalized family tree.
///
/// A new `data` value replaces the whole tree; hover shows a tooltip,
/// clicking a node invokes `on_node_click` with that node's data, the
/// wheel and the overlay buttons zoom, dragging the background pans.
#[component]
pub fn FamilyTreeCanvas(
	#[prop(into)] data: Signal<PersonNode>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_node_click: Option<Callback<PersonNode>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<FamilyTreeState>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, resize_cb_init) = (state.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// Tracks `data`: a new tree rebuilds the state wholesale.
		*state_init.borrow_mut() = Some(FamilyTreeState::new(data.get(), w, h));
		if let Some(ref s) = *state_init.borrow() {
			draw(&canvas, s);
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
				if let Some(ref s) = *state_resize.borrow() {
					draw(&canvas_resize, s);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = mouse_position(&canvas, &ev);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.press.node = Some(idx);
				s.press.start_x = x;
				s.press.start_y = y;
				s.press.moved = false;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = mouse_position(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
				s.set_hover(None);
			} else {
				if s.press.node.is_some()
					&& ((x - s.press.start_x).abs() > CLICK_SLOP
						|| (y - s.press.start_y).abs() > CLICK_SLOP)
				{
					s.press.moved = true;
				}
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
			draw(&canvas, s);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = mouse_position(&canvas, &ev);

		let mut clicked = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some(idx) = s.press.node {
				if !s.press.moved && s.node_at_position(x, y) == Some(idx) {
					clicked = s.person_at(idx);
				}
			}
			s.press = Default::default();
			s.pan.active = false;
			draw(&canvas, s);
		}
		// Run the callback outside the borrow; it may update signals that
		// feed back into this component.
		if let (Some(person), Some(callback)) = (clicked, on_node_click) {
			callback.run(person);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.press = Default::default();
			s.pan.active = false;
			s.set_hover(None);
			draw(&canvas, s);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = mouse_position(&canvas, &ev);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_by(factor, x, y);
			draw(&canvas, s);
		}
	};

	let state_zi = state.clone();
	let on_zoom_in = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			let k = s.zoom();
			s.set_zoom(k * 1.2);
			draw(&canvas, s);
		}
	};

	let state_zo = state.clone();
	let on_zoom_out = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			let k = s.zoom();
			s.set_zoom(k / 1.2);
			draw(&canvas, s);
		}
	};

	view! {
		<div class="family-tree-wrap">
			<canvas
				node_ref=canvas_ref
				class="family-tree-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: default;"
			/>
			<div class="tree-zoom-controls">
				<button title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button title="Zoom out" on:click=on_zoom_out>"\u{2212}"</button>
			</div>
		</div>
	}
}
