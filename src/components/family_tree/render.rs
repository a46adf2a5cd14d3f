use web_sys::CanvasRenderingContext2d;

use super::layout::Edge;
use super::state::FamilyTreeState;
use super::types::Gender;

const BACKGROUND: &str = "#f6f2ea";
const EDGE_STROKE: &str = "rgba(90, 82, 70, 0.55)";
const PARTNER_STROKE: &str = "rgba(170, 98, 87, 0.85)";
const CARD_STROKE: &str = "#5a5246";
const CURRENT_USER_RING: &str = "#d99a2b";
const TOOLTIP_FILL: &str = "rgba(42, 38, 32, 0.92)";

fn card_fill(gender: Gender) -> &'static str {
	match gender {
		Gender::Male => "#cfe0ef",
		Gender::Female => "#f2d9db",
		Gender::Other => "#e4e7d8",
	}
}

/// Draw one full frame: edges, then node cards, then the tooltip.
///
/// The pass runs under the view transform, so the zoom factor scales the
/// finished layout instead of feeding back into coordinate assignment.
/// The tooltip is drawn last in screen space.
pub fn render(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	for edge in &state.layout.edges {
		ctx.begin_path();
		match *edge {
			Edge::ParentChild { x1, y1, x2, y2 } => {
				ctx.set_stroke_style_str(EDGE_STROKE);
				ctx.set_line_width(1.5);
				// Elbow through the midpoint between the rows.
				let mid_y = (y1 + y2) / 2.0;
				ctx.move_to(x1, y1);
				ctx.line_to(x1, mid_y);
				ctx.line_to(x2, mid_y);
				ctx.line_to(x2, y2);
			}
			Edge::Partner { x1, x2, y, drop } => {
				ctx.set_stroke_style_str(PARTNER_STROKE);
				ctx.set_line_width(2.0);
				ctx.move_to(x1, y);
				ctx.line_to(x1, y + drop);
				ctx.line_to(x2, y + drop);
				ctx.line_to(x2, y);
			}
		}
		ctx.stroke();
	}
}

fn draw_nodes(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.config.node_width, state.config.node_height);
	ctx.set_text_align("center");

	for (idx, node) in state.layout.nodes.iter().enumerate() {
		let left = node.x - w / 2.0;
		let hovered = state.hover.node == Some(idx);

		ctx.set_fill_style_str(card_fill(node.person.gender));
		ctx.fill_rect(left, node.y, w, h);

		ctx.set_stroke_style_str(CARD_STROKE);
		ctx.set_line_width(if hovered { 2.5 } else { 1.0 });
		ctx.stroke_rect(left, node.y, w, h);

		if node.person.is_current_user {
			ctx.set_stroke_style_str(CURRENT_USER_RING);
			ctx.set_line_width(2.0);
			ctx.stroke_rect(left - 3.0, node.y - 3.0, w + 6.0, h + 6.0);
		}

		ctx.set_fill_style_str("#2a2620");
		ctx.set_font("13px sans-serif");
		let _ = ctx.fill_text(&fit_text(&node.person.display_name(), 20), node.x, node.y + 22.0);

		let lifespan = node.person.lifespan();
		if !lifespan.is_empty() {
			ctx.set_fill_style_str("rgba(42, 38, 32, 0.65)");
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(&lifespan, node.x, node.y + 40.0);
		}
	}

	ctx.set_text_align("start");
}

fn draw_tooltip(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	let Some(tooltip) = &state.hover.tooltip else {
		return;
	};

	const LINE_HEIGHT: f64 = 16.0;
	const PADDING: f64 = 8.0;
	// No TextMetrics binding; a character estimate is plenty for a tooltip.
	let longest = tooltip.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
	let box_width = longest as f64 * 6.5 + PADDING * 2.0;
	let box_height = tooltip.lines.len() as f64 * LINE_HEIGHT + PADDING * 2.0;

	let x = (tooltip.x - box_width / 2.0).clamp(4.0, (state.width - box_width - 4.0).max(4.0));
	let y = (tooltip.y - box_height - 8.0).max(4.0);

	ctx.set_fill_style_str(TOOLTIP_FILL);
	ctx.fill_rect(x, y, box_width, box_height);

	ctx.set_fill_style_str("#f6f2ea");
	ctx.set_font("12px sans-serif");
	for (i, line) in tooltip.lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + PADDING, y + PADDING + (i as f64 + 0.75) * LINE_HEIGHT);
	}
}

fn fit_text(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		text.to_string()
	} else {
		let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
		format!("{cut}\u{2026}")
	}
}
