use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::domain::{
    chart::{ChartLayout, ChartLayoutService, Color, ReturnsChart},
    logging::{LogComponent, get_logger},
};

const BACKGROUND: &str = "#1a1a1a";
const TEXT: &str = "#e0e0e0";
const FONT: &str = "12px Arial";
const TITLE_FONT: &str = "16px Arial";

/// Canvas 2D renderer for the returns chart - Infrastructure implementation.
///
/// All geometry comes from [`ChartLayoutService`]; this type only issues
/// drawing calls.
pub struct CanvasRenderer {
    width: u32,
    height: u32,
    layout_service: ChartLayoutService,
}

impl CanvasRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layout_service: ChartLayoutService::new(),
        }
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn context(&self, canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
        canvas.set_width(self.width);
        canvas.set_height(self.height);

        canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2D context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))
    }

    fn clear(&self, context: &CanvasRenderingContext2d) {
        let (w, h) = (self.width as f64, self.height as f64);
        context.clear_rect(0.0, 0.0, w, h);
        context.set_fill_style(&JsValue::from(BACKGROUND));
        context.fill_rect(0.0, 0.0, w, h);
    }

    pub fn render_chart(&self, canvas: &HtmlCanvasElement, chart: &ReturnsChart) -> Result<(), JsValue> {
        let Some(layout) = self
            .layout_service
            .layout(chart, self.width as f64, self.height as f64)
        else {
            return self.render_message(canvas, "No data to plot");
        };

        let context = self.context(canvas)?;
        self.clear(&context);
        self.render_grid(&context, &layout)?;
        self.render_baseline(&context, &layout);
        for polyline in &layout.polylines {
            self.render_polyline(&context, polyline.color, &polyline.segments);
        }
        self.render_legend(&context, &layout)?;
        self.render_title(&context, &layout.title)?;

        get_logger().debug(
            LogComponent::Infrastructure("CanvasRenderer"),
            &format!("rendered {} series", layout.polylines.len()),
        );
        Ok(())
    }

    /// Blank chart with a centered message, used instead of an empty plot
    pub fn render_message(&self, canvas: &HtmlCanvasElement, text: &str) -> Result<(), JsValue> {
        let context = self.context(canvas)?;
        self.clear(&context);
        context.set_fill_style(&JsValue::from(TEXT));
        context.set_font(TITLE_FONT);
        context.set_text_align("center");
        context.fill_text(text, self.width as f64 / 2.0, self.height as f64 / 2.0)?;
        context.set_text_align("start");
        Ok(())
    }

    fn render_grid(&self, context: &CanvasRenderingContext2d, layout: &ChartLayout) -> Result<(), JsValue> {
        let vp = &layout.viewport;
        context.set_stroke_style(&JsValue::from(Color::GRID.to_css()));
        context.set_line_width(1.0);
        context.set_fill_style(&JsValue::from(TEXT));
        context.set_font(FONT);

        context.set_text_align("right");
        for tick in &layout.y_ticks {
            context.begin_path();
            context.move_to(vp.left, tick.position);
            context.line_to(vp.left + vp.width, tick.position);
            context.stroke();
            context.fill_text(&tick.label, vp.left - 6.0, tick.position + 4.0)?;
        }

        context.set_text_align("center");
        let axis_y = vp.top + vp.height;
        for tick in &layout.x_ticks {
            context.begin_path();
            context.move_to(tick.position, axis_y);
            context.line_to(tick.position, axis_y + 4.0);
            context.stroke();
            context.fill_text(&tick.label, tick.position, axis_y + 18.0)?;
        }
        context.set_text_align("start");
        Ok(())
    }

    fn render_baseline(&self, context: &CanvasRenderingContext2d, layout: &ChartLayout) {
        let Some(y) = layout.baseline_y else {
            return;
        };
        let vp = &layout.viewport;
        context.set_stroke_style(&JsValue::from(Color::BASELINE.to_css()));
        context.set_line_width(1.5);
        context.begin_path();
        context.move_to(vp.left, y);
        context.line_to(vp.left + vp.width, y);
        context.stroke();
    }

    fn render_polyline(&self, context: &CanvasRenderingContext2d, color: Color, segments: &[Vec<(f64, f64)>]) {
        let css = JsValue::from(color.to_css());
        context.set_stroke_style(&css);
        context.set_fill_style(&css);
        context.set_line_width(2.0);

        for segment in segments {
            match segment.as_slice() {
                [] => {}
                // an isolated point would be invisible as a path
                [(x, y)] => context.fill_rect(x - 1.5, y - 1.5, 3.0, 3.0),
                [(x0, y0), rest @ ..] => {
                    context.begin_path();
                    context.move_to(*x0, *y0);
                    for (x, y) in rest {
                        context.line_to(*x, *y);
                    }
                    context.stroke();
                }
            }
        }
    }

    fn render_legend(&self, context: &CanvasRenderingContext2d, layout: &ChartLayout) -> Result<(), JsValue> {
        let x = layout.viewport.left + layout.viewport.width + 12.0;
        context.set_font(FONT);

        for (i, entry) in layout.legend.iter().enumerate() {
            let y = layout.viewport.top + 8.0 + i as f64 * 18.0;
            context.set_fill_style(&JsValue::from(entry.color.to_css()));
            context.fill_rect(x, y - 8.0, 10.0, 10.0);
            context.set_fill_style(&JsValue::from(TEXT));
            let text = match entry.latest {
                Some(value) => format!("{} {:+.1}%", entry.label, value),
                None => entry.label.clone(),
            };
            context.fill_text(&text, x + 16.0, y + 1.0)?;
        }
        Ok(())
    }

    fn render_title(&self, context: &CanvasRenderingContext2d, title: &str) -> Result<(), JsValue> {
        context.set_fill_style(&JsValue::from(TEXT));
        context.set_font(TITLE_FONT);
        context.fill_text(title, 12.0, 24.0)
    }
}
