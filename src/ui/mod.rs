pub mod compositor;
pub mod overlay;

use chrono::Local;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::{
    app::state::AppState,
    sim::{draw::DrawList, math::Viewport},
    ui::compositor::{Framebuffer, PIXEL_SCALE, paint_layers, paint_shapes},
};

/// Logical simulation space for a terminal of `cols` x `rows` cells.
#[must_use]
pub fn logical_viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(
        f32::from(cols) * PIXEL_SCALE,
        f32::from(rows) * PIXEL_SCALE * 2.0,
    )
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let fb = compose_frame(state, area.width, area.height);
    frame.render_widget(FramebufferWidget(&fb), area);
    overlay::render(frame, area, state, Local::now());
}

/// Rasterizes the slideshow and weather layer for a `cols` x `rows` area.
#[must_use]
pub fn compose_frame(state: &AppState, cols: u16, rows: u16) -> Framebuffer {
    let mut fb = Framebuffer::for_cells(cols, rows);
    let viewport = fb.viewport();
    let show = &state.slideshow;
    let from = show.from_image().and_then(|idx| state.store.peek(idx));
    let to = show.to_image().and_then(|idx| state.store.peek(idx));
    let layers = show.layers(state.settings.fit, viewport);
    paint_layers(
        &mut fb,
        &layers,
        from.as_deref(),
        to.as_deref(),
        state.settings.backdrop,
    );

    let mut list = DrawList::new();
    state.weather_layer.draw(&mut list);
    paint_shapes(&mut fb, &list);
    fb
}

/// Upper half block per cell: foreground is the top pixel, background the
/// bottom one.
pub struct FramebufferWidget<'a>(pub &'a Framebuffer);

impl Widget for FramebufferWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fb = self.0;
        for row in 0..area.height.min(fb.height() / 2) {
            for col in 0..area.width.min(fb.width()) {
                let top = fb.get(col, row * 2);
                let bottom = fb.get(col, row * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀")
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}
