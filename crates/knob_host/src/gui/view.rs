use cairo::{Context, LineCap};
use knob::{Boundary, Indicator, RenderState};
use palette::Srgba;
use std::f64::consts::TAU;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn draw_boundary(cr: &Context, boundary: &Boundary) -> Result<(), cairo::Error> {
    cr.new_path();
    cr.arc(
        boundary.center.x,
        boundary.center.y,
        boundary.radius,
        0.0,
        TAU,
    );
    set_source(cr, boundary.fill);
    cr.fill_preserve()?;
    set_source(cr, boundary.stroke);
    cr.set_line_width(boundary.line_width);
    cr.stroke()
}

fn draw_indicator(cr: &Context, indicator: &Indicator) -> Result<(), cairo::Error> {
    cr.new_path();
    cr.move_to(indicator.start.x, indicator.start.y);
    cr.line_to(indicator.end.x, indicator.end.y);
    set_source(cr, indicator.stroke);
    cr.set_line_width(indicator.line_width);
    cr.set_line_cap(LineCap::Round);
    cr.stroke()
}

pub fn draw(cr: &Context, state: &RenderState) -> Result<(), cairo::Error> {
    draw_boundary(cr, &state.boundary)?;
    draw_indicator(cr, &state.indicator)
}
