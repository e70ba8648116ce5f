use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Theme colours tried, in order, when the config leaves the tint unset.
const TINT_LOOKUPS: &[&str] = &["accent_bg_color", "theme_selected_bg_color"];

pub fn theme_tint(widget: &impl IsA<gtk::Widget>) -> Option<Srgba<f64>> {
    let context = widget.as_ref().style_context();
    TINT_LOOKUPS
        .iter()
        .find_map(|name| lookup_color(&context, name))
}

fn lookup_color(context: &gtk::StyleContext, name: &str) -> Option<Srgba<f64>> {
    context.lookup_color(name).map(|c| {
        Srgba::new(
            c.red() as f64,
            c.green() as f64,
            c.blue() as f64,
            c.alpha() as f64,
        )
    })
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.knob-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
