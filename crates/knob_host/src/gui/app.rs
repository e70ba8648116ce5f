use crate::config::{self, Config};
use crate::events::{self, AppEvent};
use crate::gui::{theme, view};
use gtk::prelude::*;
use gtk4 as gtk;
use knob::{Knob, KnobEvent, Point, Rect};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub knob: Rc<RefCell<Knob>>,
    pub changes: async_channel::Receiver<KnobEvent>,
    pub config: Config,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(f64, f64),
    DragBegin(Point),
    DragUpdate(Point),
    DragEnd,
    SetValue(f64),
    SetEnabled(bool),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetValue(v) => AppMsg::SetValue(v),
            AppEvent::SetEnabled(e) => AppMsg::SetEnabled(e),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn apply_initial_config(&self) {
        let theme_tint = theme::theme_tint(&self.drawing_area);
        let result = self
            .config
            .knob
            .apply_initial(&mut self.knob.borrow_mut(), theme_tint);
        if let Err(e) = result {
            log::error!("Invalid knob configuration: {}", e);
        }
        self.drawing_area.queue_draw();
    }

    fn apply_reloaded_style(&self) {
        let theme_tint = theme::theme_tint(&self.drawing_area);
        let result = self
            .config
            .knob
            .apply_style(&mut self.knob.borrow_mut(), theme_tint);
        if let Err(e) = result {
            log::error!("Invalid knob style: {}", e);
        }
        self.drawing_area.queue_draw();
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Knob"),
            set_default_width: model.config.window.width,
            set_default_height: model.config.window.height,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "knob-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width as f64, height as f64));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::DragBegin(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::DragUpdate(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragEnd);
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let bounds = Rect::from_size(config.window.width as f64, config.window.height as f64);
        let knob = Rc::new(RefCell::new(Knob::new(bounds)));
        let changes = knob.borrow_mut().subscribe();

        let model = AppModel {
            knob,
            changes,
            config,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.apply_initial_config();

        let knob_draw = model.knob.clone();
        widgets.drawing_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = view::draw(cr, knob_draw.borrow().render_state()) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_events = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_events.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Resize(width, height) => {
                self.knob
                    .borrow_mut()
                    .set_bounds(Rect::from_size(width, height));
                self.drawing_area.queue_draw();
            }
            AppMsg::DragBegin(point) => {
                self.knob.borrow_mut().begin_tracking(point);
            }
            AppMsg::DragUpdate(point) => {
                let tracking = self.knob.borrow_mut().continue_tracking(point);
                if tracking {
                    events::log_changes(&self.changes, &self.knob.borrow());
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragEnd => {
                self.knob.borrow_mut().end_tracking();
            }
            AppMsg::SetValue(value) => {
                let result = self.knob.borrow_mut().set_value(value);
                match result {
                    Ok(()) => self.drawing_area.queue_draw(),
                    Err(e) => log::error!("Failed to set value: {}", e),
                }
            }
            AppMsg::SetEnabled(enabled) => {
                self.knob.borrow_mut().set_enabled(enabled);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.config = new_config;
                    self.apply_reloaded_style();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => {
                relm4::main_application().quit();
            }
        }
    }
}
