use crate::error::KnobError;
use crate::geometry::{Point, Rect};
use crate::render::RenderState;
use crate::theme::KnobStyle;
use crate::tracker::AngleTracker;
use async_channel::{Receiver, Sender, TrySendError};
use palette::Srgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobEvent {
    /// The value moved during a drag. Read it back from the control.
    ValueChanged,
}

/// Property and event contract shared by value controls.
pub trait Control {
    fn value(&self) -> f64;
    fn set_value(&mut self, value: f64) -> Result<(), KnobError>;
    fn is_enabled(&self) -> bool;
    fn subscribe(&mut self) -> Receiver<KnobEvent>;
}

/// A rotary control selecting a value in `[0, 2π)`.
///
/// The value is 0 at 12 o'clock and grows clockwise. Dragging around the
/// centre of `bounds` rotates it; every drag step emits
/// [`KnobEvent::ValueChanged`] to subscribers. Programmatic writes through
/// [`Knob::set_value`] stay silent.
#[derive(Debug)]
pub struct Knob {
    tracker: AngleTracker,
    bounds: Rect,
    enabled: bool,
    tracking: bool,
    style: KnobStyle,
    visuals: RenderState,
    subscribers: Vec<Sender<KnobEvent>>,
}

impl Knob {
    pub fn new(bounds: Rect) -> Self {
        Self::build(bounds, KnobStyle::default())
    }

    pub fn with_style(bounds: Rect, style: KnobStyle) -> Result<Self, KnobError> {
        KnobStyle::validate_line_width(style.line_width)?;
        Ok(Self::build(bounds, style))
    }

    fn build(bounds: Rect, style: KnobStyle) -> Self {
        let tracker = AngleTracker::new();
        let visuals = RenderState::compute(&bounds, tracker.angle(), true, &style);
        Self {
            tracker,
            bounds,
            enabled: true,
            tracking: false,
            style,
            visuals,
            subscribers: Vec::new(),
        }
    }

    pub fn value(&self) -> f64 {
        self.tracker.value()
    }

    pub fn set_value(&mut self, value: f64) -> Result<(), KnobError> {
        self.tracker.set_value(value)?;
        self.recompute_visuals();
        Ok(())
    }

    pub fn angle(&self) -> f64 {
        self.tracker.angle()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.recompute_visuals();
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.end_tracking();
        }
        self.recompute_visuals();
    }

    pub fn style(&self) -> &KnobStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: KnobStyle) -> Result<(), KnobError> {
        KnobStyle::validate_line_width(style.line_width)?;
        self.style = style;
        self.recompute_visuals();
        Ok(())
    }

    pub fn background_color(&self) -> Option<Srgba<f64>> {
        self.style.background
    }

    pub fn set_background_color(&mut self, color: Option<Srgba<f64>>) {
        self.style.background = color;
        self.recompute_visuals();
    }

    pub fn tint_color(&self) -> Srgba<f64> {
        self.style.tint
    }

    pub fn set_tint_color(&mut self, color: Srgba<f64>) {
        self.style.tint = color;
        self.recompute_visuals();
    }

    pub fn line_width(&self) -> f64 {
        self.style.line_width
    }

    pub fn set_line_width(&mut self, width: f64) -> Result<(), KnobError> {
        self.style.line_width = KnobStyle::validate_line_width(width)?;
        self.recompute_visuals();
        Ok(())
    }

    pub fn render_state(&self) -> &RenderState {
        &self.visuals
    }

    pub fn recompute_visuals(&mut self) {
        self.visuals =
            RenderState::compute(&self.bounds, self.tracker.angle(), self.enabled, &self.style);
    }

    pub fn subscribe(&mut self) -> Receiver<KnobEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Starts a drag at `pointer`. Returns `false` when the knob is disabled.
    pub fn begin_tracking(&mut self, pointer: Point) -> bool {
        if !self.enabled {
            log::debug!("Knob disabled, ignoring gesture at {:?}", pointer);
            return false;
        }
        self.tracker.begin_gesture(pointer, self.center());
        self.tracking = true;
        true
    }

    /// Feeds one drag sample. Returns `false` when no drag is in progress.
    pub fn continue_tracking(&mut self, pointer: Point) -> bool {
        if !self.tracking {
            return false;
        }
        let rotation = self.tracker.continue_gesture(pointer, self.center());
        log::trace!("Knob rotated by {:.4} to {:.4}", rotation.delta, rotation.value);
        self.recompute_visuals();
        self.notify();
        true
    }

    pub fn end_tracking(&mut self) {
        self.tracking = false;
        self.tracker.end_gesture();
    }

    fn notify(&mut self) {
        self.subscribers.retain(|tx| {
            !matches!(
                tx.try_send(KnobEvent::ValueChanged),
                Err(TrySendError::Closed(_))
            )
        });
    }
}

impl Control for Knob {
    fn value(&self) -> f64 {
        Knob::value(self)
    }

    fn set_value(&mut self, value: f64) -> Result<(), KnobError> {
        Knob::set_value(self, value)
    }

    fn is_enabled(&self) -> bool {
        Knob::is_enabled(self)
    }

    fn subscribe(&mut self) -> Receiver<KnobEvent> {
        Knob::subscribe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angular_distance;
    use crate::theme::disabled_color;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn knob() -> Knob {
        Knob::new(Rect::from_size(100.0, 100.0))
    }

    fn drain(rx: &Receiver<KnobEvent>) -> usize {
        std::iter::from_fn(|| rx.try_recv().ok()).count()
    }

    #[test]
    fn test_drag_step_emits_one_notification() {
        let mut knob = knob();
        let rx = knob.subscribe();

        assert!(knob.begin_tracking(Point::new(50.0, 0.0)));
        assert_eq!(drain(&rx), 0);

        assert!(knob.continue_tracking(Point::new(100.0, 50.0)));
        assert_eq!(rx.try_recv(), Ok(KnobEvent::ValueChanged));
        assert_eq!(drain(&rx), 0);

        // quarter turn clockwise from 12 o'clock
        assert!((knob.value() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_set_value_is_silent_and_moves_indicator() {
        let mut knob = knob();
        let rx = knob.subscribe();
        let before = knob.render_state().indicator;

        knob.set_value(FRAC_PI_2).unwrap();

        assert_eq!(drain(&rx), 0);
        let after = knob.render_state().indicator;
        assert_ne!(before.start, after.start);
        // 3 o'clock
        assert!((after.start.x - 99.0).abs() < EPS);
        assert!((after.start.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_set_value_rejects_nan() {
        let mut knob = knob();
        knob.set_value(1.0).unwrap();
        assert_eq!(
            knob.set_value(f64::NEG_INFINITY),
            Err(KnobError::NonFiniteValue(f64::NEG_INFINITY))
        );
        assert!((knob.value() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_disabled_knob_refuses_tracking() {
        let mut knob = knob();
        let rx = knob.subscribe();
        knob.set_enabled(false);

        assert!(!knob.begin_tracking(Point::new(50.0, 0.0)));
        assert!(!knob.continue_tracking(Point::new(100.0, 50.0)));
        assert_eq!(drain(&rx), 0);
        assert_eq!(knob.value(), 0.0);
    }

    #[test]
    fn test_disabling_mid_drag_ends_gesture() {
        let mut knob = knob();
        knob.begin_tracking(Point::new(50.0, 0.0));
        knob.set_enabled(false);
        assert!(!knob.is_tracking());
        knob.set_enabled(true);
        assert!(!knob.continue_tracking(Point::new(0.0, 50.0)));
    }

    #[test]
    fn test_continue_without_begin_is_ignored() {
        let mut knob = knob();
        let rx = knob.subscribe();
        assert!(!knob.continue_tracking(Point::new(10.0, 10.0)));
        assert_eq!(drain(&rx), 0);
    }

    #[test]
    fn test_drag_through_centre_still_notifies() {
        let mut knob = knob();
        let rx = knob.subscribe();
        knob.begin_tracking(Point::new(50.0, 50.0));
        assert!(knob.continue_tracking(Point::new(50.0, 50.0)));
        assert!(knob.continue_tracking(Point::new(50.0, 0.0)));
        assert_eq!(drain(&rx), 2);
        assert_eq!(knob.value(), 0.0);
    }

    #[test]
    fn test_end_tracking_stops_updates() {
        let mut knob = knob();
        knob.begin_tracking(Point::new(50.0, 0.0));
        knob.end_tracking();
        assert!(!knob.continue_tracking(Point::new(100.0, 50.0)));
        assert_eq!(knob.value(), 0.0);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut knob = knob();
        let kept = knob.subscribe();
        drop(knob.subscribe());

        knob.begin_tracking(Point::new(50.0, 0.0));
        knob.continue_tracking(Point::new(60.0, 0.0));

        assert_eq!(knob.subscribers.len(), 1);
        assert_eq!(drain(&kept), 1);
    }

    #[test]
    fn test_bounds_change_moves_centre() {
        let mut knob = knob();
        knob.set_bounds(Rect::new(100.0, 0.0, 200.0, 100.0));
        assert_eq!(knob.center(), Point::new(200.0, 50.0));
        assert_eq!(knob.render_state().boundary.center, Point::new(200.0, 50.0));

        knob.begin_tracking(Point::new(200.0, 0.0));
        knob.continue_tracking(Point::new(150.0, 50.0));
        // quarter turn counterclockwise lands on 9 o'clock
        assert!(angular_distance(knob.value(), 3.0 * FRAC_PI_2) < EPS);
    }

    #[test]
    fn test_colour_setters_recompute_visuals() {
        let mut knob = knob();
        let red = Srgba::new(1.0, 0.0, 0.0, 1.0);
        knob.set_tint_color(red);
        knob.set_background_color(Some(Srgba::new(0.2, 0.2, 0.2, 1.0)));
        assert_eq!(knob.render_state().boundary.stroke, red);
        assert_eq!(knob.background_color(), Some(Srgba::new(0.2, 0.2, 0.2, 1.0)));

        knob.set_enabled(false);
        assert_eq!(knob.render_state().indicator.stroke, disabled_color(red));
    }

    #[test]
    fn test_line_width_setter_validates() {
        let mut knob = knob();
        assert!(knob.set_line_width(4.0).is_ok());
        assert!((knob.render_state().boundary.radius - 48.0).abs() < EPS);
        assert_eq!(
            knob.set_line_width(-2.0),
            Err(KnobError::InvalidLineWidth(-2.0))
        );
        assert_eq!(knob.line_width(), 4.0);
    }

    #[test]
    fn test_with_style_validates_line_width() {
        let bounds = Rect::from_size(100.0, 100.0);
        for width in [f64::NAN, f64::INFINITY, -1.0] {
            let style = KnobStyle {
                line_width: width,
                ..KnobStyle::default()
            };
            assert!(matches!(
                Knob::with_style(bounds, style),
                Err(KnobError::InvalidLineWidth(_))
            ));
        }

        let style = KnobStyle {
            line_width: 2.0,
            ..KnobStyle::default()
        };
        let knob = Knob::with_style(bounds, style).unwrap();
        assert!((knob.render_state().boundary.radius - 49.0).abs() < EPS);
    }

    #[test]
    fn test_control_trait_object() {
        let mut knob = knob();
        let control: &mut dyn Control = &mut knob;
        control.set_value(2.0).unwrap();
        assert!((control.value() - 2.0).abs() < EPS);
        assert!(control.is_enabled());
    }
}
