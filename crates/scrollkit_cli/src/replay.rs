//! Headless replay
//!
//! Runs a [`Script`] against a real [`ScrollbarWidget`] wired to a
//! [`Scrollable`] model, a recording surface and a host that applies wheel
//! input. Committed positions are fed back into the scrollbar after every
//! step, the way a host relayout would.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

use scrollkit_core::{Buttons, NoopCapture, PointerEvent, Rect, WheelEvent};
use scrollkit_timer::{lock_timers, TimerScheduler};
use scrollkit_widgets::{
    ArrowSide, Axis, NewScrollPosition, ScrollDimensions, ScrollModel, Scrollable,
    ScrollbarContext, ScrollbarHost, ScrollbarOptions, ScrollbarPart, ScrollbarSurface,
    ScrollbarWidget,
};

use crate::script::{PartSpec, Script, Step, SurfaceSpec};

const SCROLLBAR_ELEMENT: u64 = 1;
const SLIDER_ELEMENT: u64 = 2;
const CONTENT_ELEMENT: u64 = 3;

/// Something observable that happened during a replay.
///
/// `step` is `None` for output produced while setting up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    Scroll {
        step: Option<usize>,
        position: f32,
    },
    ClassName {
        step: Option<usize>,
        class_name: String,
    },
    DragStart {
        step: Option<usize>,
    },
    DragEnd {
        step: Option<usize>,
    },
    Wheel {
        step: Option<usize>,
        delta_x: f32,
        delta_y: f32,
    },
}

impl fmt::Display for ReplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |step: &Option<usize>| match step {
            Some(step) => format!("step {step}"),
            None => "setup".to_string(),
        };
        match self {
            ReplayEvent::Scroll { step, position } => {
                write!(f, "[{}] scroll {}", label(step), position)
            }
            ReplayEvent::ClassName { step, class_name } => {
                write!(f, "[{}] class \"{}\"", label(step), class_name)
            }
            ReplayEvent::DragStart { step } => write!(f, "[{}] drag start", label(step)),
            ReplayEvent::DragEnd { step } => write!(f, "[{}] drag end", label(step)),
            ReplayEvent::Wheel {
                step,
                delta_x,
                delta_y,
            } => write!(f, "[{}] wheel {} {}", label(step), delta_x, delta_y),
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Collects replay events, tagged with the running step
#[derive(Default)]
struct Recorder {
    step: Cell<Option<usize>>,
    events: RefCell<Vec<ReplayEvent>>,
}

impl Recorder {
    fn step(&self) -> Option<usize> {
        self.step.get()
    }

    fn push(&self, event: ReplayEvent) {
        tracing::debug!("{}", event);
        self.events.borrow_mut().push(event);
    }

    fn take(&self) -> Vec<ReplayEvent> {
        self.events.take()
    }
}

// ============================================================================
// Headless collaborators
// ============================================================================

struct HeadlessSurface {
    rect: Rect,
    recorder: Rc<Recorder>,
}

impl ScrollbarSurface for HeadlessSurface {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(self.rect)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        tracing::trace!("attribute {}={}", name, value);
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.recorder.push(ReplayEvent::ClassName {
            step: self.recorder.step(),
            class_name: class_name.to_string(),
        });
    }

    fn set_track_size(&mut self, width: f32, height: f32) {
        self.rect.width = width;
        self.rect.height = height;
    }

    fn set_slider_rect(&mut self, rect: Rect) {
        tracing::trace!("slider {:?}", rect);
    }

    fn toggle_slider_class(&mut self, class_name: &str, enabled: bool) {
        tracing::trace!("slider class {} = {}", class_name, enabled);
    }

    fn set_arrow_rect(&mut self, side: ArrowSide, rect: Rect) {
        tracing::trace!("arrow {:?} {:?}", side, rect);
    }
}

/// Applies wheel input to the model, like a scrollable element would
struct ReplayHost {
    recorder: Rc<Recorder>,
    model: Arc<Mutex<Scrollable>>,
    axis: Axis,
    wheel_step: f32,
}

impl ScrollbarHost for ReplayHost {
    fn on_mouse_wheel(&mut self, event: WheelEvent) {
        self.recorder.push(ReplayEvent::Wheel {
            step: self.recorder.step(),
            delta_x: event.delta_x,
            delta_y: event.delta_y,
        });

        let mut model = lock(&self.model);
        let (current, delta) = match self.axis {
            Axis::Horizontal => (model.scroll_left(), event.delta_x),
            Axis::Vertical => (model.scroll_top(), event.delta_y),
        };
        let mut position = NewScrollPosition::default();
        self.axis
            .write_scroll_position(&mut position, current - delta * self.wheel_step);
        model.set_scroll_position_now(position);
    }

    fn on_drag_start(&mut self) {
        self.recorder.push(ReplayEvent::DragStart {
            step: self.recorder.step(),
        });
    }

    fn on_drag_end(&mut self) {
        self.recorder.push(ReplayEvent::DragEnd {
            step: self.recorder.step(),
        });
    }
}

fn dimensions(axis: Axis, surface: &SurfaceSpec) -> ScrollDimensions {
    match axis {
        Axis::Horizontal => {
            ScrollDimensions::new(surface.visible_size, 0.0, surface.scroll_size, 0.0)
        }
        Axis::Vertical => {
            ScrollDimensions::new(0.0, surface.visible_size, 0.0, surface.scroll_size)
        }
    }
}

// ============================================================================
// Replay
// ============================================================================

/// A scrollbar under scripted input
pub struct Replay {
    widget: ScrollbarWidget,
    model: Arc<Mutex<Scrollable>>,
    recorder: Rc<Recorder>,
    surface: SurfaceSpec,
    axis: Axis,
    now: Instant,
}

impl Replay {
    pub fn new(options: ScrollbarOptions, surface: SurfaceSpec) -> Self {
        let axis = options.axis;
        let timers = TimerScheduler::shared();
        let now = lock_timers(&timers).now();
        let model = Arc::new(Mutex::new(Scrollable::new(dimensions(axis, &surface))));
        let recorder = Rc::new(Recorder::default());

        let mut widget = ScrollbarWidget::new(
            options,
            ScrollbarContext {
                element_id: SCROLLBAR_ELEMENT,
                host: Box::new(ReplayHost {
                    recorder: recorder.clone(),
                    model: model.clone(),
                    axis,
                    wheel_step: surface.wheel_step,
                }),
                model: model.clone(),
                capture: Box::new(NoopCapture),
                timers,
            },
        );

        widget.attach(Box::new(HeadlessSurface {
            rect: Rect::new(surface.x, surface.y, 0.0, 0.0),
            recorder: recorder.clone(),
        }));
        widget.update_scrollbar_size(surface.scrollbar_size);
        widget.on_element_size(surface.visible_size);
        widget.on_element_scroll_size(surface.scroll_size);

        Self {
            widget,
            model,
            recorder,
            surface,
            axis,
            now,
        }
    }

    pub fn widget(&self) -> &ScrollbarWidget {
        &self.widget
    }

    /// Position of the model along the scrollbar axis
    pub fn position(&self) -> f32 {
        let model = lock(&self.model);
        match self.axis {
            Axis::Horizontal => model.scroll_left(),
            Axis::Vertical => model.scroll_top(),
        }
    }

    /// Run every step of `script`, returning everything observed
    pub fn run(&mut self, script: &Script) -> Result<Vec<ReplayEvent>> {
        for (index, step) in script.steps.iter().enumerate() {
            self.recorder.step.set(Some(index));
            self.apply(step)
                .with_context(|| format!("Step {} ({:?}) failed", index, step))?;

            // Zero-delay timers fire before the next input
            self.widget.tick(self.now);
            self.sync_model();
        }
        Ok(self.recorder.take())
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        match *step {
            Step::Down {
                part,
                x,
                y,
                buttons,
            } => self.pointer_down(part, x, y, buttons)?,
            Step::Move { x, y, buttons } => {
                self.widget
                    .on_pointer_move(&PointerEvent::new(SLIDER_ELEMENT, x, y, buttons));
            }
            Step::Up { x, y } => {
                self.widget
                    .on_pointer_up(&PointerEvent::new(SLIDER_ELEMENT, x, y, Buttons::NONE));
            }
            Step::Hover { inside } => {
                if inside {
                    self.widget.begin_reveal();
                } else {
                    self.widget.begin_hide();
                }
            }
            Step::Wait { ms } => {
                self.now += Duration::from_millis(ms);
            }
            Step::Resize {
                visible_size,
                scroll_size,
                scrollbar_size,
            } => self.resize(visible_size, scroll_size, scrollbar_size),
            Step::Scroll { position } => {
                let mut new_position = NewScrollPosition::default();
                self.axis.write_scroll_position(&mut new_position, position);
                lock(&self.model).set_scroll_position_now(new_position);
            }
        }
        Ok(())
    }

    fn pointer_down(&mut self, part: PartSpec, x: f32, y: f32, buttons: Buttons) -> Result<()> {
        let (part, event) = match part {
            PartSpec::Delegate => {
                let event = PointerEvent::new(CONTENT_ELEMENT, x, y, buttons).with_time(self.now);
                self.widget.delegate_pointer_down(&event)?;
                return Ok(());
            }
            PartSpec::Track => (
                ScrollbarPart::Track,
                PointerEvent::new(SCROLLBAR_ELEMENT, x, y, buttons)
                    .with_offset(x - self.surface.x, y - self.surface.y),
            ),
            PartSpec::Slider => (
                ScrollbarPart::Slider,
                PointerEvent::new(SLIDER_ELEMENT, x, y, buttons),
            ),
            PartSpec::StartArrow => (
                ScrollbarPart::Arrow(ArrowSide::Start),
                PointerEvent::new(SCROLLBAR_ELEMENT, x, y, buttons),
            ),
            PartSpec::EndArrow => (
                ScrollbarPart::Arrow(ArrowSide::End),
                PointerEvent::new(SCROLLBAR_ELEMENT, x, y, buttons),
            ),
        };
        self.widget.on_pointer_down(part, &event.with_time(self.now))?;
        Ok(())
    }

    fn resize(
        &mut self,
        visible_size: Option<f32>,
        scroll_size: Option<f32>,
        scrollbar_size: Option<f32>,
    ) {
        if let Some(visible_size) = visible_size {
            self.surface.visible_size = visible_size;
        }
        if let Some(scroll_size) = scroll_size {
            self.surface.scroll_size = scroll_size;
        }
        lock(&self.model).set_dimensions(dimensions(self.axis, &self.surface));

        if let Some(scrollbar_size) = scrollbar_size {
            self.surface.scrollbar_size = scrollbar_size;
            self.widget.update_scrollbar_size(scrollbar_size);
        }
        self.widget.on_element_size(self.surface.visible_size);
        self.widget.on_element_scroll_size(self.surface.scroll_size);
    }

    /// Feed model changes back into the scrollbar
    fn sync_model(&mut self) {
        let events = lock(&self.model).take_events();
        for event in events {
            let (position, changed) = match self.axis {
                Axis::Horizontal => (event.scroll_left, event.scroll_left_changed),
                Axis::Vertical => (event.scroll_top, event.scroll_top_changed),
            };
            if changed {
                self.recorder.push(ReplayEvent::Scroll {
                    step: self.recorder.step(),
                    position,
                });
            }
            self.widget.on_element_scroll_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    fn scrolls(events: &[ReplayEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                ReplayEvent::Scroll { position, .. } => Some(*position),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_replay_slider_drag() {
        let mut replay = Replay::new(ScrollbarOptions::vertical(), SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [
                    { "kind": "down", "part": "slider", "x": 5, "y": 10 },
                    { "kind": "move", "x": 5, "y": 20 },
                    { "kind": "up", "x": 5, "y": 20 }
                ] }"#,
            ))
            .unwrap();

        assert_eq!(scrolls(&events), vec![50.0]);
        assert!(events.contains(&ReplayEvent::DragStart { step: Some(0) }));
        assert!(events.contains(&ReplayEvent::DragEnd { step: Some(2) }));
        assert_eq!(replay.position(), 50.0);
    }

    #[test]
    fn test_replay_snap_back() {
        let mut options = ScrollbarOptions::vertical();
        options.snap_back = true;
        let mut replay = Replay::new(options, SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [
                    { "kind": "down", "part": "slider", "x": 5, "y": 10 },
                    { "kind": "move", "x": 5, "y": 30 },
                    { "kind": "move", "x": 155, "y": 30 }
                ] }"#,
            ))
            .unwrap();

        assert_eq!(scrolls(&events), vec![100.0, 0.0]);
    }

    #[test]
    fn test_replay_hover_reveals_after_step() {
        let mut replay = Replay::new(ScrollbarOptions::vertical(), SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [
                    { "kind": "hover", "inside": true },
                    { "kind": "hover", "inside": false }
                ] }"#,
            ))
            .unwrap();

        assert_eq!(
            events,
            vec![
                ReplayEvent::ClassName {
                    step: None,
                    class_name: "invisible scrollbar vertical".to_string()
                },
                ReplayEvent::ClassName {
                    step: Some(0),
                    class_name: "visible scrollbar vertical".to_string()
                },
                ReplayEvent::ClassName {
                    step: Some(1),
                    class_name: "invisible scrollbar vertical fade".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_replay_arrow_repeat_scrolls_model() {
        let mut replay = Replay::new(ScrollbarOptions::classic(11.0), SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [
                    { "kind": "down", "part": "end_arrow", "x": 5, "y": 195 },
                    { "kind": "wait", "ms": 200 },
                    { "kind": "up", "x": 5, "y": 195 },
                    { "kind": "wait", "ms": 500 }
                ] }"#,
            ))
            .unwrap();

        assert_eq!(scrolls(&events), vec![16.0, 32.0]);
        assert_eq!(replay.position(), 32.0);
    }

    #[test]
    fn test_replay_external_scroll_and_resize() {
        let mut replay = Replay::new(ScrollbarOptions::vertical(), SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [
                    { "kind": "scroll", "position": 800 },
                    { "kind": "resize", "scroll_size": 500 }
                ] }"#,
            ))
            .unwrap();

        assert_eq!(scrolls(&events), vec![800.0, 400.0]);
        assert_eq!(replay.widget().state().scroll_position(), 400.0);
    }

    #[test]
    fn test_replay_track_press_jumps() {
        let mut replay = Replay::new(ScrollbarOptions::vertical(), SurfaceSpec::default());
        let events = replay
            .run(&script(
                r#"{ "steps": [ { "kind": "down", "part": "track", "x": 5, "y": 100 } ] }"#,
            ))
            .unwrap();

        assert_eq!(scrolls(&events), vec![450.0]);
        assert!(replay.widget().is_dragging());
    }
}
