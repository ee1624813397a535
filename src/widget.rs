use ratatui::layout::Rect;
use ratatui::text::Text;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::AttachError;
use crate::registry::StatusRegistry;
use crate::types::{DismissBehavior, HIDE_FADE, LOADING_TEXT, Outcome, Phase, SHOW_FADE, Target};

/// Time-based opacity ramp, evaluated lazily at render time.
///
/// Starting a new fade samples the current opacity first, so overlapping
/// `show`/`hide` calls restart the ramp without a visual jump.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fade {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl Fade {
    fn fixed(value: f64) -> Self {
        Fade {
            from: value,
            to: value,
            started: Instant::now(),
            duration: Duration::ZERO,
        }
    }

    fn toward(from: f64, to: f64, duration: Duration) -> Self {
        Fade {
            from,
            to,
            started: Instant::now(),
            duration,
        }
    }

    pub(crate) fn opacity_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let t = elapsed / self.duration.as_secs_f64();
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * t.max(0.0)
    }

    /// Instant at which the ramp settles on its target value.
    pub(crate) fn deadline(&self) -> Instant {
        self.started + self.duration
    }

    #[cfg(test)]
    pub(crate) fn rewind(&mut self, by: Duration) {
        self.started -= by;
    }
}

/// Shared interior state of a status widget. Handles are cheap clones of an
/// `Rc` around this; the UI runs on one logical thread, so no locking.
#[derive(Debug)]
pub(crate) struct WidgetState {
    pub(crate) message: Text<'static>,
    pub(crate) phase: Phase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) fade: Fade,
    pub(crate) key: Option<String>,
    pub(crate) anchor: Option<Rect>,
    pub(crate) superseded: bool,
    pub(crate) destroyed: bool,
    pub(crate) dismiss: DismissBehavior,
    pub(crate) created: Instant,
    /// Screen cell of the dismiss control, refreshed on every render.
    pub(crate) close_cell: Option<(u16, u16)>,
}

impl WidgetState {
    pub(crate) fn clear_presence(&mut self) {
        self.destroyed = true;
        self.fade = Fade::fixed(0.0);
        self.anchor = None;
        self.key = None;
        self.close_cell = None;
    }
}

/// Handle to a status indicator: spinner, message line and dismiss control,
/// attached to at most one registry slot at a time.
///
/// Constructed detached and invisible; `attach` binds it to a target,
/// `show`/`reset`/`finish`/`hide` drive the displayed status, and `destroy`
/// removes it for good.
#[derive(Debug, Clone)]
pub struct StatusWidget {
    pub(crate) state: Rc<RefCell<WidgetState>>,
    pub(crate) registry: StatusRegistry,
}

impl StatusWidget {
    /// Detached widget showing the default loading message.
    pub fn new(registry: &StatusRegistry) -> Self {
        Self::with_message(registry, LOADING_TEXT)
    }

    /// Detached widget with an initial message. Rich (styled) content is
    /// kept as-is.
    pub fn with_message(registry: &StatusRegistry, text: impl Into<Text<'static>>) -> Self {
        let state = WidgetState {
            message: text.into(),
            phase: Phase::Loading,
            outcome: None,
            fade: Fade::fixed(0.0),
            key: None,
            anchor: None,
            superseded: false,
            destroyed: false,
            dismiss: DismissBehavior::default(),
            created: Instant::now(),
            close_cell: None,
        };
        StatusWidget {
            state: Rc::new(RefCell::new(state)),
            registry: registry.clone(),
        }
    }

    /// Construct and immediately attach, propagating the attach failure.
    pub fn attached(
        registry: &StatusRegistry,
        text: impl Into<Text<'static>>,
        target: &Target,
    ) -> Result<Self, AttachError> {
        Self::with_message(registry, text).attach(target, false)
    }

    pub(crate) fn from_state(registry: &StatusRegistry, state: Rc<RefCell<WidgetState>>) -> Self {
        StatusWidget {
            state,
            registry: registry.clone(),
        }
    }

    /// Bind this widget to `target`.
    ///
    /// Region targets place the widget directly under the region. A taken
    /// slot fails with [`AttachError::AlreadyAttached`] unless `overwrite`
    /// is requested, in which case the previous owner is superseded: it
    /// loses its key and on-screen presence while this widget adopts them,
    /// keeping its own message. A target without an identifier fails with
    /// [`AttachError::InvalidTarget`] and destroys this widget. Screen-level
    /// attachment never overwrites; one screen status exists at a time.
    pub fn attach(&self, target: &Target, overwrite: bool) -> Result<StatusWidget, AttachError> {
        if self.state.borrow().destroyed {
            warn!("attach called on a destroyed status widget");
            return Err(AttachError::InvalidTarget);
        }
        let Some(use_key) = target.registry_key() else {
            warn!("attach target has no usable identifier; widget destroys itself");
            self.destroy();
            return Err(AttachError::InvalidTarget);
        };

        if self.state.borrow().key.as_deref() == Some(use_key.as_str()) {
            // Already bound to this slot.
            return Ok(self.clone());
        }

        if let Some(existing) = self.registry.state_of(&use_key) {
            let takeover = overwrite && !matches!(target, Target::Screen);
            if !takeover {
                warn!(key = %use_key, "status widget already attached");
                return Err(AttachError::AlreadyAttached { key: use_key });
            }
            // Transfer of visual ownership: the old owner keeps its handle
            // but is marked superseded; this widget adopts its anchor and
            // fade state, and the caller's message wins.
            let (anchor, fade) = {
                let mut old = existing.borrow_mut();
                old.superseded = true;
                old.key = None;
                old.close_cell = None;
                (old.anchor, old.fade)
            };
            self.release_current_key();
            {
                let mut st = self.state.borrow_mut();
                st.anchor = anchor;
                st.fade = fade;
                st.key = Some(use_key.clone());
            }
            self.registry.claim(use_key.clone(), Rc::clone(&self.state));
            debug!(key = %use_key, "status widget took over existing slot");
            return Ok(self.clone());
        }

        self.release_current_key();
        {
            let mut st = self.state.borrow_mut();
            st.anchor = target.area();
            st.key = Some(use_key.clone());
        }
        self.registry.claim(use_key.clone(), Rc::clone(&self.state));
        debug!(key = %use_key, "status widget attached");
        Ok(self.clone())
    }

    /// Unregister and dispose the widget. Safe to call repeatedly; this is
    /// the only terminal transition.
    pub fn destroy(&self) {
        let key = {
            let mut st = self.state.borrow_mut();
            let key = st.key.take();
            st.clear_presence();
            key
        };
        if let Some(key) = key {
            self.registry.release_if(&key, &self.state);
            debug!(%key, "status widget destroyed");
        }
    }

    /// Back to the in-progress look: loading message, spinner, no outcome.
    pub fn reset(&self) -> &Self {
        let mut st = self.state.borrow_mut();
        if !st.destroyed {
            st.message = Text::from(LOADING_TEXT);
            st.phase = Phase::Loading;
            st.outcome = None;
        }
        self
    }

    /// Fade the widget in.
    pub fn show(&self) -> &Self {
        self.fade_to(1.0, SHOW_FADE)
    }

    /// Replace the message, then fade in.
    pub fn show_with(&self, text: impl Into<Text<'static>>) -> &Self {
        self.set_message(text);
        self.fade_to(1.0, SHOW_FADE)
    }

    /// Fade the widget out over the default duration. Phase, message and
    /// registry membership are untouched.
    pub fn hide(&self) -> &Self {
        self.fade_to(0.0, HIDE_FADE)
    }

    /// Fade out over an explicit duration.
    pub fn hide_over(&self, duration: Duration) -> &Self {
        self.fade_to(0.0, duration)
    }

    /// Terminal status: swaps the spinner for a check mark (success) or a
    /// warning mark (failure) and replaces the message.
    pub fn finish(&self, text: impl Into<Text<'static>>, success: bool) -> &Self {
        let mut st = self.state.borrow_mut();
        if !st.destroyed {
            st.message = text.into();
            st.phase = Phase::Final;
            st.outcome = Some(if success {
                Outcome::Success
            } else {
                Outcome::Failure
            });
        }
        self
    }

    /// What the dismiss control invokes: hide or destroy, per the widget's
    /// [`DismissBehavior`].
    pub fn dismiss(&self) {
        let behavior = self.state.borrow().dismiss;
        match behavior {
            DismissBehavior::HideOnly => {
                self.hide();
            }
            DismissBehavior::Destroy => self.destroy(),
        }
    }

    /// Future resolving when the current fade settles. Fades stay
    /// fire-and-forget unless the caller awaits this.
    pub fn fade_done(&self) -> tokio::time::Sleep {
        let deadline = self.state.borrow().fade.deadline();
        tokio::time::sleep_until(deadline.into())
    }

    fn fade_to(&self, to: f64, duration: Duration) -> &Self {
        let mut st = self.state.borrow_mut();
        if !st.destroyed {
            let from = st.fade.opacity_at(Instant::now());
            st.fade = Fade::toward(from, to, duration);
        }
        self
    }

    fn release_current_key(&self) {
        let old = self.state.borrow_mut().key.take();
        if let Some(key) = old {
            self.registry.release_if(&key, &self.state);
        }
    }

    // accessors

    pub fn message(&self) -> Text<'static> {
        self.state.borrow().message.clone()
    }

    pub fn set_message(&self, text: impl Into<Text<'static>>) -> &Self {
        let mut st = self.state.borrow_mut();
        if !st.destroyed {
            st.message = text.into();
        }
        self
    }

    /// Registry key claimed by this widget, set at successful attach.
    pub fn key(&self) -> Option<String> {
        self.state.borrow().key.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.borrow().outcome
    }

    /// Region this widget visually tracks; `None` for screen-level widgets.
    pub fn anchor(&self) -> Option<Rect> {
        self.state.borrow().anchor
    }

    /// Current opacity in `[0.0, 1.0]`.
    pub fn opacity(&self) -> f64 {
        self.state.borrow().fade.opacity_at(Instant::now())
    }

    pub fn is_visible(&self) -> bool {
        self.opacity() > 0.0
    }

    /// True once another widget took over this widget's slot via an
    /// overwrite attach.
    pub fn is_superseded(&self) -> bool {
        self.state.borrow().superseded
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    pub fn dismiss_behavior(&self) -> DismissBehavior {
        self.state.borrow().dismiss
    }

    pub fn set_dismiss_behavior(&self, behavior: DismissBehavior) -> &Self {
        self.state.borrow_mut().dismiss = behavior;
        self
    }

    pub(crate) fn hit_dismiss(&self, column: u16, row: u16) -> bool {
        self.state.borrow().close_cell == Some((column, row))
    }

    pub(crate) fn clear_close_cell(&self) {
        self.state.borrow_mut().close_cell = None;
    }

    /// Test helper: move the fade and spinner clocks into the past.
    #[cfg(test)]
    pub(crate) fn fast_forward(&self, by: Duration) {
        let mut st = self.state.borrow_mut();
        st.fade.rewind(by);
        st.created -= by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region(id: &str) -> Target {
        Target::region(id, Rect::new(4, 2, 20, 3))
    }

    #[test]
    fn starts_detached_and_invisible() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        assert_eq!(w.key(), None);
        assert!(!w.is_visible());
        assert_eq!(w.phase(), Phase::Loading);
        assert!(registry.is_empty());
    }

    #[test]
    fn finish_sets_message_and_outcome() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.finish("Upload failed", false);
        assert_eq!(w.message(), Text::from("Upload failed"));
        assert_eq!(w.phase(), Phase::Final);
        assert_eq!(w.outcome(), Some(Outcome::Failure));

        w.finish("Upload complete", true);
        assert_eq!(w.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn reset_restores_loading_regardless_of_prior_state() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::with_message(&registry, "Working");
        w.finish("All done", true);
        w.reset();
        assert_eq!(w.message(), Text::from(LOADING_TEXT));
        assert_eq!(w.phase(), Phase::Loading);
        assert_eq!(w.outcome(), None);
    }

    #[test]
    fn attach_positions_widget_under_the_target() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        let attached = w.attach(&region("btn1"), false).unwrap();
        assert_eq!(attached.key().as_deref(), Some("smart-btn1"));
        assert_eq!(attached.anchor(), Some(Rect::new(4, 2, 20, 3)));
    }

    #[test]
    fn overwrite_transfers_visuals_but_keeps_callers_message() {
        let registry = StatusRegistry::new();
        let a = StatusWidget::with_message(&registry, "Uploading");
        a.attach(&region("btn1"), false).unwrap();
        a.show();
        a.fast_forward(Duration::from_secs(2));
        assert!(a.is_visible());

        let b = StatusWidget::with_message(&registry, "Retrying");
        let b = b.attach(&region("btn1"), true).unwrap();

        assert!(a.is_superseded());
        assert_eq!(a.key(), None);
        assert_eq!(b.key().as_deref(), Some("smart-btn1"));
        assert_eq!(b.message(), Text::from("Retrying"));
        // Adopted the old owner's on-screen presence.
        assert_eq!(b.anchor(), Some(Rect::new(4, 2, 20, 3)));
        assert!(b.is_visible());

        let found = registry.find("smart-btn1").unwrap();
        assert_eq!(found.message(), Text::from("Retrying"));
    }

    #[test]
    fn hide_changes_nothing_but_opacity() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::with_message(&registry, "Syncing");
        w.attach(&region("sync"), false).unwrap();
        w.show();
        w.fast_forward(Duration::from_secs(1));

        w.hide_over(Duration::from_millis(200));
        w.fast_forward(Duration::from_secs(1));
        assert!(!w.is_visible());
        assert_eq!(w.message(), Text::from("Syncing"));
        assert_eq!(w.phase(), Phase::Loading);
        assert!(registry.contains("smart-sync"));
    }

    #[test]
    fn fade_ramps_monotonically() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.show();
        let start = w.opacity();
        w.fast_forward(Duration::from_millis(200));
        let mid = w.opacity();
        w.fast_forward(Duration::from_secs(1));
        let end = w.opacity();
        assert!(start <= mid && mid <= end);
        assert_eq!(end, 1.0);
    }

    #[test]
    fn overlapping_fade_restarts_from_current_opacity() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.show();
        w.fast_forward(Duration::from_millis(200));
        let before = w.opacity();
        assert!(before > 0.0 && before < 1.0);
        // Reversing mid-ramp must not jump to either endpoint.
        w.hide();
        let after = w.opacity();
        assert!((after - before).abs() < 0.05);
    }

    #[test]
    fn dismiss_hide_only_keeps_registration() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.attach(&region("job"), false).unwrap();
        w.show();
        w.fast_forward(Duration::from_secs(1));
        w.dismiss();
        w.fast_forward(Duration::from_secs(2));
        assert!(!w.is_visible());
        assert!(registry.contains("smart-job"));
        assert!(!w.is_destroyed());
    }

    #[test]
    fn dismiss_destroy_unregisters() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.set_dismiss_behavior(DismissBehavior::Destroy);
        w.attach(&region("job"), false).unwrap();
        w.dismiss();
        assert!(w.is_destroyed());
        assert!(!registry.contains("smart-job"));
    }

    #[test]
    fn destroyed_widget_ignores_updates_and_reattach() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.attach(&region("job"), false).unwrap();
        w.destroy();
        w.destroy(); // repeated destroy is safe

        w.show_with("Back again");
        assert!(!w.is_visible());
        assert_eq!(
            w.attach(&region("job"), false).unwrap_err(),
            AttachError::InvalidTarget
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn reattach_moves_the_widget_to_the_new_slot() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.attach(&region("first"), false).unwrap();
        w.attach(&region("second"), false).unwrap();
        assert_eq!(w.key().as_deref(), Some("smart-second"));
        assert!(!registry.contains("smart-first"));
        assert!(registry.contains("smart-second"));
    }

    #[tokio::test]
    async fn fade_done_resolves_after_the_ramp() {
        let registry = StatusRegistry::new();
        let w = StatusWidget::new(&registry);
        w.show();
        w.hide_over(Duration::from_millis(20));
        w.fade_done().await;
        assert_eq!(w.opacity(), 0.0);
    }
}
