// SPDX-License-Identifier: GPL-3.0-only

//! Registry of concurrently running animations.
//!
//! The [`Animator`] is driven once per external render tick and advances
//! every registered [`TransformAnimation`] by the same delta. Registrations
//! are non-owning: the animation stays owned by whichever component created
//! it (popup layer, window slide, ...) and the animator drops its entry as
//! soon as the animation finishes or its owner goes away.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::animation::timeline::TransformAnimation;

/// Shared handle to an animation, owned by the component that plays it.
pub type AnimationHandle = Rc<RefCell<TransformAnimation>>;

/// Callback invoked after each tick of a registered animation.
pub type UpdateObserver = Box<dyn FnMut(&TransformAnimation)>;

/// Pairs a running animation with its optional per-tick observer for the
/// animation's active lifetime.
struct AnimatorEntry {
    animation: Weak<RefCell<TransformAnimation>>,
    on_update: Option<UpdateObserver>,
}

/// Advances all registered animations once per tick and retires finished
/// ones.
#[derive(Default)]
pub struct Animator {
    running: Vec<AnimatorEntry>,
    scratch: Vec<AnimatorEntry>,
}

impl Animator {
    /// Creates an empty animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances all registered animations by `delta` seconds.
    ///
    /// Every still-running animation is updated exactly once, then its
    /// observer (if any) is invoked. Entries whose animation has finished
    /// after this tick, or whose owner dropped the handle, are discarded;
    /// the survivors are kept through a double-buffered list swap so no
    /// in-place removal happens during iteration.
    pub fn update(&mut self, delta: f64) {
        let mut running = std::mem::take(&mut self.running);
        let mut retained = std::mem::take(&mut self.scratch);
        debug_assert!(retained.is_empty());

        for mut entry in running.drain(..) {
            let Some(animation) = entry.animation.upgrade() else {
                continue;
            };
            animation.borrow_mut().update(delta);
            let finished = {
                let animation = animation.borrow();
                if let Some(on_update) = entry.on_update.as_mut() {
                    on_update(&animation);
                }
                animation.has_finished()
            };
            if !finished {
                retained.push(entry);
            }
        }

        self.running = retained;
        self.scratch = running;
    }

    /// Registers and starts an animation.
    ///
    /// If the animation was already started (non-idle), it is force-ended
    /// first — its finish observers fire synchronously inside this call —
    /// so that an animation instance never has more than one active
    /// playback position. Any previous registration of the same instance
    /// is replaced.
    pub fn play(&mut self, animation: &AnimationHandle, on_update: Option<UpdateObserver>) {
        {
            let mut animation = animation.borrow_mut();
            if animation.has_started() {
                animation.end();
            }
            animation.start();
        }

        let handle = Rc::downgrade(animation);
        self.running.retain(|entry| !entry.animation.ptr_eq(&handle));
        self.running.push(AnimatorEntry {
            animation: handle,
            on_update,
        });
    }

    /// Number of currently registered animations.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Upgraded handles of all currently registered animations.
    #[must_use]
    pub fn running_animations(&self) -> Vec<AnimationHandle> {
        self.running
            .iter()
            .filter_map(|entry| entry.animation.upgrade())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::easing::Easing;
    use crate::animation::frame::TransformFrame;
    use crate::geometry::Point;
    use std::cell::Cell;

    fn slide_handle(duration: f64) -> AnimationHandle {
        let mut animation = TransformAnimation::new();
        animation.set_easing(Easing::Linear);
        animation.add_frame(
            TransformFrame::builder()
                .position(0.0, 0.0)
                .duration(duration)
                .build(),
        );
        animation.add_frame(TransformFrame::builder().position(10.0, 0.0).build());
        Rc::new(RefCell::new(animation))
    }

    #[test]
    fn test_update_advances_and_retires() {
        let mut animator = Animator::new();
        let animation = slide_handle(1.0);

        animator.play(&animation, None);
        assert_eq!(animator.running_count(), 1);

        animator.update(0.5);
        assert_eq!(
            animation.borrow().current_frame().position,
            Point::new(5.0, 0.0)
        );
        assert_eq!(animator.running_count(), 1);

        animator.update(0.6);
        assert!(animation.borrow().has_finished());
        assert_eq!(
            animator.running_count(),
            0,
            "finished animations are dropped after their final tick"
        );
    }

    #[test]
    fn test_observer_runs_once_per_tick() {
        let mut animator = Animator::new();
        let animation = slide_handle(1.0);
        let ticks = Rc::new(Cell::new(0));
        let observed = Rc::clone(&ticks);

        animator.play(
            &animation,
            Some(Box::new(move |_| observed.set(observed.get() + 1))),
        );

        animator.update(0.25);
        animator.update(0.25);
        assert_eq!(ticks.get(), 2);
    }

    /// Replaying a mid-playback animation fires its finish notification
    /// exactly once, then playback restarts from frame 0.
    #[test]
    fn test_replay_forces_end_then_restarts() {
        let mut animator = Animator::new();
        let animation = slide_handle(1.0);
        let finishes = Rc::new(Cell::new(0));
        let observed = Rc::clone(&finishes);
        animation
            .borrow_mut()
            .on_finish(move |_| observed.set(observed.get() + 1));

        animator.play(&animation, None);
        animator.update(0.5);
        assert_eq!(finishes.get(), 0);

        animator.play(&animation, None);
        assert_eq!(finishes.get(), 1, "forced end fires inside play()");
        assert_eq!(animation.borrow().current_index(), 0);
        assert!(!animation.borrow().has_finished());
        assert_eq!(
            animator.running_count(),
            1,
            "the stale registration is replaced, not duplicated"
        );

        // A single instance advances at single speed after the replay.
        animator.update(0.5);
        assert_eq!(
            animation.borrow().current_frame().position,
            Point::new(5.0, 0.0)
        );
    }

    #[test]
    fn test_dropped_owner_retires_entry() {
        let mut animator = Animator::new();
        let animation = slide_handle(1.0);
        animator.play(&animation, None);

        drop(animation);
        animator.update(0.1);
        assert_eq!(animator.running_count(), 0);
    }

    #[test]
    fn test_multiple_animations_advance_independently() {
        let mut animator = Animator::new();
        let fast = slide_handle(0.5);
        let slow = slide_handle(2.0);

        animator.play(&fast, None);
        animator.play(&slow, None);
        animator.update(0.6);

        assert!(fast.borrow().has_finished());
        assert!(!slow.borrow().has_finished());
        assert_eq!(animator.running_count(), 1);
        assert_eq!(animator.running_animations().len(), 1);
    }
}
