/// Two-phase overlay visibility
///
/// The original UI toggled a CSS class shortly after mounting an
/// overlay (and unmounted it shortly after removing the class) so the
/// opacity transition could play. Here that timing is an explicit state
/// machine: begin_show/begin_hide stage the change and report whether a
/// delayed finalize message must be scheduled; finish_show/finish_hide
/// apply it. Stale finalize timers land on the wrong state and are
/// ignored, so overlapping show/hide sequences stay consistent.

use std::time::Duration;

/// Delay between mounting an overlay and making it fully visible
pub const SHOW_DELAY: Duration = Duration::from_millis(10);

/// Time a dissolving overlay stays mounted so the fade-out can play
pub const HIDE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fade {
    #[default]
    Hidden,
    /// Mounted but still transparent, waiting for the show delay
    Appearing,
    Visible,
    /// Fading out, waiting for the hide delay before unmounting
    Dissolving,
}

impl Fade {
    /// Start showing. Returns true when a finalize timer is needed.
    /// Reversing a fade-out needs no timer: the overlay is already
    /// mounted, so it snaps straight back to visible.
    pub fn begin_show(&mut self) -> bool {
        match self {
            Fade::Hidden => {
                *self = Fade::Appearing;
                true
            }
            Fade::Dissolving => {
                *self = Fade::Visible;
                false
            }
            Fade::Appearing | Fade::Visible => false,
        }
    }

    /// Finalize a staged show; a stale timer firing in any other state
    /// is a no-op
    pub fn finish_show(&mut self) {
        if *self == Fade::Appearing {
            *self = Fade::Visible;
        }
    }

    /// Start hiding. Returns true when a finalize timer is needed.
    pub fn begin_hide(&mut self) -> bool {
        match self {
            Fade::Appearing | Fade::Visible => {
                *self = Fade::Dissolving;
                true
            }
            Fade::Hidden | Fade::Dissolving => false,
        }
    }

    /// Finalize a staged hide; stale timers are ignored
    pub fn finish_hide(&mut self) {
        if *self == Fade::Dissolving {
            *self = Fade::Hidden;
        }
    }

    /// Whether the overlay occupies the view at all
    pub fn is_mounted(&self) -> bool {
        *self != Fade::Hidden
    }

    pub fn is_visible(&self) -> bool {
        *self == Fade::Visible
    }

    /// Opacity for the current phase
    pub fn opacity(&self) -> f32 {
        match self {
            Fade::Visible => 1.0,
            Fade::Hidden | Fade::Appearing | Fade::Dissolving => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_show_hide_cycle() {
        let mut fade = Fade::default();
        assert!(!fade.is_mounted());

        assert!(fade.begin_show());
        assert_eq!(fade, Fade::Appearing);
        assert!(fade.is_mounted());
        assert!(!fade.is_visible());

        fade.finish_show();
        assert!(fade.is_visible());

        assert!(fade.begin_hide());
        assert_eq!(fade, Fade::Dissolving);
        assert!(fade.is_mounted());

        fade.finish_hide();
        assert_eq!(fade, Fade::Hidden);
    }

    #[test]
    fn test_hide_before_show_finalizes() {
        // A very fast response can hide the overlay while it is still
        // in the staged Appearing phase
        let mut fade = Fade::default();
        fade.begin_show();
        assert!(fade.begin_hide());
        assert_eq!(fade, Fade::Dissolving);

        // The stale show timer fires afterwards and must not resurrect it
        fade.finish_show();
        assert_eq!(fade, Fade::Dissolving);

        fade.finish_hide();
        assert_eq!(fade, Fade::Hidden);
    }

    #[test]
    fn test_reshow_during_dissolve_cancels_the_hide() {
        let mut fade = Fade::Visible;
        fade.begin_hide();

        // Re-shown before the hide timer fired: snap back, no new timer
        assert!(!fade.begin_show());
        assert!(fade.is_visible());

        // The stale hide timer is ignored
        fade.finish_hide();
        assert!(fade.is_visible());
    }

    #[test]
    fn test_redundant_transitions_schedule_nothing() {
        let mut fade = Fade::Hidden;
        assert!(!fade.begin_hide());

        let mut fade = Fade::Visible;
        assert!(!fade.begin_show());
    }

    #[test]
    fn test_opacity_tracks_phase() {
        assert_eq!(Fade::Hidden.opacity(), 0.0);
        assert_eq!(Fade::Appearing.opacity(), 0.0);
        assert_eq!(Fade::Visible.opacity(), 1.0);
        assert_eq!(Fade::Dissolving.opacity(), 0.0);
    }
}
