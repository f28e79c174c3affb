//! Zoom level arithmetic. Scales are whole percentages.

pub const MIN_SCALE: u32 = 50;
pub const MAX_SCALE: u32 = 500;
pub const DEFAULT_SCALE: u32 = 100;
/// Step for the zoom buttons and keyboard shortcuts.
pub const SCALE_STEP: u32 = 25;
/// Step for modifier + scroll wheel.
pub const SCROLL_STEP: u32 = 10;

/// Next multiple of `step` above `current`, capped at `max`.
///
/// Off-grid values snap to the grid: `snap_up(110, 25, 500) == 125`.
pub fn snap_up(current: u32, step: u32, max: u32) -> u32 {
    if current >= max || step == 0 {
        return current.min(max);
    }
    (current + step - current % step).min(max)
}

/// Previous multiple of `step` below `current`, floored at `min`.
pub fn snap_down(current: u32, step: u32, min: u32) -> u32 {
    if current <= min || step == 0 {
        return current.max(min);
    }
    let rest = current % step;
    let snapped = if rest == 0 {
        current - step
    } else {
        current - rest
    };
    snapped.max(min)
}

/// Clamp a typed-in percentage to the supported range.
pub fn clamp_scale(value: i64) -> u32 {
    value.clamp(i64::from(MIN_SCALE), i64::from(MAX_SCALE)) as u32
}

/// Parse a typed-in percentage. Non-numeric input yields `None`, leaving
/// the current zoom unchanged.
pub fn parse_scale(input: &str) -> Option<u32> {
    input.trim().parse::<i64>().ok().map(clamp_scale)
}

/// A zoom level within `MIN_SCALE..=MAX_SCALE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(DEFAULT_SCALE)
    }
}

impl Zoom {
    pub fn new(percent: i64) -> Self {
        Zoom(clamp_scale(percent))
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    /// Multiplier for a page viewport (`1.0` at 100%).
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn zoom_in(self) -> Self {
        Zoom(snap_up(self.0, SCALE_STEP, MAX_SCALE))
    }

    pub fn zoom_out(self) -> Self {
        Zoom(snap_down(self.0, SCALE_STEP, MIN_SCALE))
    }

    /// Modifier + wheel: scrolling up (`delta_y < 0`) zooms in.
    pub fn wheel(self, delta_y: f64) -> Self {
        if delta_y < 0.0 {
            Zoom(snap_up(self.0, SCROLL_STEP, MAX_SCALE))
        } else {
            Zoom(snap_down(self.0, SCROLL_STEP, MIN_SCALE))
        }
    }

    /// Zoom at which a page fills the container height.
    ///
    /// `rendered_height` is the page's current on-screen height at this
    /// zoom; `padding` is subtracted from `container_height`. The result is
    /// floored to a whole percent and clamped. Returns `None` while the page
    /// has no measurable height.
    pub fn fit_height(
        self,
        rendered_height: f64,
        container_height: f64,
        padding: f64,
    ) -> Option<Self> {
        if !rendered_height.is_finite() || rendered_height <= 0.0 {
            return None;
        }
        let unscaled = rendered_height / self.factor();
        let fit = ((container_height - padding) / unscaled * 100.0).floor();
        if !fit.is_finite() {
            return None;
        }
        Some(Zoom::new(fit as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_up_moves_to_next_grid_point() {
        assert_eq!(snap_up(100, 25, 500), 125);
        assert_eq!(snap_up(110, 25, 500), 125);
        assert_eq!(snap_up(490, 25, 500), 500);
        assert_eq!(snap_up(500, 25, 500), 500);
        assert_eq!(snap_up(103, 10, 500), 110);
    }

    #[test]
    fn snap_down_moves_to_previous_grid_point() {
        assert_eq!(snap_down(100, 25, 50), 75);
        assert_eq!(snap_down(110, 25, 50), 100);
        assert_eq!(snap_down(50, 25, 50), 50);
        assert_eq!(snap_down(55, 25, 50), 50);
        assert_eq!(snap_down(103, 10, 50), 100);
    }

    #[test]
    fn typed_scale_is_clamped() {
        assert_eq!(clamp_scale(10), MIN_SCALE);
        assert_eq!(clamp_scale(9000), MAX_SCALE);
        assert_eq!(parse_scale(" 150 "), Some(150));
        assert_eq!(parse_scale("abc"), None);
        assert_eq!(parse_scale("-20"), Some(MIN_SCALE));
    }

    #[test]
    fn zoom_steps_and_wheel() {
        let zoom = Zoom::default();
        assert_eq!(zoom.zoom_in().percent(), 125);
        assert_eq!(zoom.zoom_out().percent(), 75);
        assert_eq!(zoom.wheel(-1.0).percent(), 110);
        assert_eq!(zoom.wheel(3.0).percent(), 90);
        assert_eq!(Zoom::new(500).zoom_in().percent(), 500);
        assert_eq!(Zoom::new(50).zoom_out().percent(), 50);
        assert_eq!(Zoom::new(150).factor(), 1.5);
    }

    #[test]
    fn fit_height_scales_to_container() {
        let a4 = 842.0;
        assert_eq!(Zoom::default().fit_height(a4, 1000.0, 16.0), Some(Zoom::new(116)));
        // Same page already rendered at 150%.
        assert_eq!(Zoom::new(150).fit_height(a4 * 1.5, 1000.0, 16.0), Some(Zoom::new(116)));
        assert_eq!(Zoom::default().fit_height(a4, 300.0, 16.0), Some(Zoom::new(50)));
        assert_eq!(Zoom::new(50).fit_height(100.0, 5000.0, 0.0), Some(Zoom::new(500)));
    }

    #[test]
    fn fit_height_needs_a_rendered_page() {
        assert_eq!(Zoom::default().fit_height(0.0, 1000.0, 16.0), None);
        assert_eq!(Zoom::default().fit_height(f64::NAN, 1000.0, 16.0), None);
    }
}
