//! Keep the line being typed inside the scrollable letter body.

/// Layout numbers of a line and its scroll container, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub element_top: f64,      // offset of the line inside the container
    pub element_height: f64,
    pub container_height: f64, // visible height
    pub scroll_top: f64,
}

/// New scroll offset if the line is (partly) outside the visible area, else `None`.
pub fn scroll_target(m: ScrollMetrics, margin_px: f64) -> Option<f64> {
    let above = m.element_top < m.scroll_top;
    let below = m.element_top + m.element_height > m.scroll_top + m.container_height;
    if above || below {
        Some((m.element_top - margin_px).max(0.0))
    } else {
        None
    }
}

/// Coarse throttle for progress-driven scrolling: at most one request per tenth
/// of progress, none before `after`.
#[derive(Clone, Debug)]
pub struct ScrollThrottle {
    after: f64,
    last_tenth: i64,
}

impl ScrollThrottle {
    pub fn new(after: f64) -> Self {
        Self { after, last_tenth: (after * 10.0).floor() as i64 - 1 }
    }

    pub fn should_scroll(&mut self, progress: f64) -> bool {
        if progress <= self.after {
            return false;
        }
        let tenth = (progress * 10.0).floor() as i64;
        if tenth > self.last_tenth {
            self.last_tenth = tenth;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(top: f64, scroll_top: f64) -> ScrollMetrics {
        ScrollMetrics { element_top: top, element_height: 30.0, container_height: 200.0, scroll_top }
    }

    #[test]
    fn test_visible_line_does_not_scroll() {
        assert_eq!(scroll_target(metrics(50.0, 0.0), 20.0), None);
    }

    #[test]
    fn test_line_below_view_scrolls_with_margin() {
        assert_eq!(scroll_target(metrics(190.0, 0.0), 20.0), Some(170.0));
    }

    #[test]
    fn test_line_above_view_scrolls_back() {
        assert_eq!(scroll_target(metrics(10.0, 100.0), 20.0), Some(0.0));
    }

    #[test]
    fn test_throttle_one_per_tenth_after_threshold() {
        let mut t = ScrollThrottle::new(0.2);
        assert!(!t.should_scroll(0.1));
        assert!(!t.should_scroll(0.2));
        assert!(t.should_scroll(0.21));
        assert!(!t.should_scroll(0.27));
        assert!(t.should_scroll(0.31));
        assert!(t.should_scroll(0.75));
        assert!(!t.should_scroll(0.79));
        assert!(t.should_scroll(1.0));
    }
}
