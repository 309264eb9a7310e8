use prepify_types::Rect;

// Use a small epsilon to handle floating point inaccuracies
const EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Centralized logic to check if a block fits in the remaining space.
///
/// * `cursor_y`: The current Y position in page space.
/// * `child_height`: The required height for the block.
/// * `bounds`: The content area of the page (inside the margins).
pub fn check_child_fit(cursor_y: f32, child_height: f32, bounds: Rect) -> BreakAnalysis {
    let available = (bounds.bottom() - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}

/// Whether a block of `child_height` could fit on an empty page at all.
pub fn fits_empty_page(child_height: f32, bounds: Rect) -> bool {
    child_height <= bounds.height + EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(50.0, 50.0, 500.0, 700.0)
    }

    #[test]
    fn test_fits_with_room_to_spare() {
        let analysis = check_child_fit(100.0, 50.0, bounds());
        assert!(!analysis.should_break);
        assert_eq!(analysis.remaining_height, 650.0);
    }

    #[test]
    fn test_exact_fit_does_not_break() {
        let analysis = check_child_fit(700.0, 50.0, bounds());
        assert!(!analysis.should_break);
    }

    #[test]
    fn test_overflow_breaks() {
        let analysis = check_child_fit(700.0, 50.1, bounds());
        assert!(analysis.should_break);
    }

    #[test]
    fn test_cursor_past_bottom_has_no_room() {
        let analysis = check_child_fit(760.0, 1.0, bounds());
        assert!(analysis.should_break);
        assert_eq!(analysis.remaining_height, 0.0);
    }

    #[test]
    fn test_fits_empty_page() {
        assert!(fits_empty_page(700.0, bounds()));
        assert!(!fits_empty_page(701.0, bounds()));
    }
}
