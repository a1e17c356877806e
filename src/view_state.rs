use chrono::NaiveDate;

/// Label format of the slider handles
pub const SLIDER_LABEL_FORMAT: &str = "%y.%m.%d";

/// Two-handle window over the dates of the loaded table.
///
/// Handles are indexes into `dates`; `low <= high` always holds after
/// [`ViewState::move_handles`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    dates: Vec<NaiveDate>,
    low: usize,
    high: usize,
}

impl ViewState {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        let mut state = Self::default();
        state.reset(dates);
        state
    }

    /// New data loaded: bind to its dates and select all of them.
    pub fn reset(&mut self, dates: Vec<NaiveDate>) {
        self.low = 0;
        self.high = dates.len().saturating_sub(1);
        self.dates = dates;
    }

    /// Move both handles. Crossed handles are swapped and both are
    /// clamped to the last date.
    pub fn move_handles(&mut self, a: usize, b: usize) {
        let last = self.dates.len().saturating_sub(1);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.low = low.min(last);
        self.high = high.min(last);
    }

    pub fn handles(&self) -> (usize, usize) {
        (self.low, self.high)
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates under the handles
    pub fn visible_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.get(self.low)?, *self.dates.get(self.high)?))
    }

    pub fn label_at(&self, index: usize) -> Option<String> {
        self.dates
            .get(index)
            .map(|d| d.format(SLIDER_LABEL_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> Vec<NaiveDate> {
        (4..=8)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect()
    }

    #[test]
    fn reset_selects_everything() {
        let state = ViewState::new(dates());
        assert_eq!(state.handles(), (0, 4));
        let all = dates();
        assert_eq!(state.visible_range(), Some((all[0], all[4])));
    }

    #[test]
    fn crossed_handles_are_normalized() {
        let mut state = ViewState::new(dates());
        state.move_handles(3, 1);
        assert_eq!(state.handles(), (1, 3));
        state.move_handles(2, 99);
        assert_eq!(state.handles(), (2, 4));
    }

    #[test]
    fn labels_use_short_year() {
        let state = ViewState::new(dates());
        assert_eq!(state.label_at(0).as_deref(), Some("24.03.04"));
        assert_eq!(state.label_at(9), None);
    }

    #[test]
    fn empty_state_has_no_window() {
        let state = ViewState::default();
        assert_eq!(state.visible_range(), None);
        assert!(state.is_empty());
    }
}
