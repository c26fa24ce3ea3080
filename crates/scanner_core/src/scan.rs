//! Pure state machine behind the new-titles scan.
//!
//! The upstream lists new titles one calendar day at a time, so a date window
//! fans out into one cursor-paginated session per day, newest day first. The
//! driver feeds page results in through [`update`] and performs whatever
//! [`ScanStep`] comes back.

use chrono::NaiveDate;

use crate::failure::UpstreamError;
use crate::filters::{is_exclusive, DateWindow, ScanFilters};
use crate::model::{NewTitleRow, NewTitlesPage};

/// The next page to fetch: a day and the cursor within that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub day: NaiveDate,
    /// `None` starts the day's result set from the top.
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanMsg {
    Start,
    PageLoaded(NewTitlesPage),
    PageFailed(UpstreamError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The window was exhausted or the target count was reached.
    Complete(Vec<NewTitleRow>),
    /// A transient failure interrupted the scan after rows were collected.
    Partial {
        rows: Vec<NewTitleRow>,
        failure: UpstreamError,
    },
    Fatal(UpstreamError),
}

impl ScanOutcome {
    pub fn rows(&self) -> &[NewTitleRow] {
        match self {
            ScanOutcome::Complete(rows) | ScanOutcome::Partial { rows, .. } => rows,
            ScanOutcome::Fatal(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&UpstreamError> {
        match self {
            ScanOutcome::Complete(_) => None,
            ScanOutcome::Partial { failure, .. } | ScanOutcome::Fatal(failure) => Some(failure),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, ScanOutcome::Partial { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanOutcome::Fatal(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep {
    Fetch(PageRequest),
    Done(ScanOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanPhase {
    #[default]
    Idle,
    Fetching,
    Finished,
}

/// State owned by a single scan invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    window: DateWindow,
    target: usize,
    exclusive_only: bool,
    /// `None` once the walk has moved past the start of the window.
    day: Option<NaiveDate>,
    cursor: Option<String>,
    rows: Vec<NewTitleRow>,
    pages_loaded: usize,
    phase: ScanPhase,
}

impl ScanState {
    pub fn new(window: DateWindow, filters: &ScanFilters) -> Self {
        Self {
            window,
            target: filters.count,
            exclusive_only: filters.exclusive_only,
            day: Some(window.to()),
            cursor: None,
            rows: Vec::new(),
            pages_loaded: 0,
            phase: ScanPhase::Idle,
        }
    }

    pub fn collected(&self) -> usize {
        self.rows.len()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    fn target_reached(&self) -> bool {
        self.rows.len() >= self.target
    }

    /// Keeps rows in page order until the target is hit; returns the next cursor.
    fn absorb(&mut self, page: NewTitlesPage) -> Option<String> {
        self.pages_loaded += 1;
        let next_cursor = page.next_cursor().map(str::to_owned);
        for edge in page.edges {
            if self.target_reached() {
                break;
            }
            if self.exclusive_only && !is_exclusive(&edge.node) {
                continue;
            }
            self.rows.push(NewTitleRow::from(edge));
        }
        next_cursor
    }

    fn advance_day(&mut self) {
        let from = self.window.from();
        self.day = self
            .day
            .and_then(|day| day.pred_opt())
            .filter(|day| *day >= from);
        self.cursor = None;
    }

    fn next_step(&mut self) -> ScanStep {
        match self.day {
            Some(day) if !self.target_reached() => ScanStep::Fetch(PageRequest {
                day,
                cursor: self.cursor.clone(),
            }),
            _ => self.finish(ScanOutcome::Complete),
        }
    }

    fn finish(&mut self, outcome: impl FnOnce(Vec<NewTitleRow>) -> ScanOutcome) -> ScanStep {
        self.phase = ScanPhase::Finished;
        ScanStep::Done(outcome(std::mem::take(&mut self.rows)))
    }
}

/// Pure update function: applies a message to the scan and returns the next step.
pub fn update(mut state: ScanState, msg: ScanMsg) -> (ScanState, ScanStep) {
    if state.phase == ScanPhase::Finished {
        // Rows were handed out with the first Done.
        return (state, ScanStep::Done(ScanOutcome::Complete(Vec::new())));
    }

    let step = match msg {
        ScanMsg::Start => {
            state.phase = ScanPhase::Fetching;
            state.next_step()
        }
        ScanMsg::PageLoaded(page) => match state.absorb(page) {
            Some(cursor) if !state.target_reached() => {
                state.cursor = Some(cursor);
                state.next_step()
            }
            _ => {
                state.advance_day();
                state.next_step()
            }
        },
        ScanMsg::PageFailed(failure) => {
            if failure.kind.is_transient() && !state.rows.is_empty() {
                state.finish(|rows| ScanOutcome::Partial { rows, failure })
            } else {
                state.finish(|_| ScanOutcome::Fatal(failure))
            }
        }
    };

    (state, step)
}
