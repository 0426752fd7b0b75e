/// Number of day slots in a weekly menu.
pub const DAYS_PER_WEEK: usize = 7;

/// Maximum number of meals a weekly menu may hold.
pub const MAX_MEALS: usize = DAYS_PER_WEEK;

/// Display names for the day slots, Monday first.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ─────────────────────────────────────────────────────────────────────────────
// Budget
// ─────────────────────────────────────────────────────────────────────────────

/// Budget a new planning session starts with (kr).
pub const DEFAULT_BUDGET: f64 = 1000.0;

/// Lowest budget the user can pick.
pub const MIN_BUDGET: f64 = 500.0;

/// Highest budget the user can pick.
pub const MAX_BUDGET: f64 = 2000.0;

/// Budget adjustment granularity.
pub const BUDGET_STEP: f64 = 100.0;

/// Percentage shown when the budget cannot be divided by.
pub const FULL_PERCENT: f64 = 100.0;
