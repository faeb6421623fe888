/// ─── Feeclaim Protocol Constants ────────────────────────────────────────────

// ── Retroactive registration ─────────────────────────────────────────────────

/// Length of the retroactive registration window, in seconds (30 days).
///
/// The deadline is fixed at first initialization as `init time + window` and
/// never extended afterwards: pre-existing fee-generating participants get a
/// bounded migration period, after which the administrator can no longer
/// grant fee rights retroactively.
pub const RETROACTIVE_WINDOW_SECS: i64 = 30 * 24 * 3600;
