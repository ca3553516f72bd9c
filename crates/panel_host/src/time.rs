//! Wall-clock helpers used to stamp and order layout snapshots.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ISSUED_ID: Cell<u64> = const { Cell::new(0) };
}

/// Milliseconds since the unix epoch, or zero when the clock reads before it.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_epoch| since_epoch.as_millis() as u64)
    }
}

/// Mints a snapshot id above both `after` and every id issued earlier on this thread.
///
/// Ids track the wall clock in milliseconds, so they double as save times and sort in save order
/// even when several snapshots land in the same millisecond or the clock steps backwards.
pub fn next_snapshot_id(after: u64) -> u64 {
    let now = unix_time_ms_now();
    LAST_ISSUED_ID.with(|last| {
        let floor = last.get().max(after).saturating_add(1);
        let id = now.max(floor);
        last.set(id);
        id
    })
}
