//! Reset history: ring behaviour, storage failures and persistence across
//! simulated boots.

use board_supervisor::adapters::hooks::HookTable;
use board_supervisor::adapters::nvs::NvsStore;
use board_supervisor::adapters::sim::SimBoard;
use board_supervisor::app::ports::StorageError;
use board_supervisor::config::SupervisorConfig;
use board_supervisor::diagnostics::{self, ResetLog, RESET_HISTORY_LEN};
use board_supervisor::{Error, ResetCause, Supervisor};

use crate::mock_hw::MockStorage;

fn cause(raw: u8) -> ResetCause {
    ResetCause::from_raw(raw)
}

fn boots(log: &ResetLog, store: &MockStorage) -> Vec<u32> {
    log.read_all(store).iter().map(|r| r.boot_count).collect()
}

// ── Ring ─────────────────────────────────────────────────────

#[test]
fn fresh_store_has_empty_history() {
    let store = MockStorage::default();
    let log = ResetLog::load(&store);
    assert_eq!(log.boot_count(), 0);
    assert!(log.read_all(&store).is_empty());
    assert_eq!(log.count(&store), 0);
}

#[test]
fn first_record_is_boot_one() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    assert_eq!(log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap(), 1);

    let history = log.read_all(&store);
    assert_eq!(history.len(), 1);
    assert!(history[0].cause().is_power_on());
}

#[test]
fn history_keeps_last_eight_boots_in_order() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    for i in 0..20u8 {
        log.record(&mut store, cause(i)).unwrap();
    }
    let history = log.read_all(&store);
    assert_eq!(history.len(), RESET_HISTORY_LEN);
    assert_eq!(boots(&log, &store), (13..=20).collect::<Vec<u32>>());
    assert_eq!(history[7].cause, 19);
    assert_eq!(log.boot_count(), 20);
    assert_eq!(log.count(&store), RESET_HISTORY_LEN);
}

#[test]
fn reload_continues_where_previous_boot_stopped() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap();
    log.record(&mut store, cause(ResetCause::WATCHDOG)).unwrap();

    let mut reopened = ResetLog::load(&store);
    assert_eq!(reopened, log);
    assert_eq!(reopened.record(&mut store, cause(ResetCause::EXTERNAL)).unwrap(), 3);
    assert_eq!(boots(&reopened, &store), vec![1, 2, 3]);
}

#[test]
fn watchdog_resets_are_counted() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap();
    log.record(&mut store, cause(ResetCause::WATCHDOG)).unwrap();
    log.record(&mut store, cause(ResetCause::WATCHDOG | ResetCause::EXTERNAL))
        .unwrap();
    assert_eq!(log.watchdog_resets(&store), 2);
}

#[test]
fn clear_erases_records_and_keeps_boot_count() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap();
    log.record(&mut store, cause(ResetCause::SOFTWARE)).unwrap();
    log.clear(&mut store).unwrap();

    assert!(log.read_all(&store).is_empty());
    assert_eq!(log.count(&store), 0);
    let reopened = ResetLog::load(&store);
    assert_eq!(reopened.boot_count(), 2);
    assert!(reopened.read_all(&store).is_empty());
}

// ── Storage failures ─────────────────────────────────────────

#[test]
fn failed_slot_write_leaves_counter_and_history_consistent() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap();

    store.fail_key("r1", StorageError::Full);
    assert_eq!(
        log.record(&mut store, cause(ResetCause::WATCHDOG)),
        Err(Error::Storage(StorageError::Full))
    );
    assert_eq!(log.boot_count(), 1);
    assert_eq!(ResetLog::load(&store).boot_count(), 1);
    assert_eq!(boots(&log, &store), vec![1]);

    // Next boot reuses the number the failed boot never got.
    store.heal();
    let mut next = ResetLog::load(&store);
    assert_eq!(next.record(&mut store, cause(ResetCause::SOFTWARE)).unwrap(), 2);
    assert_eq!(boots(&next, &store), vec![1, 2]);
}

#[test]
fn failed_counter_write_does_not_advance_in_memory_state() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    store.fail_key("boot_cnt", StorageError::IoError);

    assert!(log.record(&mut store, cause(ResetCause::POWER_ON)).is_err());
    assert_eq!(log.boot_count(), 0);
    assert_eq!(ResetLog::load(&store).boot_count(), 0);
}

#[test]
fn clear_reports_delete_failures() {
    let mut store = MockStorage::default();
    let mut log = ResetLog::load(&store);
    log.record(&mut store, cause(ResetCause::POWER_ON)).unwrap();

    store.fail_key("reset_idx", StorageError::IoError);
    assert_eq!(
        log.clear(&mut store),
        Err(Error::Storage(StorageError::IoError))
    );
}

// ── Across simulated boots ───────────────────────────────────

/// One boot as the firmware does it: read, report, record, clear.
fn record_boot(sup: &mut Supervisor<SimBoard, HookTable>, store: &mut NvsStore) -> u32 {
    let cause = sup.get_reset_source();
    diagnostics::report_reset_cause(cause);
    let mut log = ResetLog::load(&*store);
    let boot = log.record(store, cause).unwrap();
    sup.clear_reset_source();
    boot
}

#[test]
fn watchdog_hang_shows_up_in_history() {
    let mut store = NvsStore::new().unwrap();
    let mut sup = Supervisor::init(
        SupervisorConfig::default(),
        SimBoard::default(),
        HookTable::new(),
    );
    assert_eq!(record_boot(&mut sup, &mut store), 1);

    sup.watchdog_init();
    sup.board_mut().advance_ms(10_000);

    let (board, hooks) = sup.into_parts();
    let mut sup = Supervisor::init(SupervisorConfig::default(), board, hooks);
    assert_eq!(record_boot(&mut sup, &mut store), 2);

    let log = ResetLog::load(&store);
    let history = log.read_all(&store);
    assert_eq!(history.len(), 2);
    assert!(history[0].cause().is_power_on());
    assert_eq!(history[1].cause(), cause(ResetCause::WATCHDOG));
    assert_eq!(log.watchdog_resets(&store), 1);
}
