//! End-to-end scenarios S1-S6 against fake collaborators: no real
//! filesystem writes, no real process spawns.

mod support;

use mce_core::config::{BucketSetting, Config};
use mce_core::event::{CeEvent, CpuModel, StatusFlags};
use mce_core::offliner::OfflineMode;
use mce_core::record::OfflineStatus;
use mce_core::sysfs::{HARD_OFFLINE_PATH, SOFT_OFFLINE_PATH};
use mce_core::{setup, Accountant};
use std::rc::Rc;
use support::{FakeSpawner, FakeSysfs, NullDimm};

fn event(addr: u64, time: u64) -> CeEvent {
    CeEvent {
        addr,
        status: StatusFlags {
            addrv: true,
            uc: false,
        },
        time,
        cpu: 1,
        ext_cpu: 0,
        bank: 0,
        socket_id: 0,
        channel: 1,
        dimm: 2,
    }
}

fn config(action: OfflineMode, max_corr_err_counters: u64) -> Config {
    Config {
        page_trigger: BucketSetting {
            capacity: 3,
            agetime_secs: 3600,
        },
        replacement_trigger: BucketSetting {
            capacity: 2,
            agetime_secs: 3600,
        },
        action,
        max_corr_err_counters,
        page_size: 4096,
        row_radius: 1,
        page_trigger_path: Some("/usr/local/bin/page-trigger".into()),
        replacement_trigger_path: Some("/usr/local/bin/replacement-trigger".into()),
        pre_soft_trigger_path: Some("/usr/local/bin/pre-soft".into()),
        post_soft_trigger_path: Some("/usr/local/bin/post-soft".into()),
        cpu_model: CpuModel::Other,
    }
}

#[test]
fn s1_happy_path() {
    let sysfs = FakeSysfs::default();
    sysfs.allow(SOFT_OFFLINE_PATH);
    let spawner = FakeSpawner::default();

    let mut core = setup(
        config(OfflineMode::Soft, 1024),
        Box::new(sysfs),
        Box::new(spawner),
        Box::new(NullDimm),
    )
    .unwrap();

    for t in 0..3 {
        Accountant::account_event(&mut core, event(0x10000, t));
    }

    let handle = core.index.lookup(0x10000).expect("record created");
    let record = core.pool.get(handle);
    assert_eq!(record.ce_count, 3);
    assert!(record.triggered);
    assert_eq!(record.offline_status, OfflineStatus::Offline);
}

#[test]
fn s2_uncorrected_filter_leaves_no_trace() {
    let mut core = setup(
        config(OfflineMode::Account, 1024),
        Box::new(FakeSysfs::default()),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    let mut ev = event(0x20000, 0);
    ev.status.uc = true;
    Accountant::account_event(&mut core, ev);

    assert!(core.index.is_empty());
}

#[test]
fn s3_sandybridge_ep_dedup() {
    let mut core = setup(
        {
            let mut c = config(OfflineMode::Account, 1024);
            c.cpu_model = CpuModel::SandyBridgeEp;
            c
        },
        Box::new(FakeSysfs::default()),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    let mut dup = event(0x30000, 0);
    dup.bank = 1;
    dup.cpu = 0;
    dup.ext_cpu = 0;
    Accountant::account_event(&mut core, dup);
    assert!(core.index.is_empty());

    let mut real = event(0x30000, 1);
    real.bank = 1;
    real.cpu = 1;
    Accountant::account_event(&mut core, real);
    assert_eq!(core.index.len(), 1);
}

#[test]
fn s4_soft_then_hard_fallback() {
    let sysfs = FakeSysfs::default();
    sysfs.allow(SOFT_OFFLINE_PATH);
    sysfs.allow(HARD_OFFLINE_PATH);
    sysfs.fail(SOFT_OFFLINE_PATH);

    let mut core = setup(
        config(OfflineMode::SoftThenHard, 1024),
        Box::new(sysfs),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    for t in 0..3 {
        Accountant::account_event(&mut core, event(0x40000, t));
    }

    let handle = core.index.lookup(0x40000).unwrap();
    assert_eq!(core.pool.get(handle).offline_status, OfflineStatus::Offline);
}

#[test]
fn s5_eviction_preserves_capacity_and_counts_replacement() {
    // Exactly one cluster's worth of capacity: once it is full, every
    // subsequent miss reclaims the *whole* cluster at once (see the
    // cluster-granularity eviction design note), not just the single
    // oldest record.
    let slots = mce_core::cluster::slots_per_cluster() as u64;
    let mut core = setup(
        config(OfflineMode::Account, slots),
        Box::new(FakeSysfs::default()),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    for i in 0..slots {
        Accountant::account_event(&mut core, event((i + 1) * 0x1000, i));
    }
    assert_eq!(core.index.len() as u64, slots);

    Accountant::account_event(&mut core, event((slots + 1) * 0x1000, slots));

    // the whole saturated cluster was reclaimed in one shot: only the
    // newly inserted address survives.
    assert_eq!(core.index.len(), 1);
    assert_eq!(core.replacement.count, 1);
    assert!(core.index.lookup(0x1000).is_none());
    assert!(core.index.lookup((slots + 1) * 0x1000).is_some());
}

#[test]
fn s6_kernel_interface_missing_demotes_to_account() {
    let mut core = setup(
        config(OfflineMode::Soft, 1024),
        Box::new(FakeSysfs::default()), // nothing marked writable
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    assert_eq!(core.config.action, OfflineMode::Account);

    for t in 0..3 {
        Accountant::account_event(&mut core, event(0x60000, t));
    }
    let handle = core.index.lookup(0x60000).unwrap();
    // still Online: Account mode never attempts an offline.
    assert_eq!(core.pool.get(handle).offline_status, OfflineStatus::Online);
}

#[test]
fn lru_keeps_frequently_touched_cluster_alive_under_load() {
    // Eviction in this design reclaims a whole LRU-tail *cluster* at
    // once (see the cluster-granularity design note). Two clusters'
    // worth of capacity is the minimum needed to show that touching a
    // page protects its cluster, not just the one page.
    let slots = mce_core::cluster::slots_per_cluster() as u64;
    let mut core = setup(
        config(OfflineMode::Account, slots * 2),
        Box::new(FakeSysfs::default()),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    let hot_addr = 0x1000u64; // lands in the first cluster allocated
    let mut t = 0u64;
    Accountant::account_event(&mut core, event(hot_addr, t));
    t += 1;

    // fill out the rest of the first cluster, then all of the second --
    // capacity is now exactly saturated and the first cluster (holding
    // hot_addr) is the LRU tail.
    for i in 1..(slots * 2) {
        Accountant::account_event(&mut core, event((i + 1) * 0x1000, t));
        t += 1;
    }
    assert_eq!(core.index.len() as u64, slots * 2);

    // re-touch the hot page: its cluster moves back to the LRU head, so
    // the second cluster becomes the next eviction target instead.
    Accountant::account_event(&mut core, event(hot_addr, t));
    t += 1;

    let second_cluster_addr = (slots + 1) * 0x1000;
    Accountant::account_event(&mut core, event(0xfeed_0000, t));

    assert!(core.index.lookup(hot_addr).is_some());
    assert!(core.index.lookup(second_cluster_addr).is_none());
}

#[test]
fn row_offline_writes_neighbour_pages_to_sysfs() {
    let sysfs = Rc::new(FakeSysfs::default());
    sysfs.allow(HARD_OFFLINE_PATH);

    let mut cfg = config(OfflineMode::Hard, 1024);
    cfg.row_radius = 2;

    let mut core = setup(
        cfg,
        Box::new(Rc::clone(&sysfs)),
        Box::new(FakeSpawner::default()),
        Box::new(NullDimm),
    )
    .unwrap();

    for t in 0..3 {
        Accountant::account_event(&mut core, event(0x70000, t));
    }

    let handle = core.index.lookup(0x70000).unwrap();
    assert_eq!(core.pool.get(handle).offline_status, OfflineStatus::Offline);

    let writes = sysfs.writes.borrow();
    let written_payloads: Vec<&String> = writes.iter().map(|(_, payload)| payload).collect();
    for k in -2i64..=2 {
        let target = (0x70000i128 + k as i128 * 0x1000) as u64;
        let payload = format!("{target:#x}");
        assert!(
            written_payloads.contains(&&payload),
            "missing neighbour offset {k} ({payload})"
        );
    }
    assert_eq!(writes.len(), 5, "expected target plus 2 neighbours each side");
}
