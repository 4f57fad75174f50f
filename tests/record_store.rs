use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use flatrec::bank::{Account, AccountKind};
use flatrec::consts::STORE_HDR_SIZE;
use flatrec::restaurant::MenuItem;
use flatrec::store::{inspect, Edit};
use flatrec::{Cents, FixedRecord, RecordStore};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("flatrec-store-{prefix}-{pid}-{t}-{id}"))
}

fn acc(number: u32, name: &str, cents: i64) -> Account {
    Account {
        number,
        name: name.to_string(),
        kind: AccountKind::Savings,
        balance: Cents::from_cents(cents),
    }
}

fn store(root: &PathBuf) -> RecordStore<Account> {
    RecordStore::new(root.join("accounts.dat")).with_fsync(false)
}

#[test]
fn absent_store_reads_as_empty() -> Result<()> {
    let root = unique_root("absent");
    let s = store(&root);
    assert!(!s.exists());
    assert!(s.scan_all()?.is_empty());
    assert_eq!(s.count()?, 0);
    assert!(s.find_by_key(1)?.is_none());
    assert_eq!(s.next_id()?, 1);
    assert_eq!(s.rebuild_excluding(1)?, 0);
    assert!(s.status()?.is_none());
    Ok(())
}

#[test]
fn scan_returns_records_in_append_order() -> Result<()> {
    let root = unique_root("order");
    let s = store(&root);
    let recs = vec![acc(30, "c", 300), acc(10, "a", 100), acc(20, "b", 200)];
    for r in &recs {
        s.append(r)?;
    }
    assert_eq!(s.scan_all()?, recs);
    assert_eq!(s.count()?, 3);

    // restartable: a second pass sees the same sequence
    let keys: Vec<u64> = s.iter()?.map(|r| r.map(|(_, a)| a.key())).collect::<Result<_>>()?;
    assert_eq!(keys, vec![30, 10, 20]);

    let mut seen = Vec::new();
    s.for_each(|pos, a| seen.push((pos, a.number)))?;
    assert_eq!(seen, vec![(0, 30), (1, 10), (2, 20)]);

    let len = fs::metadata(s.path())?.len();
    let slot = (Account::SIZE + 4) as u64;
    assert_eq!(len, STORE_HDR_SIZE as u64 + 3 * slot);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn find_returns_first_match_with_position() -> Result<()> {
    let root = unique_root("find");
    let s = store(&root);
    s.append(&acc(1, "one", 1))?;
    s.append(&acc(2, "two", 2))?;
    s.append(&acc(2, "dup", 3))?;

    let f = s.find_by_key(2)?.expect("key 2 present");
    assert_eq!(f.pos, 1);
    assert_eq!(f.record.name, "two");
    assert!(s.find_by_key(9)?.is_none());

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn update_in_place_touches_only_target() -> Result<()> {
    let root = unique_root("inplace");
    let s = store(&root);
    for n in 1..=4 {
        s.append(&acc(n, &format!("n{n}"), i64::from(n) * 100))?;
    }
    let len_before = fs::metadata(s.path())?.len();

    let f = s.find_by_key(3)?.expect("key 3");
    let mut rec = f.record.clone();
    rec.balance = Cents::from_cents(999);
    s.update_in_place(f.pos, &rec)?;

    let all = s.scan_all()?;
    assert_eq!(all[2].balance, Cents::from_cents(999));
    assert_eq!(all[0], acc(1, "n1", 100));
    assert_eq!(all[1], acc(2, "n2", 200));
    assert_eq!(all[3], acc(4, "n4", 400));
    assert_eq!(fs::metadata(s.path())?.len(), len_before);

    // out of range and stale positions are refused
    assert!(s.update_in_place(10, &rec).is_err());
    assert!(s.update_in_place(0, &rec).is_err());

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn stale_position_after_rebuild_is_refused() -> Result<()> {
    let root = unique_root("stale");
    let s = store(&root);
    s.append(&acc(1, "a", 1))?;
    s.append(&acc(2, "b", 2))?;
    let f = s.find_by_key(2)?.expect("key 2");
    assert_eq!(s.rebuild_excluding(1)?, 1);

    // slot 1 no longer exists
    let err = s.update_in_place(f.pos, &f.record).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err:#}");

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn update_by_key_commit_and_discard() -> Result<()> {
    let root = unique_root("bykey");
    let s = store(&root);
    s.append(&acc(1, "a", 100))?;
    s.append(&acc(2, "b", 200))?;

    let got = s.update_by_key(2, |a| {
        a.balance = Cents::from_cents(250);
        Ok(Edit::Commit(a.balance))
    })?;
    assert_eq!(got, Some(Cents::from_cents(250)));

    let got = s.update_by_key(1, |a| {
        a.balance = Cents::from_cents(0);
        Ok(Edit::Discard("nope"))
    })?;
    assert_eq!(got, Some("nope"));

    let none: Option<()> = s.update_by_key(7, |_| Ok(Edit::Commit(())))?;
    assert!(none.is_none());

    let all = s.scan_all()?;
    assert_eq!(all[0].balance, Cents::from_cents(100));
    assert_eq!(all[1].balance, Cents::from_cents(250));

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn rebuild_removes_all_matches_and_keeps_order() -> Result<()> {
    let root = unique_root("rebuild");
    let s = store(&root);
    let recs = vec![
        acc(1, "a", 1),
        acc(2, "b", 2),
        acc(3, "c", 3),
        acc(2, "b2", 4),
        acc(4, "d", 5),
    ];
    for r in &recs {
        s.append(r)?;
    }
    assert_eq!(s.rebuild_excluding(2)?, 2);
    let expect: Vec<Account> = recs.iter().filter(|a| a.number != 2).cloned().collect();
    assert_eq!(s.scan_all()?, expect);

    assert_eq!(s.rebuild_excluding(42)?, 0);
    assert_eq!(s.scan_all()?, expect);

    // no side file left behind
    let names: Vec<String> = fs::read_dir(&root)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names, vec!["accounts.dat".to_string()]);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn next_id_never_reuses_deleted_keys() -> Result<()> {
    let root = unique_root("nextid");
    let s = store(&root);
    for n in 1..=3 {
        s.append(&acc(n, "x", 0))?;
    }
    assert_eq!(s.next_id()?, 4);
    s.rebuild_excluding(3)?;
    assert_eq!(s.next_id()?, 4);
    s.append(&acc(4, "y", 0))?;
    s.rebuild_excluding(4)?;
    s.rebuild_excluding(2)?;
    assert_eq!(s.next_id()?, 5);
    assert_eq!(s.status()?.expect("present").last_id, 4);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn rewrite_all_replaces_contents() -> Result<()> {
    let root = unique_root("rewrite");
    let s = store(&root);
    for n in 1..=5 {
        s.append(&acc(n, "old", 0))?;
    }
    let fresh = vec![acc(2, "new", 20), acc(1, "new", 10)];
    s.rewrite_all(&fresh)?;
    assert_eq!(s.scan_all()?, fresh);
    // high-water mark survives a shrinking rewrite
    assert_eq!(s.next_id()?, 6);

    s.rewrite_all(&[])?;
    assert!(s.scan_all()?.is_empty());
    assert_eq!(s.next_id()?, 6);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn torn_tail_is_a_read_error() -> Result<()> {
    let root = unique_root("torn");
    let s = store(&root);
    s.append(&acc(1, "a", 1))?;
    s.append(&acc(2, "b", 2))?;
    {
        let mut f = OpenOptions::new().append(true).open(s.path())?;
        f.write_all(&[0xAA; 7])?;
    }
    let err = s.scan_all().unwrap_err();
    assert!(format!("{err:#}").contains("torn tail"), "{err:#}");
    assert!(s.append(&acc(3, "c", 3)).is_err());

    let rep = s.verify()?.expect("present");
    assert_eq!(rep.records, 2);
    assert_eq!(rep.torn_tail_bytes, 7);
    assert!(!rep.is_clean());

    let st = inspect(s.path())?;
    assert_eq!(st.records, 2);
    assert_eq!(st.torn_tail_bytes, 7);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn checksum_mismatch_stops_scan_and_is_reported_by_verify() -> Result<()> {
    let root = unique_root("crc");
    let s = store(&root);
    for n in 1..=3 {
        s.append(&acc(n, "abc", 0))?;
    }
    let slot = (Account::SIZE + 4) as u64;
    {
        // flip a byte inside the name of record 1
        let mut f = OpenOptions::new().write(true).open(s.path())?;
        f.seek(SeekFrom::Start(STORE_HDR_SIZE as u64 + slot + 6))?;
        f.write_all(&[0x5A])?;
    }
    let err = s.scan_all().unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("record 1"), "{msg}");
    assert!(msg.contains("checksum"), "{msg}");

    let rep = s.verify()?.expect("present");
    assert_eq!(rep.records, 3);
    assert_eq!(rep.ok, 2);
    assert_eq!(rep.crc_failures, vec![1]);

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn wrong_record_type_is_refused() -> Result<()> {
    let root = unique_root("tag");
    let path = root.join("accounts.dat");
    RecordStore::<Account>::new(&path)
        .with_fsync(false)
        .append(&acc(1, "a", 1))?;

    let menu = RecordStore::<MenuItem>::new(&path).with_fsync(false);
    assert!(menu.scan_all().is_err());
    assert!(menu.status().is_err());

    fs::remove_dir_all(&root).ok();
    Ok(())
}

#[test]
fn bad_magic_is_refused() -> Result<()> {
    let root = unique_root("magic");
    fs::create_dir_all(&root)?;
    let path = root.join("accounts.dat");
    fs::write(&path, vec![0u8; STORE_HDR_SIZE + 10])?;
    let s = RecordStore::<Account>::new(&path);
    assert!(s.scan_all().is_err());
    assert!(inspect(&path).is_err());

    fs::remove_dir_all(&root).ok();
    Ok(())
}
