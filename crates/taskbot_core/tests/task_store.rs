use chrono::NaiveDate;
use std::fs;
use taskbot_core::storage::load_lines;
use taskbot_core::{encode_task, FixedClock, LoadReport, TaskList, TaskStore};

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
}

#[test]
fn load_skips_bad_lines_and_counts_them() {
    let content = "\
[T][ ] buy groceries

[D][X] submit report (by:2025-10-15)
this is not a task
[D][ ] ancient (by:1900-01-01)
[E][ ] camp (from:2025-07-03 to:2025-07-01)
[E][ ] offsite (from:2025-07-01 to:2025-07-03)
";
    let mut list = TaskList::with_clock(clock());

    let report = load_lines(content, &mut list);

    assert_eq!(
        report,
        LoadReport {
            lines_read: 7,
            blank_lines: 1,
            tasks_loaded: 3,
            failures: 3,
        }
    );
    let lines = list.tasks().iter().map(encode_task).collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "[T][ ] buy groceries",
            "[D][X] submit report (by:2025-10-15)",
            "[E][ ] offsite (from:2025-07-01 to:2025-07-03)",
        ]
    );
}

#[test]
fn garbage_only_file_loads_empty_list() {
    let mut list = TaskList::with_clock(clock());
    let report = load_lines("???\n[X][X] nope\n", &mut list);
    assert_eq!(list.size(), 0);
    assert_eq!(report.failures, 2);
}

#[test]
fn missing_file_loads_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("absent.txt"));

    let (list, report) = store.load(clock()).unwrap();

    assert!(list.is_empty());
    assert_eq!(report, LoadReport::default());
}

#[test]
fn save_then_load_preserves_order_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("nested").join("tasks.txt"));
    let mut list = TaskList::with_clock(clock());
    list.add_plain("buy groceries");
    list.add_deadline("submit report /by 2025-10-15");
    list.add_event("camp /from 2025-07-01 /to 2025-07-03");
    list.mark_task(2);

    store.save(&list).unwrap();
    let written = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        written,
        "[T][ ] buy groceries\n[D][X] submit report (by:2025-10-15)\n[E][ ] camp (from:2025-07-01 to:2025-07-03)\n"
    );

    let (reloaded, report) = store.load(clock()).unwrap();
    assert_eq!(report.tasks_loaded, 3);
    assert_eq!(reloaded.show_all_tasks(), list.show_all_tasks());
}

#[test]
fn save_keeps_previous_file_as_backup() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("tasks.txt"));
    let mut list = TaskList::with_clock(clock());
    list.add_plain("first");
    store.save(&list).unwrap();

    list.add_plain("second");
    store.save(&list).unwrap();

    assert_eq!(
        fs::read_to_string(store.backup_path()).unwrap(),
        "[T][ ] first\n"
    );
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "[T][ ] first\n[T][ ] second\n"
    );
    assert!(!dir.path().join("tasks.txt.tmp").exists());
}

#[test]
fn unreadable_primary_falls_back_to_backup() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("tasks.txt"));
    // A directory at the primary path cannot be read as a file.
    fs::create_dir(store.path()).unwrap();
    fs::write(store.backup_path(), "[T][X] recovered\n").unwrap();

    let (list, report) = store.load(clock()).unwrap();

    assert_eq!(report.tasks_loaded, 1);
    assert_eq!(list.get_task(0).unwrap().to_string(), "[T][X] recovered");
}

#[test]
fn unreadable_primary_without_backup_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("tasks.txt"));
    fs::create_dir(store.path()).unwrap();

    let err = store.load(clock()).unwrap_err();

    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn invalid_utf8_line_is_skipped_without_losing_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("tasks.txt"));
    let mut content = b"[T][ ] first\n[T][ ] bad ".to_vec();
    content.extend_from_slice(&[0xff, 0xfe]);
    content.extend_from_slice(b"\n[T][X] third\r\n");
    fs::write(store.path(), &content).unwrap();
    fs::write(store.backup_path(), "[T][ ] stale backup\n").unwrap();

    let (list, report) = store.load(clock()).unwrap();

    assert_eq!(
        report,
        LoadReport {
            lines_read: 3,
            blank_lines: 0,
            tasks_loaded: 2,
            failures: 1,
        }
    );
    let lines = list.tasks().iter().map(encode_task).collect::<Vec<_>>();
    assert_eq!(lines, vec!["[T][ ] first", "[T][X] third"]);

    store.save(&list).unwrap();
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "[T][ ] first\n[T][X] third\n"
    );
}

#[test]
fn failed_save_leaves_previous_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    let store = TaskStore::new(&path);
    let mut list = TaskList::with_clock(clock());
    list.add_plain("keep me");
    store.save(&list).unwrap();

    // A directory squatting on the staging path makes the staging write fail.
    fs::create_dir(dir.path().join("tasks.txt.tmp")).unwrap();
    list.add_plain("lost");
    let err = store.save(&list).unwrap_err();

    assert!(err.to_string().contains("failed to write"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[T][ ] keep me\n");
}

#[test]
fn free_functions_mirror_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "[T][ ] from disk\n").unwrap();

    let mut list = taskbot_core::load(&path).unwrap();
    assert_eq!(list.size(), 1);
    list.add_plain("added");
    taskbot_core::save(&list, &path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[T][ ] from disk\n[T][ ] added\n"
    );
}
