//! Integration tests for validate, load, save, and typed access.
//!
//! These tests exercise complete file round-trips through the public API:
//! parsing real files from disk, serializing documents back, and reading
//! values through the typed facade.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use inifile::{validate, Document, Status, SyntaxErrorKind};
use uuid::Uuid;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("inifile_io_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn test_load_parses_sections_pairs_and_comments() {
    let dir = temp_dir();
    let path = write_file(
        &dir,
        "app.ini",
        b"; application settings\n\
          [database]\n\
          host=localhost\n\
          port = 5432\n\
          \n\
          # network tuning\n\
          [network]\n\
          timeout=30\n",
    );

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.section_count().unwrap(), 2);
    assert_eq!(doc.get("database", "host").unwrap(), "localhost");
    assert_eq!(doc.get("database", "port").unwrap(), "5432");
    assert_eq!(doc.get("network", "timeout").unwrap(), "30");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_pairs_before_first_header_land_in_global_section() {
    let dir = temp_dir();
    let path = write_file(&dir, "g.ini", b"orphan=value\n[s]\nk=v\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.get("", "orphan").unwrap(), "value");
    assert_eq!(doc.get("s", "k").unwrap(), "v");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_duplicate_key_keeps_last_occurrence() {
    let dir = temp_dir();
    let path = write_file(&dir, "dup.ini", b"[s]\nk=first\nk=second\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.get("s", "k").unwrap(), "second");
    assert_eq!(doc.pair_count("s").unwrap(), 1);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_repeated_header_reopens_the_section() {
    let dir = temp_dir();
    let path = write_file(&dir, "reopen.ini", b"[s]\na=1\n[other]\nx=9\n[s]\nb=2\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.get("s", "a").unwrap(), "1");
    assert_eq!(doc.get("s", "b").unwrap(), "2");
    assert_eq!(doc.pair_count("s").unwrap(), 2);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_consumes_bom_at_offset_zero_only() {
    let dir = temp_dir();
    // BOM at the start is transparent; BOM bytes mid-file are content.
    let path = write_file(&dir, "bom.ini", b"\xEF\xBB\xBF[s]\n\xEF\xBB\xBFkey=v\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert!(doc.has_section("s").unwrap());
    assert_eq!(doc.get("s", "\u{FEFF}key").unwrap(), "v");
    assert!(!doc.has_key("s", "key").unwrap());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_handles_crlf_terminators() {
    let dir = temp_dir();
    let path = write_file(&dir, "crlf.ini", b"[s]\r\nkey=value\r\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    // No stray \r in the value.
    assert_eq!(doc.get("s", "key").unwrap(), "value");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_dequotes_values() {
    let dir = temp_dir();
    let path = write_file(&dir, "q.ini", b"[s]\nmsg=\"hello world\"\nplain=bare\n");

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.get("s", "msg").unwrap(), "hello world");
    assert_eq!(doc.get("s", "plain").unwrap(), "bare");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_replaces_previous_contents_atomically() {
    let dir = temp_dir();
    let first = write_file(&dir, "first.ini", b"[old]\nk=1\n");
    let second = write_file(&dir, "second.ini", b"[new]\nk=2\n");

    let doc = Document::new();
    doc.load(&first).unwrap();
    doc.load(&second).unwrap();

    assert!(!doc.has_section("old").unwrap(), "reload must not merge");
    assert_eq!(doc.get("new", "k").unwrap(), "2");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_failed_load_leaves_document_unchanged() {
    let dir = temp_dir();
    let good = write_file(&dir, "good.ini", b"[keep]\nk=v\n");
    let bad = write_file(&dir, "bad.ini", b"[keep]\nk=v\nbroken line\n");

    let doc = Document::new();
    doc.load(&good).unwrap();
    assert!(doc.load(&bad).is_err());

    // The document still holds the last good state.
    assert_eq!(doc.get("keep", "k").unwrap(), "v");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_reports_filesystem_shapes() {
    let dir = temp_dir();
    let doc = Document::new();

    let err = doc.load(dir.join("missing.ini")).unwrap_err();
    assert_eq!(err.status(), Status::FileNotFound);

    let empty = write_file(&dir, "empty.ini", b"");
    let err = doc.load(&empty).unwrap_err();
    assert_eq!(err.status(), Status::FileEmpty);

    let err = doc.load(&dir).unwrap_err();
    assert_eq!(err.status(), Status::FileIsDirectory);

    let err = doc.load("").unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
    fs::remove_dir_all(&dir).ok();
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn test_validate_accepts_what_load_accepts() {
    let dir = temp_dir();
    let path = write_file(
        &dir,
        "ok.ini",
        b"before=header\n; comment\n[s]\nk=v\nq=\"spaced value\"\n",
    );

    validate(&path).unwrap();
    let doc = Document::new();
    doc.load(&path).unwrap();
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_validate_positions_the_first_violation() {
    let dir = temp_dir();
    let cases: &[(&[u8], u64, SyntaxErrorKind)] = &[
        (b"[s]\n[broken\n", 2, SyntaxErrorKind::UnterminatedHeader),
        (b"[]\n", 1, SyntaxErrorKind::EmptySectionName),
        (b"[s]\n=value\n", 2, SyntaxErrorKind::EmptyKey),
        (b"[s]\nk=\"open\n", 2, SyntaxErrorKind::UnbalancedQuote),
        (b"[s]\nlist=a,b,c\n", 2, SyntaxErrorKind::ArrayValue),
        (b"[s]\nk=v\nstray text\n", 3, SyntaxErrorKind::StrayLine),
    ];

    for (i, (content, line, kind)) in cases.iter().enumerate() {
        let path = write_file(&dir, &format!("bad{i}.ini"), content);
        let err = validate(&path).unwrap_err();
        assert_eq!(err.line(), Some(*line), "case {i}");
        assert_eq!(err.syntax_kind(), Some(*kind), "case {i}");
        assert_eq!(err.status(), Status::FileBadFormat, "case {i}");
    }
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_line_length_boundary() {
    let dir = temp_dir();

    // 8191 content bytes: the longest legal line.
    let ok = format!("key={}\n", "v".repeat(8191 - 4));
    let path = write_file(&dir, "long_ok.ini", ok.as_bytes());
    validate(&path).unwrap();

    // 8192 content bytes: one too many.
    let bad = format!("key={}\n", "v".repeat(8192 - 4));
    let path = write_file(&dir, "long_bad.ini", bad.as_bytes());
    let err = validate(&path).unwrap_err();
    assert_eq!(err.syntax_kind(), Some(SyntaxErrorKind::LineTooLong));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_validate_rejects_non_utf8_content() {
    let dir = temp_dir();
    let path = write_file(&dir, "latin1.ini", b"[s]\nname=caf\xE9\n");
    let err = validate(&path).unwrap_err();
    assert_eq!(err.syntax_kind(), Some(SyntaxErrorKind::InvalidUtf8));
    assert_eq!(err.line(), Some(2));
    fs::remove_dir_all(&dir).ok();
}

// ── Saving ────────────────────────────────────────────────────────────────────

#[test]
fn test_save_then_load_round_trips_the_document() {
    let dir = temp_dir();
    let path = dir.join("out.ini");

    let doc = Document::new();
    doc.set("", "global_key", "global").unwrap();
    doc.set("server", "host", "localhost").unwrap();
    doc.set("server", "motd", "hello world").unwrap();
    doc.set("server", "empty", "").unwrap();
    doc.set("paths", "log", "/var/log/app.log").unwrap();
    doc.save(&path).unwrap();

    let reloaded = Document::new();
    reloaded.load(&path).unwrap();
    assert_eq!(doc, reloaded);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_save_writes_global_pairs_headerless_and_first() {
    let dir = temp_dir();
    let path = dir.join("g.ini");

    let doc = Document::new();
    doc.set("", "top", "1").unwrap();
    doc.set("s", "k", "v").unwrap();
    doc.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("top=1\n"), "got: {text:?}");
    assert!(text.contains("\n\n[s]\n"), "one blank line before header: {text:?}");
    assert!(text.ends_with('\n'), "LF at end of last line");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_save_of_global_only_document_produces_headerless_file() {
    let dir = temp_dir();
    let path = dir.join("only_global.ini");

    let doc = Document::new();
    doc.set("", "a", "1").unwrap();
    doc.set("", "b", "2").unwrap();
    doc.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains('['), "no header expected: {text:?}");

    let reloaded = Document::new();
    reloaded.load(&path).unwrap();
    assert_eq!(reloaded.get("", "a").unwrap(), "1");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_save_quotes_values_that_need_it() {
    let dir = temp_dir();
    let path = dir.join("quoted.ini");

    let doc = Document::new();
    doc.set("s", "spaced", "two words").unwrap();
    doc.set("s", "commented", "semi;colon").unwrap();
    doc.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("spaced=\"two words\"\n"), "got: {text:?}");
    assert!(text.contains("commented=\"semi;colon\"\n"), "got: {text:?}");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_save_rejects_directory_target() {
    let dir = temp_dir();
    let doc = Document::new();
    doc.set("s", "k", "v").unwrap();

    let err = doc.save(&dir).unwrap_err();
    assert_eq!(err.status(), Status::FileIsDirectory);
    fs::remove_dir_all(&dir).ok();
}

#[cfg(unix)]
#[test]
fn test_save_rejects_readonly_target() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir();
    let path = write_file(&dir, "ro.ini", b"[s]\nk=v\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

    let doc = Document::new();
    doc.set("s", "k", "new").unwrap();
    let err = doc.save(&path).unwrap_err();
    assert_eq!(err.status(), Status::FilePermissionDenied);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    fs::remove_dir_all(&dir).ok();
}

// ── Typed access over a real file ─────────────────────────────────────────────

#[test]
fn test_typed_reads_from_a_loaded_file() {
    let dir = temp_dir();
    let path = write_file(
        &dir,
        "typed.ini",
        b"[server]\nport=8080\nratio=0.75\nverbose=yes\nname=prod\n",
    );

    let doc = Document::new();
    doc.load(&path).unwrap();

    assert_eq!(doc.get_int("server", "port").unwrap(), 8080);
    assert_eq!(doc.get_float("server", "ratio").unwrap(), 0.75);
    assert!(doc.get_bool("server", "verbose").unwrap());
    assert_eq!(doc.get("server", "name").unwrap(), "prod");
    assert_eq!(doc.get_or_int("server", "workers", 4).unwrap(), 4);

    let err = doc.get_int("server", "name").unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
    fs::remove_dir_all(&dir).ok();
}

// ── Concurrency ───────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_readers_never_observe_a_partial_load() {
    let dir = temp_dir();
    // Two files whose sections are internally consistent: a reader must see
    // either all of file A or all of file B, never a mix.
    let a = write_file(&dir, "a.ini", b"[state]\nleft=A\nright=A\n");
    let b = write_file(&dir, "b.ini", b"[state]\nleft=B\nright=B\n");

    let doc = Arc::new(Document::new());
    doc.load(&a).unwrap();

    let writer = {
        let doc = Arc::clone(&doc);
        let (a, b) = (a.clone(), b.clone());
        thread::spawn(move || {
            for i in 0..50 {
                let path = if i % 2 == 0 { &b } else { &a };
                doc.load(path).expect("load must succeed");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let doc = Arc::clone(&doc);
            thread::spawn(move || {
                for _ in 0..200 {
                    let left = doc.get("state", "left").expect("left present");
                    let right = doc.get("state", "right").expect("right present");
                    // Values come from one whole file. A torn load would let
                    // a reader catch left/right from different generations,
                    // but get() itself always sees a complete table.
                    assert!(left == "A" || left == "B");
                    assert!(right == "A" || right == "B");
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }
    fs::remove_dir_all(&dir).ok();
}
